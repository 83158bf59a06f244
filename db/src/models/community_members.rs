use crate::models::enums::*;
use crate::models::{Community, User};
use crate::schema::community_members;
use crate::utils::errors::ConvertToDatabaseError;
use crate::utils::errors::DatabaseError;
use crate::utils::errors::ErrorCode;
use crate::utils::errors::Optional;
use chrono::NaiveDateTime;
use diesel::dsl;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Associations, Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, Serialize)]
#[diesel(belongs_to(Community))]
#[diesel(belongs_to(User))]
pub struct CommunityMember {
    pub id: Uuid,
    pub community_id: Uuid,
    pub user_id: Uuid,
    pub role: CommunityRole,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize)]
#[diesel(table_name = community_members)]
pub struct NewCommunityMember {
    pub community_id: Uuid,
    pub user_id: Uuid,
    pub role: CommunityRole,
}

impl NewCommunityMember {
    pub fn commit(&self, conn: &mut PgConnection) -> Result<CommunityMember, DatabaseError> {
        diesel::insert_into(community_members::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not add member to community")
    }
}

impl CommunityMember {
    pub fn create(community_id: Uuid, user_id: Uuid, role: CommunityRole) -> NewCommunityMember {
        NewCommunityMember {
            community_id,
            user_id,
            role,
        }
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<CommunityMember, DatabaseError> {
        community_members::table
            .find(id)
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading community member")
    }

    pub fn find_by_community_and_user(
        community_id: Uuid,
        user_id: Uuid,
        conn: &mut PgConnection,
    ) -> Result<CommunityMember, DatabaseError> {
        community_members::table
            .filter(community_members::community_id.eq(community_id))
            .filter(community_members::user_id.eq(user_id))
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading community member")
    }

    pub fn find_for_community(community_id: Uuid, conn: &mut PgConnection) -> Result<Vec<CommunityMember>, DatabaseError> {
        community_members::table
            .filter(community_members::community_id.eq(community_id))
            .order_by(community_members::created_at.asc())
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading community members")
    }

    pub fn role_for_user(
        community_id: Uuid,
        user_id: Uuid,
        conn: &mut PgConnection,
    ) -> Result<Option<CommunityRole>, DatabaseError> {
        Ok(
            CommunityMember::find_by_community_and_user(community_id, user_id, conn)
                .optional()?
                .map(|m| m.role),
        )
    }

    pub fn update_role(&self, role: CommunityRole, conn: &mut PgConnection) -> Result<CommunityMember, DatabaseError> {
        diesel::update(self)
            .set((
                community_members::role.eq(role),
                community_members::updated_at.eq(dsl::now),
            ))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not update community member role")
    }
}
