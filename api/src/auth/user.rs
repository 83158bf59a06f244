use crate::auth::AccessToken;
use crate::errors::{ApiError, AuthError};
use diesel::PgConnection;
use gather_db::prelude::*;
use uuid::Uuid;

/// The caller behind the current request. Users are provisioned on their
/// first authenticated request from the token claims.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user: User,
}

impl AuthUser {
    pub fn load(claims: &AccessToken, conn: &mut PgConnection) -> Result<AuthUser, ApiError> {
        let user = match User::find_by_sub(&claims.sub, conn).optional()? {
            Some(user) => user,
            None => {
                let email = claims
                    .email
                    .as_deref()
                    .ok_or_else(|| AuthError::unauthorized("Token is missing an email claim"))?;
                User::create(&claims.sub, email, claims.name.clone()).commit(conn)?
            }
        };
        Ok(AuthUser { user })
    }

    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn is_admin(&self) -> bool {
        self.user.admin
    }

    /// Whether the user can manage content in the community. Site admins
    /// can manage any community.
    pub fn is_organizer(&self, community_id: Uuid, conn: &mut PgConnection) -> Result<bool, ApiError> {
        if self.is_admin() {
            return Ok(true);
        }
        let role = CommunityMember::role_for_user(community_id, self.id(), conn)?;
        Ok(matches!(
            role,
            Some(CommunityRole::Admin) | Some(CommunityRole::Collaborator)
        ))
    }

    pub fn require_organizer(&self, community_id: Uuid, conn: &mut PgConnection) -> Result<(), ApiError> {
        if self.is_organizer(community_id, conn)? {
            Ok(())
        } else {
            Err(AuthError::forbidden("User cannot manage this community's content").into())
        }
    }

    /// Member management needs the community admin role, not just
    /// collaborator.
    pub fn require_community_admin(&self, community_id: Uuid, conn: &mut PgConnection) -> Result<(), ApiError> {
        if self.is_admin() {
            return Ok(());
        }
        match CommunityMember::role_for_user(community_id, self.id(), conn)? {
            Some(CommunityRole::Admin) => Ok(()),
            _ => Err(AuthError::forbidden("User is not an admin of this community").into()),
        }
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AuthError::forbidden("User is not a site admin").into())
        }
    }
}
