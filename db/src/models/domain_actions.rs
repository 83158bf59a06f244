use crate::models::enums::*;
use crate::schema::domain_actions;
use crate::utils::errors::ConvertToDatabaseError;
use crate::utils::errors::DatabaseError;
use crate::utils::errors::ErrorCode;
use chrono::{Duration, NaiveDateTime, Utc};
use diesel::dsl;
use diesel::prelude::*;
use serde::Deserialize;
use uuid::Uuid;

/// A queued unit of background work. Workers poll for pending actions,
/// lease them via `blocked_until` and report the outcome back.
#[derive(Clone, Debug, Identifiable, PartialEq, Queryable)]
pub struct DomainAction {
    pub id: Uuid,
    pub domain_action_type: DomainActionTypes,
    pub payload: serde_json::Value,
    pub main_table: Option<String>,
    pub main_table_id: Option<Uuid>,
    pub scheduled_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
    pub last_attempted_at: Option<NaiveDateTime>,
    pub attempt_count: i64,
    pub max_attempt_count: i64,
    pub status: DomainActionStatus,
    pub last_failure_reason: Option<String>,
    pub blocked_until: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Deserialize)]
#[diesel(table_name = domain_actions)]
pub struct DomainActionEditableAttributes {
    pub scheduled_at: Option<NaiveDateTime>,
    pub last_attempted_at: Option<NaiveDateTime>,
    pub attempt_count: Option<i64>,
    pub blocked_until: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = domain_actions)]
pub struct NewDomainAction {
    pub domain_action_type: DomainActionTypes,
    pub payload: serde_json::Value,
    pub main_table: Option<String>,
    pub main_table_id: Option<Uuid>,
    pub scheduled_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
    pub last_attempted_at: Option<NaiveDateTime>,
    pub attempt_count: i64,
    pub max_attempt_count: i64,
    pub status: DomainActionStatus,
}

impl NewDomainAction {
    pub fn commit(self, conn: &mut PgConnection) -> Result<DomainAction, DatabaseError> {
        diesel::insert_into(domain_actions::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not insert domain action")
    }
}

impl DomainAction {
    pub fn create(
        domain_action_type: DomainActionTypes,
        payload: serde_json::Value,
        main_table: Option<String>,
        main_table_id: Option<Uuid>,
        scheduled_at: NaiveDateTime,
        expires_at: NaiveDateTime,
        max_attempt_count: i64,
    ) -> NewDomainAction {
        NewDomainAction {
            domain_action_type,
            payload,
            main_table,
            main_table_id,
            scheduled_at,
            expires_at,
            last_attempted_at: None,
            attempt_count: 0,
            max_attempt_count,
            status: DomainActionStatus::Pending,
        }
    }

    pub fn find_pending(
        domain_action_type: Option<DomainActionTypes>,
        conn: &mut PgConnection,
    ) -> Result<Vec<DomainAction>, DatabaseError> {
        let mut query = domain_actions::table
            .filter(domain_actions::scheduled_at.le(dsl::now))
            .filter(domain_actions::expires_at.gt(dsl::now))
            .filter(domain_actions::blocked_until.le(dsl::now))
            .filter(domain_actions::attempt_count.lt(domain_actions::max_attempt_count))
            .filter(domain_actions::status.eq(DomainActionStatus::Pending))
            .into_boxed();

        if let Some(action_type) = domain_action_type {
            query = query.filter(domain_actions::domain_action_type.eq(action_type));
        }

        query
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading domain actions")
    }

    /// True when a live pending action already exists for the given type and
    /// target row. Used to avoid double-scheduling recurring work.
    pub fn has_pending_action(
        action_type: DomainActionTypes,
        main_table: Option<String>,
        main_table_id: Option<Uuid>,
        conn: &mut PgConnection,
    ) -> Result<bool, DatabaseError> {
        let mut query = domain_actions::table
            .select(dsl::count(domain_actions::id))
            .filter(domain_actions::domain_action_type.eq(action_type))
            .filter(domain_actions::status.eq(DomainActionStatus::Pending))
            .filter(domain_actions::expires_at.gt(dsl::now))
            .into_boxed();

        if let Some(main_table) = main_table {
            query = query.filter(domain_actions::main_table.eq(main_table));
        }
        if let Some(main_table_id) = main_table_id {
            query = query.filter(domain_actions::main_table_id.eq(main_table_id));
        }

        query
            .limit(1)
            .get_result(conn)
            .map(|count: i64| count > 0)
            .to_db_error(ErrorCode::QueryError, "Error loading domain actions")
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<DomainAction, DatabaseError> {
        domain_actions::table
            .find(id)
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading domain action")
    }

    /// Leases the action for `timeout` seconds so other workers skip it.
    pub fn set_busy(&self, timeout: i64, conn: &mut PgConnection) -> Result<(), DatabaseError> {
        let timeout = Utc::now().naive_utc() + Duration::seconds(timeout);
        let db_blocked = DomainAction::find(self.id, conn)?;
        if db_blocked.blocked_until > Utc::now().naive_utc() {
            return DatabaseError::concurrency_error("Another process is busy with this action");
        }
        diesel::update(self)
            .filter(domain_actions::blocked_until.le(timeout))
            .set((
                domain_actions::blocked_until.eq(timeout),
                domain_actions::updated_at.eq(dsl::now),
            ))
            .get_result::<DomainAction>(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not update domain action")?;
        Ok(())
    }

    pub fn set_done(&self, conn: &mut PgConnection) -> Result<DomainAction, DatabaseError> {
        diesel::update(self)
            .set((
                domain_actions::status.eq(DomainActionStatus::Success),
                domain_actions::updated_at.eq(dsl::now),
            ))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not update domain action")
    }

    /// Records a transient failure. The action stays pending and will be
    /// retried until `max_attempt_count` is reached, at which point it moves
    /// to `RetriesExceeded`. For permanent failures use `set_errored`.
    pub fn set_failed(&self, reason: &str, conn: &mut PgConnection) -> Result<DomainAction, DatabaseError> {
        if self.max_attempt_count <= self.attempt_count + 1 {
            diesel::update(self)
                .set((
                    domain_actions::last_failure_reason.eq(reason),
                    domain_actions::status.eq(DomainActionStatus::RetriesExceeded),
                    domain_actions::attempt_count.eq(self.attempt_count + 1),
                    domain_actions::blocked_until.eq(dsl::now),
                    domain_actions::updated_at.eq(dsl::now),
                ))
                .get_result(conn)
                .to_db_error(ErrorCode::UpdateError, "Could not update domain action")
        } else {
            // Intentionally leave checked out until the lease lapses
            diesel::update(self)
                .set((
                    domain_actions::last_failure_reason.eq(reason),
                    domain_actions::attempt_count.eq(self.attempt_count + 1),
                    domain_actions::updated_at.eq(dsl::now),
                ))
                .get_result(conn)
                .to_db_error(ErrorCode::UpdateError, "Could not update domain action")
        }
    }

    /// Marks the action permanently failed. It will not be retried.
    pub fn set_errored(&self, reason: &str, conn: &mut PgConnection) -> Result<DomainAction, DatabaseError> {
        diesel::update(self)
            .set((
                domain_actions::last_failure_reason.eq(reason),
                domain_actions::status.eq(DomainActionStatus::Errored),
                domain_actions::blocked_until.eq(dsl::now),
                domain_actions::updated_at.eq(dsl::now),
            ))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not update domain action")
    }

    pub fn set_cancelled(&self, conn: &mut PgConnection) -> Result<DomainAction, DatabaseError> {
        diesel::update(self)
            .set((
                domain_actions::status.eq(DomainActionStatus::Cancelled),
                domain_actions::updated_at.eq(dsl::now),
            ))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not update domain action")
    }

    pub fn update(
        &self,
        attributes: &DomainActionEditableAttributes,
        conn: &mut PgConnection,
    ) -> Result<DomainAction, DatabaseError> {
        diesel::update(self)
            .set((attributes, domain_actions::updated_at.eq(dsl::now)))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not update domain action")
    }
}
