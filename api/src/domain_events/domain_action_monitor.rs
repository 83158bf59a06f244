use crate::config::Config;
use crate::db::Database;
use crate::domain_events::DomainActionRouter;
use crate::errors::ApiError;
use chrono::{Duration as ChronoDuration, Utc};
use gather_db::prelude::*;
use log::Level::*;
use serde_json::json;
use std::sync::mpsc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Duration;

const LOG_TARGET: &str = "gather::domain_actions";
const ACTION_LEASE_SECONDS: i64 = 60;
const EXPIRY_SWEEP_PERIOD_SECONDS: i64 = 60;

/// Polls the domain action queue on a worker thread and dispatches each
/// pending action to its executor.
pub struct DomainActionMonitor {
    config: Config,
    database: Database,
    interval: u64,
    worker: Option<(Sender<()>, thread::JoinHandle<()>)>,
}

impl DomainActionMonitor {
    pub fn new(config: Config, database: Database, poll_period_in_secs: u64) -> DomainActionMonitor {
        DomainActionMonitor {
            config,
            database,
            interval: poll_period_in_secs,
            worker: None,
        }
    }

    pub fn start(&mut self) {
        let (tx, rx) = mpsc::channel::<()>();
        let config = self.config.clone();
        let database = self.database.clone();
        let interval = self.interval;

        let handle = thread::spawn(move || {
            if let Err(e) = DomainActionMonitor::run_actions(config, database, interval, rx) {
                jlog!(Error, LOG_TARGET, "Domain action processor failed", { "error": e.to_string() });
            }
        });

        self.worker = Some((tx, handle));
    }

    pub fn stop(&mut self) {
        if let Some((tx, handle)) = self.worker.take() {
            // The worker may have already exited on error
            tx.send(()).ok();
            handle.join().ok();
        }
    }

    /// Processes everything currently due and returns. Used by tests and
    /// one-shot worker invocations.
    pub fn run_til_empty(&self) -> Result<(), ApiError> {
        let mut router = DomainActionRouter::new();
        router.set_up_executors(&self.config);
        while DomainActionMonitor::process_pending_actions(&self.database, &router)? > 0 {}
        Ok(())
    }

    fn run_actions(config: Config, database: Database, interval: u64, rx: Receiver<()>) -> Result<(), ApiError> {
        let mut router = DomainActionRouter::new();
        router.set_up_executors(&config);

        loop {
            if rx.try_recv().is_ok() {
                jlog!(Info, LOG_TARGET, "Stopping actions processor", {});
                break;
            }

            DomainActionMonitor::schedule_recurring_actions(&database)?;

            let processed = DomainActionMonitor::process_pending_actions(&database, &router)?;
            if processed == 0 {
                thread::sleep(Duration::from_secs(interval));
            }
        }
        Ok(())
    }

    /// Keeps one purchase order expiry sweep on the queue at all times.
    fn schedule_recurring_actions(database: &Database) -> Result<(), ApiError> {
        let mut conn = database.get_connection()?;
        let conn = &mut *conn;

        if !DomainAction::has_pending_action(DomainActionTypes::ExpirePurchaseOrders, None, None, conn)? {
            let now = Utc::now().naive_utc();
            DomainAction::create(
                DomainActionTypes::ExpirePurchaseOrders,
                json!({}),
                None,
                None,
                now + ChronoDuration::seconds(EXPIRY_SWEEP_PERIOD_SECONDS),
                now + ChronoDuration::days(1),
                1,
            )
            .commit(conn)?;
        }
        Ok(())
    }

    fn process_pending_actions(database: &Database, router: &DomainActionRouter) -> Result<usize, ApiError> {
        let mut conn = database.get_connection()?;
        let conn = &mut *conn;

        let pending_actions = DomainAction::find_pending(None, conn)?;
        if pending_actions.is_empty() {
            jlog!(Trace, LOG_TARGET, "Found no actions to process", {});
            return Ok(0);
        }

        jlog!(Debug, LOG_TARGET, "Found actions to process", { "action_count": pending_actions.len() });

        let mut processed = 0;
        for action in pending_actions {
            jlog!(Info, LOG_TARGET, "Pending action", {
                "id": action.id,
                "domain_action_type": action.domain_action_type
            });

            match action.set_busy(ACTION_LEASE_SECONDS, conn) {
                Ok(_) => {}
                Err(e) => match e.error_code {
                    ErrorCode::ConcurrencyError => {
                        jlog!(Debug, LOG_TARGET, "Action was already checked out to another process", { "id": action.id });
                        continue;
                    }
                    _ => return Err(e.into()),
                },
            }

            let executor = match router.get_executor_for(action.domain_action_type) {
                Some(executor) => executor,
                None => {
                    action.set_errored("No executor has been created for this action type", conn)?;
                    continue;
                }
            };

            match executor.execute(&action, conn) {
                Ok(_) => {
                    action.set_done(conn)?;
                    jlog!(Info, LOG_TARGET, "Action succeeded", { "id": action.id });
                }
                Err(e) => {
                    jlog!(Error, LOG_TARGET, "Action failed", { "id": action.id, "error": e.to_string() });
                    action.set_failed(&e.to_string(), conn)?;
                }
            }
            processed += 1;
        }

        Ok(processed)
    }
}
