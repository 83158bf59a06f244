use crate::config::Config;
use crate::domain_events::executors::expire_purchase_orders::ExpirePurchaseOrdersExecutor;
use crate::domain_events::executors::import_event_image::ImportEventImageExecutor;
use crate::domain_events::executors::process_payment_ipn::ProcessPaymentIpnExecutor;
use crate::domain_events::executors::send_communication::SendCommunicationExecutor;
use crate::errors::{ApiError, ApplicationError};
use diesel::PgConnection;
use gather_db::prelude::*;
use std::borrow::Borrow;
use std::collections::HashMap;

pub trait DomainActionExecutor: Send + Sync {
    fn execute(&self, action: &DomainAction, conn: &mut PgConnection) -> Result<(), ApiError>;
}

pub struct DomainActionRouter {
    routes: HashMap<DomainActionTypes, Box<dyn DomainActionExecutor>>,
}

impl DomainActionRouter {
    pub fn new() -> DomainActionRouter {
        DomainActionRouter { routes: HashMap::new() }
    }

    pub fn add_executor(
        &mut self,
        action_type: DomainActionTypes,
        executor: Box<dyn DomainActionExecutor>,
    ) -> Result<(), ApiError> {
        match self.routes.insert(action_type, executor) {
            Some(_) => Err(ApplicationError::new("Action type already has an executor".to_string()).into()),
            None => Ok(()),
        }
    }

    pub fn get_executor_for(&self, action_type: DomainActionTypes) -> Option<&dyn DomainActionExecutor> {
        self.routes.get(&action_type).map(|o| (*o).borrow())
    }

    pub fn set_up_executors(&mut self, conf: &Config) {
        use DomainActionTypes::*;

        // The match forces a compile time error when a new action type is
        // added without an executor.
        let find_executor = |action_type| -> Box<dyn DomainActionExecutor> {
            let conf = conf.clone();
            match action_type {
                Communication => Box::new(SendCommunicationExecutor::new(conf)),
                ExpirePurchaseOrders => Box::new(ExpirePurchaseOrdersExecutor::new(conf)),
                ImportEventImage => Box::new(ImportEventImageExecutor::new(conf)),
                PaymentProviderIpn => Box::new(ProcessPaymentIpnExecutor::new(conf)),
            }
        };

        for action_type in [Communication, ExpirePurchaseOrders, ImportEventImage, PaymentProviderIpn] {
            self.add_executor(action_type, find_executor(action_type))
                .expect("Could not add executor to router");
        }
    }
}
