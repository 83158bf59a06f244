use crate::config::Config;
use crate::domain_events::DomainActionExecutor;
use crate::errors::ApiError;
use crate::payments::PaymentProviders;
use chrono::{Duration, Utc};
use diesel::PgConnection;
use gather_db::prelude::*;
use log::Level::{Info, Warn};

/// Recurring sweep that expires unpaid orders past their checkout window,
/// releasing the claimed tickets back into stock.
pub struct ExpirePurchaseOrdersExecutor {
    config: Config,
}

impl ExpirePurchaseOrdersExecutor {
    pub fn new(config: Config) -> ExpirePurchaseOrdersExecutor {
        ExpirePurchaseOrdersExecutor { config }
    }
}

impl DomainActionExecutor for ExpirePurchaseOrdersExecutor {
    fn execute(&self, _action: &DomainAction, conn: &mut PgConnection) -> Result<(), ApiError> {
        let cutoff = Utc::now().naive_utc() - Duration::minutes(self.config.purchase_order_expiry_minutes);
        let stale_orders = PurchaseOrder::find_stale_unpaid(cutoff, conn)?;
        if stale_orders.is_empty() {
            return Ok(());
        }

        jlog!(Info, "gather::domain_actions", "Expiring stale purchase orders", {
            "order_count": stale_orders.len()
        });

        let providers = PaymentProviders::from_config(&self.config);
        for order in stale_orders {
            // Best effort: a provider failure must not keep the order open
            if let Some(platform) = order.payment_platform {
                if let Err(e) = providers.gateway(platform).cancel_checkout(&order) {
                    jlog!(Warn, "gather::domain_actions", "Could not close provider checkout", {
                        "order_id": order.id,
                        "error": e.to_string()
                    });
                }
            }
            order.mark_expired(conn)?;
        }

        Ok(())
    }
}
