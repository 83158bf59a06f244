pub mod expire_purchase_orders;
pub mod import_event_image;
pub mod process_payment_ipn;
pub mod send_communication;
