pub mod templates;

use gather_db::prelude::*;

/// Builders for the emails the platform sends. Each returns a
/// `Communication` ready to be queued; delivery happens in the background
/// worker.
pub fn purchase_completed(user: &User, order: &PurchaseOrder, source_email: &str) -> Communication {
    let mut data = TemplateData::new();
    data.insert("name".to_string(), user.full_name());
    data.insert("order_id".to_string(), order.id.to_string());
    data.insert("total".to_string(), format_money(order.total_price_in_cents, &order.currency));

    let mut communication = Communication::new(
        "Your order is confirmed".to_string(),
        Some(CommAddress::from(source_email.to_string())),
        CommAddress::from(user.email.clone()),
        templates::PURCHASE_COMPLETED.to_string(),
        data,
    );
    communication.main_table = Some("purchase_orders".to_string());
    communication.main_table_id = Some(order.id);
    communication
}

pub fn ticket_gifted(
    from_user: &User,
    recipient_email: &str,
    event_name: &str,
    source_email: &str,
) -> Communication {
    let mut data = TemplateData::new();
    data.insert("sender_name".to_string(), from_user.full_name());
    data.insert("event_name".to_string(), event_name.to_string());

    Communication::new(
        format!("{} sent you a ticket", from_user.full_name()),
        Some(CommAddress::from(source_email.to_string())),
        CommAddress::from(recipient_email.to_string()),
        templates::TICKET_GIFTED.to_string(),
        data,
    )
}

pub fn gift_accepted(
    original_owner: &User,
    recipient_name: &str,
    event_name: &str,
    source_email: &str,
) -> Communication {
    let mut data = TemplateData::new();
    data.insert("recipient_name".to_string(), recipient_name.to_string());
    data.insert("event_name".to_string(), event_name.to_string());

    Communication::new(
        "Your gifted ticket was accepted".to_string(),
        Some(CommAddress::from(source_email.to_string())),
        CommAddress::from(original_owner.email.clone()),
        templates::GIFT_ACCEPTED.to_string(),
        data,
    )
}

pub fn waitlist_approved(user: &User, event_name: &str, source_email: &str) -> Communication {
    let mut data = TemplateData::new();
    data.insert("name".to_string(), user.full_name());
    data.insert("event_name".to_string(), event_name.to_string());

    Communication::new(
        format!("You're in: {}", event_name),
        Some(CommAddress::from(source_email.to_string())),
        CommAddress::from(user.email.clone()),
        templates::WAITLIST_APPROVED.to_string(),
        data,
    )
}

pub fn waitlist_rejected(user: &User, event_name: &str, source_email: &str) -> Communication {
    let mut data = TemplateData::new();
    data.insert("name".to_string(), user.full_name());
    data.insert("event_name".to_string(), event_name.to_string());

    Communication::new(
        format!("Update on your spot for {}", event_name),
        Some(CommAddress::from(source_email.to_string())),
        CommAddress::from(user.email.clone()),
        templates::WAITLIST_REJECTED.to_string(),
        data,
    )
}

pub fn work_email_confirmation(work_email: &WorkEmail, front_end_url: &str, source_email: &str) -> Communication {
    let mut data = TemplateData::new();
    data.insert(
        "confirmation_url".to_string(),
        format!("{}/work-emails/confirm/{}", front_end_url, work_email.confirmation_code),
    );

    let mut communication = Communication::new(
        "Confirm your work email".to_string(),
        Some(CommAddress::from(source_email.to_string())),
        CommAddress::from(work_email.email.clone()),
        templates::WORK_EMAIL_CONFIRMATION.to_string(),
        data,
    );
    communication.main_table = Some("work_emails".to_string());
    communication.main_table_id = Some(work_email.id);
    communication
}

fn format_money(amount_in_cents: i64, currency: &str) -> String {
    format!("{} {}.{:02}", currency, amount_in_cents / 100, amount_in_cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user() -> User {
        let now = chrono::Utc::now().naive_utc();
        User {
            id: Uuid::new_v4(),
            sub: "auth0|1".to_string(),
            email: "ana@example.com".to_string(),
            name: Some("Ana".to_string()),
            username: None,
            bio: None,
            image_url: None,
            admin: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn purchase_completed_addresses_the_buyer() {
        let user = user();
        let now = chrono::Utc::now().naive_utc();
        let order = PurchaseOrder {
            id: Uuid::new_v4(),
            user_id: user.id,
            payment_status: PaymentStatus::Paid,
            payment_platform: Some(PaymentPlatform::Stripe),
            payment_platform_reference_id: Some("cs_1".to_string()),
            payment_link: None,
            total_price_in_cents: 2550,
            currency: "USD".to_string(),
            purchased_at: Some(now),
            created_at: now,
            updated_at: now,
        };

        let communication = purchase_completed(&user, &order, "noreply@example.com");
        assert_eq!(communication.destinations.get_first().unwrap(), "ana@example.com");
        assert_eq!(communication.template_id, templates::PURCHASE_COMPLETED);
        assert_eq!(communication.template_data["total"], "USD 25.50");
        assert_eq!(communication.main_table_id, Some(order.id));
    }

    #[test]
    fn work_email_confirmation_links_the_code() {
        let now = chrono::Utc::now().naive_utc();
        let work_email = WorkEmail {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            email: "ana@corp.com".to_string(),
            confirmation_code: Uuid::new_v4(),
            status: WorkEmailStatus::Pending,
            confirmed_at: None,
            created_at: now,
            updated_at: now,
        };

        let communication = work_email_confirmation(&work_email, "https://gather.example.com", "noreply@example.com");
        assert!(communication.template_data["confirmation_url"]
            .contains(&work_email.confirmation_code.to_string()));
        assert_eq!(communication.destinations.get_first().unwrap(), "ana@corp.com");
    }

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(2550, "USD"), "USD 25.50");
        assert_eq!(format_money(100, "MXN"), "MXN 1.00");
        assert_eq!(format_money(5, "USD"), "USD 0.05");
    }
}
