use crate::errors::{ApiError, ApplicationError};
use gather_db::prelude::TemplateData;

pub const PURCHASE_COMPLETED: &str = "purchase-completed";
pub const TICKET_GIFTED: &str = "ticket-gifted";
pub const GIFT_ACCEPTED: &str = "gift-accepted";
pub const WAITLIST_APPROVED: &str = "waitlist-approved";
pub const WAITLIST_REJECTED: &str = "waitlist-rejected";
pub const WORK_EMAIL_CONFIRMATION: &str = "work-email-confirmation";

fn field<'a>(data: &'a TemplateData, key: &str) -> &'a str {
    data.get(key).map(|s| s.as_str()).unwrap_or("")
}

/// Renders a queued communication into a subject and HTML body.
pub fn render(template_id: &str, title: &str, data: &TemplateData) -> Result<(String, String), ApiError> {
    let html = match template_id {
        PURCHASE_COMPLETED => format!(
            "<p>Hi {},</p><p>Your order <strong>{}</strong> is confirmed. Total paid: {}.</p>\
             <p>Your tickets are available in your account.</p>",
            field(data, "name"),
            field(data, "order_id"),
            field(data, "total"),
        ),
        TICKET_GIFTED => format!(
            "<p>{} sent you a ticket for <strong>{}</strong>.</p>\
             <p>Sign in with this email address to accept it.</p>",
            field(data, "sender_name"),
            field(data, "event_name"),
        ),
        GIFT_ACCEPTED => format!(
            "<p>{} accepted the ticket you sent for <strong>{}</strong>.</p>",
            field(data, "recipient_name"),
            field(data, "event_name"),
        ),
        WAITLIST_APPROVED => format!(
            "<p>Hi {},</p><p>Your spot for <strong>{}</strong> has been confirmed. See you there!</p>",
            field(data, "name"),
            field(data, "event_name"),
        ),
        WAITLIST_REJECTED => format!(
            "<p>Hi {},</p><p>Unfortunately we couldn't confirm your spot for <strong>{}</strong> this time.</p>",
            field(data, "name"),
            field(data, "event_name"),
        ),
        WORK_EMAIL_CONFIRMATION => format!(
            "<p>Confirm your work email by following this link:</p>\
             <p><a href=\"{url}\">{url}</a></p><p>If you didn't request this, ignore this email.</p>",
            url = field(data, "confirmation_url"),
        ),
        other => {
            return Err(ApplicationError::new(format!("Unknown email template: {}", other)).into());
        }
    };
    Ok((title.to_string(), html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_known_templates() {
        let mut data = TemplateData::new();
        data.insert("name".to_string(), "Ana".to_string());
        data.insert("event_name".to_string(), "RustConf".to_string());

        let (subject, html) = render(WAITLIST_APPROVED, "You're in: RustConf", &data).unwrap();
        assert_eq!(subject, "You're in: RustConf");
        assert!(html.contains("RustConf"));
        assert!(html.contains("Ana"));
    }

    #[test]
    fn unknown_template_is_an_error() {
        let data = TemplateData::new();
        assert!(render("no-such-template", "Subject", &data).is_err());
    }

    #[test]
    fn missing_fields_render_blank() {
        let data = TemplateData::new();
        let (_, html) = render(TICKET_GIFTED, "A ticket for you", &data).unwrap();
        assert!(html.contains("sent you a ticket"));
    }
}
