table! {
    communities (id) {
        id -> Uuid,
        name -> Text,
        slug -> Text,
        description -> Nullable<Text>,
        status -> Text,
        logo_url -> Nullable<Text>,
        banner_url -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    community_members (id) {
        id -> Uuid,
        community_id -> Uuid,
        user_id -> Uuid,
        role -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    companies (id) {
        id -> Uuid,
        name -> Nullable<Text>,
        domain -> Text,
        logo_url -> Nullable<Text>,
        status -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    domain_actions (id) {
        id -> Uuid,
        domain_action_type -> Text,
        payload -> Json,
        main_table -> Nullable<Text>,
        main_table_id -> Nullable<Uuid>,
        scheduled_at -> Timestamp,
        expires_at -> Timestamp,
        last_attempted_at -> Nullable<Timestamp>,
        attempt_count -> Int8,
        max_attempt_count -> Int8,
        status -> Text,
        last_failure_reason -> Nullable<Text>,
        blocked_until -> Timestamp,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    event_tags (id) {
        id -> Uuid,
        event_id -> Uuid,
        tag_id -> Uuid,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    events (id) {
        id -> Uuid,
        community_id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        status -> Text,
        visibility -> Text,
        starts_at -> Timestamp,
        ends_at -> Timestamp,
        timezone -> Nullable<Text>,
        address -> Nullable<Text>,
        latitude -> Nullable<Text>,
        longitude -> Nullable<Text>,
        max_attendees -> Nullable<Int8>,
        preview_image_url -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    purchase_orders (id) {
        id -> Uuid,
        user_id -> Uuid,
        payment_status -> Text,
        payment_platform -> Nullable<Text>,
        payment_platform_reference_id -> Nullable<Text>,
        payment_link -> Nullable<Text>,
        total_price_in_cents -> Int8,
        currency -> Text,
        purchased_at -> Nullable<Timestamp>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    salaries (id) {
        id -> Uuid,
        user_id -> Uuid,
        company_id -> Uuid,
        amount_in_cents -> Int8,
        currency -> Text,
        work_role -> Text,
        years_of_experience -> Int4,
        gender -> Nullable<Text>,
        country_code -> Text,
        work_setting -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    sessions (id) {
        id -> Uuid,
        event_id -> Uuid,
        title -> Text,
        description -> Nullable<Text>,
        speaker_names -> Array<Text>,
        starts_at -> Nullable<Timestamp>,
        ends_at -> Nullable<Timestamp>,
        room -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    tags (id) {
        id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    ticket_templates (id) {
        id -> Uuid,
        event_id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        status -> Text,
        visibility -> Text,
        quantity -> Nullable<Int8>,
        max_per_user -> Nullable<Int8>,
        price_in_cents -> Int8,
        currency -> Text,
        requires_approval -> Bool,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    user_tickets (id) {
        id -> Uuid,
        ticket_template_id -> Uuid,
        user_id -> Uuid,
        purchase_order_id -> Uuid,
        approval_status -> Text,
        redemption_status -> Text,
        gift_recipient_email -> Nullable<Text>,
        redeemed_at -> Nullable<Timestamp>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    users (id) {
        id -> Uuid,
        sub -> Text,
        email -> Text,
        name -> Nullable<Text>,
        username -> Nullable<Text>,
        bio -> Nullable<Text>,
        image_url -> Nullable<Text>,
        admin -> Bool,
        deleted_at -> Nullable<Timestamp>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    work_emails (id) {
        id -> Uuid,
        user_id -> Uuid,
        email -> Text,
        confirmation_code -> Uuid,
        status -> Text,
        confirmed_at -> Nullable<Timestamp>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

joinable!(community_members -> communities (community_id));
joinable!(community_members -> users (user_id));
joinable!(event_tags -> events (event_id));
joinable!(event_tags -> tags (tag_id));
joinable!(events -> communities (community_id));
joinable!(purchase_orders -> users (user_id));
joinable!(salaries -> companies (company_id));
joinable!(salaries -> users (user_id));
joinable!(sessions -> events (event_id));
joinable!(ticket_templates -> events (event_id));
joinable!(user_tickets -> purchase_orders (purchase_order_id));
joinable!(user_tickets -> ticket_templates (ticket_template_id));
joinable!(user_tickets -> users (user_id));
joinable!(work_emails -> users (user_id));

allow_tables_to_appear_in_same_query!(
    communities,
    community_members,
    companies,
    domain_actions,
    event_tags,
    events,
    purchase_orders,
    salaries,
    sessions,
    tags,
    ticket_templates,
    user_tickets,
    users,
    work_emails,
);
