use dotenv::dotenv;
use std::env;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

#[derive(Clone)]
pub struct Config {
    pub allowed_origins: String,
    pub api_url: String,
    pub api_port: String,
    pub app_name: String,
    pub database_url: String,
    pub database_pool_size: u32,
    pub environment: Environment,
    pub front_end_url: String,
    pub api_base_url: String,
    pub token_secret: String,
    pub block_external_comms: bool,
    pub communication_default_source_email: String,
    pub resend_api_key: String,
    pub stripe_secret_key: String,
    pub mercado_pago_access_token: String,
    pub sanity_project_id: String,
    pub sanity_dataset: String,
    pub sanity_token: String,
    pub purchase_order_expiry_minutes: i64,
    pub worker_poll_period_seconds: u64,
}

const ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";
const APP_NAME: &str = "APP_NAME";
const API_URL: &str = "API_URL";
const API_PORT: &str = "API_PORT";
const DATABASE_URL: &str = "DATABASE_URL";
const DATABASE_POOL_SIZE: &str = "DATABASE_POOL_SIZE";
const TEST_DATABASE_URL: &str = "TEST_DATABASE_URL";
const FRONT_END_URL: &str = "FRONT_END_URL";
// Public URL payment providers call back on
const API_BASE_URL: &str = "API_BASE_URL";
const TOKEN_SECRET: &str = "TOKEN_SECRET";
// Blocks all external communications from occurring
const BLOCK_EXTERNAL_COMMS: &str = "BLOCK_EXTERNAL_COMMS";
const COMMUNICATION_DEFAULT_SOURCE_EMAIL: &str = "COMMUNICATION_DEFAULT_SOURCE_EMAIL";
const RESEND_API_KEY: &str = "RESEND_API_KEY";
const STRIPE_SECRET_KEY: &str = "STRIPE_SECRET_KEY";
const MERCADO_PAGO_ACCESS_TOKEN: &str = "MERCADO_PAGO_ACCESS_TOKEN";
const SANITY_PROJECT_ID: &str = "SANITY_PROJECT_ID";
const SANITY_DATASET: &str = "SANITY_DATASET";
const SANITY_TOKEN: &str = "SANITY_TOKEN";
const PURCHASE_ORDER_EXPIRY_MINUTES: &str = "PURCHASE_ORDER_EXPIRY_MINUTES";
const WORKER_POLL_PERIOD_SECONDS: &str = "WORKER_POLL_PERIOD_SECONDS";

impl Config {
    pub fn new(environment: Environment) -> Self {
        dotenv().ok();

        let app_name = env::var(APP_NAME).unwrap_or_else(|_| "Gather".to_string());

        let database_url = match environment {
            Environment::Test => {
                env::var(TEST_DATABASE_URL).unwrap_or_else(|_| panic!("{} must be defined.", TEST_DATABASE_URL))
            }
            _ => env::var(DATABASE_URL).unwrap_or_else(|_| panic!("{} must be defined.", DATABASE_URL)),
        };

        let database_pool_size = env::var(DATABASE_POOL_SIZE)
            .map(|s| s.parse().expect("Not a valid integer for database pool size"))
            .unwrap_or(20);

        let allowed_origins = env::var(ALLOWED_ORIGINS).unwrap_or_else(|_| "*".to_string());
        let api_url = env::var(API_URL).unwrap_or_else(|_| "127.0.0.1".to_string());
        let api_port = env::var(API_PORT).unwrap_or_else(|_| "8088".to_string());

        let front_end_url = env::var(FRONT_END_URL).unwrap_or_else(|_| panic!("{} must be defined.", FRONT_END_URL));
        let api_base_url = env::var(API_BASE_URL).unwrap_or_else(|_| format!("http://{}:{}", api_url, api_port));
        let token_secret = env::var(TOKEN_SECRET).unwrap_or_else(|_| panic!("{} must be defined.", TOKEN_SECRET));

        let block_external_comms = env::var(BLOCK_EXTERNAL_COMMS)
            .map(|v| v != "0" && v.to_lowercase() != "false")
            .unwrap_or(environment == Environment::Test);

        let communication_default_source_email = env::var(COMMUNICATION_DEFAULT_SOURCE_EMAIL)
            .unwrap_or_else(|_| panic!("{} must be defined.", COMMUNICATION_DEFAULT_SOURCE_EMAIL));
        let resend_api_key = env::var(RESEND_API_KEY).unwrap_or_else(|_| "<resend not enabled>".to_string());

        let stripe_secret_key = env::var(STRIPE_SECRET_KEY).unwrap_or_else(|_| "<stripe not enabled>".to_string());
        let mercado_pago_access_token =
            env::var(MERCADO_PAGO_ACCESS_TOKEN).unwrap_or_else(|_| "<mercado pago not enabled>".to_string());

        let sanity_project_id = env::var(SANITY_PROJECT_ID).unwrap_or_else(|_| "<sanity not enabled>".to_string());
        let sanity_dataset = env::var(SANITY_DATASET).unwrap_or_else(|_| "production".to_string());
        let sanity_token = env::var(SANITY_TOKEN).unwrap_or_else(|_| "<sanity not enabled>".to_string());

        let purchase_order_expiry_minutes = env::var(PURCHASE_ORDER_EXPIRY_MINUTES)
            .map(|s| s.parse().expect("Not a valid integer for purchase order expiry"))
            .unwrap_or(60);
        let worker_poll_period_seconds = env::var(WORKER_POLL_PERIOD_SECONDS)
            .map(|s| s.parse().expect("Not a valid integer for worker poll period"))
            .unwrap_or(5);

        Config {
            allowed_origins,
            api_url,
            api_port,
            app_name,
            database_url,
            database_pool_size,
            environment,
            front_end_url,
            api_base_url,
            token_secret,
            block_external_comms,
            communication_default_source_email,
            resend_api_key,
            stripe_secret_key,
            mercado_pago_access_token,
            sanity_project_id,
            sanity_dataset,
            sanity_token,
            purchase_order_expiry_minutes,
            worker_poll_period_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_for_optional_settings() {
        std::env::set_var(TEST_DATABASE_URL, "postgres://localhost/gather_test");
        std::env::set_var(FRONT_END_URL, "http://localhost:3000");
        std::env::set_var(TOKEN_SECRET, "secret");
        std::env::set_var(COMMUNICATION_DEFAULT_SOURCE_EMAIL, "noreply@example.com");

        let config = Config::new(Environment::Test);
        assert_eq!(config.api_port, "8088");
        assert_eq!(config.allowed_origins, "*");
        assert_eq!(config.purchase_order_expiry_minutes, 60);
        // External comms are blocked by default under test
        assert!(config.block_external_comms);
    }
}
