#[macro_use]
extern crate logging;

use dotenv::dotenv;
use gather_api::config::{Config, Environment};
use gather_api::server::Server;
use log::Level::Info;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    logging::setup_logger();

    let environment = match env::var("ENVIRONMENT").as_deref() {
        Ok("production") => Environment::Production,
        Ok("test") => Environment::Test,
        _ => Environment::Development,
    };
    let config = Config::new(environment);

    // `--worker-only` runs the domain action processor without the HTTP
    // server; `--http-only` the reverse. The default process runs both.
    let args: Vec<String> = env::args().collect();
    let (process_actions, process_http) = if args.iter().any(|a| a == "--worker-only") {
        (true, false)
    } else if args.iter().any(|a| a == "--http-only") {
        (false, true)
    } else {
        (true, true)
    };

    jlog!(Info, "gather::server", "Starting server", { "app_name": config.app_name, "environment": format!("{:?}", config.environment) });
    Server::start(config, process_actions, process_http).await
}
