use crate::config::{Config, Environment};
use crate::controllers;
use crate::db::Database;
use crate::domain_events::DomainActionMonitor;
use crate::graphql;
use crate::payments::PaymentProviders;
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, web::Data, App, HttpServer};
use log::Level::Info;
use std::sync::Arc;

// Must be valid JSON
const LOGGER_FORMAT: &str = r#"{"level": "INFO", "target":"gather::request", "remote_ip":"%a", "user_agent": "%{User-Agent}i", "request": "%r", "status_code": %s, "response_time": %D}"#;

pub struct Server {
    pub config: Config,
}

impl Server {
    pub async fn start(config: Config, process_actions: bool, process_http: bool) -> std::io::Result<()> {
        let bind_addr = format!("{}:{}", config.api_url, config.api_port);
        jlog!(Info, "gather::server", "Server start requested", {
            "bind_addr": bind_addr,
            "process_actions": process_actions,
            "process_http": process_http
        });

        let database = Database::from_config(&config);
        let providers = Arc::new(PaymentProviders::from_config(&config));

        let mut domain_action_monitor =
            DomainActionMonitor::new(config.clone(), database.clone(), config.worker_poll_period_seconds);
        if process_actions {
            domain_action_monitor.start();
        }

        if process_http {
            let schema = graphql::build_schema(database.clone(), config.clone(), providers);
            let conf = config.clone();

            HttpServer::new(move || {
                let mut cors = Cors::default()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600);
                if conf.allowed_origins == "*" {
                    cors = cors.allow_any_origin();
                } else {
                    for origin in conf.allowed_origins.split(',') {
                        cors = cors.allowed_origin(origin.trim());
                    }
                }

                let mut app = App::new()
                    .app_data(Data::new(schema.clone()))
                    .app_data(Data::new(conf.clone()))
                    .app_data(Data::new(database.clone()))
                    .wrap(cors)
                    .wrap(Logger::new(LOGGER_FORMAT).exclude("/status"))
                    .route("/status", web::get().to(controllers::status::check))
                    .route("/graphql", web::post().to(controllers::graphql::execute))
                    .route(
                        "/webhooks/mercadopago",
                        web::post().to(controllers::webhooks::mercado_pago),
                    );

                if conf.environment != Environment::Production {
                    app = app.route("/graphql", web::get().to(controllers::graphql::graphiql));
                }
                app
            })
            .bind(&bind_addr)?
            .run()
            .await?;
        } else if process_actions {
            // Worker-only process: park the main thread behind ctrl-c
            actix_web::rt::signal::ctrl_c().await?;
        }

        if process_actions {
            domain_action_monitor.stop();
        }
        Ok(())
    }
}
