#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use homebase_auth::{
    configure_services, routes::AUTH_CALLBACK_ROUTE, settings::HomebaseSettings,
    HttpSessionExchange, SessionExchange,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = HomebaseSettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e}")))?;

    let exchange: Arc<dyn SessionExchange> = Arc::new(
        HttpSessionExchange::from_settings(&settings.identity).map_err(|e| {
            std::io::Error::other(format!("Failed to initialize session exchange: {e}"))
        })?,
    );

    start_server(settings, exchange).await
}

/// Start the HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(
    settings: HomebaseSettings,
    exchange: Arc<dyn SessionExchange>,
) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, &settings);

    let cors_origins = settings.get_cors_origins();

    HttpServer::new(move || {
        let cors_origins = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _| {
                cors_origins
                    .iter()
                    .any(|allowed| allowed == origin.to_str().unwrap_or(""))
            })
            .allowed_methods(vec!["GET", "OPTIONS"])
            .allowed_headers(vec!["Content-Type", "Accept"])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(settings.clone()))
            .app_data(web::Data::from(Arc::clone(&exchange)))
            .wrap(cors)
            .wrap(Logger::default())
            .configure(configure_services)
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn print_startup_info(bind_address: &str, settings: &HomebaseSettings) {
    println!(
        "Starting homebase-auth {} on http://{bind_address}",
        homebase_auth::VERSION
    );
    println!();
    println!("Endpoints:");
    println!("  GET  {AUTH_CALLBACK_ROUTE}  - Exchange code for session, then redirect");
    println!("  GET  /ping           - Health check");
    println!();
    println!("Public origin: {}", settings.origin());
    println!("Identity backend: {}", settings.identity.url);
    println!(
        "Auth cookie: {} (secure: {})",
        settings.auth_cookie_name(),
        settings.cookies.secure
    );
}
