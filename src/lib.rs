#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the homebase-auth service
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod exchange;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod settings;
pub mod utils;
pub mod validation;

/// Re-export commonly used items
pub use exchange::{ExchangeError, HttpSessionExchange, SessionExchange};
pub use handlers::{auth_callback, health};
pub use settings::HomebaseSettings;
pub use validation::{safe_redirect_path, safe_redirect_url};

use actix_web::web;

/// Register the service's routes
pub fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg
        // Auth callback
        .route(routes::AUTH_CALLBACK_ROUTE, web::get().to(auth_callback))
        // Health endpoint
        .route("/ping", web::get().to(health));
}
