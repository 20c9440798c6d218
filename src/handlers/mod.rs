// HTTP request handlers
pub mod callback;
pub mod health;

// Re-export the main handler functions
pub use callback::auth_callback;
pub use health::health;
