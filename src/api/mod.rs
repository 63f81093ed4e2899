//! API server module for serving read-only retrieval and league services via REST

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use handlers::AppState;
pub use routes::api_routes;
pub use server::build_app;
pub use server::serve_api;
