pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod routes;
pub mod store;
pub mod types;
pub mod validation;
