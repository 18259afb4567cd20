pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod store;
pub mod templates;
