pub mod app;
pub mod clients;
pub mod config;
pub mod contracts;
pub mod dashboard;
pub mod error;
mod http;
pub mod identity;
pub mod offers;
pub mod store;
pub mod telemetry;

pub use app::api_router;
