//! HTTP surface: the scrape endpoint, a landing page and a liveness probe.

pub mod handlers;
pub mod routes;
pub mod server;

pub use routes::{build_router, ApiState};
pub use server::start_server;
