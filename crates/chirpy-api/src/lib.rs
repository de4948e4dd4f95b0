pub mod auth;
pub mod chirps;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod sessions;
pub mod upgrades;
pub mod users;
