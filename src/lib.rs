// Spicy back office API client - library root

pub mod api;
pub mod config;
pub mod error;
pub mod http_client;
pub mod models;
pub mod router;
pub mod session;
