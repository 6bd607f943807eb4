// Resource clients
// One module per backend resource, all going through the shared ApiHttpClient

pub mod auth;
pub mod cart;
pub mod demand;
pub mod inventory;
pub mod order;
pub mod settlement;
pub mod user;
