pub mod auth;
pub mod bidding;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod market;
pub mod query;
pub mod router;
pub mod store;
pub mod watchlist;
