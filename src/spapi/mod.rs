//! Selling-partner feeds API - authentication, wire messages and REST client

pub mod auth;
pub mod messages;
pub mod rest;

pub use auth::RequestContext;
pub use rest::FeedsRestClient;
