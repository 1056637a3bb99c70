//! HTTP request handlers for the forecast API.

pub mod cache;
pub mod forecast;
pub mod health;
