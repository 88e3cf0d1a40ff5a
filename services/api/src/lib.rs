//! services/api/src/lib.rs
//!
//! The course platform HTTP service: configuration, credentials, store adapters,
//! the aggregation reporter and the Axum handlers.

pub mod adapters;
pub mod auth;
pub mod config;
pub mod error;
pub mod reporting;
pub mod web;
