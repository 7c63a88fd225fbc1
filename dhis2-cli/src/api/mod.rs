//! DHIS2 Web API module
//!
//! Client, credentials, metadata models and uid helpers used to read the
//! current server metadata and post metadata imports.

pub mod auth;
pub mod client;
pub mod metadata;
pub mod uid;

pub use client::Dhis2Client;
