//! Client for the BMKG search API.
//!
//! [`BmkgConfig`] is read from the environment. [`BmkgClient`] logs in once,
//! then pages through station and message searches with a bearer token.

mod client;
mod config;

pub use client::BmkgClient;
pub use config::BmkgConfig;
