//! Common test utilities and helpers
//!
//! Shared by the integration test crates:
//! - Database and cache fixtures (real PostgreSQL and Redis)
//! - Assertion macros

#![allow(dead_code)]

pub mod assertions;
pub mod database;

pub use database::*;
