//! Common library for the Pinboard application
//!
//! This crate provides the infrastructure shared by the services: the
//! relational store lifecycle, the Redis connection used for sessions, and
//! the store error taxonomy.

pub mod cache;
pub mod database;
pub mod error;

pub use error::{StoreError, StoreResult};
