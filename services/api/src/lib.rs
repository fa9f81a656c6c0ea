//! Pinboard API service
//!
//! Users register, log in, follow each other and post images; the home
//! view shows the posts of the accounts the viewer follows.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;

pub use state::AppState;
