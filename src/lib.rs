//! Bearer-token authentication service for the bug tracker backend.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
