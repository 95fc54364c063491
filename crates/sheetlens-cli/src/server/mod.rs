//! HTTP API over a shared analysis session.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
