//! HTTP control API

pub mod handlers;
pub mod server;

pub use server::{create_router, run, AppState};
