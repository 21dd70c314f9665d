//! tocar - single-track local audio player
//!
//! One file at a time: play, pause, resume, stop, volume, status. Driven
//! either from the command line (blocking) or through a small HTTP API.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod library;
pub mod player;

pub use error::{PlayerError, Result};
