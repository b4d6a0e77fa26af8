//! Configuration module for Marksync
//!
//! This module handles user preferences: the `Settings` struct with its JSON
//! representation, and read-only loading from the platform config directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
