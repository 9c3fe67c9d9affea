//! Bulwark-core: Shared types, fixed-point arithmetic, errors, and configuration
//!
//! This crate provides the foundational types used across the Bulwark workspace.

pub mod config;
pub mod errors;
pub mod fixed;
pub mod types;

pub use config::*;
pub use errors::*;
pub use fixed::*;
pub use types::*;
