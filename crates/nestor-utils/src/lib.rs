//! Shared utilities for nestor plugins
//!
//! This crate provides common functionality used across the nestor workspace,
//! including logging setup and environment variable helpers.

pub mod env;
pub mod logging;

pub use env::{EnvError, EnvSource, ProcessEnv};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
