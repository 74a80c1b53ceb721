//! CLI infrastructure for the Q-learning toolkit
//!
//! This module provides the command-line interface for training agents,
//! inspecting their learned values, and evaluating them.

pub mod commands;
pub mod config;
pub mod output;

pub use config::RunConfig;
