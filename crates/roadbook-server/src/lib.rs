//! Shared library surface for the roadbook server and its tests.

pub mod api;
pub mod config;
pub mod persistence;
pub mod state;
