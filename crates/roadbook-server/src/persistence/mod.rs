//! Persistence layer for the roadbook server.
//!
//! SQLite-backed storage for riders, routes, and their ordered waypoints.
//! A route's waypoint set is always written as one transaction so readers
//! never observe a partially shifted ordering.

pub mod db;
pub mod riders;
pub mod routes;

pub use db::{init_database, Database};
