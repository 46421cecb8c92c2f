//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Domain types and request parameters
//! - `wire.rs` — Raw serde structs matching upstream responses
//! - `convert.rs` — `From` conversions from wire to domain types (where they differ)
//! - `state.rs` — The resource definition and its store wrapper
//! - `client.rs` — Sub-client with typed HTTP methods

pub mod chart;
pub mod market;
pub mod trending;
