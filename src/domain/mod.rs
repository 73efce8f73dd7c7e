//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs`: Rich domain types (validated, view-ready) and cache keys
//! - `wire.rs`: Raw serde structs matching backend responses
//! - `convert.rs`: `TryFrom`/`From` conversions with validation
//! - `client.rs`: Sub-client with one-shot fetches and query subscriptions

pub mod health;
pub mod index;
pub mod quote;
pub mod ranking;
pub mod theme;
