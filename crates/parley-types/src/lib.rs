//! Shared value types for the Parley message store, its REST layer and the
//! notification gateway.

pub mod api;
pub mod events;
pub mod models;
