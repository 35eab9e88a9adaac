//! # Domain Models
//!
//! Pure types shared by every crate: server configuration, API constants and the
//! feature-slice registry. Depends on `serde` only; no I/O, networking or business logic.

pub mod config;
pub mod constants;
pub mod registry;
