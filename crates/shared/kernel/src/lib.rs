//! Kernel utilities shared across slices.
//!
//! Keep this crate lightweight: layered config loading, the [`server::ApiState`]
//! registry handed to every handler, the system router, and small security helpers.
//!
//! ## Config loading
//! ```rust
//! use slotbook_kernel::config::load_config;
//! use slotbook_kernel::domain::config::ApiConfig;
//!
//! // A missing file is fine: defaults plus `SLOTBOOK__*` environment overrides.
//! let cfg: ApiConfig = load_config(Some("does-not-exist.toml")).unwrap();
//! assert_eq!(cfg.server.port, 4583);
//! ```
pub mod config;
pub mod prelude;
pub mod security;
pub mod server;

pub use slotbook_domain as domain;
