//! Items nearly every feature slice imports.

pub use crate::domain::config::ApiConfig;
pub use crate::domain::constants::*;
pub use crate::domain::registry::{FeatureSlice, InitializedSlice};
pub use crate::security::secret::SharedSecret;
pub use crate::server::response::{failure, server_error};
pub use crate::server::{ApiState, ApiStateError};
