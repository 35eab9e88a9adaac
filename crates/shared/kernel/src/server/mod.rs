mod health;
pub mod response;
mod router;
mod state;

pub use router::system_router;
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateErrorExt, ApiStateInner};
