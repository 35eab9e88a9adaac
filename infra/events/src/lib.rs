//! # Event Bus
//!
//! A small, type-keyed broadcast bus shared by all feature slices.
//!
//! Slices never call each other directly: the booking slice publishes an event once a
//! registration is committed, and any interested slice (the notifier, for one)
//! subscribes to that event type. Publishing never blocks and never fails because
//! nobody is listening.
//!
//! # Example
//!
//! ```rust
//! use slotbook_event_bus::{EventBus, EventBusError, EventReceiverExt};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct SlotTaken { date: &'static str }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!     let mut rx = bus.subscribe::<SlotTaken>()?;
//!
//!     bus.publish(SlotTaken { date: "2024-01-01" })?;
//!
//!     let event = rx.next_event().await.expect("bus is open");
//!     assert_eq!(event.date, "2024-01-01");
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{DEFAULT_CAPACITY, Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
