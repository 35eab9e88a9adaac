use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

/// Buffer size used by [`EventBus::subscribe`] and by first-time publishers.
///
/// Admission events are rare, so a receiver that falls this far behind is stuck anyway.
pub const DEFAULT_CAPACITY: usize = 64;

/// Marker trait for types that can travel over the [`EventBus`].
///
/// Any `Send + Sync + 'static` type qualifies.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

type Channels = FxHashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// A cloneable, thread-safe broadcast bus keyed by the event's [`TypeId`].
///
/// Every clone shares the same registry. Receivers see `Closed` once every clone of the
/// bus has been dropped or [`EventBus::shutdown`] was called.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<Channels>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to events of type `T` using [`DEFAULT_CAPACITY`].
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the registry is inconsistent.
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes to events of type `T`, creating the channel with `capacity` if it
    /// does not exist yet. An existing channel keeps its original capacity.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidCapacity`] for a zero capacity.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        if capacity == 0 {
            return Err(EventBusError::InvalidCapacity {
                message: "capacity must be greater than zero".into(),
                context: Some(std::any::type_name::<T>().into()),
            });
        }
        Ok(self.sender::<T>(capacity)?.subscribe())
    }

    /// Publishes an event to every current subscriber of `T`.
    ///
    /// Returns the number of receivers the event was delivered to; zero when nobody
    /// listens, which is not an error.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the registry is inconsistent.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        self.publish_arc(Arc::new(event))
    }

    /// Publishes an already shared event without re-wrapping it.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the registry is inconsistent.
    pub fn publish_arc<T: Event>(&self, event: Arc<T>) -> Result<usize, EventBusError> {
        let sender = self.sender::<T>(DEFAULT_CAPACITY)?;
        let delivered = sender.send(event).unwrap_or(0);
        trace!(event = std::any::type_name::<T>(), delivered, "Event published");
        Ok(delivered)
    }

    /// Drops every channel so that all receivers observe `Closed`.
    ///
    /// Returns how many channels were closed.
    pub fn shutdown(&self) -> usize {
        let mut channels = self.channels.write();
        let closed = channels.len();
        channels.clear();
        closed
    }

    fn sender<T: Event>(&self, capacity: usize) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        let id = TypeId::of::<T>();

        if let Some(existing) = self.channels.read().get(&id) {
            return downcast::<T>(existing.as_ref());
        }

        let mut channels = self.channels.write();
        let entry = channels.entry(id).or_insert_with(|| {
            let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
            Box::new(tx)
        });
        downcast::<T>(entry.as_ref())
    }
}

fn downcast<T: Event>(
    sender: &(dyn Any + Send + Sync),
) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
    sender.downcast_ref::<broadcast::Sender<Arc<T>>>().cloned().ok_or_else(|| {
        EventBusError::TypeMismatch {
            message: std::any::type_name::<T>().into(),
            context: Some("Registered sender has a different event type".into()),
        }
    })
}
