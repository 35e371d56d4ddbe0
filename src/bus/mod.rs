//! Message-bus interface: outbound plan events and inbound disruption routing

pub mod event;
pub mod publisher;
pub mod router;

pub use event::{EventKind, ItineraryEvent};
pub use publisher::{EventPublisher, FanoutPublisher, FileEventPublisher, MemoryEventBus};
pub use router::{DisruptionEnvelope, DisruptionRouter};
