pub mod event_bus;
pub mod types;

pub use event_bus::{EventBus, EventBusStats, EventFilter, EventSubscriber};
pub use types::{EventPayload, EventType, PlayerEvent, SkipSide};
