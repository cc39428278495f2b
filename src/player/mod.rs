pub mod controller;
pub mod embedded_widget;
pub mod factory;
pub mod host;
pub mod loader;
pub mod native_element;
pub mod simulated;
pub mod types;

pub use controller::{PlayerController, PlayerHandle};
pub use factory::Player;
pub use host::{
    ElementEvent, MediaElement, MediaElementFactory, WidgetApi, WidgetEvent, WidgetPlayer,
};
pub use loader::{BackendEnvironment, WidgetApiLoader};
pub use types::{AdapterEvent, BackendEvent, BackendState, EventSink, SourceId};
