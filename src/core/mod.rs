pub mod property;
pub mod seek;
pub mod session;
pub mod timer;

pub use property::{Property, PropertySubscriber, ReadOnlyProperty};
pub use seek::SeekState;
pub use session::{
    Countdown, PlayerStatus, SessionController, SessionHandle, SessionSnapshot, Transition,
};
pub use timer::ScheduledTask;
