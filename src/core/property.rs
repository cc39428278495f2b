use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

/// Change notification handle for a [`Property`].
pub struct PropertySubscriber {
    receiver: broadcast::Receiver<()>,
}

// PropertySubscriber intentionally does not implement Clone.
// Each subscriber should be unique to avoid conflicts.
// To get multiple subscribers, call Property::subscribe() multiple times.

impl PropertySubscriber {
    pub async fn wait_for_change(&mut self) -> bool {
        loop {
            match self.receiver.recv().await {
                Ok(_) => return true,
                // If we lagged behind, skip to the latest and keep waiting
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                // Channel closed: no more updates
                Err(broadcast::error::RecvError::Closed) => return false,
            }
        }
    }

    pub fn try_recv(&mut self) -> bool {
        match self.receiver.try_recv() {
            Ok(_) => true,
            Err(broadcast::error::TryRecvError::Empty) => false,
            // Consider lag as a change signal; the next recv() will align
            Err(broadcast::error::TryRecvError::Lagged(_)) => true,
            Err(broadcast::error::TryRecvError::Closed) => false,
        }
    }
}

/// Observable value with a single writer and any number of readers.
///
/// Clones share the same underlying value. Readers either poll with
/// [`Property::get_sync`], await changes on a [`Property::watch`] receiver, or
/// hold a [`PropertySubscriber`] for change pings.
pub struct Property<T: Clone + Send + Sync> {
    watch_sender: Arc<watch::Sender<T>>,
    watch_receiver: watch::Receiver<T>,
    broadcast_sender: broadcast::Sender<()>,
    name: String,
}

impl<T: Clone + Send + Sync> Property<T> {
    pub fn new(initial_value: T, name: impl Into<String>) -> Self {
        let (watch_sender, watch_receiver) = watch::channel(initial_value);
        let (broadcast_sender, _) = broadcast::channel(100);
        Self {
            watch_sender: Arc::new(watch_sender),
            watch_receiver,
            broadcast_sender,
            name: name.into(),
        }
    }

    pub fn get_sync(&self) -> T {
        self.watch_receiver.borrow().clone()
    }

    pub fn set(&self, new_value: T) {
        self.watch_sender.send_replace(new_value);
        let _ = self.broadcast_sender.send(());
    }

    pub fn subscribe(&self) -> PropertySubscriber {
        PropertySubscriber {
            receiver: self.broadcast_sender.subscribe(),
        }
    }

    /// A `watch` receiver that sees the latest value and awaits changes.
    pub fn watch(&self) -> watch::Receiver<T> {
        self.watch_sender.subscribe()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A handle that can observe this property but never write it.
    pub fn read_only(&self) -> ReadOnlyProperty<T> {
        ReadOnlyProperty {
            inner: self.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + PartialEq> Property<T> {
    /// Set the value only if it differs, notifying subscribers on change.
    ///
    /// Returns whether the value changed.
    pub fn set_if_changed(&self, new_value: T) -> bool {
        let changed = self.watch_sender.send_if_modified(|current| {
            if *current == new_value {
                false
            } else {
                *current = new_value;
                true
            }
        });
        if changed {
            let _ = self.broadcast_sender.send(());
        }
        changed
    }
}

impl<T: Clone + Send + Sync> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            watch_sender: self.watch_sender.clone(),
            watch_receiver: self.watch_receiver.clone(),
            broadcast_sender: self.broadcast_sender.clone(),
            name: self.name.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + Debug> Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Property({} = {:?})", self.name, self.get_sync())
    }
}

/// Observer side of a [`Property`] held by another owner.
///
/// ```compile_fail
/// use feedreel::core::Property;
///
/// let owned = Property::new(1u32, "count");
/// owned.read_only().set(2);
/// ```
#[derive(Clone)]
pub struct ReadOnlyProperty<T: Clone + Send + Sync> {
    inner: Property<T>,
}

impl<T: Clone + Send + Sync> ReadOnlyProperty<T> {
    pub fn get_sync(&self) -> T {
        self.inner.get_sync()
    }

    pub fn watch(&self) -> watch::Receiver<T> {
        self.inner.watch()
    }

    pub fn subscribe(&self) -> PropertySubscriber {
        self.inner.subscribe()
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }
}

impl<T: Clone + Send + Sync + Debug> Debug for ReadOnlyProperty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReadOnlyProperty({} = {:?})", self.name(), self.get_sync())
    }
}
