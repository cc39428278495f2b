use super::types::{EventPayload, EventType, PlayerEvent};
use crate::constants::EVENT_HISTORY_SIZE;
use crate::core::session::PlayerStatus;
use anyhow::Result;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::trace;

/// Event subscriber handle
pub struct EventSubscriber {
    receiver: broadcast::Receiver<PlayerEvent>,
    filter: Option<EventFilter>,
}

impl EventSubscriber {
    pub fn new(receiver: broadcast::Receiver<PlayerEvent>, filter: Option<EventFilter>) -> Self {
        Self { receiver, filter }
    }

    /// Receive the next event matching the filter
    pub async fn recv(&mut self) -> Result<PlayerEvent> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Try to receive without blocking
    pub fn try_recv(&mut self) -> Result<Option<PlayerEvent>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Ok(Some(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn accepts(&self, event: &PlayerEvent) -> bool {
        self.filter.as_ref().is_none_or(|f| f.matches(event))
    }
}

/// Event filter for selective subscription
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    event_types: Option<Vec<EventType>>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_types(mut self, types: Vec<EventType>) -> Self {
        self.event_types = Some(types);
        self
    }

    pub fn matches(&self, event: &PlayerEvent) -> bool {
        if let Some(ref types) = self.event_types
            && !types.contains(&event.event_type)
        {
            return false;
        }
        true
    }
}

/// Broadcasts player events to any number of observers.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<PlayerEvent>,
    stats: Arc<RwLock<EventBusStats>>,
    event_history: Arc<RwLock<VecDeque<PlayerEvent>>>,
    max_history_size: usize,
}

#[derive(Debug, Default, Clone)]
pub struct EventBusStats {
    pub total_events: u64,
    pub events_by_type: HashMap<String, u64>,
    pub subscriber_count: usize,
    pub dropped_events: u64,
}

impl EventBus {
    /// Create a new event bus with specified buffer capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);

        Self {
            sender,
            stats: Arc::new(RwLock::new(EventBusStats::default())),
            event_history: Arc::new(RwLock::new(VecDeque::with_capacity(EVENT_HISTORY_SIZE))),
            max_history_size: EVENT_HISTORY_SIZE,
        }
    }

    /// Publish an event to all subscribers
    pub async fn publish(&self, event: PlayerEvent) -> Result<()> {
        trace!("Publishing event: {:?}", event.event_type);

        {
            let mut stats = self.stats.write().await;
            stats.total_events += 1;
            *stats
                .events_by_type
                .entry(event.event_type.as_str().to_string())
                .or_insert(0) += 1;
        }

        {
            let mut history = self.event_history.write().await;
            if history.len() == self.max_history_size {
                history.pop_front();
            }
            history.push_back(event.clone());
        }

        if self.sender.send(event).is_err() {
            // No subscribers is normal, don't log
            self.stats.write().await.dropped_events += 1;
        }
        Ok(())
    }

    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber::new(self.sender.subscribe(), None)
    }

    pub fn subscribe_filtered(&self, filter: EventFilter) -> EventSubscriber {
        EventSubscriber::new(self.sender.subscribe(), Some(filter))
    }

    pub fn subscribe_to_types(&self, types: Vec<EventType>) -> EventSubscriber {
        self.subscribe_filtered(EventFilter::new().with_types(types))
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub async fn get_stats(&self) -> EventBusStats {
        let mut stats = self.stats.read().await.clone();
        stats.subscriber_count = self.subscriber_count();
        stats
    }

    /// Get event history for debugging
    pub async fn get_history(&self) -> Vec<PlayerEvent> {
        self.event_history.read().await.iter().cloned().collect()
    }

    pub async fn clear_history(&self) {
        self.event_history.write().await.clear();
    }

    pub async fn emit_status_changed(&self, from: PlayerStatus, to: PlayerStatus) -> Result<()> {
        self.publish(PlayerEvent::new(
            EventType::StatusChanged,
            EventPayload::Status { from, to },
        ))
        .await
    }

    pub async fn emit_seek(&self, position: f64) -> Result<()> {
        self.publish(PlayerEvent::new(
            EventType::SeekCommitted,
            EventPayload::Seek { position },
        ))
        .await
    }
}
