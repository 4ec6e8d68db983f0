//! Bounded in-memory history of diagnostic events.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::tracing_layer::DiagnosticEvent;

pub const DEFAULT_CAPACITY: usize = 200;

/// Keeps the most recent `capacity` events. Clones share the buffer.
#[derive(Clone)]
pub struct DiagnosticLog {
    capacity: usize,
    events: Arc<Mutex<VecDeque<DiagnosticEvent>>>,
}

impl DiagnosticLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            events: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn push(&self, event: DiagnosticEvent) {
        let mut events = self.lock();
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// The last `limit` events, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<DiagnosticEvent> {
        let events = self.lock();
        let skip = events.len().saturating_sub(limit);
        events.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drains `receiver` into this log until every sender is gone.
    pub fn spawn_collector(
        &self,
        mut receiver: mpsc::UnboundedReceiver<DiagnosticEvent>,
    ) -> JoinHandle<()> {
        let log = self.clone();
        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                log.push(event);
            }
        })
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<DiagnosticEvent>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
