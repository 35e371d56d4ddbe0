use super::event::ItineraryEvent;
use crate::error::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::broadcast};
use tracing::debug;

/// Outbound side of the message bus.
#[async_trait]
pub trait EventPublisher: Send + Sync + Debug {
    async fn publish(&self, event: ItineraryEvent) -> Result<()>;
}

/// In-process broadcast bus that also keeps the most recent events.
#[derive(Debug, Clone)]
pub struct MemoryEventBus {
    sender: broadcast::Sender<ItineraryEvent>,
    backlog: Arc<Mutex<VecDeque<ItineraryEvent>>>,
    capacity: usize,
}

impl MemoryEventBus {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            backlog: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ItineraryEvent> {
        self.sender.subscribe()
    }

    /// Retained events, oldest first
    pub fn snapshot(&self) -> Vec<ItineraryEvent> {
        self.backlog.lock().iter().cloned().collect()
    }

    /// Retained events of one session, oldest first
    pub fn session_snapshot(&self, session_id: &str) -> Vec<ItineraryEvent> {
        self.backlog
            .lock()
            .iter()
            .filter(|event| event.session_id == session_id)
            .cloned()
            .collect()
    }
}

impl Default for MemoryEventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EventPublisher for MemoryEventBus {
    async fn publish(&self, event: ItineraryEvent) -> Result<()> {
        {
            let mut backlog = self.backlog.lock();
            backlog.push_back(event.clone());
            while backlog.len() > self.capacity {
                backlog.pop_front();
            }
        }
        debug!(
            target: "itinerary::bus",
            "{} #{} for session {}", event.kind, event.sequence, event.session_id
        );
        // no subscribers is fine, the backlog still has the event
        let _ = self.sender.send(event);
        Ok(())
    }
}

/// Appends every event to a file as one JSON line.
#[derive(Debug, Clone)]
pub struct FileEventPublisher {
    path: PathBuf,
}

impl FileEventPublisher {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EventPublisher for FileEventPublisher {
    async fn publish(&self, event: ItineraryEvent) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let data = serde_json::to_vec(&event)?;
        file.write_all(&data).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        Ok(())
    }
}

/// Sends every event to each inner publisher in order; stops at the first failure.
#[derive(Debug, Clone, Default)]
pub struct FanoutPublisher {
    targets: Vec<Arc<dyn EventPublisher>>,
}

impl FanoutPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: Arc<dyn EventPublisher>) -> Self {
        self.targets.push(target);
        self
    }
}

#[async_trait]
impl EventPublisher for FanoutPublisher {
    async fn publish(&self, event: ItineraryEvent) -> Result<()> {
        for target in &self.targets {
            target.publish(event.clone()).await?;
        }
        Ok(())
    }
}
