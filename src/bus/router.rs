use crate::{
    core::ItineraryAgent,
    error::{ItineraryError, Result},
    types::Disruption,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info};

/// Inbound disruption addressed to one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisruptionEnvelope {
    pub session_id: String,
    pub disruption: Disruption,
}

impl DisruptionEnvelope {
    pub fn new(session_id: impl Into<String>, disruption: Disruption) -> Self {
        Self {
            session_id: session_id.into(),
            disruption,
        }
    }
}

struct SessionWorker {
    inbox: mpsc::Sender<Disruption>,
    handle: JoinHandle<ItineraryAgent>,
}

/// Fans inbound disruptions out to one task per session.
///
/// Each session drains its own queue in order, so a replan always starts from
/// the plan the previous disruption produced. Sessions run independently.
pub struct DisruptionRouter {
    workers: HashMap<String, SessionWorker>,
    buffer: usize,
}

impl DisruptionRouter {
    pub fn new(buffer: usize) -> Self {
        Self {
            workers: HashMap::new(),
            buffer: buffer.max(1),
        }
    }

    /// Move an agent onto its own task. Must be called inside a tokio runtime.
    pub fn register(&mut self, agent: ItineraryAgent) -> Result<()> {
        let session_id = agent.session_id().to_string();
        if self.workers.contains_key(&session_id) {
            return Err(ItineraryError::Bus(format!(
                "session {} is already registered",
                session_id
            )));
        }

        let (inbox, receiver) = mpsc::channel(self.buffer);
        let handle = tokio::spawn(agent.run_disruptions(receiver));
        info!(target: "itinerary::bus", "Registered session {}", session_id);
        self.workers
            .insert(session_id, SessionWorker { inbox, handle });
        Ok(())
    }

    /// Queue a disruption for its session; waits while the session queue is full.
    pub async fn route(&self, envelope: DisruptionEnvelope) -> Result<()> {
        let worker = self
            .workers
            .get(&envelope.session_id)
            .ok_or_else(|| ItineraryError::UnknownSession(envelope.session_id.clone()))?;

        debug!(
            target: "itinerary::bus",
            "Routing {} to session {}",
            envelope.disruption.label(),
            envelope.session_id
        );
        worker
            .inbox
            .send(envelope.disruption)
            .await
            .map_err(|_| {
                ItineraryError::Bus(format!("session {} stopped", envelope.session_id))
            })
    }

    pub fn session_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.workers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Close every session queue and wait for queued disruptions to finish.
    pub async fn shutdown(self) -> Result<Vec<ItineraryAgent>> {
        let mut agents = Vec::with_capacity(self.workers.len());
        for (session_id, worker) in self.workers {
            drop(worker.inbox);
            let agent = worker.handle.await.map_err(|err| {
                ItineraryError::Bus(format!("session {} task failed: {}", session_id, err))
            })?;
            agents.push(agent);
        }
        agents.sort_by(|a, b| a.session_id().cmp(b.session_id()));
        Ok(agents)
    }
}

impl std::fmt::Debug for DisruptionRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisruptionRouter")
            .field("sessions", &self.session_ids())
            .field("buffer", &self.buffer)
            .finish()
    }
}
