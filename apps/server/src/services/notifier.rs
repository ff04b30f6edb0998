//! Host notifier: publishes the completion event to the self and parent contexts.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use memory_core::{CompletionEvent, CompletionOutcome};
use thiserror::Error;
use tokio::sync::broadcast;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("no receiver is listening")]
    NoReceivers,
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for completion events.
pub trait CompletionChannel: Send + Sync {
    /// Channel name used in logs.
    fn name(&self) -> &'static str;

    /// Deliver one event. Must not block the calling task.
    fn publish(&self, event: &CompletionEvent) -> Result<(), NotifyError>;
}

/// Sends each completion to two receivers: the current context and its parent.
pub struct HostNotifier {
    self_context: Box<dyn CompletionChannel>,
    parent_context: Box<dyn CompletionChannel>,
}

impl HostNotifier {
    pub fn new(
        self_context: Box<dyn CompletionChannel>,
        parent_context: Box<dyn CompletionChannel>,
    ) -> Self {
        Self {
            self_context,
            parent_context,
        }
    }

    /// Fire-and-forget. Delivery failures are logged and dropped.
    pub fn notify_completion(&self, outcome: &CompletionOutcome) {
        let event = CompletionEvent::from(outcome);

        for channel in [&self.self_context, &self.parent_context] {
            match channel.publish(&event) {
                Ok(()) => tracing::debug!(channel = channel.name(), "Completion event delivered"),
                Err(e) => tracing::warn!(
                    channel = channel.name(),
                    error = %e,
                    "Failed to deliver completion event"
                ),
            }
        }
    }
}

/// In-process fan-out over a tokio broadcast channel.
#[derive(Clone)]
pub struct BroadcastChannel {
    sender: broadcast::Sender<CompletionEvent>,
}

impl BroadcastChannel {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CompletionEvent> {
        self.sender.subscribe()
    }
}

impl CompletionChannel for BroadcastChannel {
    fn name(&self) -> &'static str {
        "broadcast"
    }

    fn publish(&self, event: &CompletionEvent) -> Result<(), NotifyError> {
        self.sender
            .send(event.clone())
            .map(|_| ())
            .map_err(|_| NotifyError::NoReceivers)
    }
}

/// Keeps the latest event so the hosting page can fetch it.
#[derive(Clone, Default)]
pub struct MailboxChannel {
    latest: Arc<Mutex<Option<CompletionEvent>>>,
}

impl MailboxChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<CompletionEvent> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CompletionChannel for MailboxChannel {
    fn name(&self) -> &'static str {
        "self"
    }

    fn publish(&self, event: &CompletionEvent) -> Result<(), NotifyError> {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(event.clone());
        Ok(())
    }
}

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// One JSON line per event, read by the parent process.
///
/// Inside a tokio runtime the write runs on the blocking pool, so a slow
/// reader on the other end of the pipe never stalls a worker thread.
#[derive(Clone)]
pub struct LineChannel {
    writer: SharedWriter,
}

impl LineChannel {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

/// Serialize an event as a single newline-terminated JSON line.
pub fn encode_line(event: &CompletionEvent) -> Result<String, NotifyError> {
    let mut line = serde_json::to_string(event)?;
    line.push('\n');
    Ok(line)
}

fn write_line(writer: &SharedWriter, line: &str) -> std::io::Result<()> {
    let mut writer = writer.lock().unwrap_or_else(PoisonError::into_inner);
    writer.write_all(line.as_bytes())?;
    writer.flush()
}

impl CompletionChannel for LineChannel {
    fn name(&self) -> &'static str {
        "parent"
    }

    fn publish(&self, event: &CompletionEvent) -> Result<(), NotifyError> {
        let line = encode_line(event)?;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let writer = self.writer.clone();
                handle.spawn_blocking(move || {
                    if let Err(e) = write_line(&writer, &line) {
                        tracing::warn!(error = %e, "Failed to write completion line");
                    }
                });
                Ok(())
            }
            Err(_) => Ok(write_line(&self.writer, &line)?),
        }
    }
}
