use tokio::sync::mpsc::Sender;
use tracing::info;

/// Run-progress notifications for an observing consumer (CLI, server
/// stream). Events are emitted in the order chunks complete.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Log(String),
    Chunk { completed: usize, total: usize },
}

/// Logs the message and forwards it to the observer when one is attached.
pub(crate) async fn report(progress: Option<&Sender<ProgressEvent>>, message: impl Into<String>) {
    let message = message.into();
    info!("{message}");
    if let Some(tx) = progress {
        let _ = tx.send(ProgressEvent::Log(message)).await;
    }
}

pub(crate) async fn report_chunk(
    progress: Option<&Sender<ProgressEvent>>,
    completed: usize,
    total: usize,
) {
    if let Some(tx) = progress {
        let _ = tx.send(ProgressEvent::Chunk { completed, total }).await;
    }
}
