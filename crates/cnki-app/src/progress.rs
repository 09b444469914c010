use std::io::Write;

use cnki_translator::{ProgressObserver, TranslationResult};
use cnki_types::ProgressEvent;
use kanal::{AsyncReceiver, AsyncSender};

/// Forwards pipeline hooks to the render task
pub struct ChannelObserver {
    result: TranslationResult,
    tx: AsyncSender<ProgressEvent>,
}

impl ChannelObserver {
    pub fn new(result: TranslationResult, tx: AsyncSender<ProgressEvent>) -> Self {
        Self { result, tx }
    }

    fn send(&self, event: ProgressEvent) {
        if let Err(e) = self.tx.try_send(event) {
            tracing::warn!("progress channel closed: {e}");
        }
    }
}

impl ProgressObserver for ChannelObserver {
    fn refresh(&self) {
        self.send(ProgressEvent::Refresh {
            result: self.result.text(),
        });
    }

    fn warn(&self, message: &str) {
        self.send(ProgressEvent::Warning(message.to_string()));
    }
}

/// Renders events until the run finishes or fails.
///
/// Partial results go to stderr when it is a terminal; the final text
/// always goes to stdout.
pub async fn render_progress(rx: AsyncReceiver<ProgressEvent>, interactive: bool) {
    let mut updates = 0usize;

    while let Ok(event) = rx.recv().await {
        match event {
            ProgressEvent::Refresh { result } => {
                updates += 1;
                if interactive {
                    eprintln!("[{updates}] {result}");
                }
            }
            ProgressEvent::Warning(message) => {
                eprintln!("warning: {message}");
            }
            ProgressEvent::Finished { result } => {
                print_result(&result);
                break;
            }
            ProgressEvent::Failed {
                message,
                banned,
                result,
            } => {
                if !result.is_empty() {
                    print_result(&result);
                }
                if banned {
                    eprintln!("{message}");
                } else {
                    eprintln!("error: {message}");
                }
                break;
            }
        }
    }
}

fn print_result(result: &str) {
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{result}").and_then(|_| stdout.flush()) {
        tracing::error!("failed to write result: {e}");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn observer_forwards_hooks() {
        let (tx, rx) = kanal::unbounded_async::<ProgressEvent>();
        let observer = ChannelObserver::new(TranslationResult::new(), tx);

        observer.warn("Maximum text length is 10");
        observer.refresh();

        match timeout(Duration::from_secs(1), rx.recv()).await {
            Ok(Ok(ProgressEvent::Warning(message))) => {
                assert_eq!(message, "Maximum text length is 10");
            }
            other => panic!("unexpected: {other:?}"),
        }

        match timeout(Duration::from_secs(1), rx.recv()).await {
            Ok(Ok(ProgressEvent::Refresh { result })) => assert!(result.is_empty()),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn renderer_stops_on_terminal_event() {
        let (tx, rx) = kanal::unbounded_async::<ProgressEvent>();
        let renderer = tokio::spawn(render_progress(rx, false));

        tx.send(ProgressEvent::Refresh {
            result: "partial".to_string(),
        })
        .await
        .unwrap();
        tx.send(ProgressEvent::Failed {
            message: "boom".to_string(),
            banned: false,
            result: String::new(),
        })
        .await
        .unwrap();

        assert!(timeout(Duration::from_secs(2), renderer).await.is_ok());
    }
}
