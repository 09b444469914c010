/// Host hook notified as the pipeline publishes results.
pub trait ProgressObserver: Send + Sync {
    /// The published result changed, re-render now
    fn refresh(&self);

    /// User-visible, non-fatal notice
    fn warn(&self, _message: &str) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn refresh(&self) {}
}
