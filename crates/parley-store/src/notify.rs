use thiserror::Error;

use parley_types::models::Message;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("no live subscribers for {0}")]
    NoSubscribers(String),
}

/// Outward hook invoked after a message has been stored.
///
/// Delivery is best effort: the store calls this once the write lock has been
/// released and discards the result, so a failing transport never rolls back
/// or delays a message write.
pub trait Notifier: Send + Sync {
    fn notify(&self, destination_id: &str, message: &Message) -> Result<(), NotifyError>;
}

/// Notifier for stores that have nobody to tell.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _destination_id: &str, _message: &Message) -> Result<(), NotifyError> {
        Ok(())
    }
}
