use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::mpsc;
use tracing::{debug, trace};
use uuid::Uuid;

use parley_store::{Notifier, NotifyError};
use parley_types::events::NotificationEvent;
use parley_types::models::Message;

/// Live connections keyed by the destination they listen on.
///
/// A client subscribes once per destination it cares about: its own user id
/// for direct messages, and the id of every group it belongs to. Several
/// connections (devices) may listen on the same destination.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

type Subscribers = HashMap<String, HashMap<Uuid, mpsc::UnboundedSender<NotificationEvent>>>;

struct DispatcherInner {
    /// destination id -> (conn_id -> sender)
    subscribers: RwLock<Subscribers>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                subscribers: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Register a connection on `destination_id`. Returns (conn_id, receiver).
    pub fn subscribe(
        &self,
        destination_id: &str,
    ) -> (Uuid, mpsc::UnboundedReceiver<NotificationEvent>) {
        let conn_id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(destination_id.to_string())
            .or_default()
            .insert(conn_id, tx);
        debug!("Connection {} subscribed to {}", conn_id, destination_id);
        (conn_id, rx)
    }

    /// Drop one connection. Unknown ids are ignored.
    pub fn unsubscribe(&self, destination_id: &str, conn_id: Uuid) {
        let mut subscribers = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(connections) = subscribers.get_mut(destination_id) {
            connections.remove(&conn_id);
            if connections.is_empty() {
                subscribers.remove(destination_id);
            }
        }
    }

    /// True if at least one open connection listens on `destination_id`.
    pub fn is_connected(&self, destination_id: &str) -> bool {
        self.inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(destination_id)
            .is_some_and(|connections| connections.values().any(|tx| !tx.is_closed()))
    }

    /// Push `event` to every connection on `destination_id`, pruning the ones
    /// whose receiver is gone. Returns how many connections got it.
    pub fn send_to(
        &self,
        destination_id: &str,
        event: NotificationEvent,
    ) -> Result<usize, NotifyError> {
        let mut subscribers = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let delivered = match subscribers.get_mut(destination_id) {
            Some(connections) => {
                connections.retain(|_, tx| tx.send(event.clone()).is_ok());
                let delivered = connections.len();
                if delivered == 0 {
                    subscribers.remove(destination_id);
                }
                delivered
            }
            None => 0,
        };

        if delivered == 0 {
            debug!(
                "No live connection on {}, dropping event for message {}",
                destination_id,
                event.message_id()
            );
            return Err(NotifyError::NoSubscribers(destination_id.to_string()));
        }

        trace!(
            "Event for message {} sent to {} connection(s) on {}",
            event.message_id(),
            delivered,
            destination_id
        );
        Ok(delivered)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for Dispatcher {
    fn notify(&self, destination_id: &str, message: &Message) -> Result<(), NotifyError> {
        self.send_to(
            destination_id,
            NotificationEvent::MessageCreate {
                message: message.clone(),
            },
        )
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use parley_types::models::{ConversationKind, MessageStatus};

    use super::*;

    fn message(destination: &str) -> Message {
        let now = Utc::now();
        Message {
            id: "m1".into(),
            sender_id: "user1".into(),
            destination_id: destination.into(),
            text: "Hello".into(),
            status: MessageStatus::Sent,
            kind: ConversationKind::OneToOne,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn notify_reaches_every_device() {
        let dispatcher = Dispatcher::new();
        let (_, mut phone) = dispatcher.subscribe("user2");
        let (_, mut laptop) = dispatcher.subscribe("user2");
        let (_, mut other) = dispatcher.subscribe("user3");

        dispatcher.notify("user2", &message("user2")).unwrap();

        for rx in [&mut phone, &mut laptop] {
            match rx.try_recv().unwrap() {
                NotificationEvent::MessageCreate { message } => assert_eq!(message.id, "m1"),
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert!(other.try_recv().is_err());
    }

    #[test]
    fn nobody_listening() {
        let dispatcher = Dispatcher::new();
        assert_eq!(
            dispatcher.notify("user2", &message("user2")),
            Err(NotifyError::NoSubscribers("user2".into()))
        );
        assert!(!dispatcher.is_connected("user2"));
    }

    #[test]
    fn closed_connections_are_pruned() {
        let dispatcher = Dispatcher::new();
        let (_, rx) = dispatcher.subscribe("user2");
        let (_, mut live) = dispatcher.subscribe("user2");
        drop(rx);

        let delivered = dispatcher
            .send_to(
                "user2",
                NotificationEvent::MessageStatusUpdate {
                    message_id: "m1".into(),
                    user_id: "user3".into(),
                    status: MessageStatus::Read,
                },
            )
            .unwrap();
        assert_eq!(delivered, 1);
        assert!(live.try_recv().is_ok());

        drop(live);
        assert!(!dispatcher.is_connected("user2"));
        assert!(dispatcher.notify("user2", &message("user2")).is_err());
    }

    #[test]
    fn unsubscribe_drops_connection() {
        let dispatcher = Dispatcher::new();
        let (conn_id, _rx) = dispatcher.subscribe("group1");
        assert!(dispatcher.is_connected("group1"));

        dispatcher.unsubscribe("group1", Uuid::new_v4());
        assert!(dispatcher.is_connected("group1"));

        dispatcher.unsubscribe("group1", conn_id);
        assert!(!dispatcher.is_connected("group1"));
    }
}
