use tokio::task::JoinHandle;
use tracing::info;

use parley_gateway::Dispatcher;
use parley_store::{NewGroup, NewUser, Repository};
use parley_types::events::NotificationEvent;

pub const DEMO_USERS: [(&str, &str, &str); 3] = [
    ("user1", "Alice", "alice@example.com"),
    ("user2", "Bob", "bob@example.com"),
    ("user3", "Charlie", "charlie@example.com"),
];

pub const DEMO_GROUP: &str = "group1";

/// Users matching the default client credentials plus one group holding all
/// of them.
pub fn seed_demo(store: &dyn Repository) -> anyhow::Result<()> {
    for (id, name, email) in DEMO_USERS {
        store.create_user(NewUser {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        })?;
    }

    store.create_group(NewGroup {
        id: DEMO_GROUP.into(),
        name: "Project Team".into(),
        description: "Team chat for project discussions".into(),
        created_by: DEMO_USERS[0].0.into(),
    })?;
    for (id, _, _) in DEMO_USERS {
        store.add_group_member(DEMO_GROUP, id)?;
    }

    info!("Seeded {} demo users and group {}", DEMO_USERS.len(), DEMO_GROUP);
    Ok(())
}

/// Stand-in for a client connection: subscribe on `destination_id` and log
/// whatever arrives until the dispatcher drops us. Resolves to the number of
/// events handled.
pub fn listen(dispatcher: &Dispatcher, destination_id: &str) -> JoinHandle<usize> {
    let (conn_id, mut rx) = dispatcher.subscribe(destination_id);
    let destination_id = destination_id.to_string();

    tokio::spawn(async move {
        let mut handled = 0;
        while let Some(event) = rx.recv().await {
            handled += 1;
            match event {
                NotificationEvent::MessageCreate { message } => info!(
                    "[{}] new message {} from {}: {}",
                    destination_id, message.id, message.sender_id, message.text
                ),
                NotificationEvent::MessageStatusUpdate {
                    message_id,
                    user_id,
                    status,
                } => info!(
                    "[{}] message {} is now {} for {}",
                    destination_id, message_id, status, user_id
                ),
            }
        }
        info!("Connection {} on {} closed after {} event(s)", conn_id, destination_id, handled);
        handled
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parley_store::{MemoryStore, NewMessage, StoreError};
    use parley_types::models::ConversationKind;

    use super::*;

    #[test]
    fn seeds_users_and_group() {
        let store = MemoryStore::new();
        seed_demo(&store).unwrap();

        assert_eq!(store.get_user("user2").unwrap().name, "Bob");
        assert_eq!(
            store.group_members(DEMO_GROUP).unwrap(),
            vec!["user1", "user2", "user3"]
        );

        // seeding twice is a configuration error, not a silent no-op
        let err = seed_demo(&store).unwrap_err();
        assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn listener_handles_events_until_closed() {
        let dispatcher = Dispatcher::new();
        let store = MemoryStore::with_notifier(Arc::new(dispatcher.clone()));
        seed_demo(&store).unwrap();

        let bob = listen(&dispatcher, "user2");
        let team = listen(&dispatcher, DEMO_GROUP);
        assert!(dispatcher.is_connected("user2"));

        for (destination_id, kind) in [
            ("user2", ConversationKind::OneToOne),
            ("user2", ConversationKind::OneToOne),
            (DEMO_GROUP, ConversationKind::Group),
        ] {
            store
                .create_message(NewMessage {
                    sender_id: "user1".into(),
                    destination_id: destination_id.into(),
                    text: "Hello".into(),
                    kind,
                })
                .unwrap();
        }

        // dropping every dispatcher handle closes the connections
        drop(store);
        drop(dispatcher);
        assert_eq!(bob.await.unwrap(), 2);
        assert_eq!(team.await.unwrap(), 1);
    }
}
