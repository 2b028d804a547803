use std::sync::{Arc, Mutex, OnceLock};
use std::thread;

use parley_store::{
    Entity, MemoryStore, NewGroup, NewMessage, NewUser, Notifier, NotifyError, Repository,
    StoreError,
};
use parley_types::models::{ConversationKind, Message, MessageStatus};

fn seed(store: &dyn Repository) {
    for (id, name) in [("user1", "Alice"), ("user2", "Bob"), ("user3", "Charlie")] {
        store
            .create_user(NewUser {
                id: id.into(),
                name: name.into(),
                email: format!("{}@example.com", name.to_lowercase()),
            })
            .unwrap();
    }
    store
        .create_group(NewGroup {
            id: "group1".into(),
            name: "Project Team".into(),
            description: "Team chat for project discussions".into(),
            created_by: "user1".into(),
        })
        .unwrap();
    for member in ["user1", "user2", "user3"] {
        store.add_group_member("group1", member).unwrap();
    }
}

fn direct(from: &str, to: &str, text: &str) -> NewMessage {
    NewMessage {
        sender_id: from.into(),
        destination_id: to.into(),
        text: text.into(),
        kind: ConversationKind::OneToOne,
    }
}

fn to_group(from: &str, text: &str) -> NewMessage {
    NewMessage {
        sender_id: from.into(),
        destination_id: "group1".into(),
        text: text.into(),
        kind: ConversationKind::Group,
    }
}

#[test]
fn send_fetch_read_scenario() {
    let store = MemoryStore::new();
    seed(&store);

    let m1 = store.create_message(direct("user1", "user2", "Hello Bob!")).unwrap();
    assert_eq!(m1.status, MessageStatus::Sent);

    let page = store.get_messages("user2", 50, "").unwrap();
    assert_eq!(page.messages, vec![m1.clone()]);
    assert_eq!(page.next_cursor, None);
    assert!(!page.has_more());

    store.create_message_read(&m1.id, "user2").unwrap();
    assert_eq!(store.get_message(&m1.id).unwrap().status, MessageStatus::Read);
}

#[test]
fn duplicate_read_receipts_collapse() {
    let store = MemoryStore::new();
    seed(&store);
    let message = store.create_message(direct("user1", "user2", "hi")).unwrap();

    assert!(store.create_message_read(&message.id, "user2").unwrap());
    let after_first = store.get_message(&message.id).unwrap();
    assert!(!store.create_message_read(&message.id, "user2").unwrap());

    let reads = store.get_message_reads(&message.id);
    assert_eq!(reads.len(), 1);
    assert_eq!(reads[0].user_id, "user2");
    assert_eq!(store.get_message(&message.id).unwrap(), after_first);
}

#[test]
fn stale_delivery_ack_cannot_undo_read() {
    let store = MemoryStore::new();
    seed(&store);
    let message = store.create_message(direct("user1", "user2", "hi")).unwrap();

    // a delivery ack looked the message up before a read ack landed
    let seen_by_delivery = store.get_message(&message.id).unwrap();
    assert!(seen_by_delivery.status.can_advance_to(MessageStatus::Delivered));
    store.create_message_read(&message.id, "user2").unwrap();

    assert!(!store.advance_message_status(&message.id, MessageStatus::Delivered).unwrap());
    assert_eq!(store.get_message(&message.id).unwrap().status, MessageStatus::Read);
}

#[test]
fn racing_acks_end_read() {
    let store = MemoryStore::new();
    seed(&store);
    let messages: Vec<Message> = (0..100)
        .map(|i| store.create_message(direct("user1", "user2", &format!("m{i}"))).unwrap())
        .collect();

    thread::scope(|scope| {
        scope.spawn(|| {
            for message in &messages {
                store.advance_message_status(&message.id, MessageStatus::Delivered).unwrap();
            }
        });
        scope.spawn(|| {
            for message in messages.iter().rev() {
                store.create_message_read(&message.id, "user2").unwrap();
            }
        });
    });

    for message in &messages {
        assert_eq!(store.get_message(&message.id).unwrap().status, MessageStatus::Read);
    }
}

#[test]
fn lookups_of_missing_records() {
    let store = MemoryStore::new();
    seed(&store);

    assert_eq!(
        store.get_message("nope").unwrap_err(),
        StoreError::NotFound {
            entity: Entity::Message,
            id: "nope".into()
        }
    );
    assert!(matches!(
        store.update_message_status("nope", MessageStatus::Delivered),
        Err(StoreError::NotFound { entity: Entity::Message, .. })
    ));
    assert!(matches!(
        store.advance_message_status("nope", MessageStatus::Delivered),
        Err(StoreError::NotFound { entity: Entity::Message, .. })
    ));
    assert!(matches!(
        store.create_message_read("nope", "user1"),
        Err(StoreError::NotFound { .. })
    ));
    assert!(store.get_message_reads("nope").is_empty());
    assert!(store.get_user("nope").is_err());
    assert!(store.get_group("nope").is_err());
    assert!(!store.is_group_member("nope", "user1"));
    assert!(store.get_user_conversations("nope").is_empty());
    assert!(matches!(
        store.create_user(NewUser {
            id: "user1".into(),
            name: "Dup".into(),
            email: String::new(),
        }),
        Err(StoreError::AlreadyExists { entity: Entity::User, .. })
    ));
}

#[test]
fn conversation_row_tracks_latest_message() {
    let store = MemoryStore::new();
    seed(&store);

    let mut last = None;
    for i in 0..4 {
        last = Some(store.create_message(direct("user1", "user3", &format!("#{i}"))).unwrap());
    }
    let last = last.unwrap();

    let rows = store.get_user_conversations("user1");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].destination_id, "user3");
    assert_eq!(rows[0].updated_at, last.created_at);

    let overview = store.conversation_overview("user3");
    assert_eq!(overview.len(), 1);
    assert_eq!(overview[0].unread_count, 4);
    assert_eq!(overview[0].last_message.as_ref(), Some(&last));
}

#[test]
fn group_message_reaches_every_member() {
    let store = MemoryStore::new();
    seed(&store);
    store.create_message(to_group("user1", "Hello team!")).unwrap();

    for user in ["user1", "user2", "user3"] {
        let overview = store.conversation_overview(user);
        assert_eq!(overview.len(), 1, "{user}");
        let expected_unread = if user == "user1" { 0 } else { 1 };
        assert_eq!(overview[0].unread_count, expected_unread, "{user}");
    }
}

#[test]
fn search_is_scoped_to_participants() {
    let store = MemoryStore::new();
    seed(&store);
    let message = store.create_message(direct("user1", "user2", "well hello")).unwrap();

    assert_eq!(store.search_messages("user1", "hello"), vec![message.clone()]);
    assert_eq!(store.search_messages("user2", "HELLO"), vec![message]);
    assert!(store.search_messages("user3", "hello").is_empty());
    assert!(store.search_messages("user1", "").is_empty());
}

#[test]
fn returned_entities_are_copies() {
    let store = MemoryStore::new();
    seed(&store);
    let mut message = store.create_message(direct("user1", "user2", "original")).unwrap();
    message.text = "tampered".into();
    message.status = MessageStatus::Read;

    let stored = store.get_message(&message.id).unwrap();
    assert_eq!(stored.text, "original");
    assert_eq!(stored.status, MessageStatus::Sent);
}

#[test]
fn concurrent_writers_and_readers() {
    let store = Arc::new(MemoryStore::new());
    seed(store.as_ref());

    let writers = ["user1", "user2", "user3"];
    let per_writer = 50;

    thread::scope(|scope| {
        for sender in writers {
            let store = &store;
            scope.spawn(move || {
                for i in 0..per_writer {
                    let text = format!("{sender} {i}");
                    let message = store.create_message(to_group(sender, &text)).unwrap();
                    if i % 2 == 0 {
                        store.create_message_read(&message.id, "user1").unwrap();
                    }
                }
            });
        }
        for reader in writers {
            let store = &store;
            scope.spawn(move || {
                for _ in 0..per_writer {
                    let _ = store.get_messages("group1", 10, "").unwrap();
                    let _ = store.conversation_overview(reader);
                    let _ = store.search_messages(reader, "user");
                }
            });
        }
    });

    let total = writers.len() * per_writer;
    let mut seen = 0;
    let mut cursor = String::new();
    loop {
        let page = store.get_messages("group1", 7, &cursor).unwrap();
        seen += page.messages.len();
        match page.next_cursor {
            Some(next) => cursor = next,
            None => break,
        }
    }
    assert_eq!(seen, total);

    // one row per member, whatever the interleaving
    for user in writers {
        assert_eq!(store.get_user_conversations(user).len(), 1);
    }
    // user1 read every even message of the others and never counts its own
    let unread = store.conversation_overview("user1")[0].unread_count;
    assert_eq!(unread, 2 * (per_writer / 2));
}

/// Records notifications and reads back through the store while doing so,
/// which would deadlock if the store still held its write lock.
#[derive(Default)]
struct ReentrantNotifier {
    store: OnceLock<Arc<MemoryStore>>,
    seen: Mutex<Vec<(String, String)>>,
}

impl Notifier for ReentrantNotifier {
    fn notify(&self, destination_id: &str, message: &Message) -> Result<(), NotifyError> {
        if let Some(store) = self.store.get() {
            store.get_message(&message.id).expect("message visible to notifier");
        }
        self.seen
            .lock()
            .unwrap()
            .push((destination_id.to_string(), message.id.clone()));
        Err(NotifyError::NoSubscribers(destination_id.to_string()))
    }
}

#[test]
fn notifier_runs_after_write_and_cannot_fail_it() {
    let notifier = Arc::new(ReentrantNotifier::default());
    let store = Arc::new(MemoryStore::with_notifier(notifier.clone()));
    let _ = notifier.store.set(store.clone());
    seed(store.as_ref());

    let message = store.create_message(direct("user1", "user2", "ping")).unwrap();
    assert_eq!(
        *notifier.seen.lock().unwrap(),
        vec![("user2".to_string(), message.id.clone())]
    );
    assert_eq!(store.get_message(&message.id).unwrap(), message);
}
