use std::cmp::Reverse;

use uuid::Uuid;

use parley_types::models::{ConversationOverview, Message, UserConversation};

use crate::state::{ConversationKey, ConversationRow, State};

impl State {
    /// Upsert the row for `key`: bump it to `message.created_at` if it exists,
    /// create it otherwise. Rows are never removed.
    pub(crate) fn touch_conversation(&mut self, key: ConversationKey, message: &Message) {
        self.touch_seq += 1;
        let touched = self.touch_seq;

        let rows = self.conversations.entry(key.user_id.clone()).or_default();
        let existing = rows.iter_mut().find(|row| {
            row.conversation.destination_id == key.destination_id
                && row.conversation.kind == key.kind
        });

        match existing {
            Some(row) => {
                row.conversation.updated_at = message.created_at;
                row.last_message_id = message.id.clone();
                row.touched = touched;
            }
            None => rows.push(ConversationRow {
                conversation: UserConversation {
                    id: Uuid::new_v4().to_string(),
                    user_id: key.user_id,
                    destination_id: key.destination_id,
                    kind: key.kind,
                    created_at: message.created_at,
                    updated_at: message.created_at,
                },
                last_message_id: message.id.clone(),
                touched,
            }),
        }
    }

    /// A user's rows, most recently active first.
    pub(crate) fn conversations_for(&self, user_id: &str) -> Vec<&ConversationRow> {
        let mut rows: Vec<&ConversationRow> = self
            .conversations
            .get(user_id)
            .map(|rows| rows.iter().collect())
            .unwrap_or_default();
        rows.sort_by_key(|row| Reverse((row.conversation.updated_at, row.touched)));
        rows
    }

    pub(crate) fn overview(&self, user_id: &str) -> Vec<ConversationOverview> {
        self.conversations_for(user_id)
            .into_iter()
            .map(|row| {
                let key = ConversationKey::new(
                    user_id,
                    &row.conversation.destination_id,
                    row.conversation.kind,
                );
                ConversationOverview {
                    conversation: row.conversation.clone(),
                    last_message: self.find_message(&row.last_message_id).cloned(),
                    unread_count: self.unread.get(&key).map_or(0, |ids| ids.len()),
                }
            })
            .collect()
    }

    pub(crate) fn mark_unread(&mut self, key: ConversationKey, message_id: &str) {
        self.unread.entry(key).or_default().insert(message_id.to_string());
    }

    /// Drop `message` from `user_id`'s unread set. No-op if it was never
    /// counted, e.g. for the sender or a member who joined later.
    pub(crate) fn clear_unread(&mut self, user_id: &str, message: &Message) {
        let key = ConversationKey::for_reader(user_id, message);
        if let Some(ids) = self.unread.get_mut(&key) {
            ids.remove(&message.id);
        }
    }
}
