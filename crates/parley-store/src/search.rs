use parley_types::models::{ConversationKind, Message};

use crate::state::State;

impl State {
    /// Naive keyword search: scans every message, no index, no ranking.
    ///
    /// Destinations are visited in ascending id order, messages in append
    /// order within each. An empty query matches nothing.
    pub(crate) fn search(&self, user_id: &str, query: &str) -> Vec<Message> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();

        let mut destinations: Vec<&String> = self.messages.keys().collect();
        destinations.sort();

        destinations
            .into_iter()
            .flat_map(|destination| &self.messages[destination])
            .filter(|message| self.is_participant(user_id, message))
            .filter(|message| message.text.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub(crate) fn is_participant(&self, user_id: &str, message: &Message) -> bool {
        message.sender_id == user_id
            || message.is_direct_recipient(user_id)
            || (message.kind == ConversationKind::Group
                && self.is_member(&message.destination_id, user_id))
    }
}
