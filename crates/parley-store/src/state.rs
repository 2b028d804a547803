use std::collections::{BTreeSet, HashMap, HashSet};

use parley_types::models::{
    ConversationKind, Group, Message, MessageRead, User, UserConversation,
};

/// Everything the store owns, guarded as one unit by the store's lock.
///
/// Methods on `State` never lock; they are the internal variants that public
/// store operations call once they hold the guard.
#[derive(Default)]
pub(crate) struct State {
    pub(crate) users: HashMap<String, User>,
    pub(crate) groups: HashMap<String, Group>,
    /// group id -> member ids
    pub(crate) group_members: HashMap<String, BTreeSet<String>>,
    /// destination id -> messages in append order
    pub(crate) messages: HashMap<String, Vec<Message>>,
    /// message id -> position in `messages`
    pub(crate) locations: HashMap<String, MessageLocation>,
    /// user id -> conversation rows in creation order
    pub(crate) conversations: HashMap<String, Vec<ConversationRow>>,
    /// message id -> receipts in creation order
    pub(crate) message_reads: HashMap<String, Vec<MessageRead>>,
    /// ids of messages each user still has to read, per conversation
    pub(crate) unread: HashMap<ConversationKey, HashSet<String>>,
    /// bumped on every conversation touch; orders rows with equal timestamps
    pub(crate) touch_seq: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct MessageLocation {
    pub(crate) destination_id: String,
    pub(crate) index: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct ConversationRow {
    pub(crate) conversation: UserConversation,
    pub(crate) last_message_id: String,
    pub(crate) touched: u64,
}

/// (user, destination, kind) as seen from the owning user's side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ConversationKey {
    pub(crate) user_id: String,
    pub(crate) destination_id: String,
    pub(crate) kind: ConversationKind,
}

impl ConversationKey {
    pub(crate) fn new(user_id: &str, destination_id: &str, kind: ConversationKind) -> Self {
        Self {
            user_id: user_id.to_string(),
            destination_id: destination_id.to_string(),
            kind,
        }
    }

    /// The conversation `message` belongs to from `user_id`'s point of view.
    pub(crate) fn for_reader(user_id: &str, message: &Message) -> Self {
        match message.kind {
            // the other party of a direct message is whoever isn't reading it
            ConversationKind::OneToOne if message.destination_id == user_id => {
                Self::new(user_id, &message.sender_id, ConversationKind::OneToOne)
            }
            kind => Self::new(user_id, &message.destination_id, kind),
        }
    }
}
