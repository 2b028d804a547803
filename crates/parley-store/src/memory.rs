use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;

use parley_types::models::{
    ConversationOverview, Group, Message, MessageRead, MessageStatus, User, UserConversation,
};

use crate::Repository;
use crate::error::StoreResult;
use crate::models::{MessagePage, NewGroup, NewMessage, NewUser};
use crate::notify::{NoopNotifier, Notifier};
use crate::state::State;

/// In-memory [`Repository`].
///
/// One reader/writer lock covers every collection so that a message write
/// updates its destination list, the conversation rows of all participants
/// and their unread sets in a single critical section. Each public method
/// takes the lock exactly once; everything behind it runs on lock-free
/// `State` helpers. Returned entities are copies.
pub struct MemoryStore {
    state: RwLock<State>,
    notifier: Arc<dyn Notifier>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_notifier(Arc::new(NoopNotifier))
    }

    pub fn with_notifier(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: RwLock::new(State::default()),
            notifier,
        }
    }

    // State helpers validate before they mutate, so a poisoned lock still
    // guards consistent data and is recovered.
    fn with_state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&State) -> T,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn with_state_mut<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut State) -> T,
    {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MemoryStore {
    fn create_user(&self, user: NewUser) -> StoreResult<User> {
        self.with_state_mut(|state| state.insert_user(user, Utc::now()))
    }

    fn get_user(&self, user_id: &str) -> StoreResult<User> {
        self.with_state(|state| state.user(user_id).cloned())
    }

    fn create_group(&self, group: NewGroup) -> StoreResult<Group> {
        self.with_state_mut(|state| state.insert_group(group, Utc::now()))
    }

    fn get_group(&self, group_id: &str) -> StoreResult<Group> {
        self.with_state(|state| state.group(group_id).cloned())
    }

    fn add_group_member(&self, group_id: &str, user_id: &str) -> StoreResult<()> {
        self.with_state_mut(|state| state.add_member(group_id, user_id))
    }

    fn is_group_member(&self, group_id: &str, user_id: &str) -> bool {
        self.with_state(|state| state.is_member(group_id, user_id))
    }

    fn group_members(&self, group_id: &str) -> StoreResult<Vec<String>> {
        self.with_state(|state| state.members(group_id))
    }

    fn create_message(&self, message: NewMessage) -> StoreResult<Message> {
        let message = self.with_state_mut(|state| state.insert_message(message, Utc::now()))?;

        // Outside the lock; the outcome is ignored.
        let _ = self.notifier.notify(&message.destination_id, &message);

        Ok(message)
    }

    fn get_message(&self, message_id: &str) -> StoreResult<Message> {
        self.with_state(|state| state.message(message_id).cloned())
    }

    fn get_messages(
        &self,
        destination_id: &str,
        limit: usize,
        cursor: &str,
    ) -> StoreResult<MessagePage> {
        self.with_state(|state| state.page(destination_id, limit, cursor))
    }

    fn update_message_status(&self, message_id: &str, status: MessageStatus) -> StoreResult<()> {
        self.with_state_mut(|state| state.set_status(message_id, status, Utc::now()))
    }

    fn advance_message_status(&self, message_id: &str, status: MessageStatus) -> StoreResult<bool> {
        self.with_state_mut(|state| state.advance_status(message_id, status, Utc::now()))
    }

    fn create_message_read(&self, message_id: &str, user_id: &str) -> StoreResult<bool> {
        self.with_state_mut(|state| state.record_read(message_id, user_id, Utc::now()))
    }

    fn get_message_reads(&self, message_id: &str) -> Vec<MessageRead> {
        self.with_state(|state| state.reads_for(message_id).to_vec())
    }

    fn get_user_conversations(&self, user_id: &str) -> Vec<UserConversation> {
        self.with_state(|state| {
            state
                .conversations_for(user_id)
                .into_iter()
                .map(|row| row.conversation.clone())
                .collect()
        })
    }

    fn conversation_overview(&self, user_id: &str) -> Vec<ConversationOverview> {
        self.with_state(|state| state.overview(user_id))
    }

    fn search_messages(&self, user_id: &str, query: &str) -> Vec<Message> {
        self.with_state(|state| state.search(user_id, query))
    }
}
