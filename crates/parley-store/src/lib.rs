pub mod error;
pub mod memory;
pub mod models;
pub mod notify;

mod conversations;
mod groups;
mod messages;
mod reads;
mod search;
mod state;
mod users;

use parley_types::models::{
    ConversationOverview, Group, Message, MessageRead, MessageStatus, User, UserConversation,
};

pub use error::{Entity, StoreError, StoreResult};
pub use memory::MemoryStore;
pub use models::{MessagePage, NewGroup, NewMessage, NewUser};
pub use notify::{NoopNotifier, Notifier, NotifyError};

/// Capability interface over the chat state.
///
/// Handlers, services and the server only ever hold an `Arc<dyn Repository>`,
/// so a persistent backend can replace [`MemoryStore`] without touching them.
/// Every call is synchronous and yields exactly one outcome.
pub trait Repository: Send + Sync {
    // -- Users --

    fn create_user(&self, user: NewUser) -> StoreResult<User>;
    fn get_user(&self, user_id: &str) -> StoreResult<User>;

    // -- Groups --

    fn create_group(&self, group: NewGroup) -> StoreResult<Group>;
    fn get_group(&self, group_id: &str) -> StoreResult<Group>;
    fn add_group_member(&self, group_id: &str, user_id: &str) -> StoreResult<()>;
    /// Never fails: unknown groups and users are simply not members.
    fn is_group_member(&self, group_id: &str, user_id: &str) -> bool;
    /// Member ids in ascending order.
    fn group_members(&self, group_id: &str) -> StoreResult<Vec<String>>;

    // -- Messages --

    fn create_message(&self, message: NewMessage) -> StoreResult<Message>;
    fn get_message(&self, message_id: &str) -> StoreResult<Message>;
    /// Newest-first page of a destination's messages. Passing the previous
    /// page's `next_cursor` resumes right after it. An empty or unknown
    /// `cursor` starts at the newest message.
    fn get_messages(
        &self,
        destination_id: &str,
        limit: usize,
        cursor: &str,
    ) -> StoreResult<MessagePage>;
    /// Unconditional overwrite.
    fn update_message_status(&self, message_id: &str, status: MessageStatus) -> StoreResult<()>;
    /// Forward-only transition checked and applied under one write lock.
    /// Returns `false` when the message is already at or past `status`.
    fn advance_message_status(
        &self,
        message_id: &str,
        status: MessageStatus,
    ) -> StoreResult<bool>;

    // -- Read receipts --

    /// Returns `true` if this created the receipt, `false` if it existed.
    fn create_message_read(&self, message_id: &str, user_id: &str) -> StoreResult<bool>;
    fn get_message_reads(&self, message_id: &str) -> Vec<MessageRead>;

    // -- Conversations --

    /// Most recently active first.
    fn get_user_conversations(&self, user_id: &str) -> Vec<UserConversation>;
    /// Same ordering as [`Repository::get_user_conversations`], with the last
    /// message and unread count of each row.
    fn conversation_overview(&self, user_id: &str) -> Vec<ConversationOverview>;

    // -- Search --

    fn search_messages(&self, user_id: &str, query: &str) -> Vec<Message>;
}
