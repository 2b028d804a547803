use chrono::{DateTime, Utc};
use uuid::Uuid;

use parley_types::models::{MessageRead, MessageStatus};

use crate::error::{Entity, StoreError, StoreResult};
use crate::state::State;

impl State {
    /// Record that `user_id` read `message_id`.
    ///
    /// The first receipt for a message, from any reader, promotes it to
    /// `READ`. A repeated receipt for the same pair changes nothing and
    /// returns `false`.
    pub(crate) fn record_read(
        &mut self,
        message_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        if self.find_message(message_id).is_none() {
            return Err(StoreError::not_found(Entity::Message, message_id));
        }

        let reads = self.message_reads.entry(message_id.to_string()).or_default();
        if reads.iter().any(|read| read.user_id == user_id) {
            return Ok(false);
        }
        reads.push(MessageRead {
            id: Uuid::new_v4().to_string(),
            message_id: message_id.to_string(),
            user_id: user_id.to_string(),
            created_at: now,
        });

        self.set_status(message_id, MessageStatus::Read, now)?;
        if let Some(message) = self.find_message(message_id).cloned() {
            self.clear_unread(user_id, &message);
        }
        Ok(true)
    }

    pub(crate) fn reads_for(&self, message_id: &str) -> &[MessageRead] {
        self.message_reads
            .get(message_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
