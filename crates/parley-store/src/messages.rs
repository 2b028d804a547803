use chrono::{DateTime, Utc};
use uuid::Uuid;

use parley_types::models::{ConversationKind, Message, MessageStatus};

use crate::error::{Entity, StoreError, StoreResult};
use crate::models::{MessagePage, NewMessage};
use crate::state::{ConversationKey, MessageLocation, State};

impl State {
    /// Append a message to its destination list and fan it out to the
    /// conversation index of every participant.
    pub(crate) fn insert_message(
        &mut self,
        new: NewMessage,
        now: DateTime<Utc>,
    ) -> StoreResult<Message> {
        self.user(&new.sender_id)?;
        match new.kind {
            ConversationKind::OneToOne => {
                self.user(&new.destination_id)?;
            }
            ConversationKind::Group => {
                self.group(&new.destination_id)?;
            }
        }

        let message = Message {
            id: Uuid::now_v7().to_string(),
            sender_id: new.sender_id,
            destination_id: new.destination_id,
            text: new.text,
            status: MessageStatus::Sent,
            kind: new.kind,
            created_at: now,
            updated_at: now,
        };

        let list = self.messages.entry(message.destination_id.clone()).or_default();
        self.locations.insert(
            message.id.clone(),
            MessageLocation {
                destination_id: message.destination_id.clone(),
                index: list.len(),
            },
        );
        list.push(message.clone());

        self.fan_out(&message);
        Ok(message)
    }

    fn fan_out(&mut self, message: &Message) {
        self.touch_conversation(
            ConversationKey::new(&message.sender_id, &message.destination_id, message.kind),
            message,
        );

        let recipients: Vec<String> = match message.kind {
            ConversationKind::OneToOne => vec![message.destination_id.clone()],
            ConversationKind::Group => self
                .group_members
                .get(&message.destination_id)
                .map(|members| members.iter().cloned().collect())
                .unwrap_or_default(),
        };

        for recipient in recipients.iter().filter(|id| **id != message.sender_id) {
            let key = ConversationKey::for_reader(recipient, message);
            self.touch_conversation(key.clone(), message);
            self.mark_unread(key, &message.id);
        }
    }

    pub(crate) fn find_message(&self, message_id: &str) -> Option<&Message> {
        let location = self.locations.get(message_id)?;
        self.messages.get(&location.destination_id)?.get(location.index)
    }

    pub(crate) fn find_message_mut(&mut self, message_id: &str) -> Option<&mut Message> {
        let location = self.locations.get(message_id)?;
        self.messages
            .get_mut(&location.destination_id)?
            .get_mut(location.index)
    }

    pub(crate) fn message(&self, message_id: &str) -> StoreResult<&Message> {
        self.find_message(message_id)
            .ok_or_else(|| StoreError::not_found(Entity::Message, message_id))
    }

    /// Newest-first page starting right after `cursor`.
    pub(crate) fn page(
        &self,
        destination_id: &str,
        limit: usize,
        cursor: &str,
    ) -> StoreResult<MessagePage> {
        if limit == 0 {
            return Err(StoreError::InvalidArgument("limit must be positive".into()));
        }

        let Some(list) = self.messages.get(destination_id) else {
            return Ok(MessagePage::default());
        };

        // Offset into the newest-first view; the cursor message opens the page.
        // A cursor that is unknown, or belongs to another destination, restarts
        // from the newest message.
        let start = match self.locations.get(cursor) {
            Some(location) if !cursor.is_empty() && location.destination_id == destination_id => {
                list.len() - 1 - location.index
            }
            _ => 0,
        };

        let messages = list.iter().rev().skip(start).take(limit).cloned().collect();
        let next_cursor = list
            .iter()
            .rev()
            .nth(start.saturating_add(limit))
            .map(|message| message.id.clone());

        Ok(MessagePage {
            messages,
            next_cursor,
        })
    }

    /// Overwrite a message's status. Ordering checks belong to the caller.
    pub(crate) fn set_status(
        &mut self,
        message_id: &str,
        status: MessageStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<()> {
        let message = self
            .find_message_mut(message_id)
            .ok_or_else(|| StoreError::not_found(Entity::Message, message_id))?;
        message.status = status;
        message.updated_at = now;
        Ok(())
    }

    /// Move a message to `status` only if that is a step forward. Returns
    /// whether the status changed.
    pub(crate) fn advance_status(
        &mut self,
        message_id: &str,
        status: MessageStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let current = self.message(message_id)?.status;
        if !current.can_advance_to(status) {
            return Ok(false);
        }
        self.set_status(message_id, status, now)?;
        Ok(true)
    }
}
