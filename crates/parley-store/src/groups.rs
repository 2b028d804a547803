use chrono::{DateTime, Utc};

use parley_types::models::Group;

use crate::error::{Entity, StoreError, StoreResult};
use crate::models::NewGroup;
use crate::state::State;

impl State {
    pub(crate) fn insert_group(&mut self, new: NewGroup, now: DateTime<Utc>) -> StoreResult<Group> {
        if self.groups.contains_key(&new.id) {
            return Err(StoreError::already_exists(Entity::Group, &new.id));
        }

        let group = Group {
            id: new.id,
            name: new.name,
            description: new.description,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        };
        self.group_members.insert(group.id.clone(), Default::default());
        self.groups.insert(group.id.clone(), group.clone());
        Ok(group)
    }

    pub(crate) fn group(&self, group_id: &str) -> StoreResult<&Group> {
        self.groups
            .get(group_id)
            .ok_or_else(|| StoreError::not_found(Entity::Group, group_id))
    }

    /// Re-adding an existing member is a no-op.
    pub(crate) fn add_member(&mut self, group_id: &str, user_id: &str) -> StoreResult<()> {
        let members = self
            .group_members
            .get_mut(group_id)
            .ok_or_else(|| StoreError::not_found(Entity::Group, group_id))?;
        members.insert(user_id.to_string());
        Ok(())
    }

    pub(crate) fn is_member(&self, group_id: &str, user_id: &str) -> bool {
        self.group_members
            .get(group_id)
            .is_some_and(|members| members.contains(user_id))
    }

    pub(crate) fn members(&self, group_id: &str) -> StoreResult<Vec<String>> {
        self.group_members
            .get(group_id)
            .map(|members| members.iter().cloned().collect())
            .ok_or_else(|| StoreError::not_found(Entity::Group, group_id))
    }
}
