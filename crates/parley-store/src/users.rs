use chrono::{DateTime, Utc};

use parley_types::models::User;

use crate::error::{Entity, StoreError, StoreResult};
use crate::models::NewUser;
use crate::state::State;

impl State {
    pub(crate) fn insert_user(&mut self, new: NewUser, now: DateTime<Utc>) -> StoreResult<User> {
        if self.users.contains_key(&new.id) {
            return Err(StoreError::already_exists(Entity::User, &new.id));
        }

        let user = User {
            id: new.id,
            name: new.name,
            email: new.email,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    pub(crate) fn user(&self, user_id: &str) -> StoreResult<&User> {
        self.users
            .get(user_id)
            .ok_or_else(|| StoreError::not_found(Entity::User, user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> NewUser {
        NewUser {
            id: "user1".into(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
        }
    }

    #[test]
    fn create_then_lookup() {
        let mut state = State::default();
        let now = Utc::now();
        let user = state.insert_user(alice(), now).unwrap();
        assert_eq!(user.created_at, now);
        assert_eq!(state.user("user1").unwrap().name, "Alice");
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut state = State::default();
        state.insert_user(alice(), Utc::now()).unwrap();
        let err = state.insert_user(alice(), Utc::now()).unwrap_err();
        assert_eq!(err, StoreError::already_exists(Entity::User, "user1"));
    }

    #[test]
    fn unknown_user() {
        let state = State::default();
        assert!(matches!(
            state.user("ghost"),
            Err(StoreError::NotFound { entity: Entity::User, .. })
        ));
    }
}
