// User Collection Store
// The ordered in-memory list of users. Ids are unique at all times.

use crate::models::UserRecord;

use std::collections::HashSet;
use thiserror::Error;
use tracing::warn;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("User with id {0} not found")]
    NotFound(u64),

    #[error("User with id {0} already exists")]
    DuplicateId(u64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserCollection {
    users: Vec<UserRecord>,
}

impl UserCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from a server listing, keeping the first record for any repeated id
    pub fn from_records(records: Vec<UserRecord>) -> Self {
        let mut seen = HashSet::with_capacity(records.len());
        let users = records
            .into_iter()
            .filter(|user| {
                let fresh = seen.insert(user.id);
                if !fresh {
                    warn!(id = user.id, "dropping repeated user id from listing");
                }
                fresh
            })
            .collect();
        Self { users }
    }

    pub fn all(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&UserRecord> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.get(id).is_some()
    }

    pub fn max_id(&self) -> Option<u64> {
        self.users.iter().map(|user| user.id).max()
    }

    /// One past the largest id, or 1 for an empty collection. When the
    /// largest id is `u64::MAX`, the smallest unused id instead.
    pub fn next_id(&self) -> u64 {
        match self.max_id() {
            None => 1,
            Some(max) => max
                .checked_add(1)
                .unwrap_or_else(|| self.smallest_unused_id()),
        }
    }

    fn smallest_unused_id(&self) -> u64 {
        let taken: HashSet<u64> = self.users.iter().map(|user| user.id).collect();
        (1..=u64::MAX)
            .find(|id| !taken.contains(id))
            .unwrap_or(0)
    }

    /// Prepend a record whose id has already been resolved by the caller
    pub fn insert_at_front(&mut self, record: UserRecord) -> StoreResult<()> {
        if self.contains(record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        self.users.insert(0, record);
        Ok(())
    }

    /// Replace the record stored under `id`. The stored record keeps `id`.
    pub fn replace(&mut self, id: u64, record: UserRecord) -> StoreResult<()> {
        let slot = self
            .users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or(StoreError::NotFound(id))?;
        *slot = UserRecord { id, ..record };
        Ok(())
    }

    pub fn remove(&mut self, id: u64) -> StoreResult<UserRecord> {
        let index = self
            .users
            .iter()
            .position(|user| user.id == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(self.users.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64, name: &str) -> UserRecord {
        UserRecord::new(id, name, format!("{}@example.com", name.to_lowercase()), "555")
    }

    fn collection() -> UserCollection {
        UserCollection::from_records(vec![user(1, "Alice"), user(2, "Bob"), user(3, "Cara")])
    }

    #[test]
    fn test_from_records_drops_repeated_ids() {
        let users = UserCollection::from_records(vec![user(1, "A"), user(1, "B"), user(2, "C")]);
        assert_eq!(users.len(), 2);
        assert_eq!(users.get(1).unwrap().name, "A");
    }

    #[test]
    fn test_insert_at_front() {
        let mut users = collection();
        users.insert_at_front(user(4, "Dan")).unwrap();

        assert_eq!(users.len(), 4);
        assert_eq!(users.all()[0].id, 4);
        assert_eq!(
            users.insert_at_front(user(2, "Again")),
            Err(StoreError::DuplicateId(2))
        );
        assert_eq!(users.len(), 4);
    }

    #[test]
    fn test_replace_keeps_position_and_id() {
        let mut users = collection();
        users.replace(2, user(99, "Robert")).unwrap();

        assert_eq!(users.all()[1], UserRecord { id: 2, ..user(99, "Robert") });
        assert!(!users.contains(99));
    }

    #[test]
    fn test_replace_missing() {
        let mut users = collection();
        let before = users.clone();
        assert_eq!(users.replace(7, user(7, "X")), Err(StoreError::NotFound(7)));
        assert_eq!(users, before);
    }

    #[test]
    fn test_remove() {
        let mut users = collection();
        let removed = users.remove(2).unwrap();

        assert_eq!(removed.name, "Bob");
        assert_eq!(users.len(), 2);
        assert!(!users.contains(2));
        assert_eq!(users.remove(2), Err(StoreError::NotFound(2)));
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn test_next_id() {
        assert_eq!(UserCollection::new().next_id(), 1);
        assert_eq!(collection().next_id(), 4);
    }

    #[test]
    fn test_next_id_after_largest_possible_id() {
        let users = UserCollection::from_records(vec![
            user(1, "Alice"),
            user(u64::MAX, "Max"),
            user(2, "Bob"),
        ]);
        assert_eq!(users.next_id(), 3);
    }
}
