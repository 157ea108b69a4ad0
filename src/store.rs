use std::sync::Arc;

use crate::error::Rejection;
use crate::schemas::{Friend, FriendId};

/// Ordered collection of friends.
///
/// Updates never touch the current vector: they build a new one and swap the
/// `Arc`, so a snapshot taken before an update stays valid and
/// `Arc::ptr_eq` tells whether anything changed.
#[derive(Clone, Debug, Default)]
pub struct FriendStore {
    friends: Arc<Vec<Friend>>,
}

impl FriendStore {
    pub fn new(friends: Vec<Friend>) -> Self {
        Self {
            friends: Arc::new(friends),
        }
    }

    pub fn friends(&self) -> &[Friend] {
        &self.friends
    }

    pub fn get(&self, id: &FriendId) -> Option<&Friend> {
        self.friends.iter().find(|friend| &friend.id == id)
    }

    pub fn contains(&self, id: &FriendId) -> bool {
        self.get(id).is_some()
    }

    pub fn same_snapshot(&self, other: &FriendStore) -> bool {
        Arc::ptr_eq(&self.friends, &other.friends)
    }

    pub fn add_friend(&self, friend: Friend) -> Result<FriendStore, Rejection> {
        if self.contains(&friend.id) {
            return Err(Rejection::DuplicateFriend(friend.id));
        }
        let mut friends = Vec::with_capacity(self.friends.len() + 1);
        friends.extend(self.friends.iter().cloned());
        friends.push(friend);
        Ok(FriendStore::new(friends))
    }

    pub fn apply_balance_delta(&self, id: &FriendId, delta: f64) -> Option<FriendStore> {
        if !self.contains(id) {
            return None;
        }
        let friends = self
            .friends
            .iter()
            .map(|friend| {
                if &friend.id == id {
                    Friend {
                        balance: friend.balance + delta,
                        ..friend.clone()
                    }
                } else {
                    friend.clone()
                }
            })
            .collect();
        Some(FriendStore::new(friends))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::split_delta;
    use crate::schemas::Payer;

    fn friend(id: &str, name: &str, balance: f64) -> Friend {
        Friend {
            id: FriendId::new(id),
            name: name.to_string(),
            image: format!("https://i.pravatar.cc/48?u={id}"),
            balance,
        }
    }

    #[test]
    fn add_friend_appends_in_insertion_order() {
        let store = FriendStore::default()
            .add_friend(friend("1", "Clark", -7.0))
            .unwrap()
            .add_friend(friend("2", "Sarah", 20.0))
            .unwrap();
        let names: Vec<_> = store.friends().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Clark", "Sarah"]);
    }

    #[test]
    fn add_friend_rejects_duplicate_id() {
        let store = FriendStore::new(vec![friend("1", "Clark", -7.0)]);
        let result = store.add_friend(friend("1", "Sam", 0.0));
        assert_eq!(result.unwrap_err(), Rejection::DuplicateFriend(FriendId::new("1")));
        assert_eq!(store.friends().len(), 1);
    }

    #[test]
    fn delta_only_touches_matching_friend() {
        let store = FriendStore::new(vec![friend("1", "Clark", -7.0), friend("2", "Sarah", 20.0)]);
        let updated = store.apply_balance_delta(&FriendId::new("1"), 70.0).unwrap();
        assert_eq!(updated.get(&FriendId::new("1")).unwrap().balance, 63.0);
        assert_eq!(updated.get(&FriendId::new("2")).unwrap().balance, 20.0);
        assert_eq!(store.get(&FriendId::new("1")).unwrap().balance, -7.0);
        assert!(!updated.same_snapshot(&store));
    }

    #[test]
    fn delta_for_unknown_friend_is_none() {
        let store = FriendStore::new(vec![friend("1", "Clark", -7.0)]);
        assert!(store.apply_balance_delta(&FriendId::new("9"), 5.0).is_none());
    }

    #[test]
    fn balance_is_sum_of_applied_deltas() {
        let deltas = [70.0, -20.0, 12.5, -0.5, 3.0];
        let id = FriendId::new("1");
        let mut store = FriendStore::new(vec![friend("1", "Clark", 0.0)]);
        for delta in deltas {
            store = store.apply_balance_delta(&id, delta).unwrap();
        }
        assert_eq!(store.get(&id).unwrap().balance, deltas.iter().sum::<f64>());
    }

    #[test]
    fn sub_cent_deltas_accumulate_exactly() {
        let delta = split_delta(0.004, 0.0, Payer::User);
        let id = FriendId::new("1");
        let mut store = FriendStore::new(vec![friend("1", "Clark", 0.0)]);
        for _ in 0..3 {
            store = store.apply_balance_delta(&id, delta).unwrap();
        }
        let expected = (0..3).fold(0.0, |sum, _| sum + delta);
        assert_eq!(store.get(&id).unwrap().balance, expected);
        assert!(store.get(&id).unwrap().balance > 0.01);
    }
}
