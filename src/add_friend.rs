use serde::Serialize;
#[cfg(test)]
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use crate::error::Rejection;
use crate::schemas::{Friend, FriendId};

pub const DEFAULT_IMAGE: &str = "https://i.pravatar.cc/48";

/// Produces friend ids that are unique for the lifetime of the process.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> FriendId;
}

pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&self) -> FriendId {
        FriendId::new(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

#[cfg(test)]
impl IdSource for SequentialIds {
    fn next_id(&self) -> FriendId {
        let id = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        FriendId::new(id.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AddFriendForm {
    pub name: String,
    pub image: String,
    #[serde(skip)]
    default_image: String,
}

impl Default for AddFriendForm {
    fn default() -> Self {
        Self::with_default_image(DEFAULT_IMAGE)
    }
}

impl AddFriendForm {
    pub fn with_default_image(image: impl Into<String>) -> Self {
        let image = image.into();
        Self {
            name: String::new(),
            image: image.clone(),
            default_image: image,
        }
    }

    pub fn edit(&self, name: Option<String>, image: Option<String>) -> AddFriendForm {
        AddFriendForm {
            name: name.unwrap_or_else(|| self.name.clone()),
            image: image.unwrap_or_else(|| self.image.clone()),
            default_image: self.default_image.clone(),
        }
    }

    pub fn reset(&self) -> AddFriendForm {
        Self::with_default_image(self.default_image.clone())
    }

    /// Builds the new friend from the form fields.
    ///
    /// The id is appended to the image url only to bust avatar caches.
    pub fn submit(&self, ids: &dyn IdSource) -> Result<Friend, Rejection> {
        if self.name.is_empty() {
            return Err(Rejection::EmptyName);
        }
        if self.image.is_empty() {
            return Err(Rejection::EmptyImage);
        }
        let id = ids.next_id();
        Ok(Friend {
            image: format!("{}?={}", self.image, id),
            name: self.name.clone(),
            balance: 0.0,
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_builds_settled_friend() {
        let form = AddFriendForm::default().edit(
            Some("Sam".to_string()),
            Some("https://example.com/a".to_string()),
        );
        let friend = form.submit(&SequentialIds::default()).unwrap();
        assert_eq!(friend.name, "Sam");
        assert_eq!(friend.balance, 0.0);
        assert_eq!(friend.id, FriendId::new("1"));
        assert_eq!(friend.image, "https://example.com/a?=1");
    }

    #[test]
    fn empty_name_is_rejected() {
        let form = AddFriendForm::default();
        assert_eq!(form.submit(&RandomIds).unwrap_err(), Rejection::EmptyName);
    }

    #[test]
    fn empty_image_is_rejected() {
        let form = AddFriendForm::default().edit(Some("Sam".to_string()), Some(String::new()));
        assert_eq!(form.submit(&RandomIds).unwrap_err(), Rejection::EmptyImage);
    }

    #[test]
    fn reset_restores_configured_default_image() {
        let form = AddFriendForm::with_default_image("https://avatars.test/64")
            .edit(Some("Sam".to_string()), Some("https://example.com/a".to_string()))
            .reset();
        assert_eq!(form.name, "");
        assert_eq!(form.image, "https://avatars.test/64");
    }

    #[test]
    fn random_ids_do_not_repeat() {
        let first = RandomIds.next_id();
        let second = RandomIds.next_id();
        assert_ne!(first, second);
    }
}
