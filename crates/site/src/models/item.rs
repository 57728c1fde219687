//! The user-owned item resource.

use chrono::{DateTime, Utc};

use nexussphere_core::{FieldErrors, ItemId, Owned, UserId, Username};

/// Maximum length of an item name, in characters.
pub const NAME_MAX_LENGTH: usize = 200;

/// A stored item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Empty when the author gave no description.
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// The creating account. `None` for owner-less items.
    pub owner: Option<ItemOwner>,
}

/// Owner reference carried on an [`Item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOwner {
    pub id: UserId,
    pub username: Username,
}

impl Item {
    /// Username of the owner, if any.
    #[must_use]
    pub fn owner_username(&self) -> Option<&str> {
        self.owner.as_ref().map(|o| o.username.as_str())
    }
}

impl Owned for Item {
    fn owner_id(&self) -> Option<UserId> {
        self.owner.as_ref().map(|o| o.id)
    }
}

/// The writable fields of an item.
///
/// This is the only shape an update can take, so no edit path can reassign
/// the owner or the creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemChanges {
    pub name: String,
    pub description: String,
}

impl ItemChanges {
    /// Validate raw input: the name is trimmed, required and at most
    /// [`NAME_MAX_LENGTH`] characters; a missing description becomes empty.
    ///
    /// # Errors
    ///
    /// Returns the field errors when the name is blank or too long.
    pub fn parse(name: Option<&str>, description: Option<&str>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = name.unwrap_or_default().trim();
        if name.is_empty() {
            errors.add("name", "This field is required.");
        } else if name.chars().count() > NAME_MAX_LENGTH {
            errors.add(
                "name",
                format!("Ensure this field has no more than {NAME_MAX_LENGTH} characters."),
            );
        }

        errors.into_result(Self {
            name: name.to_owned(),
            description: description.unwrap_or_default().to_owned(),
        })
    }
}

/// An item about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub fields: ItemChanges,
    pub owner: UserId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_name_and_defaults_description() {
        let changes = ItemChanges::parse(Some("  Widget  "), None).unwrap();
        assert_eq!(changes.name, "Widget");
        assert_eq!(changes.description, "");
    }

    #[test]
    fn test_parse_requires_name() {
        let errors = ItemChanges::parse(Some("   "), Some("desc")).unwrap_err();
        assert_eq!(errors.first("name"), Some("This field is required."));

        let errors = ItemChanges::parse(None, None).unwrap_err();
        assert!(errors.contains("name"));
    }

    #[test]
    fn test_parse_limits_name_length() {
        assert!(ItemChanges::parse(Some(&"x".repeat(200)), None).is_ok());
        let errors = ItemChanges::parse(Some(&"x".repeat(201)), None).unwrap_err();
        assert_eq!(
            errors.first("name"),
            Some("Ensure this field has no more than 200 characters.")
        );
    }

    #[test]
    fn test_owner_id_follows_owner() {
        let mut item = Item {
            id: ItemId::new(1),
            name: "Widget".to_string(),
            description: String::new(),
            created_at: Utc::now(),
            owner: Some(ItemOwner {
                id: UserId::new(4),
                username: Username::parse("alice").unwrap(),
            }),
        };
        assert_eq!(item.owner_id(), Some(UserId::new(4)));
        assert_eq!(item.owner_username(), Some("alice"));

        item.owner = None;
        assert_eq!(item.owner_id(), None);
    }
}
