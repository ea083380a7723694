//! Tags and ingredients.
//!
//! Both are owner-scoped named labels attached to recipes. They share one
//! model and are told apart by [`LabelKind`].

use std::cmp::Reverse;
use std::fmt;

use super::UserId;

/// Maximum length, in characters, of a label name.
pub const LABEL_NAME_MAX: usize = 255;

/// Validation errors for label values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelValidationError {
    /// Name was blank once trimmed.
    #[error("name must not be blank")]
    BlankName,
    /// Name exceeded [`LABEL_NAME_MAX`].
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
}

impl LabelValidationError {
    /// Machine-readable code used in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BlankName => "blank",
            Self::NameTooLong { .. } => "max_length",
        }
    }
}

/// Which label collection an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    /// Recipe tags such as "Vegan".
    Tag,
    /// Recipe ingredients such as "Salt".
    Ingredient,
}

impl LabelKind {
    /// Singular noun used in messages.
    pub fn noun(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Ingredient => "ingredient",
        }
    }

    /// Field name used on recipe payloads.
    pub fn field(self) -> &'static str {
        match self {
            Self::Tag => "tags",
            Self::Ingredient => "ingredients",
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// Database identifier of a tag or ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(i64);

impl LabelId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated label name: trimmed, non-blank, at most [`LABEL_NAME_MAX`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelName(String);

impl LabelName {
    /// Validate a raw name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, LabelValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LabelValidationError::BlankName);
        }
        if trimmed.chars().count() > LABEL_NAME_MAX {
            return Err(LabelValidationError::NameTooLong {
                max: LABEL_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for LabelName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A stored tag or ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    id: LabelId,
    owner: UserId,
    name: LabelName,
}

impl Label {
    /// Build a label from stored parts.
    #[must_use]
    pub fn new(id: LabelId, owner: UserId, name: LabelName) -> Self {
        Self { id, owner, name }
    }

    /// Identifier.
    pub fn id(&self) -> LabelId {
        self.id
    }

    /// Owning user.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Display name.
    pub fn name(&self) -> &LabelName {
        &self.name
    }
}

/// Listing options for tags and ingredients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelFilter {
    /// Only return labels attached to at least one of the owner's recipes.
    pub assigned_only: bool,
}

/// Sort labels the way listings present them: name descending ignoring
/// case, then the exact name, then id descending to keep equal names stable.
///
/// Both storage adapters sort through this so the order does not depend on
/// the database collation.
pub fn sort_for_listing(labels: &mut [Label]) {
    labels.sort_by_cached_key(|label| {
        (
            Reverse(label.name.as_ref().to_lowercase()),
            Reverse(label.name.as_ref().to_owned()),
            Reverse(label.id),
        )
    });
}
