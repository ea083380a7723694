//! Recipe aggregate and its validated inputs.
//!
//! Handlers turn request payloads into [`RecipeChanges`]; services resolve
//! those against the stored [`Recipe`] (for updates) into a complete
//! [`RecipeDraft`] that repositories persist as-is.

mod price;

use std::fmt;

use serde_json::json;

use super::{Error, Label, LabelId, LabelKind, UserId};

pub use self::price::{PRICE_MAX_CENTS, Price, PriceError};

/// Maximum length, in characters, of a recipe title or link.
pub const RECIPE_FIELD_MAX: usize = 255;

/// Validation failure tied to one recipe payload field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeValidationError {
    /// A required field was not supplied.
    #[error("{field} is required")]
    Missing { field: &'static str },
    /// Title was blank.
    #[error("title must not be blank")]
    BlankTitle,
    /// Title or link exceeded [`RECIPE_FIELD_MAX`].
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    /// Cooking time was outside `0..=i32::MAX`.
    #[error("time_minutes must be between 0 and {max}", max = i32::MAX)]
    TimeOutOfRange,
    /// Price failed to parse or was out of range.
    #[error(transparent)]
    Price(#[from] PriceError),
    /// Link was not an http(s) URL.
    #[error("link must be a valid http or https URL")]
    InvalidLink,
    /// A referenced tag or ingredient does not belong to the caller.
    #[error("unknown {kind} id {id}")]
    UnknownLabel { kind: LabelKind, id: LabelId },
}

impl RecipeValidationError {
    /// Payload field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field } | Self::TooLong { field, .. } => field,
            Self::BlankTitle => "title",
            Self::TimeOutOfRange => "time_minutes",
            Self::Price(_) => "price",
            Self::InvalidLink => "link",
            Self::UnknownLabel { kind, .. } => kind.field(),
        }
    }

    /// Machine-readable failure code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "required",
            Self::BlankTitle => "blank",
            Self::TooLong { .. } => "max_length",
            Self::TimeOutOfRange => "out_of_range",
            Self::Price(err) => err.code(),
            Self::InvalidLink => "invalid_url",
            Self::UnknownLabel { .. } => "unknown_label",
        }
    }
}

impl From<RecipeValidationError> for Error {
    fn from(err: RecipeValidationError) -> Self {
        let details = match &err {
            RecipeValidationError::UnknownLabel { id, .. } => {
                json!({ "field": err.field(), "code": err.code(), "id": id.get() })
            }
            _ => json!({ "field": err.field(), "code": err.code() }),
        };
        Error::invalid_request(err.to_string()).with_details(details)
    }
}

/// Database identifier of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecipeId(i64);

impl RecipeId {
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

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Non-blank recipe title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeTitle(String);

impl RecipeTitle {
    /// Validate and trim a title.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RecipeValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RecipeValidationError::BlankTitle);
        }
        if trimmed.chars().count() > RECIPE_FIELD_MAX {
            return Err(RecipeValidationError::TooLong {
                field: "title",
                max: RECIPE_FIELD_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RecipeTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Preparation time in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CookingTime(i32);

impl CookingTime {
    /// Validate a minute count.
    pub fn new(minutes: i64) -> Result<Self, RecipeValidationError> {
        i32::try_from(minutes)
            .ok()
            .filter(|value| *value >= 0)
            .map(Self)
            .ok_or(RecipeValidationError::TimeOutOfRange)
    }

    /// Minutes.
    #[must_use]
    pub const fn minutes(self) -> i32 {
        self.0
    }
}

/// External http(s) link to the original recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeLink(String);

impl RecipeLink {
    /// Parse an optional link; blank input means "no link".
    pub fn parse(raw: &str) -> Result<Option<Self>, RecipeValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > RECIPE_FIELD_MAX {
            return Err(RecipeValidationError::TooLong {
                field: "link",
                max: RECIPE_FIELD_MAX,
            });
        }
        let url = url::Url::parse(trimmed).map_err(|_| RecipeValidationError::InvalidLink)?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(RecipeValidationError::InvalidLink);
        }
        Ok(Some(Self(trimmed.to_owned())))
    }
}

impl AsRef<str> for RecipeLink {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A stored recipe with its labels loaded.
///
/// Embedded labels are ordered by id ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Identifier.
    pub id: RecipeId,
    /// Owning user.
    pub owner: UserId,
    /// Title.
    pub title: RecipeTitle,
    /// Preparation time.
    pub time_minutes: CookingTime,
    /// Price.
    pub price: Price,
    /// Optional external link.
    pub link: Option<RecipeLink>,
    /// Attached tags.
    pub tags: Vec<Label>,
    /// Attached ingredients.
    pub ingredients: Vec<Label>,
}

impl Recipe {
    /// Identifiers of attached labels of `kind`.
    pub fn label_ids(&self, kind: LabelKind) -> Vec<LabelId> {
        let labels = match kind {
            LabelKind::Tag => &self.tags,
            LabelKind::Ingredient => &self.ingredients,
        };
        labels.iter().map(Label::id).collect()
    }
}

/// Complete recipe state ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    /// Title.
    pub title: RecipeTitle,
    /// Preparation time.
    pub time_minutes: CookingTime,
    /// Price.
    pub price: Price,
    /// Optional link.
    pub link: Option<RecipeLink>,
    /// Tag ids, deduplicated.
    pub tags: Vec<LabelId>,
    /// Ingredient ids, deduplicated.
    pub ingredients: Vec<LabelId>,
}

impl RecipeDraft {
    /// Label ids of `kind`.
    pub fn label_ids(&self, kind: LabelKind) -> &[LabelId] {
        match kind {
            LabelKind::Tag => &self.tags,
            LabelKind::Ingredient => &self.ingredients,
        }
    }
}

/// How supplied fields combine with the stored recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Replace the whole recipe; omitted optional fields are cleared.
    Full,
    /// Replace only the supplied fields.
    Partial,
}

/// Validated recipe fields supplied by a caller; `None` means "not supplied".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeChanges {
    /// New title.
    pub title: Option<RecipeTitle>,
    /// New preparation time.
    pub time_minutes: Option<CookingTime>,
    /// New price.
    pub price: Option<Price>,
    /// New link; `Some(None)` clears it.
    pub link: Option<Option<RecipeLink>>,
    /// Replacement tag set.
    pub tags: Option<Vec<LabelId>>,
    /// Replacement ingredient set.
    pub ingredients: Option<Vec<LabelId>>,
}

impl RecipeChanges {
    /// Build the state of a new recipe. Title, time and price are required.
    pub fn into_new_draft(self) -> Result<RecipeDraft, RecipeValidationError> {
        let Self {
            title,
            time_minutes,
            price,
            link,
            tags,
            ingredients,
        } = self;
        Ok(RecipeDraft {
            title: title.ok_or(RecipeValidationError::Missing { field: "title" })?,
            time_minutes: time_minutes.ok_or(RecipeValidationError::Missing {
                field: "time_minutes",
            })?,
            price: price.ok_or(RecipeValidationError::Missing { field: "price" })?,
            link: link.flatten(),
            tags: dedup_ids(tags.unwrap_or_default()),
            ingredients: dedup_ids(ingredients.unwrap_or_default()),
        })
    }

    /// Apply these changes to `existing` according to `mode`.
    pub fn resolve(
        self,
        existing: &Recipe,
        mode: UpdateMode,
    ) -> Result<RecipeDraft, RecipeValidationError> {
        match mode {
            UpdateMode::Full => self.into_new_draft(),
            UpdateMode::Partial => Ok(RecipeDraft {
                title: self.title.unwrap_or_else(|| existing.title.clone()),
                time_minutes: self.time_minutes.unwrap_or(existing.time_minutes),
                price: self.price.unwrap_or(existing.price),
                link: self.link.unwrap_or_else(|| existing.link.clone()),
                tags: dedup_ids(
                    self.tags
                        .unwrap_or_else(|| existing.label_ids(LabelKind::Tag)),
                ),
                ingredients: dedup_ids(
                    self.ingredients
                        .unwrap_or_else(|| existing.label_ids(LabelKind::Ingredient)),
                ),
            }),
        }
    }
}

fn dedup_ids(ids: Vec<LabelId>) -> Vec<LabelId> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Label-membership filter for recipe listings.
///
/// Within one list a recipe matches when any of its labels is listed; when
/// both lists are present both must match. Empty lists do not filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeFilter {
    /// Required tag ids (any of).
    pub tags: Option<Vec<LabelId>>,
    /// Required ingredient ids (any of).
    pub ingredients: Option<Vec<LabelId>>,
}

impl RecipeFilter {
    /// Build a filter, treating empty lists as absent.
    #[must_use]
    pub fn new(tags: Option<Vec<LabelId>>, ingredients: Option<Vec<LabelId>>) -> Self {
        Self {
            tags: tags.filter(|ids| !ids.is_empty()),
            ingredients: ingredients.filter(|ids| !ids.is_empty()),
        }
    }

    /// Whether `recipe` passes the filter.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let passes = |wanted: &Option<Vec<LabelId>>, labels: &[Label]| match wanted {
            Some(ids) if !ids.is_empty() => labels.iter().any(|label| ids.contains(&label.id())),
            _ => true,
        };
        passes(&self.tags, &recipe.tags) && passes(&self.ingredients, &recipe.ingredients)
    }
}

#[cfg(test)]
mod tests;
