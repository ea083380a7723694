//! User account model.
//!
//! Accounts are identified internally by a UUID and externally by their
//! normalised email address. Every tag, ingredient and recipe belongs to
//! exactly one account.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

/// Maximum length, in characters, of stored email addresses and names.
pub const USER_FIELD_MAX: usize = 255;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Email was missing or blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email did not look like `local@domain.tld`.
    #[error("enter a valid email address")]
    InvalidEmail,
    /// Email exceeded [`USER_FIELD_MAX`].
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    /// Name exceeded [`USER_FIELD_MAX`].
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier from its hyphenated string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID read from storage.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // One `@`, no whitespace, and a dotted domain.
        let pattern = r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised (trimmed, lowercased) email address.
///
/// # Examples
/// ```
/// use backend::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Cook@Example.COM ").expect("valid email");
/// assert_eq!(email.as_ref(), "cook@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > USER_FIELD_MAX {
            return Err(UserValidationError::EmailTooLong {
                max: USER_FIELD_MAX,
            });
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-form person name; may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name, trimming surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.chars().count() > USER_FIELD_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_FIELD_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Permission flags attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountFlags {
    /// Inactive accounts cannot obtain or use tokens.
    pub is_active: bool,
    /// Staff accounts may administer the service.
    pub is_staff: bool,
    /// Superusers hold every permission.
    pub is_superuser: bool,
}

impl AccountFlags {
    /// Flags for a self-registered account.
    #[must_use]
    pub const fn regular() -> Self {
        Self {
            is_active: true,
            is_staff: false,
            is_superuser: false,
        }
    }

    /// Flags for an operator-created superuser.
    #[must_use]
    pub const fn superuser() -> Self {
        Self {
            is_active: true,
            is_staff: true,
            is_superuser: true,
        }
    }
}

/// Registered user account. The password hash never leaves persistence
/// adapters through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    name: PersonName,
    flags: AccountFlags,
}

impl User {
    /// Build a user from validated parts.
    #[must_use]
    pub fn new(id: UserId, email: EmailAddress, name: PersonName, flags: AccountFlags) -> Self {
        Self {
            id,
            email,
            name,
            flags,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Normalised login email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Display name, possibly empty.
    pub fn name(&self) -> &PersonName {
        &self.name
    }

    /// Whether the account may authenticate.
    pub fn is_active(&self) -> bool {
        self.flags.is_active
    }

    /// Whether the account is staff.
    pub fn is_staff(&self) -> bool {
        self.flags.is_staff
    }

    /// Whether the account is a superuser.
    pub fn is_superuser(&self) -> bool {
        self.flags.is_superuser
    }

    /// Permission flags.
    pub fn flags(&self) -> AccountFlags {
        self.flags
    }

    /// Replace the display name.
    #[must_use]
    pub fn with_name(mut self, name: PersonName) -> Self {
        self.name = name;
        self
    }
}

#[cfg(test)]
mod tests;
