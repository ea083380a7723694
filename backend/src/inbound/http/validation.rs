//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every payload or query failure becomes an `invalid_request` error whose
//! details name the offending field and a stable code.

use serde::{Deserialize, Deserializer};
use serde_json::json;

use crate::domain::{
    Error, LabelId, LabelValidationError, LoginValidationError, PasswordValidationError,
    UserValidationError,
};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

/// Build an `invalid_request` error tied to `field`.
pub(crate) fn field_error(field: FieldName, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code,
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(field, "required", format!("{name} is required"))
}

/// Unwrap an optional payload value or report it as missing.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

fn user_error_code(err: &UserValidationError) -> &'static str {
    match err {
        UserValidationError::EmptyEmail => "blank",
        UserValidationError::InvalidEmail | UserValidationError::InvalidId => "invalid",
        UserValidationError::EmailTooLong { .. } | UserValidationError::NameTooLong { .. } => {
            "max_length"
        }
    }
}

pub(crate) fn user_field_error(field: FieldName, err: &UserValidationError) -> Error {
    field_error(field, user_error_code(err), err.to_string())
}

pub(crate) fn password_error(err: &PasswordValidationError) -> Error {
    let code = match err {
        PasswordValidationError::TooShort { .. } => "min_length",
    };
    field_error(FieldName::new("password"), code, err.to_string())
}

pub(crate) fn login_error(err: &LoginValidationError) -> Error {
    match err {
        LoginValidationError::Email(inner) => user_field_error(FieldName::new("email"), inner),
        LoginValidationError::EmptyPassword => {
            field_error(FieldName::new("password"), "blank", err.to_string())
        }
    }
}

pub(crate) fn label_error(err: &LabelValidationError) -> Error {
    field_error(FieldName::new("name"), err.code(), err.to_string())
}

/// Parse a boolean query flag.
///
/// Integers are truthy when non-zero; `true` and `false` are accepted in any
/// case. An absent or empty value is `false`.
pub(crate) fn parse_flag(raw: Option<&str>, field: FieldName) -> Result<bool, Error> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(false);
    };
    if value.eq_ignore_ascii_case("true") {
        return Ok(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Ok(false);
    }
    value.parse::<i64>().map(|number| number != 0).map_err(|_| {
        let name = field.as_str();
        Error::invalid_request(format!("{name} must be 0, 1, true or false")).with_details(
            json!({ "field": name, "code": "invalid_flag", "value": value }),
        )
    })
}

/// Parse a comma-separated list of label ids.
///
/// `None` or an empty string means "no filter". Blank segments are skipped.
pub(crate) fn parse_id_list(
    raw: Option<&str>,
    field: FieldName,
) -> Result<Option<Vec<LabelId>>, Error> {
    let Some(value) = raw.filter(|value| !value.trim().is_empty()) else {
        return Ok(None);
    };
    let ids = value
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .enumerate()
        .map(|(index, segment)| {
            segment.parse::<i64>().map(LabelId::new).map_err(|_| {
                let name = field.as_str();
                Error::invalid_request(format!("{name} must be a comma-separated list of ids"))
                    .with_details(json!({
                        "field": name,
                        "code": "invalid_id",
                        "index": index,
                        "value": segment,
                    }))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(ids))
}

/// Deserialize a field that may be absent, `null` or a value, keeping the
/// distinction between absent (`None`) and `null` (`Some(None)`).
///
/// Pair with `#[serde(default)]`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
