//! Domain primitives, aggregates, ports and services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters, the ports those adapters plug into, and the services that
//! implement the use cases. Nothing here depends on actix or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, EmailAddress, PersonName: account identity.
//! - LoginCredentials, PlainPassword, AuthToken: authentication values.
//! - Label, LabelKind, LabelName: tags and ingredients.
//! - Recipe, RecipeChanges, RecipeDraft, RecipeFilter: the recipe aggregate.
//! - AccountService, LabelService, RecipeService: driving port implementations.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod label_service;
pub mod labels;
pub mod ports;
pub mod recipe_service;
pub mod recipes;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    AuthToken, LoginCredentials, LoginValidationError, PASSWORD_MIN_LENGTH, PasswordHash,
    PasswordValidationError, PlainPassword, TokenDigest,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::label_service::LabelService;
pub use self::labels::{
    LABEL_NAME_MAX, Label, LabelFilter, LabelId, LabelKind, LabelName, LabelValidationError,
    sort_for_listing,
};
pub use self::recipe_service::RecipeService;
pub use self::recipes::{
    CookingTime, PRICE_MAX_CENTS, Price, PriceError, RECIPE_FIELD_MAX, Recipe, RecipeChanges,
    RecipeDraft, RecipeFilter, RecipeId, RecipeLink, RecipeTitle, RecipeValidationError,
    UpdateMode,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    AccountFlags, EmailAddress, PersonName, USER_FIELD_MAX, User, UserId, UserValidationError,
};

/// Convenient result alias for use-case and handler code.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such recipe"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
