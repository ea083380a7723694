//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports describe how the domain reaches storage and hashing
//! adapters; each exposes a typed error generated by `define_port_error!`
//! so adapters map their failures into predictable variants. Driving ports
//! are the use cases inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod account_query;
mod auth_token_repository;
mod label_command;
mod label_query;
mod label_repository;
mod password_hasher;
mod recipe_command;
mod recipe_query;
mod recipe_repository;
mod user_repository;

pub use account_command::{AccountCommand, ProfileChanges, RegisterUserRequest};
#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_query::AccountQuery;
#[cfg(test)]
pub use account_query::MockAccountQuery;
pub use auth_token_repository::{AuthTokenRepository, AuthTokenRepositoryError};
#[cfg(test)]
pub use auth_token_repository::MockAuthTokenRepository;
pub use label_command::LabelCommand;
#[cfg(test)]
pub use label_command::MockLabelCommand;
pub use label_query::LabelQuery;
#[cfg(test)]
pub use label_query::MockLabelQuery;
pub use label_repository::{LabelRepository, LabelRepositoryError};
#[cfg(test)]
pub use label_repository::MockLabelRepository;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use recipe_command::RecipeCommand;
#[cfg(test)]
pub use recipe_command::MockRecipeCommand;
pub use recipe_query::RecipeQuery;
#[cfg(test)]
pub use recipe_query::MockRecipeQuery;
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use user_repository::{StoredCredentials, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
