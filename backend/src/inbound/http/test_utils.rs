//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use serde_json::Value;

use crate::domain::ports::{
    MockAccountCommand, MockAccountQuery, MockLabelCommand, MockLabelQuery, MockRecipeCommand,
    MockRecipeQuery,
};
use crate::domain::{AccountFlags, EmailAddress, PersonName, User, UserId};

use super::state::HttpState;

/// Token sent with every request built by [`send`].
pub const TOKEN: &str = "0123456789abcdef0123456789abcdef01234567";

/// A regular active account.
pub fn cook() -> User {
    User::new(
        UserId::random(),
        EmailAddress::new("cook@example.com").expect("email"),
        PersonName::new("Cook").expect("name"),
        AccountFlags::regular(),
    )
}

/// Mocked driving ports; unset expectations fail the test when called.
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockAccountCommand,
    pub accounts_query: MockAccountQuery,
    pub labels: MockLabelCommand,
    pub labels_query: MockLabelQuery,
    pub recipes: MockRecipeCommand,
    pub recipes_query: MockRecipeQuery,
}

impl MockPorts {
    /// Ports whose token authentication always resolves to `user`.
    pub fn signed_in(user: &User) -> Self {
        let mut ports = Self::default();
        let resolved = user.clone();
        ports
            .accounts_query
            .expect_authenticate()
            .returning(move |_| Ok(resolved.clone()));
        ports
    }

    pub fn into_state(self) -> HttpState {
        HttpState {
            accounts: Arc::new(self.accounts),
            accounts_query: Arc::new(self.accounts_query),
            labels: Arc::new(self.labels),
            labels_query: Arc::new(self.labels_query),
            recipes: Arc::new(self.recipes),
            recipes_query: Arc::new(self.recipes_query),
        }
    }
}

/// Send `request` with [`TOKEN`] through the full API and decode the body.
///
/// Empty bodies decode as `Value::Null`.
pub async fn send(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(ports.into_state()))
            .configure(super::configure),
    )
    .await;
    let request = request
        .insert_header((AUTHORIZATION, format!("Token {TOKEN}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}
