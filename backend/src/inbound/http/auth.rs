//! Token authentication for HTTP handlers.
//!
//! Handlers that need an account take an [`AuthenticatedUser`] argument; the
//! extractor reads `Authorization: Token <key>` (or `Bearer <key>`) and
//! resolves it through the [`AccountQuery`](crate::domain::ports::AccountQuery)
//! port held in [`HttpState`].

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{AuthToken, Error, User, UserId};

use super::state::HttpState;

const ACCEPTED_SCHEMES: [&str; 2] = ["token", "bearer"];

/// The account that presented a valid token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(User);

impl AuthenticatedUser {
    /// Resolved account.
    pub fn user(&self) -> &User {
        &self.0
    }

    /// Identifier of the resolved account.
    pub fn id(&self) -> &UserId {
        self.0.id()
    }

    /// Take the resolved account.
    pub fn into_inner(self) -> User {
        self.0
    }
}

fn invalid_header() -> Error {
    Error::unauthorized("invalid token header")
}

/// Extract the presented token from the `Authorization` header.
fn presented_token(req: &HttpRequest) -> Result<AuthToken, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("authentication credentials were not provided"))?;
    let value = header.to_str().map_err(|_| invalid_header())?;
    let (scheme, key) = value
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(invalid_header)?;
    if !ACCEPTED_SCHEMES
        .iter()
        .any(|accepted| scheme.eq_ignore_ascii_case(accepted))
    {
        debug!(scheme, "unsupported authorization scheme");
        return Err(invalid_header());
    }
    let key = key.trim();
    if key.contains(char::is_whitespace) {
        return Err(invalid_header());
    }
    AuthToken::from_presented(key).ok_or_else(invalid_header)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = presented_token(req);
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let user = state.accounts_query.authenticate(&token?).await?;
            Ok(Self(user))
        })
    }
}
