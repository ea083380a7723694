//! Shared helpers for the HTTP integration suites.
//!
//! Every request runs through the real routes, middleware and services over
//! one [`InMemoryStore`], so state persists across calls on the same [`Api`].

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::http::{Method, StatusCode};
use actix_web::{App, test as actix_test, web};
use serde_json::{Value, json};

use backend::Trace;
use backend::inbound::http::configure;
use backend::test_support::InMemoryStore;

/// Response status, headers and decoded JSON body (`Null` when empty).
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// In-process API client.
#[derive(Default)]
pub struct Api {
    store: InMemoryStore,
}

impl Api {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Reply {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(self.store.http_state()))
                .wrap(Trace)
                .configure(configure),
        )
        .await;
        let mut request = actix_test::TestRequest::default().method(method).uri(uri);
        if let Some(token) = token {
            request = request.insert_header((AUTHORIZATION, format!("Token {token}")));
        }
        if let Some(body) = body {
            request = request.set_json(body);
        }
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = actix_test::read_body(response).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        Reply {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, token: &str, uri: &str) -> Reply {
        self.call(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, token: &str, uri: &str, body: Value) -> Reply {
        self.call(Method::POST, uri, Some(token), Some(body)).await
    }

    /// Register `email` with password `pass123` and return its token.
    pub async fn sign_up(&self, email: &str) -> String {
        let created = self
            .call(
                Method::POST,
                "/api/user/create",
                None,
                Some(json!({ "email": email, "password": "pass123", "name": "Cook" })),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
        let issued = self
            .call(
                Method::POST,
                "/api/user/token",
                None,
                Some(json!({ "email": email, "password": "pass123" })),
            )
            .await;
        assert_eq!(issued.status, StatusCode::OK, "{}", issued.body);
        issued.body["token"]
            .as_str()
            .expect("token string")
            .to_owned()
    }

    /// Create a tag or ingredient and return its id.
    pub async fn label(&self, token: &str, collection: &str, name: &str) -> i64 {
        let reply = self
            .post(
                token,
                &format!("/api/recipe/{collection}"),
                json!({ "name": name }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        reply.body["id"].as_i64().expect("label id")
    }

    /// Create a recipe from `body` and return its id.
    pub async fn recipe(&self, token: &str, body: Value) -> i64 {
        let reply = self.post(token, "/api/recipe/recipes", body).await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        reply.body["id"].as_i64().expect("recipe id")
    }
}

/// Ids of every object in a JSON array.
pub fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .expect("JSON array")
        .iter()
        .map(|item| item["id"].as_i64().expect("id"))
        .collect()
}
