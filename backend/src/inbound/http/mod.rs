//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod labels;
pub mod recipes;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use crate::domain::ApiResult;

/// Register extractor error handlers and every `/api` endpoint.
///
/// The caller supplies [`state::HttpState`] as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    error::configure_extractors(cfg);
    cfg.service(
        web::scope("/api")
            .service(users::create_user)
            .service(users::create_token)
            .service(users::get_profile)
            .service(users::update_profile)
            .service(labels::list_tags)
            .service(labels::create_tag)
            .service(labels::get_tag)
            .service(labels::replace_tag)
            .service(labels::update_tag)
            .service(labels::list_ingredients)
            .service(labels::create_ingredient)
            .service(labels::get_ingredient)
            .service(labels::replace_ingredient)
            .service(labels::update_ingredient)
            .service(recipes::list_recipes)
            .service(recipes::create_recipe)
            .service(recipes::get_recipe)
            .service(recipes::replace_recipe)
            .service(recipes::update_recipe)
            .service(recipes::delete_recipe),
    );
}
