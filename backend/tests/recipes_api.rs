//! Recipe endpoints end to end: ownership, filtering and update modes.

mod support;

use actix_web::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::{Value, json};

use support::{Api, ids};

fn rice() -> Value {
    json!({ "title": "Rice", "time_minutes": 20, "price": 2.00 })
}

#[actix_web::test]
async fn created_recipes_render_price_and_empty_link() {
    let api = Api::new();
    let token = api.sign_up("cook@example.com").await;

    let reply = api.post(&token, "/api/recipe/recipes", rice()).await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["price"], "2.00");
    assert_eq!(reply.body["link"], "");
    assert_eq!(reply.body["tags"], json!([]));
}

#[actix_web::test]
async fn other_users_recipes_are_invisible() {
    let api = Api::new();
    let alice = api.sign_up("alice@example.com").await;
    let bob = api.sign_up("bob@example.com").await;
    let bobs = api.recipe(&bob, rice()).await;
    let alices = api.recipe(&alice, rice()).await;

    let listed = api.get(&alice, "/api/recipe/recipes").await;
    assert_eq!(ids(&listed.body), vec![alices]);

    let uri = format!("/api/recipe/recipes/{bobs}");
    for method in [Method::GET, Method::PATCH, Method::DELETE] {
        let body = (method == Method::PATCH).then(|| json!({ "title": "Mine" }));
        let reply = api.call(method.clone(), &uri, Some(&alice), body).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND, "{method}");
    }
    assert_eq!(api.get(&bob, &uri).await.status, StatusCode::OK);
}

#[actix_web::test]
async fn listings_are_newest_first() {
    let api = Api::new();
    let token = api.sign_up("cook@example.com").await;
    let first = api.recipe(&token, rice()).await;
    let second = api.recipe(&token, rice()).await;

    let reply = api.get(&token, "/api/recipe/recipes").await;

    assert_eq!(ids(&reply.body), vec![second, first]);
}

#[actix_web::test]
async fn ingredient_filter_matches_only_recipes_using_it() {
    let api = Api::new();
    let token = api.sign_up("cook@example.com").await;
    let salt = api.label(&token, "ingredients", "Salt").await;
    let salted = api
        .recipe(
            &token,
            json!({ "title": "Rice", "time_minutes": 20, "price": "2.00", "ingredients": [salt] }),
        )
        .await;
    api.recipe(&token, rice()).await;

    let reply = api
        .get(&token, &format!("/api/recipe/recipes?ingredients={salt}"))
        .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(ids(&reply.body), vec![salted]);
}

#[actix_web::test]
async fn tag_filter_matches_any_listed_tag() {
    let api = Api::new();
    let token = api.sign_up("cook@example.com").await;
    let vegan = api.label(&token, "tags", "Vegan").await;
    let quick = api.label(&token, "tags", "Quick").await;
    let spicy = api.label(&token, "tags", "Spicy").await;
    let with_vegan = api
        .recipe(
            &token,
            json!({ "title": "Salad", "time_minutes": 5, "price": 4, "tags": [vegan] }),
        )
        .await;
    let with_both = api
        .recipe(
            &token,
            json!({ "title": "Wrap", "time_minutes": 5, "price": 4, "tags": [vegan, quick] }),
        )
        .await;
    api.recipe(
        &token,
        json!({ "title": "Curry", "time_minutes": 40, "price": 6, "tags": [spicy] }),
    )
    .await;

    let reply = api
        .get(&token, &format!("/api/recipe/recipes?tags={vegan},{quick}"))
        .await;

    assert_eq!(ids(&reply.body), vec![with_both, with_vegan]);
}

#[rstest]
#[case("/api/recipe/recipes?tags=1,abc", "tags")]
#[case("/api/recipe/recipes?ingredients=x", "ingredients")]
#[actix_web::test]
async fn malformed_filters_are_rejected(#[case] uri: &str, #[case] field: &str) {
    let api = Api::new();
    let token = api.sign_up("cook@example.com").await;

    let reply = api.get(&token, uri).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["details"]["field"], field);
}

#[actix_web::test]
async fn detail_view_embeds_label_objects() {
    let api = Api::new();
    let token = api.sign_up("cook@example.com").await;
    let salt = api.label(&token, "ingredients", "Salt").await;
    let id = api
        .recipe(
            &token,
            json!({
                "title": "Rice",
                "time_minutes": 20,
                "price": "2.00",
                "link": "https://example.com/rice",
                "ingredients": [salt],
            }),
        )
        .await;

    let reply = api
        .get(&token, &format!("/api/recipe/recipes/{id}"))
        .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["ingredients"], json!([{ "id": salt, "name": "Salt" }]));
    assert_eq!(reply.body["link"], "https://example.com/rice");
}

#[actix_web::test]
async fn foreign_labels_cannot_be_attached() {
    let api = Api::new();
    let alice = api.sign_up("alice@example.com").await;
    let bob = api.sign_up("bob@example.com").await;
    let bobs_tag = api.label(&bob, "tags", "Secret").await;

    let reply = api
        .post(
            &alice,
            "/api/recipe/recipes",
            json!({ "title": "Rice", "time_minutes": 20, "price": 2, "tags": [bobs_tag] }),
        )
        .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply.body["details"],
        json!({ "field": "tags", "code": "unknown_label", "id": bobs_tag })
    );
}

#[actix_web::test]
async fn patch_keeps_relations_and_put_clears_them() {
    let api = Api::new();
    let token = api.sign_up("cook@example.com").await;
    let vegan = api.label(&token, "tags", "Vegan").await;
    let id = api
        .recipe(
            &token,
            json!({
                "title": "Rice",
                "time_minutes": 20,
                "price": 2,
                "link": "https://example.com/rice",
                "tags": [vegan],
            }),
        )
        .await;
    let uri = format!("/api/recipe/recipes/{id}");

    let patched = api
        .call(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "title": "Fried rice" })),
        )
        .await;
    assert_eq!(patched.status, StatusCode::OK);
    assert_eq!(patched.body["title"], "Fried rice");
    assert_eq!(patched.body["tags"], json!([vegan]));
    assert_eq!(patched.body["link"], "https://example.com/rice");

    let replaced = api
        .call(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "title": "Plain rice", "time_minutes": 15, "price": "1.50" })),
        )
        .await;
    assert_eq!(replaced.status, StatusCode::OK);
    assert_eq!(replaced.body["tags"], json!([]));
    assert_eq!(replaced.body["link"], "");
    assert_eq!(replaced.body["price"], "1.50");
}

#[actix_web::test]
async fn put_requires_the_core_fields() {
    let api = Api::new();
    let token = api.sign_up("cook@example.com").await;
    let id = api.recipe(&token, rice()).await;

    let reply = api
        .call(
            Method::PUT,
            &format!("/api/recipe/recipes/{id}"),
            Some(&token),
            Some(json!({ "title": "Rice" })),
        )
        .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["details"]["code"], "required");
}

#[actix_web::test]
async fn delete_removes_the_recipe() {
    let api = Api::new();
    let token = api.sign_up("cook@example.com").await;
    let id = api.recipe(&token, rice()).await;
    let uri = format!("/api/recipe/recipes/{id}");

    let deleted = api.call(Method::DELETE, &uri, Some(&token), None).await;

    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(api.get(&token, &uri).await.status, StatusCode::NOT_FOUND);
}

#[rstest]
#[case(json!({ "title": "", "time_minutes": 1, "price": 1 }), "title")]
#[case(json!({ "title": "Rice", "time_minutes": -1, "price": 1 }), "time_minutes")]
#[case(json!({ "title": "Rice", "time_minutes": 1, "price": "1.234" }), "price")]
#[case(json!({ "title": "Rice", "time_minutes": 1, "price": 1, "link": "not a url" }), "link")]
#[actix_web::test]
async fn invalid_fields_name_the_offender(#[case] body: Value, #[case] field: &str) {
    let api = Api::new();
    let token = api.sign_up("cook@example.com").await;

    let reply = api.post(&token, "/api/recipe/recipes", body).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["details"]["field"], field);
}
