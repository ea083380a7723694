//! Tests for recipe handlers and payload conversion.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{LabelKind, LabelName, UserId};
use crate::inbound::http::test_utils::{MockPorts, cook, send};

fn label(id: i64, owner: UserId, name: &str) -> Label {
    Label::new(LabelId::new(id), owner, LabelName::new(name).expect("label name"))
}

fn rice(owner: UserId) -> Recipe {
    Recipe {
        id: RecipeId::new(5),
        owner,
        title: RecipeTitle::new("Rice").expect("title"),
        time_minutes: CookingTime::new(20).expect("time"),
        price: "2.5".parse().expect("price"),
        link: None,
        tags: vec![label(1, owner, "Vegan"), label(2, owner, "Quick")],
        ingredients: vec![label(9, owner, "Salt")],
    }
}

fn changes(payload: Value) -> Result<RecipeChanges, RecipeValidationError> {
    let request: RecipeRequest = serde_json::from_value(payload).expect("request shape");
    RecipeChanges::try_from(request)
}

#[rstest]
#[case(json!(5.5), 550)]
#[case(json!(5), 500)]
#[case(json!("5.50"), 550)]
#[case(json!("0.99"), 99)]
fn prices_accept_numbers_and_strings(#[case] price: Value, #[case] cents: i32) {
    let parsed = changes(json!({ "price": price })).expect("valid price");
    assert_eq!(parsed.price.map(Price::cents), Some(cents));
}

#[rstest]
#[case(json!("abc"), "invalid")]
#[case(json!(1.005), "max_decimal_places")]
#[case(json!(-1), "min_value")]
fn bad_prices_report_their_code(#[case] price: Value, #[case] code: &str) {
    let err = changes(json!({ "price": price })).expect_err("invalid price");
    assert_eq!(err.field(), "price");
    assert_eq!(err.code(), code);
}

#[rstest]
#[case(json!({}), None)]
#[case(json!({ "link": null }), Some(None))]
#[case(json!({ "link": "" }), Some(None))]
fn link_presence_is_preserved(#[case] payload: Value, #[case] expected: Option<Option<RecipeLink>>) {
    assert_eq!(changes(payload).expect("valid").link, expected);
}

#[test]
fn non_http_links_are_rejected() {
    let err = changes(json!({ "link": "ftp://example.com/rice" })).expect_err("bad link");
    assert_eq!(err.code(), "invalid_url");
}

#[test]
fn list_shape_uses_label_ids() {
    let recipe = rice(UserId::random());
    let body = serde_json::to_value(RecipeResponse::from(&recipe)).expect("serialise");
    assert_eq!(
        body,
        json!({
            "id": 5,
            "title": "Rice",
            "time_minutes": 20,
            "price": "2.50",
            "link": "",
            "tags": [1, 2],
            "ingredients": [9],
        })
    );
}

#[actix_web::test]
async fn detail_shape_embeds_labels() {
    let user = cook();
    let mut ports = MockPorts::signed_in(&user);
    ports
        .recipes_query
        .expect_get_recipe()
        .withf(|_, id| *id == RecipeId::new(5))
        .returning(|owner, _| Ok(rice(*owner)));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::get().uri("/api/recipe/recipes/5"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tags"], json!([{ "id": 1, "name": "Vegan" }, { "id": 2, "name": "Quick" }]));
    assert_eq!(body["ingredients"], json!([{ "id": 9, "name": "Salt" }]));
}

#[actix_web::test]
async fn listing_passes_parsed_filters() {
    let user = cook();
    let mut ports = MockPorts::signed_in(&user);
    ports
        .recipes_query
        .expect_list_recipes()
        .withf(|_, filter| {
            filter.tags == Some(vec![LabelId::new(1), LabelId::new(2)])
                && filter.ingredients.is_none()
        })
        .returning(|owner, _| Ok(vec![rice(*owner)]));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::get().uri("/api/recipe/recipes?tags=1,2&ingredients="),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["tags"], json!([1, 2]));
}

#[actix_web::test]
async fn malformed_filter_ids_are_rejected() {
    let (status, body) = send(
        MockPorts::signed_in(&cook()),
        actix_test::TestRequest::get().uri("/api/recipe/recipes?tags=1,x"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "tags");
    assert_eq!(body["details"]["code"], "invalid_id");
}

#[actix_web::test]
async fn create_returns_201_with_the_list_shape() {
    let user = cook();
    let mut ports = MockPorts::signed_in(&user);
    ports
        .recipes
        .expect_create_recipe()
        .withf(|_, changes| {
            changes.tags == Some(vec![LabelId::new(1)])
                && changes.price.map(Price::cents) == Some(250)
        })
        .returning(|owner, _| Ok(rice(*owner)));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/recipe/recipes")
            .set_json(json!({
                "title": "Rice",
                "time_minutes": 20,
                "price": 2.5,
                "tags": [1],
            })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["price"], "2.50");
    assert_eq!(body["ingredients"], json!([9]));
}

#[actix_web::test]
async fn unknown_labels_surface_as_validation_errors() {
    let user = cook();
    let mut ports = MockPorts::signed_in(&user);
    ports.recipes.expect_create_recipe().returning(|_, _| {
        Err(RecipeValidationError::UnknownLabel {
            kind: LabelKind::Tag,
            id: LabelId::new(77),
        }
        .into())
    });

    let (status, body) = send(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/recipe/recipes")
            .set_json(json!({ "title": "Rice", "time_minutes": 20, "price": "2.50", "tags": [77] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["details"],
        json!({ "field": "tags", "code": "unknown_label", "id": 77 })
    );
}

#[rstest]
#[case(actix_test::TestRequest::put(), UpdateMode::Full)]
#[case(actix_test::TestRequest::patch(), UpdateMode::Partial)]
#[actix_web::test]
async fn updates_select_their_mode(
    #[case] request: actix_test::TestRequest,
    #[case] mode: UpdateMode,
) {
    let user = cook();
    let mut ports = MockPorts::signed_in(&user);
    ports
        .recipes
        .expect_update_recipe()
        .withf(move |_, id, _, m| *id == RecipeId::new(5) && *m == mode)
        .returning(|owner, _, _, _| Ok(rice(*owner)));

    let (status, body) = send(
        ports,
        request
            .uri("/api/recipe/recipes/5")
            .set_json(json!({ "title": "Rice" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 5);
}

#[actix_web::test]
async fn delete_returns_204_without_a_body() {
    let user = cook();
    let mut ports = MockPorts::signed_in(&user);
    ports
        .recipes
        .expect_delete_recipe()
        .withf(|_, id| *id == RecipeId::new(5))
        .returning(|_, _| Ok(()));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::delete().uri("/api/recipe/recipes/5"),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[actix_web::test]
async fn missing_recipes_are_404() {
    let user = cook();
    let mut ports = MockPorts::signed_in(&user);
    ports
        .recipes
        .expect_delete_recipe()
        .returning(|_, _| Err(Error::not_found("recipe not found")));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::delete().uri("/api/recipe/recipes/404"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}
