//! Tests for recipe validation and update resolution.

use super::*;
use crate::domain::{ErrorCode, LabelName};
use rstest::{fixture, rstest};

fn label(owner: UserId, id: i64, name: &str) -> Label {
    Label::new(
        LabelId::new(id),
        owner,
        LabelName::new(name).expect("valid label name"),
    )
}

fn ids(raw: &[i64]) -> Vec<LabelId> {
    raw.iter().copied().map(LabelId::new).collect()
}

#[fixture]
fn stored() -> Recipe {
    let owner = UserId::random();
    Recipe {
        id: RecipeId::new(7),
        owner,
        title: RecipeTitle::new("Chicken curry").expect("title"),
        time_minutes: CookingTime::new(30).expect("time"),
        price: "5.25".parse().expect("price"),
        link: RecipeLink::parse("https://example.com/curry").expect("link"),
        tags: vec![label(owner, 1, "Dinner"), label(owner, 2, "Spicy")],
        ingredients: vec![label(owner, 3, "Chicken")],
    }
}

#[rstest]
#[case("", "blank")]
#[case("   ", "blank")]
fn blank_titles_are_rejected(#[case] raw: &str, #[case] code: &str) {
    let err = RecipeTitle::new(raw).expect_err("blank title");
    assert_eq!(err.field(), "title");
    assert_eq!(err.code(), code);
}

#[rstest]
#[case(-1, false)]
#[case(0, true)]
#[case(90, true)]
#[case(i64::from(i32::MAX), true)]
#[case(i64::from(i32::MAX) + 1, false)]
fn cooking_time_range(#[case] minutes: i64, #[case] valid: bool) {
    assert_eq!(CookingTime::new(minutes).is_ok(), valid);
}

#[rstest]
#[case("", true, None)]
#[case("https://example.com/recipe.pdf", true, Some("https://example.com/recipe.pdf"))]
#[case("http://cook.example", true, Some("http://cook.example"))]
#[case("ftp://example.com/file", false, None)]
#[case("not a url", false, None)]
#[case("mailto:chef@example.com", false, None)]
fn link_parsing(#[case] raw: &str, #[case] valid: bool, #[case] stored: Option<&str>) {
    match RecipeLink::parse(raw) {
        Ok(link) => {
            assert!(valid, "expected {raw:?} to be rejected");
            assert_eq!(link.as_ref().map(AsRef::as_ref), stored);
        }
        Err(err) => {
            assert!(!valid, "expected {raw:?} to be accepted");
            assert_eq!(err.field(), "link");
        }
    }
}

#[rstest]
fn overlong_link_is_rejected() {
    let raw = format!("https://example.com/{}", "a".repeat(RECIPE_FIELD_MAX));
    let err = RecipeLink::parse(&raw).expect_err("too long");
    assert_eq!(err.code(), "max_length");
}

#[rstest]
#[case(RecipeChanges { title: None, ..complete_changes() }, "title")]
#[case(RecipeChanges { time_minutes: None, ..complete_changes() }, "time_minutes")]
#[case(RecipeChanges { price: None, ..complete_changes() }, "price")]
fn new_drafts_require_core_fields(#[case] changes: RecipeChanges, #[case] field: &str) {
    let err = changes.into_new_draft().expect_err("missing field");
    assert_eq!(err.field(), field);
    assert_eq!(err.code(), "required");
}

fn complete_changes() -> RecipeChanges {
    RecipeChanges {
        title: Some(RecipeTitle::new("Rice").expect("title")),
        time_minutes: Some(CookingTime::new(20).expect("time")),
        price: Some("2.00".parse().expect("price")),
        ..RecipeChanges::default()
    }
}

#[rstest]
fn new_draft_defaults_relations_and_dedups_ids() {
    let draft = RecipeChanges {
        tags: Some(ids(&[4, 4, 2])),
        ..complete_changes()
    }
    .into_new_draft()
    .expect("complete draft");

    assert_eq!(draft.tags, ids(&[4, 2]));
    assert!(draft.ingredients.is_empty());
    assert!(draft.link.is_none());
}

#[rstest]
fn partial_update_keeps_unsupplied_fields(stored: Recipe) {
    let changes = RecipeChanges {
        title: Some(RecipeTitle::new("Thai curry").expect("title")),
        ..RecipeChanges::default()
    };

    let draft = changes
        .resolve(&stored, UpdateMode::Partial)
        .expect("partial update resolves");

    assert_eq!(draft.title.as_ref(), "Thai curry");
    assert_eq!(draft.time_minutes, stored.time_minutes);
    assert_eq!(draft.price, stored.price);
    assert_eq!(draft.link, stored.link);
    assert_eq!(draft.tags, ids(&[1, 2]));
    assert_eq!(draft.ingredients, ids(&[3]));
}

#[rstest]
fn partial_update_replaces_supplied_relations(stored: Recipe) {
    let changes = RecipeChanges {
        tags: Some(ids(&[9])),
        link: Some(None),
        ..RecipeChanges::default()
    };

    let draft = changes
        .resolve(&stored, UpdateMode::Partial)
        .expect("partial update resolves");

    assert_eq!(draft.tags, ids(&[9]));
    assert_eq!(draft.ingredients, ids(&[3]));
    assert!(draft.link.is_none());
}

#[rstest]
fn full_update_clears_omitted_optionals(stored: Recipe) {
    let draft = complete_changes()
        .resolve(&stored, UpdateMode::Full)
        .expect("full update resolves");

    assert_eq!(draft.title.as_ref(), "Rice");
    assert!(draft.link.is_none());
    assert!(draft.tags.is_empty());
    assert!(draft.ingredients.is_empty());
}

#[rstest]
fn full_update_requires_core_fields(stored: Recipe) {
    let changes = RecipeChanges {
        title: Some(RecipeTitle::new("Only a title").expect("title")),
        ..RecipeChanges::default()
    };
    let err = changes
        .resolve(&stored, UpdateMode::Full)
        .expect_err("full update needs time and price");
    assert_eq!(err.field(), "time_minutes");
}

#[rstest]
#[case(None, None, true)]
#[case(Some(vec![1]), None, true)]
#[case(Some(vec![5, 2]), None, true)]
#[case(Some(vec![5]), None, false)]
#[case(None, Some(vec![3]), true)]
#[case(Some(vec![1]), Some(vec![4]), false)]
#[case(Some(vec![2]), Some(vec![3]), true)]
#[case(Some(vec![]), Some(vec![]), true)]
fn filter_semantics(
    stored: Recipe,
    #[case] tags: Option<Vec<i64>>,
    #[case] ingredients: Option<Vec<i64>>,
    #[case] expected: bool,
) {
    let filter = RecipeFilter::new(
        tags.as_deref().map(ids),
        ingredients.as_deref().map(ids),
    );
    assert_eq!(filter.matches(&stored), expected);
}

#[rstest]
fn empty_filter_lists_are_dropped() {
    let filter = RecipeFilter::new(Some(Vec::new()), Some(ids(&[1])));
    assert!(filter.tags.is_none());
    assert_eq!(filter.ingredients, Some(ids(&[1])));
}

#[rstest]
fn validation_errors_become_invalid_request_with_details() {
    let err: Error = RecipeValidationError::UnknownLabel {
        kind: LabelKind::Ingredient,
        id: LabelId::new(42),
    }
    .into();

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details(),
        Some(&json!({ "field": "ingredients", "code": "unknown_label", "id": 42 }))
    );
}

#[rstest]
fn price_errors_report_price_field() {
    let err = RecipeValidationError::from(PriceError::TooLarge);
    assert_eq!(err.field(), "price");
    assert_eq!(err.code(), "max_value");
}
