//! Tag and ingredient API handlers.
//!
//! ```text
//! GET   /api/recipe/tags?assigned_only=1
//! POST  /api/recipe/tags {"name":"Vegan"}
//! GET   /api/recipe/tags/{id}
//! PUT   /api/recipe/tags/{id} {"name":"Vegetarian"}
//! PATCH /api/recipe/tags/{id} {"name":"Vegetarian"}
//! ```
//!
//! `/api/recipe/ingredients` mirrors the tag routes. Both collections share
//! one implementation parameterised by [`LabelKind`].

use actix_web::{HttpResponse, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ApiResult, Label, LabelFilter, LabelId, LabelKind, LabelName, UpdateMode};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, label_error, parse_flag, require};

/// Body for creating or renaming a tag or ingredient.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LabelRequest {
    #[schema(example = "Vegan")]
    pub name: Option<String>,
}

/// A tag or ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct LabelResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Vegan")]
    pub name: String,
}

impl From<&Label> for LabelResponse {
    fn from(label: &Label) -> Self {
        Self {
            id: label.id().get(),
            name: label.name().as_ref().to_owned(),
        }
    }
}

/// Query parameters for label listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LabelListQuery {
    /// `1`/`true` to list only labels attached to one of your recipes.
    #[param(example = "1")]
    pub assigned_only: Option<String>,
}

async fn list_labels(
    state: &HttpState,
    user: &AuthenticatedUser,
    kind: LabelKind,
    query: LabelListQuery,
) -> ApiResult<web::Json<Vec<LabelResponse>>> {
    let filter = LabelFilter {
        assigned_only: parse_flag(
            query.assigned_only.as_deref(),
            FieldName::new("assigned_only"),
        )?,
    };
    let labels = state.labels_query.list_labels(user.id(), kind, filter).await?;
    Ok(web::Json(labels.iter().map(LabelResponse::from).collect()))
}

async fn create_label(
    state: &HttpState,
    user: &AuthenticatedUser,
    kind: LabelKind,
    payload: LabelRequest,
) -> ApiResult<HttpResponse> {
    let name = parse_name(payload.name)?;
    let label = state.labels.create_label(user.id(), kind, name).await?;
    Ok(HttpResponse::Created().json(LabelResponse::from(&label)))
}

fn parse_name(raw: Option<String>) -> ApiResult<LabelName> {
    let raw = require(raw, FieldName::new("name"))?;
    LabelName::new(&raw).map_err(|err| label_error(&err))
}

async fn get_label(
    state: &HttpState,
    user: &AuthenticatedUser,
    kind: LabelKind,
    id: i64,
) -> ApiResult<web::Json<LabelResponse>> {
    let label = state
        .labels_query
        .get_label(user.id(), kind, LabelId::new(id))
        .await?;
    Ok(web::Json(LabelResponse::from(&label)))
}

/// `PUT` requires `name`; a `PATCH` without one leaves the label unchanged.
async fn update_label(
    state: &HttpState,
    user: &AuthenticatedUser,
    kind: LabelKind,
    id: i64,
    payload: LabelRequest,
    mode: UpdateMode,
) -> ApiResult<web::Json<LabelResponse>> {
    let id = LabelId::new(id);
    if payload.name.is_none() && mode == UpdateMode::Partial {
        let label = state.labels_query.get_label(user.id(), kind, id).await?;
        return Ok(web::Json(LabelResponse::from(&label)));
    }
    let name = parse_name(payload.name)?;
    let label = state.labels.update_label(user.id(), kind, id, name).await?;
    Ok(web::Json(LabelResponse::from(&label)))
}

/// List your tags, name descending.
#[utoipa::path(
    get,
    path = "/api/recipe/tags",
    params(LabelListQuery),
    responses(
        (status = 200, description = "Tags", body = [LabelResponse]),
        (status = 400, description = "Invalid assigned_only value", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "listTags"
)]
#[get("/recipe/tags")]
pub async fn list_tags(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<LabelListQuery>,
) -> ApiResult<web::Json<Vec<LabelResponse>>> {
    list_labels(&state, &user, LabelKind::Tag, query.into_inner()).await
}

/// Create a tag owned by the caller.
#[utoipa::path(
    post,
    path = "/api/recipe/tags",
    request_body = LabelRequest,
    responses(
        (status = 201, description = "Tag created", body = LabelResponse),
        (status = 400, description = "Blank or overlong name", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "createTag"
)]
#[post("/recipe/tags")]
pub async fn create_tag(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<LabelRequest>,
) -> ApiResult<HttpResponse> {
    create_label(&state, &user, LabelKind::Tag, payload.into_inner()).await
}

/// Retrieve one of your tags.
#[utoipa::path(
    get,
    path = "/api/recipe/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag", body = LabelResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "No such tag for this user", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "getTag"
)]
#[get("/recipe/tags/{id}")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<LabelResponse>> {
    get_label(&state, &user, LabelKind::Tag, path.into_inner()).await
}

/// Rename one of your tags; `name` is required.
#[utoipa::path(
    put,
    path = "/api/recipe/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    request_body = LabelRequest,
    responses(
        (status = 200, description = "Tag renamed", body = LabelResponse),
        (status = 400, description = "Missing, blank or overlong name", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "No such tag for this user", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "replaceTag"
)]
#[put("/recipe/tags/{id}")]
pub async fn replace_tag(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<LabelRequest>,
) -> ApiResult<web::Json<LabelResponse>> {
    update_label(
        &state,
        &user,
        LabelKind::Tag,
        path.into_inner(),
        payload.into_inner(),
        UpdateMode::Full,
    )
    .await
}

/// Rename one of your tags when `name` is supplied.
#[utoipa::path(
    patch,
    path = "/api/recipe/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    request_body = LabelRequest,
    responses(
        (status = 200, description = "Tag updated", body = LabelResponse),
        (status = 400, description = "Blank or overlong name", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "No such tag for this user", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "updateTag"
)]
#[patch("/recipe/tags/{id}")]
pub async fn update_tag(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<LabelRequest>,
) -> ApiResult<web::Json<LabelResponse>> {
    update_label(
        &state,
        &user,
        LabelKind::Tag,
        path.into_inner(),
        payload.into_inner(),
        UpdateMode::Partial,
    )
    .await
}

/// List your ingredients, name descending.
#[utoipa::path(
    get,
    path = "/api/recipe/ingredients",
    params(LabelListQuery),
    responses(
        (status = 200, description = "Ingredients", body = [LabelResponse]),
        (status = 400, description = "Invalid assigned_only value", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "listIngredients"
)]
#[get("/recipe/ingredients")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<LabelListQuery>,
) -> ApiResult<web::Json<Vec<LabelResponse>>> {
    list_labels(&state, &user, LabelKind::Ingredient, query.into_inner()).await
}

/// Create an ingredient owned by the caller.
#[utoipa::path(
    post,
    path = "/api/recipe/ingredients",
    request_body = LabelRequest,
    responses(
        (status = 201, description = "Ingredient created", body = LabelResponse),
        (status = 400, description = "Blank or overlong name", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "createIngredient"
)]
#[post("/recipe/ingredients")]
pub async fn create_ingredient(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<LabelRequest>,
) -> ApiResult<HttpResponse> {
    create_label(&state, &user, LabelKind::Ingredient, payload.into_inner()).await
}

/// Retrieve one of your ingredients.
#[utoipa::path(
    get,
    path = "/api/recipe/ingredients/{id}",
    params(("id" = i64, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = LabelResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "No such ingredient for this user", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "getIngredient"
)]
#[get("/recipe/ingredients/{id}")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<LabelResponse>> {
    get_label(&state, &user, LabelKind::Ingredient, path.into_inner()).await
}

/// Rename one of your ingredients; `name` is required.
#[utoipa::path(
    put,
    path = "/api/recipe/ingredients/{id}",
    params(("id" = i64, Path, description = "Ingredient id")),
    request_body = LabelRequest,
    responses(
        (status = 200, description = "Ingredient renamed", body = LabelResponse),
        (status = 400, description = "Missing, blank or overlong name", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "No such ingredient for this user", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "replaceIngredient"
)]
#[put("/recipe/ingredients/{id}")]
pub async fn replace_ingredient(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<LabelRequest>,
) -> ApiResult<web::Json<LabelResponse>> {
    update_label(
        &state,
        &user,
        LabelKind::Ingredient,
        path.into_inner(),
        payload.into_inner(),
        UpdateMode::Full,
    )
    .await
}

/// Rename one of your ingredients when `name` is supplied.
#[utoipa::path(
    patch,
    path = "/api/recipe/ingredients/{id}",
    params(("id" = i64, Path, description = "Ingredient id")),
    request_body = LabelRequest,
    responses(
        (status = 200, description = "Ingredient updated", body = LabelResponse),
        (status = 400, description = "Blank or overlong name", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "No such ingredient for this user", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "updateIngredient"
)]
#[patch("/recipe/ingredients/{id}")]
pub async fn update_ingredient(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<LabelRequest>,
) -> ApiResult<web::Json<LabelResponse>> {
    update_label(
        &state,
        &user,
        LabelKind::Ingredient,
        path.into_inner(),
        payload.into_inner(),
        UpdateMode::Partial,
    )
    .await
}
