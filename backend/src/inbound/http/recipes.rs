//! Recipe API handlers.
//!
//! ```text
//! GET    /api/recipe/recipes?tags=1,2&ingredients=3
//! POST   /api/recipe/recipes {"title":"Rice","time_minutes":20,"price":"2.00"}
//! GET    /api/recipe/recipes/{id}
//! PUT    /api/recipe/recipes/{id}
//! PATCH  /api/recipe/recipes/{id} {"title":"Fried rice"}
//! DELETE /api/recipe/recipes/{id}
//! ```
//!
//! Prices are accepted as JSON numbers or decimal strings and always
//! returned as two-decimal strings. An absent link is returned as `""`.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    ApiResult, CookingTime, Error, Label, LabelId, Price, Recipe, RecipeChanges, RecipeFilter,
    RecipeId, RecipeLink, RecipeTitle, RecipeValidationError, UpdateMode,
};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::labels::LabelResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id_list, present};

/// Price as supplied by a client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PriceInput {
    /// `5.5`
    Number(serde_json::Number),
    /// `"5.50"`
    Text(String),
}

impl PriceInput {
    fn parse(&self) -> Result<Price, RecipeValidationError> {
        let parsed = match self {
            Self::Number(number) => number.to_string().parse::<Price>(),
            Self::Text(text) => text.parse::<Price>(),
        };
        parsed.map_err(RecipeValidationError::from)
    }
}

/// Recipe body for create, full and partial update.
///
/// On create and `PUT`, `title`, `time_minutes` and `price` are required.
/// On `PATCH`, omitted fields keep their stored value; `tags` and
/// `ingredients`, when given, replace the whole set. `link` may be `null` or
/// `""` to clear it.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RecipeRequest {
    #[schema(example = "Rice")]
    pub title: Option<String>,
    #[schema(example = 20)]
    pub time_minutes: Option<i64>,
    /// Decimal number or string with at most two decimal places.
    #[schema(value_type = Option<String>, example = "2.00")]
    pub price: Option<PriceInput>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, example = "https://example.com/rice")]
    pub link: Option<Option<String>>,
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<i64>>,
}

fn label_ids(raw: Option<Vec<i64>>) -> Option<Vec<LabelId>> {
    raw.map(|ids| ids.into_iter().map(LabelId::new).collect())
}

impl TryFrom<RecipeRequest> for RecipeChanges {
    type Error = RecipeValidationError;

    fn try_from(value: RecipeRequest) -> Result<Self, Self::Error> {
        let link = match value.link {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(RecipeLink::parse(&raw)?),
        };
        Ok(Self {
            title: value.title.as_deref().map(RecipeTitle::new).transpose()?,
            time_minutes: value.time_minutes.map(CookingTime::new).transpose()?,
            price: value.price.as_ref().map(PriceInput::parse).transpose()?,
            link,
            tags: label_ids(value.tags),
            ingredients: label_ids(value.ingredients),
        })
    }
}

/// Recipe with label ids, as returned by list, create and update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct RecipeResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Rice")]
    pub title: String,
    #[schema(example = 20)]
    pub time_minutes: i32,
    #[schema(example = "2.00")]
    pub price: String,
    #[schema(example = "")]
    pub link: String,
    pub tags: Vec<i64>,
    pub ingredients: Vec<i64>,
}

impl From<&Recipe> for RecipeResponse {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.get(),
            title: recipe.title.as_ref().to_owned(),
            time_minutes: recipe.time_minutes.minutes(),
            price: recipe.price.to_string(),
            link: link_text(recipe),
            tags: raw_label_ids(&recipe.tags),
            ingredients: raw_label_ids(&recipe.ingredients),
        }
    }
}

/// Recipe with embedded label objects, as returned by retrieve.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct RecipeDetailResponse {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: String,
    pub link: String,
    pub tags: Vec<LabelResponse>,
    pub ingredients: Vec<LabelResponse>,
}

impl From<&Recipe> for RecipeDetailResponse {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.get(),
            title: recipe.title.as_ref().to_owned(),
            time_minutes: recipe.time_minutes.minutes(),
            price: recipe.price.to_string(),
            link: link_text(recipe),
            tags: recipe.tags.iter().map(LabelResponse::from).collect(),
            ingredients: recipe.ingredients.iter().map(LabelResponse::from).collect(),
        }
    }
}

fn raw_label_ids(labels: &[Label]) -> Vec<i64> {
    labels.iter().map(|label| label.id().get()).collect()
}

fn link_text(recipe: &Recipe) -> String {
    recipe
        .link
        .as_ref()
        .map(|link| link.as_ref().to_owned())
        .unwrap_or_default()
}

/// Query parameters for recipe listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListQuery {
    /// Comma-separated tag ids; matches recipes with any of them.
    #[param(example = "1,2")]
    pub tags: Option<String>,
    /// Comma-separated ingredient ids; matches recipes with any of them.
    #[param(example = "3")]
    pub ingredients: Option<String>,
}

fn changes_from(payload: web::Json<RecipeRequest>) -> ApiResult<RecipeChanges> {
    RecipeChanges::try_from(payload.into_inner()).map_err(Error::from)
}

/// List your recipes, newest first.
#[utoipa::path(
    get,
    path = "/api/recipe/recipes",
    params(RecipeListQuery),
    responses(
        (status = 200, description = "Recipes", body = [RecipeResponse]),
        (status = 400, description = "Malformed id list", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "listRecipes"
)]
#[get("/recipe/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<RecipeListQuery>,
) -> ApiResult<web::Json<Vec<RecipeResponse>>> {
    let RecipeListQuery { tags, ingredients } = query.into_inner();
    let filter = RecipeFilter::new(
        parse_id_list(tags.as_deref(), FieldName::new("tags"))?,
        parse_id_list(ingredients.as_deref(), FieldName::new("ingredients"))?,
    );
    let recipes = state.recipes_query.list_recipes(user.id(), filter).await?;
    Ok(web::Json(recipes.iter().map(RecipeResponse::from).collect()))
}

/// Create a recipe owned by the caller.
#[utoipa::path(
    post,
    path = "/api/recipe/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid field or unknown label id", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "createRecipe"
)]
#[post("/recipe/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let changes = changes_from(payload)?;
    let recipe = state.recipes.create_recipe(user.id(), changes).await?;
    Ok(HttpResponse::Created().json(RecipeResponse::from(&recipe)))
}

/// Retrieve one of your recipes with its labels expanded.
#[utoipa::path(
    get,
    path = "/api/recipe/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeDetailResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "No such recipe for this user", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "getRecipe"
)]
#[get("/recipe/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecipeDetailResponse>> {
    let id = RecipeId::new(path.into_inner());
    let recipe = state.recipes_query.get_recipe(user.id(), id).await?;
    Ok(web::Json(RecipeDetailResponse::from(&recipe)))
}

async fn update(
    state: &HttpState,
    user: &AuthenticatedUser,
    id: i64,
    payload: web::Json<RecipeRequest>,
    mode: UpdateMode,
) -> ApiResult<web::Json<RecipeResponse>> {
    let changes = changes_from(payload)?;
    let recipe = state
        .recipes
        .update_recipe(user.id(), RecipeId::new(id), changes, mode)
        .await?;
    Ok(web::Json(RecipeResponse::from(&recipe)))
}

/// Replace a recipe. Omitted `link`, `tags` and `ingredients` are cleared.
#[utoipa::path(
    put,
    path = "/api/recipe/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe replaced", body = RecipeResponse),
        (status = 400, description = "Invalid field or unknown label id", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "No such recipe for this user", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "replaceRecipe"
)]
#[put("/recipe/recipes/{id}")]
pub async fn replace_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    update(&state, &user, path.into_inner(), payload, UpdateMode::Full).await
}

/// Update the supplied fields of a recipe.
#[utoipa::path(
    patch,
    path = "/api/recipe/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid field or unknown label id", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "No such recipe for this user", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "updateRecipe"
)]
#[patch("/recipe/recipes/{id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    update(&state, &user, path.into_inner(), payload, UpdateMode::Partial).await
}

/// Delete one of your recipes.
#[utoipa::path(
    delete,
    path = "/api/recipe/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "No such recipe for this user", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipe/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .recipes
        .delete_recipe(user.id(), RecipeId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
