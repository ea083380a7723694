//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer, the
//! request/response DTOs, the error wrappers from
//! [`crate::inbound::http::schemas`] and the token security scheme. Swagger UI
//! serves it in debug builds; `openapi-dump` prints it for external tooling.

use crate::inbound::http::labels::{LabelRequest, LabelResponse};
use crate::inbound::http::recipes::{RecipeDetailResponse, RecipeRequest, RecipeResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    CreateUserRequest, TokenRequest, TokenResponse, UpdateProfileRequest, UserResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the security scheme protected endpoints require.
pub const TOKEN_SECURITY_SCHEME: &str = "Token";

/// Adds the `Authorization: Token <key>` scheme to the document.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            TOKEN_SECURITY_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "`Token <key>` using the key issued by POST /api/user/token.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipe backend API",
        description = "Accounts, tokens and owner-scoped recipes, tags and ingredients."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("Token" = [])),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::create_token,
        crate::inbound::http::users::get_profile,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::labels::list_tags,
        crate::inbound::http::labels::create_tag,
        crate::inbound::http::labels::get_tag,
        crate::inbound::http::labels::replace_tag,
        crate::inbound::http::labels::update_tag,
        crate::inbound::http::labels::list_ingredients,
        crate::inbound::http::labels::create_ingredient,
        crate::inbound::http::labels::get_ingredient,
        crate::inbound::http::labels::replace_ingredient,
        crate::inbound::http::labels::update_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::replace_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreateUserRequest,
        TokenRequest,
        UpdateProfileRequest,
        UserResponse,
        TokenResponse,
        LabelRequest,
        LabelResponse,
        RecipeRequest,
        RecipeResponse,
        RecipeDetailResponse,
    )),
    tags(
        (name = "user", description = "Accounts, tokens and profiles"),
        (name = "recipe", description = "Recipes, tags and ingredients"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("crate.domain.Error", "code")]
    #[case("crate.domain.Error", "traceId")]
    #[case("RecipeRequest", "price")]
    #[case("RecipeDetailResponse", "ingredients")]
    fn schemas_expose_their_fields(#[case] name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("registered schema");
        assert_object_schema_has_field(schema, field);
    }

    #[rstest]
    #[case("/api/user/create")]
    #[case("/api/user/token")]
    #[case("/api/user/me")]
    #[case("/api/recipe/tags")]
    #[case("/api/recipe/tags/{id}")]
    #[case("/api/recipe/ingredients")]
    #[case("/api/recipe/ingredients/{id}")]
    #[case("/api/recipe/recipes")]
    #[case("/api/recipe/recipes/{id}")]
    #[case("/health/ready")]
    fn every_endpoint_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn token_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(
            components
                .security_schemes
                .contains_key(TOKEN_SECURITY_SCHEME)
        );
    }
}
