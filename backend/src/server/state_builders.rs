//! Builders wiring driven adapters into the services behind [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use backend::domain::ports::{
    AuthTokenRepository, LabelRepository, PasswordHasher, RecipeRepository, UserRepository,
};
use backend::domain::{AccountService, LabelService, RecipeService};
use backend::inbound::http::state::HttpState;
use backend::outbound::credentials::Argon2PasswordHasher;
use backend::outbound::persistence::{
    DbPool, DieselAuthTokenRepository, DieselLabelRepository, DieselRecipeRepository,
    DieselUserRepository,
};

/// Driven adapters the HTTP services are built from.
pub(super) struct Adapters<U, T, H, L, R> {
    pub users: Arc<U>,
    pub tokens: Arc<T>,
    pub hasher: Arc<H>,
    pub labels: Arc<L>,
    pub recipes: Arc<R>,
}

/// Build each service once and hand it out as both its command and query port.
pub(super) fn wire_services<U, T, H, L, R>(adapters: Adapters<U, T, H, L, R>) -> HttpState
where
    U: UserRepository + 'static,
    T: AuthTokenRepository + 'static,
    H: PasswordHasher + 'static,
    L: LabelRepository + 'static,
    R: RecipeRepository + 'static,
{
    let Adapters {
        users,
        tokens,
        hasher,
        labels,
        recipes,
    } = adapters;
    let accounts = Arc::new(AccountService::new(
        users,
        tokens,
        hasher,
        Arc::new(DefaultClock),
    ));
    let label_service = Arc::new(LabelService::new(labels.clone()));
    let recipe_service = Arc::new(RecipeService::new(recipes, labels));

    HttpState {
        accounts: accounts.clone(),
        accounts_query: accounts,
        labels: label_service.clone(),
        labels_query: label_service,
        recipes: recipe_service.clone(),
        recipes_query: recipe_service,
    }
}

/// Build the shared HTTP state over the Diesel repositories.
pub(super) fn build_http_state(pool: &DbPool) -> web::Data<HttpState> {
    web::Data::new(wire_services(Adapters {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        tokens: Arc::new(DieselAuthTokenRepository::new(pool.clone())),
        hasher: Arc::new(Argon2PasswordHasher::default()),
        labels: Arc::new(DieselLabelRepository::new(pool.clone())),
        recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::domain::ports::{
        AccountCommand, AccountQuery, LabelCommand, LabelQuery, RegisterUserRequest,
    };
    use backend::domain::{
        EmailAddress, LabelFilter, LabelKind, LabelName, LoginCredentials, PersonName,
        PlainPassword,
    };
    use backend::test_support::{InMemoryStore, PlaintextPasswordHasher};

    fn in_memory() -> HttpState {
        let store = Arc::new(InMemoryStore::new());
        wire_services(Adapters {
            users: store.clone(),
            tokens: store.clone(),
            hasher: Arc::new(PlaintextPasswordHasher),
            labels: store.clone(),
            recipes: store,
        })
    }

    #[tokio::test]
    async fn command_and_query_ports_share_one_service() {
        let state = in_memory();
        let user = state
            .accounts
            .register(RegisterUserRequest {
                email: EmailAddress::new("cook@example.com").expect("email"),
                password: PlainPassword::new("pass123").expect("password"),
                name: PersonName::default(),
            })
            .await
            .expect("register");
        let token = state
            .accounts
            .issue_token(
                LoginCredentials::try_from_parts("cook@example.com", "pass123")
                    .expect("credentials"),
            )
            .await
            .expect("token");

        let resolved = state
            .accounts_query
            .authenticate(&token)
            .await
            .expect("authenticate");
        assert_eq!(resolved.id(), user.id());

        let created = state
            .labels
            .create_label(
                user.id(),
                LabelKind::Tag,
                LabelName::new("Vegan").expect("name"),
            )
            .await
            .expect("label");
        let listed = state
            .labels_query
            .list_labels(user.id(), LabelKind::Tag, LabelFilter::default())
            .await
            .expect("list");
        assert_eq!(listed, vec![created]);
    }
}
