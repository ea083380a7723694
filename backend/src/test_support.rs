//! In-memory adapters for handler and integration tests.
//!
//! [`InMemoryStore`] implements every driven port over one shared state so
//! the real services can run without PostgreSQL. Compiled for unit tests and
//! behind the `test-support` feature for `tests/`.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::DefaultClock;

use crate::domain::ports::{
    AccountCommand, AuthTokenRepository, AuthTokenRepositoryError, LabelRepository,
    LabelRepositoryError, PasswordHasher, PasswordHasherError, RecipeRepository,
    RecipeRepositoryError, RegisterUserRequest, StoredCredentials, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    AccountService, EmailAddress, Error, Label, LabelFilter, LabelId, LabelKind, LabelName,
    LabelService, PasswordHash, PersonName, PlainPassword, Recipe, RecipeDraft, RecipeFilter,
    RecipeId, RecipeService, TokenDigest, User, UserId, sort_for_listing,
};
use crate::inbound::http::state::HttpState;

/// Password "hasher" that stores the plaintext behind a marker prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextPasswordHasher;

const PLAINTEXT_PREFIX: &str = "plain$";

#[async_trait]
impl PasswordHasher for PlaintextPasswordHasher {
    async fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::new(format!(
            "{PLAINTEXT_PREFIX}{}",
            password.expose()
        )))
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        hash.as_str()
            .strip_prefix(PLAINTEXT_PREFIX)
            .map(|stored| stored == password)
            .ok_or_else(|| PasswordHasherError::hashing("hash was not produced by this hasher"))
    }
}

#[derive(Debug, Clone)]
struct StoredRecipe {
    owner: UserId,
    draft: RecipeDraft,
}

#[derive(Debug, Default)]
struct StoreState {
    users: Vec<StoredCredentials>,
    tokens: HashMap<UserId, TokenDigest>,
    labels: BTreeMap<LabelId, (LabelKind, Label)>,
    recipes: BTreeMap<RecipeId, StoredRecipe>,
    next_label_id: i64,
    next_recipe_id: i64,
}

impl StoreState {
    fn attached(&self, ids: &[LabelId]) -> Vec<Label> {
        let mut labels: Vec<Label> = ids
            .iter()
            .filter_map(|id| self.labels.get(id).map(|(_, label)| label.clone()))
            .collect();
        labels.sort_by_key(Label::id);
        labels
    }

    fn hydrate(&self, id: RecipeId, stored: &StoredRecipe) -> Recipe {
        let StoredRecipe { owner, draft } = stored;
        Recipe {
            id,
            owner: *owner,
            title: draft.title.clone(),
            time_minutes: draft.time_minutes,
            price: draft.price,
            link: draft.link.clone(),
            tags: self.attached(&draft.tags),
            ingredients: self.attached(&draft.ingredients),
        }
    }

    fn find_owned_recipe(&self, owner: &UserId, id: RecipeId) -> Option<Recipe> {
        self.recipes
            .get(&id)
            .filter(|stored| stored.owner == *owner)
            .map(|stored| self.hydrate(id, stored))
    }

    fn is_assigned(&self, owner: &UserId, kind: LabelKind, id: LabelId) -> bool {
        self.recipes
            .values()
            .filter(|stored| stored.owner == *owner)
            .any(|stored| stored.draft.label_ids(kind).contains(&id))
    }
}

/// Shared in-memory backing store for all driven ports.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn accounts(&self) -> Arc<AccountService<Self, Self, PlaintextPasswordHasher>> {
        let store = Arc::new(self.clone());
        Arc::new(AccountService::new(
            store.clone(),
            store,
            Arc::new(PlaintextPasswordHasher),
            Arc::new(DefaultClock),
        ))
    }

    /// HTTP state wired to the real services over this store.
    #[must_use]
    pub fn http_state(&self) -> HttpState {
        let store = Arc::new(self.clone());
        let accounts = self.accounts();
        let labels = Arc::new(LabelService::new(store.clone()));
        let recipes = Arc::new(RecipeService::new(store.clone(), store));
        HttpState {
            accounts: accounts.clone(),
            accounts_query: accounts,
            labels: labels.clone(),
            labels_query: labels,
            recipes: recipes.clone(),
            recipes_query: recipes,
        }
    }

    /// Register a regular account and return a freshly issued token.
    ///
    /// # Errors
    /// Fails when the inputs do not validate or the email is taken.
    pub async fn user_with_token(&self, email: &str, password: &str) -> Result<String, Error> {
        let accounts = self.accounts();
        let request = RegisterUserRequest {
            email: EmailAddress::new(email)
                .map_err(|err| Error::invalid_request(err.to_string()))?,
            password: PlainPassword::new(password)
                .map_err(|err| Error::invalid_request(err.to_string()))?,
            name: PersonName::default(),
        };
        accounts.register(request).await?;
        let credentials = crate::domain::LoginCredentials::try_from_parts(email, password)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let token = accounts.issue_token(credentials).await?;
        Ok(token.as_str().to_owned())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut state = self.lock();
        if state
            .users
            .iter()
            .any(|stored| stored.user.email() == user.email())
        {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        state.users.push(StoredCredentials {
            user: user.clone(),
            password_hash: password_hash.clone(),
        });
        Ok(())
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.email() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.id() == id)
            .map(|stored| stored.user.clone()))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        name: &PersonName,
        password_hash: Option<PasswordHash>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.lock();
        let Some(stored) = state.users.iter_mut().find(|stored| stored.user.id() == id) else {
            return Ok(None);
        };
        stored.user = stored.user.clone().with_name(name.clone());
        if let Some(hash) = password_hash {
            stored.password_hash = hash;
        }
        Ok(Some(stored.user.clone()))
    }
}

#[async_trait]
impl AuthTokenRepository for InMemoryStore {
    async fn replace(
        &self,
        user_id: &UserId,
        digest: &TokenDigest,
        _issued_at: DateTime<Utc>,
    ) -> Result<(), AuthTokenRepositoryError> {
        self.lock().tokens.insert(*user_id, digest.clone());
        Ok(())
    }

    async fn find_user(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<User>, AuthTokenRepositoryError> {
        let state = self.lock();
        let Some(user_id) = state
            .tokens
            .iter()
            .find_map(|(user_id, stored)| (stored == digest).then_some(*user_id))
        else {
            return Ok(None);
        };
        Ok(state
            .users
            .iter()
            .find(|stored| *stored.user.id() == user_id)
            .map(|stored| stored.user.clone()))
    }
}

#[async_trait]
impl LabelRepository for InMemoryStore {
    async fn list(
        &self,
        owner: &UserId,
        kind: LabelKind,
        filter: LabelFilter,
    ) -> Result<Vec<Label>, LabelRepositoryError> {
        let state = self.lock();
        let mut labels: Vec<Label> = state
            .labels
            .values()
            .filter(|(label_kind, label)| *label_kind == kind && label.owner() == owner)
            .filter(|(_, label)| {
                !filter.assigned_only || state.is_assigned(owner, kind, label.id())
            })
            .map(|(_, label)| label.clone())
            .collect();
        sort_for_listing(&mut labels);
        Ok(labels)
    }

    async fn insert(
        &self,
        owner: &UserId,
        kind: LabelKind,
        name: &LabelName,
    ) -> Result<Label, LabelRepositoryError> {
        let mut state = self.lock();
        state.next_label_id += 1;
        let id = LabelId::new(state.next_label_id);
        let label = Label::new(id, *owner, name.clone());
        state.labels.insert(id, (kind, label.clone()));
        Ok(label)
    }

    async fn find(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
    ) -> Result<Option<Label>, LabelRepositoryError> {
        let state = self.lock();
        Ok(state
            .labels
            .get(&id)
            .filter(|(label_kind, label)| *label_kind == kind && label.owner() == owner)
            .map(|(_, label)| label.clone()))
    }

    async fn rename(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
        name: &LabelName,
    ) -> Result<Option<Label>, LabelRepositoryError> {
        let mut state = self.lock();
        let Some((_, label)) = state
            .labels
            .get_mut(&id)
            .filter(|(label_kind, label)| *label_kind == kind && label.owner() == owner)
        else {
            return Ok(None);
        };
        *label = Label::new(id, *owner, name.clone());
        Ok(Some(label.clone()))
    }

    async fn find_owned(
        &self,
        owner: &UserId,
        kind: LabelKind,
        ids: &[LabelId],
    ) -> Result<Vec<LabelId>, LabelRepositoryError> {
        let state = self.lock();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| {
                state
                    .labels
                    .get(id)
                    .is_some_and(|(label_kind, label)| *label_kind == kind && label.owner() == owner)
            })
            .collect())
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn list(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let state = self.lock();
        Ok(state
            .recipes
            .iter()
            .rev()
            .filter(|(_, stored)| stored.owner == *owner)
            .map(|(id, stored)| state.hydrate(*id, stored))
            .filter(|recipe| filter.matches(recipe))
            .collect())
    }

    async fn find(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        Ok(self.lock().find_owned_recipe(owner, id))
    }

    async fn insert(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut state = self.lock();
        state.next_recipe_id += 1;
        let id = RecipeId::new(state.next_recipe_id);
        let stored = StoredRecipe {
            owner: *owner,
            draft: draft.clone(),
        };
        let recipe = state.hydrate(id, &stored);
        state.recipes.insert(id, stored);
        Ok(recipe)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut state = self.lock();
        let Some(stored) = state
            .recipes
            .get_mut(&id)
            .filter(|stored| stored.owner == *owner)
        else {
            return Ok(None);
        };
        stored.draft = draft.clone();
        Ok(state.find_owned_recipe(owner, id))
    }

    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.lock();
        let owned = state
            .recipes
            .get(&id)
            .is_some_and(|stored| stored.owner == *owner);
        if owned {
            state.recipes.remove(&id);
        }
        Ok(owned)
    }
}
