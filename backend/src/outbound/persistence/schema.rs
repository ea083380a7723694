//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate
//! with `diesel print-schema` or edit by hand when a migration changes a
//! table.

diesel::table! {
    /// User accounts keyed by UUID; `email` is unique and stored lowercased.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Normalised login email.
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// Display name, possibly empty.
        name -> Varchar,
        /// Whether the account may authenticate.
        is_active -> Bool,
        /// Staff flag.
        is_staff -> Bool,
        /// Superuser flag.
        is_superuser -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One API token digest per user.
    auth_tokens (user_id) {
        /// Owning user; also the primary key.
        user_id -> Uuid,
        /// Hex SHA-256 digest of the issued token.
        digest -> Varchar,
        /// Issue timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Owner-scoped recipe tags.
    tags (id) {
        id -> Int8,
        user_id -> Uuid,
        name -> Varchar,
    }
}

diesel::table! {
    /// Owner-scoped recipe ingredients.
    ingredients (id) {
        id -> Int8,
        user_id -> Uuid,
        name -> Varchar,
    }
}

diesel::table! {
    /// Owner-scoped recipes. Prices are whole cents.
    recipes (id) {
        id -> Int8,
        user_id -> Uuid,
        title -> Varchar,
        time_minutes -> Int4,
        price_cents -> Int4,
        link -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Recipe to tag links.
    recipe_tags (recipe_id, tag_id) {
        recipe_id -> Int8,
        tag_id -> Int8,
    }
}

diesel::table! {
    /// Recipe to ingredient links.
    recipe_ingredients (recipe_id, ingredient_id) {
        recipe_id -> Int8,
        ingredient_id -> Int8,
    }
}

diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(tags -> users (user_id));
diesel::joinable!(ingredients -> users (user_id));
diesel::joinable!(recipes -> users (user_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    auth_tokens,
    tags,
    ingredients,
    recipes,
    recipe_tags,
    recipe_ingredients,
);
