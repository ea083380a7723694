//! Argon2id implementation of the password hashing port.
//!
//! Hashes are stored in PHC string format, so the algorithm parameters travel
//! with each hash and older hashes keep verifying after the cost changes.
//! Hashing and verification run on Tokio's blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as PhcError, PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier as _,
    SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use tokio::task;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{PasswordHash, PlainPassword};

/// Argon2id password hasher.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2PasswordHasher {
    /// Hasher with explicit memory (KiB), iteration and lane costs.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHasherError::Hashing`] when the costs fall outside
    /// the ranges Argon2 accepts.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        lanes: u32,
    ) -> Result<Self, PasswordHasherError> {
        let params = Params::new(memory_kib, iterations, lanes, None)
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

fn hash_blocking(
    argon2: &Argon2<'_>,
    password: &PlainPassword,
) -> Result<PasswordHash, PasswordHasherError> {
    let salt = SaltString::generate(&mut OsRng);
    let encoded = argon2
        .hash_password(password.expose().as_bytes(), &salt)
        .map_err(|err| PasswordHasherError::hashing(err.to_string()))?;
    Ok(PasswordHash::new(encoded.to_string()))
}

fn verify_blocking(
    argon2: &Argon2<'_>,
    password: &str,
    hash: &PasswordHash,
) -> Result<bool, PasswordHasherError> {
    let parsed =
        PhcHash::new(hash.as_str()).map_err(|err| PasswordHasherError::hashing(err.to_string()))?;
    match argon2.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PhcError::Password) => Ok(false),
        Err(err) => Err(PasswordHasherError::hashing(err.to_string())),
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T, PasswordHasherError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PasswordHasherError> + Send + 'static,
{
    task::spawn_blocking(work)
        .await
        .map_err(|err| PasswordHasherError::hashing(format!("hashing task failed: {err}")))?
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, PasswordHasherError> {
        let argon2 = self.argon2();
        let password = password.clone();
        run_blocking(move || hash_blocking(&argon2, &password)).await
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let argon2 = self.argon2();
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.clone();
        run_blocking(move || verify_blocking(&argon2, &password, &hash)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_params(256, 1, 1).expect("cheap params are valid")
    }

    #[rstest]
    #[tokio::test]
    async fn hashes_verify_only_their_password(hasher: Argon2PasswordHasher) {
        let password = PlainPassword::new("pass123").expect("valid password");
        let hash = hasher.hash(&password).await.expect("hash");

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify("pass123", &hash).await.expect("verify"));
        assert!(!hasher.verify("pass124", &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn equal_passwords_get_distinct_salts(hasher: Argon2PasswordHasher) {
        let password = PlainPassword::new("pass123").expect("valid password");
        let first = hasher.hash(&password).await.expect("hash");
        let second = hasher.hash(&password).await.expect("hash");
        assert_ne!(first, second);
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_hashes_are_errors(hasher: Argon2PasswordHasher) {
        let result = hasher
            .verify("pass123", &PasswordHash::new("not-a-phc-string"))
            .await;
        assert!(matches!(result, Err(PasswordHasherError::Hashing { .. })));
    }

    #[rstest]
    #[tokio::test(flavor = "current_thread")]
    async fn hashing_runs_off_the_calling_thread(hasher: Argon2PasswordHasher) {
        let caller = std::thread::current().id();
        let worker = run_blocking(|| Ok(std::thread::current().id()))
            .await
            .expect("blocking task");
        assert_ne!(worker, caller);

        let password = PlainPassword::new("pass123").expect("valid password");
        assert!(hasher.hash(&password).await.is_ok());
    }

    #[rstest]
    fn out_of_range_costs_are_rejected() {
        assert!(Argon2PasswordHasher::with_params(1, 0, 0).is_err());
    }
}
