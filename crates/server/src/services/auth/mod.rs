//! Authentication service.
//!
//! Username/password login against Argon2id hashes, plus account creation for
//! the seed user and the CLI.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use simcard_core::UserRole;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .users
            .get_with_password_hash(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Create a user with the given role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, AuthError> {
        let password_hash = hash_password(password)?;

        self.users
            .create(username, &password_hash, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    /// Create the admin seed user unless the username already exists.
    ///
    /// Returns the new user, or `None` if it was already present.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub async fn seed_default_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AuthError> {
        if self.users.exists(username).await? {
            return Ok(None);
        }

        match self.create_user(username, password, UserRole::Admin).await {
            Ok(user) => {
                tracing::info!(username = %user.username, "Seed user created");
                Ok(Some(user))
            }
            // Another process seeded it between the check and the insert.
            Err(AuthError::UserAlreadyExists) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
