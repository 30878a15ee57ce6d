use crate::{errors::AuthError, models::user::UserModel, store::user::UserRepository};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::instrument;

pub const MIN_PASSWORD_LEN: usize = 4;

#[derive(Clone, Debug)]
pub struct AuthService {
    repo: UserRepository,
}

impl AuthService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    #[instrument(
        name = "AuthService: Register",
        skip(self, password, confirm_password),
        fields(username = %username)
    )]
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<UserModel, AuthError> {
        if password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort);
        }
        if self.repo.find_by_username(username).await?.is_some() {
            tracing::warn!("Signup rejected: username taken");
            return Err(AuthError::UserAlreadyExists);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {:?}", e);
                AuthError::Internal
            })?
            .to_string();

        // The store re-checks the username under its lock.
        let user = self.repo.create_user(username, &hash).await?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    #[instrument(
        name = "AuthService: Login attempt",
        skip(self, password),
        fields(username = %username)
    )]
    pub async fn login(&self, username: &str, password: &str) -> Result<UserModel, AuthError> {
        // 1. Fetch User
        let user = match self.repo.find_by_username(username).await? {
            Some(u) => u,
            None => {
                tracing::warn!("Login failed: User not found");
                return Err(AuthError::UserNotFound);
            }
        };

        // 2. Parse Hash
        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
            tracing::error!("Critical: Failed to parse stored password hash: {:?}", e);
            AuthError::Internal
        })?;

        // 3. Verify Password
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_err()
        {
            tracing::warn!("Login failed: Invalid password provided");
            return Err(AuthError::InvalidPassword);
        }

        tracing::info!("User authenticated successfully");
        Ok(user)
    }

    /// Resolve the user a session points at. Deleted or unknown ids yield `None`.
    pub async fn current_user(&self, user_id: &str) -> Result<Option<UserModel>, AuthError> {
        Ok(self.repo.find_by_id(user_id).await?)
    }
}
