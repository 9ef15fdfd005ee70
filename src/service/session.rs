use crate::database::user::UserRepository;
use crate::error::app_error::AppError;
use crate::models::session::AuthState;
use crate::models::user::{RegisterRequest, User, UserRole};
use tracing::info;

/// Placeholder handed out on login. It is not verified anywhere.
pub const SESSION_TOKEN: &str = "mock-jwt-token";

/// Exact, case-sensitive match of email and plaintext password.
pub async fn authenticate<R>(repository: &R, email: &str, password: &str) -> Result<AuthState, AppError>
where
    R: UserRepository + Sync,
{
    let user = repository
        .find_user_by_credentials(email, password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    info!(user_id = user.id, role = %user.role, "user logged in");
    Ok(signed_in(user))
}

fn signed_in(user: User) -> AuthState {
    AuthState {
        user: Some(user),
        token: Some(SESSION_TOKEN.to_string()),
        is_authenticated: true,
    }
}

/// Locally held authentication state, the counterpart of the storefront's saved login.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: AuthState,
}

impl Session {
    pub fn restore(state: AuthState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    /// Returns `false` on a credential mismatch and leaves the session signed out.
    pub async fn login<R>(&mut self, repository: &R, email: &str, password: &str) -> Result<bool, AppError>
    where
        R: UserRepository + Sync,
    {
        match authenticate(repository, email, password).await {
            Ok(state) => {
                self.state = state;
                Ok(true)
            }
            Err(AppError::InvalidCredentials) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Creates the account and signs it in.
    pub async fn register<R>(&mut self, repository: &R, request: &RegisterRequest) -> Result<User, AppError>
    where
        R: UserRepository + Sync,
    {
        let user = repository.register_user(request).await?;
        self.state = signed_in(user.clone());
        Ok(user)
    }

    pub fn logout(&mut self) {
        self.state = AuthState::default();
    }

    pub fn current_user(&self) -> Result<&User, AppError> {
        match (&self.state.user, self.state.is_authenticated) {
            (Some(user), true) => Ok(user),
            _ => Err(AppError::Unauthorized),
        }
    }

    /// Role gate for console views; compares the held role directly.
    pub fn require_role(&self, role: UserRole) -> Result<&User, AppError> {
        let user = self.current_user()?;
        if user.role == role { Ok(user) } else { Err(AppError::Forbidden) }
    }
}
