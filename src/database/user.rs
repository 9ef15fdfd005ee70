use crate::database::json_repository::{JsonRepository, next_id};
use crate::error::app_error::AppError;
use crate::models::user::{RegisterRequest, User};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn get_user_by_id(&self, id: u64) -> Result<Option<User>, AppError>;
    /// Appends a new account. Duplicate emails are accepted.
    async fn register_user(&self, request: &RegisterRequest) -> Result<User, AppError>;
    /// First user whose email and password both match exactly.
    async fn find_user_by_credentials(&self, email: &str, password: &str) -> Result<Option<User>, AppError>;
}

#[async_trait::async_trait]
impl UserRepository for JsonRepository {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.store.read().await?.users)
    }

    async fn get_user_by_id(&self, id: u64) -> Result<Option<User>, AppError> {
        let snapshot = self.store.read().await?;
        Ok(snapshot.users.into_iter().find(|user| user.id == id))
    }

    async fn register_user(&self, request: &RegisterRequest) -> Result<User, AppError> {
        let request = request.clone();
        self.store
            .try_update(move |snapshot| {
                let id = next_id(snapshot.users.iter().map(|user| user.id))?;
                let user = request.into_user(id);
                snapshot.users.push(user.clone());
                Ok(user)
            })
            .await
    }

    async fn find_user_by_credentials(&self, email: &str, password: &str) -> Result<Option<User>, AppError> {
        let snapshot = self.store.read().await?;
        Ok(snapshot
            .users
            .into_iter()
            .find(|user| user.email == email && user.password.as_deref() == Some(password)))
    }
}
