use crate::database::json_repository::JsonRepository;
use crate::database::user::UserRepository;
use crate::db::StoreHandle;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::session::AuthState;
use crate::models::user::{LoginRequest, RegisterRequest, User};
use crate::service::session;
use rocket::serde::json::Json;
use rocket::{State, get, post};
use rocket_okapi::openapi;

#[openapi(tag = "Users")]
#[get("/")]
pub async fn list_all_users(store: &State<StoreHandle>) -> Result<Json<Vec<User>>, AppError> {
    let repo = JsonRepository { store: store.inner().clone() };
    Ok(Json(repo.list_users().await?))
}

/// Register a new account. Role defaults to `user`; emails are not checked for duplicates.
#[openapi(tag = "Users")]
#[post("/register", data = "<payload>")]
pub async fn register_user(store: &State<StoreHandle>, payload: JsonBody<RegisterRequest>) -> Result<Json<User>, AppError> {
    let repo = JsonRepository { store: store.inner().clone() };
    Ok(Json(repo.register_user(&payload).await?))
}

/// Exchange email and password for the client session state. Returns 403 on mismatch.
#[openapi(tag = "Users")]
#[post("/login", data = "<payload>")]
pub async fn login_user(store: &State<StoreHandle>, payload: JsonBody<LoginRequest>) -> Result<Json<AuthState>, AppError> {
    let repo = JsonRepository { store: store.inner().clone() };
    Ok(Json(session::authenticate(&repo, &payload.email, &payload.password).await?))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![list_all_users, register_user, login_user]
}
