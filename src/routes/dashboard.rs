use crate::database::json_repository::JsonRepository;
use crate::db::StoreHandle;
use crate::error::app_error::AppError;
use crate::models::dashboard::DashboardStats;
use crate::service::admin::AdminService;
use rocket::serde::json::Json;
use rocket::{State, get};
use rocket_okapi::openapi;

/// Pending requests, available fleet size and revenue from completed bookings.
#[openapi(tag = "Dashboard")]
#[get("/stats")]
pub async fn get_dashboard_stats(store: &State<StoreHandle>) -> Result<Json<DashboardStats>, AppError> {
    let repo = JsonRepository { store: store.inner().clone() };
    Ok(Json(AdminService::new(&repo).stats().await?))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![get_dashboard_stats]
}
