use crate::database::car::CarRepository;
use crate::database::json_repository::JsonRepository;
use crate::db::StoreHandle;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::car::{Car, CarFacets, CarFilter, CarRequest, DeleteCarResponse};
use crate::service::storefront;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post};
use rocket_okapi::openapi;

#[allow(clippy::result_large_err)]
fn parse_car_id(id: &str) -> Result<u64, AppError> {
    id.parse().map_err(|_| AppError::BadRequest(format!("Invalid car id: {}", id)))
}

/// List every car in the fleet, including unavailable ones
#[openapi(tag = "Cars")]
#[get("/")]
pub async fn list_all_cars(store: &State<StoreHandle>) -> Result<Json<Vec<Car>>, AppError> {
    let repo = JsonRepository { store: store.inner().clone() };
    Ok(Json(repo.list_cars().await?))
}

/// Cars shown on the storefront. `brand` and `fuel` match case-insensitively; empty means any.
#[openapi(tag = "Cars")]
#[get("/available?<brand>&<fuel>")]
pub async fn list_available_cars(store: &State<StoreHandle>, brand: Option<String>, fuel: Option<String>) -> Result<Json<Vec<Car>>, AppError> {
    let repo = JsonRepository { store: store.inner().clone() };
    let filter = CarFilter { brand, fuel_type: fuel };
    Ok(Json(storefront::available_cars(repo.list_cars().await?, &filter)))
}

/// Distinct brands and fuel types across the fleet, for the storefront filters
#[openapi(tag = "Cars")]
#[get("/facets")]
pub async fn get_car_facets(store: &State<StoreHandle>) -> Result<Json<CarFacets>, AppError> {
    let repo = JsonRepository { store: store.inner().clone() };
    let cars = repo.list_cars().await?;
    Ok(Json(storefront::facets(&cars)))
}

#[openapi(tag = "Cars")]
#[get("/<id>")]
pub async fn get_car(store: &State<StoreHandle>, id: String) -> Result<Json<Car>, AppError> {
    let car_id = parse_car_id(&id)?;
    let repo = JsonRepository { store: store.inner().clone() };
    repo.get_car_by_id(car_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Car not found".to_string()))
}

/// Create or fully replace a car. Without an id (or with id 0) the next free id is assigned.
#[openapi(tag = "Cars")]
#[post("/", data = "<payload>")]
pub async fn upsert_car(store: &State<StoreHandle>, payload: JsonBody<CarRequest>) -> Result<Json<Car>, AppError> {
    let repo = JsonRepository { store: store.inner().clone() };
    Ok(Json(repo.upsert_car(&payload).await?))
}

/// Remove a car. Unknown ids succeed as well; bookings for the car are kept.
#[openapi(tag = "Cars")]
#[delete("/<id>")]
pub async fn delete_car(store: &State<StoreHandle>, id: String) -> Result<Json<DeleteCarResponse>, AppError> {
    let car_id = parse_car_id(&id)?;
    let repo = JsonRepository { store: store.inner().clone() };
    repo.delete_car(car_id).await?;
    Ok(Json(DeleteCarResponse { success: true }))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![list_all_cars, list_available_cars, get_car_facets, get_car, upsert_car, delete_car]
}
