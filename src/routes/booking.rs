use crate::Config;
use crate::database::booking::BookingRepository;
use crate::database::json_repository::JsonRepository;
use crate::database::user::UserRepository;
use crate::db::StoreHandle;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::booking::{ApproveBookingRequest, Booking, BookingIntentRequest, BookingPatch, BookingRequest, BookingView, QuoteRequest, QuoteResponse};
use crate::service::admin::AdminService;
use crate::service::booking::BookingService;
use rocket::serde::json::Json;
use rocket::{State, get, patch, post};
use rocket_okapi::openapi;

#[allow(clippy::result_large_err)]
fn parse_booking_id(id: &str) -> Result<u64, AppError> {
    id.parse().map_err(|_| AppError::BadRequest(format!("Invalid booking id: {}", id)))
}

#[allow(clippy::result_large_err)]
fn parse_user_id(id: &str) -> Result<u64, AppError> {
    id.parse().map_err(|_| AppError::BadRequest(format!("Invalid user id: {}", id)))
}

/// List bookings with their car and user attached. `user_id` narrows the list to one customer.
#[openapi(tag = "Bookings")]
#[get("/?<user_id>")]
pub async fn list_all_bookings(store: &State<StoreHandle>, user_id: Option<String>) -> Result<Json<Vec<BookingView>>, AppError> {
    let user_id = user_id.as_deref().map(parse_user_id).transpose()?;
    let repo = JsonRepository { store: store.inner().clone() };
    let bookings = match user_id {
        Some(user_id) => repo.list_bookings_for_user(user_id).await?,
        None => repo.list_bookings().await?,
    };
    Ok(Json(bookings))
}

/// Store a booking as given. The price is taken from the payload, not recomputed.
#[openapi(tag = "Bookings")]
#[post("/", data = "<payload>")]
pub async fn create_booking(store: &State<StoreHandle>, payload: JsonBody<BookingRequest>) -> Result<Json<Booking>, AppError> {
    let repo = JsonRepository { store: store.inner().clone() };
    Ok(Json(repo.create_booking(&payload).await?))
}

/// Merge the given fields onto a booking. No status rules are applied here.
#[openapi(tag = "Bookings")]
#[patch("/<id>", data = "<payload>")]
pub async fn patch_booking(store: &State<StoreHandle>, id: String, payload: JsonBody<BookingPatch>) -> Result<Json<Booking>, AppError> {
    let booking_id = parse_booking_id(&id)?;
    let repo = JsonRepository { store: store.inner().clone() };
    repo.update_booking(booking_id, &payload)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

#[openapi(tag = "Bookings")]
#[post("/quote", data = "<payload>")]
pub async fn quote_booking(store: &State<StoreHandle>, config: &State<Config>, payload: JsonBody<QuoteRequest>) -> Result<Json<QuoteResponse>, AppError> {
    let repo = JsonRepository { store: store.inner().clone() };
    let service = BookingService::new(&repo, &config.pricing);
    Ok(Json(service.quote(&payload).await?))
}

/// Storefront checkout: prices the rental server-side and files it as `Pending`.
#[openapi(tag = "Bookings")]
#[post("/request", data = "<payload>")]
pub async fn request_booking(store: &State<StoreHandle>, config: &State<Config>, payload: JsonBody<BookingIntentRequest>) -> Result<Json<Booking>, AppError> {
    let repo = JsonRepository { store: store.inner().clone() };
    let user = repo
        .get_user_by_id(payload.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let service = BookingService::new(&repo, &config.pricing);
    Ok(Json(service.request_booking(&user, &payload).await?))
}

/// Approve a pending booking. Driver details are required when the customer asked for a driver.
/// The body is required; send `{}` when there is no driver to assign.
#[openapi(tag = "Bookings")]
#[post("/<id>/approve", data = "<payload>")]
pub async fn approve_booking(store: &State<StoreHandle>, id: String, payload: JsonBody<ApproveBookingRequest>) -> Result<Json<Booking>, AppError> {
    let booking_id = parse_booking_id(&id)?;
    let repo = JsonRepository { store: store.inner().clone() };
    let driver = payload.into_inner().driver;
    Ok(Json(AdminService::new(&repo).approve(booking_id, driver.as_ref()).await?))
}

#[openapi(tag = "Bookings")]
#[post("/<id>/reject")]
pub async fn reject_booking(store: &State<StoreHandle>, id: String) -> Result<Json<Booking>, AppError> {
    let booking_id = parse_booking_id(&id)?;
    let repo = JsonRepository { store: store.inner().clone() };
    Ok(Json(AdminService::new(&repo).reject(booking_id).await?))
}

#[openapi(tag = "Bookings")]
#[post("/<id>/complete")]
pub async fn complete_booking(store: &State<StoreHandle>, id: String) -> Result<Json<Booking>, AppError> {
    let booking_id = parse_booking_id(&id)?;
    let repo = JsonRepository { store: store.inner().clone() };
    Ok(Json(AdminService::new(&repo).complete(booking_id).await?))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![
        list_all_bookings,
        create_booking,
        patch_booking,
        quote_booking,
        request_booking,
        approve_booking,
        reject_booking,
        complete_booking
    ]
}
