use crate::config::PricingConfig;
use crate::database::booking::BookingRepository;
use crate::database::car::CarRepository;
use crate::database::json_repository::JsonRepository;
use crate::error::app_error::AppError;
use crate::models::booking::{Booking, BookingIntentRequest, BookingRequest, BookingStatus, QuoteRequest, QuoteResponse};
use crate::models::car::Car;
use crate::models::user::User;
use crate::service::pricing;
use tracing::info;

pub struct BookingService<'a> {
    repository: &'a JsonRepository,
    pricing: &'a PricingConfig,
}

impl<'a> BookingService<'a> {
    pub fn new(repository: &'a JsonRepository, pricing: &'a PricingConfig) -> Self {
        BookingService { repository, pricing }
    }

    async fn car(&self, car_id: u64) -> Result<Car, AppError> {
        self.repository
            .get_car_by_id(car_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))
    }

    pub async fn quote(&self, request: &QuoteRequest) -> Result<QuoteResponse, AppError> {
        let car = self.car(request.car_id).await?;
        pricing::quote(
            car.price_per_day,
            request.pickup_date,
            request.return_date,
            request.has_driver,
            self.pricing.driver_daily_fee,
        )
    }

    /// Prices the rental for `user` and stores it as a pending booking.
    pub async fn request_booking(&self, user: &User, intent: &BookingIntentRequest) -> Result<Booking, AppError> {
        let car = self.car(intent.car_id).await?;
        let quote = pricing::quote(
            car.price_per_day,
            intent.pickup_date,
            intent.return_date,
            intent.has_driver,
            self.pricing.driver_daily_fee,
        )?;
        if quote.total_price <= 0 {
            return Err(AppError::BadRequest("Please select valid dates".to_string()));
        }

        let booking = self
            .repository
            .create_booking(&BookingRequest {
                user_id: user.id,
                car_id: car.id,
                pickup_date: intent.pickup_date,
                return_date: intent.return_date,
                total_price: quote.total_price,
                status: BookingStatus::Pending,
                has_driver: intent.has_driver,
                driver_name: None,
                driver_phone: None,
                driver_id_proof: intent.driver_id_proof.clone(),
            })
            .await?;

        info!(
            booking_id = booking.id,
            user_id = user.id,
            car_id = car.id,
            total_price = booking.total_price,
            "booking requested"
        );
        Ok(booking)
    }
}
