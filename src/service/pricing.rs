use crate::error::app_error::AppError;
use crate::models::booking::QuoteResponse;
use chrono::NaiveDate;

/// Whole rental days between pickup and return. Dates carry no time of day, so the
/// ceiling of the day difference is the difference itself. Zero or negative when
/// the return is not after the pickup.
pub fn rental_days(pickup: NaiveDate, return_date: NaiveDate) -> i64 {
    (return_date - pickup).num_days()
}

fn out_of_range() -> AppError {
    AppError::BadRequest("Price exceeds the supported range".to_string())
}

#[allow(clippy::result_large_err)]
pub fn daily_rate(price_per_day: i64, with_driver: bool, driver_daily_fee: i64) -> Result<i64, AppError> {
    if with_driver {
        price_per_day.checked_add(driver_daily_fee).ok_or_else(out_of_range)
    } else {
        Ok(price_per_day)
    }
}

/// Price for a rental. A non-positive length yields a zero total, which blocks booking.
#[allow(clippy::result_large_err)]
pub fn quote(price_per_day: i64, pickup: NaiveDate, return_date: NaiveDate, with_driver: bool, driver_daily_fee: i64) -> Result<QuoteResponse, AppError> {
    let days = rental_days(pickup, return_date);
    let daily_rate = daily_rate(price_per_day, with_driver, driver_daily_fee)?;
    let total_price = if days > 0 { days.checked_mul(daily_rate).ok_or_else(out_of_range)? } else { 0 };

    Ok(QuoteResponse {
        days: days.max(0),
        daily_rate,
        total_price,
    })
}
