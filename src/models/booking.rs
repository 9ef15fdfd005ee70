use crate::models::car::Car;
use crate::models::user::User;
use chrono::NaiveDate;
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
pub enum BookingStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl BookingStatus {
    /// Transitions an administrator may perform from the console.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Approved) | (BookingStatus::Pending, BookingStatus::Rejected) | (BookingStatus::Approved, BookingStatus::Completed)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Approved => "Approved",
            BookingStatus::Rejected => "Rejected",
            BookingStatus::Completed => "Completed",
        };
        f.write_str(label)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct Booking {
    pub id: u64,
    pub user_id: u64,
    pub car_id: u64,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    /// Computed when the booking was requested and never recomputed.
    #[serde(default)]
    pub total_price: i64,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub has_driver: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_id_proof: Option<String>,
}

/// A booking with its car and user attached at read time. Never persisted.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car: Option<Car>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

#[derive(Deserialize, Debug, Clone, JsonSchema)]
pub struct BookingRequest {
    pub user_id: u64,
    pub car_id: u64,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    #[serde(default)]
    pub total_price: i64,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub has_driver: bool,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub driver_phone: Option<String>,
    #[serde(default)]
    pub driver_id_proof: Option<String>,
}

impl BookingRequest {
    pub fn into_booking(self, id: u64) -> Booking {
        Booking {
            id,
            user_id: self.user_id,
            car_id: self.car_id,
            pickup_date: self.pickup_date,
            return_date: self.return_date,
            total_price: self.total_price,
            status: self.status,
            has_driver: self.has_driver,
            driver_name: self.driver_name,
            driver_phone: self.driver_phone,
            driver_id_proof: self.driver_id_proof,
        }
    }
}

/// Partial update merged onto an existing booking. Absent fields keep their stored value.
#[derive(Deserialize, Debug, Clone, Default, JsonSchema)]
#[serde(default)]
pub struct BookingPatch {
    pub user_id: Option<u64>,
    pub car_id: Option<u64>,
    pub pickup_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub total_price: Option<i64>,
    pub status: Option<BookingStatus>,
    pub has_driver: Option<bool>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub driver_id_proof: Option<String>,
}

impl BookingPatch {
    pub fn status(status: BookingStatus, driver: Option<&DriverDetails>) -> Self {
        let mut patch = BookingPatch {
            status: Some(status),
            ..BookingPatch::default()
        };
        if let Some(driver) = driver {
            patch.driver_name = Some(driver.name.clone());
            patch.driver_phone = Some(driver.phone.clone());
            patch.driver_id_proof = driver.id_proof.clone();
        }
        patch
    }

    pub fn apply(&self, booking: &mut Booking) {
        if let Some(user_id) = self.user_id {
            booking.user_id = user_id;
        }
        if let Some(car_id) = self.car_id {
            booking.car_id = car_id;
        }
        if let Some(pickup_date) = self.pickup_date {
            booking.pickup_date = pickup_date;
        }
        if let Some(return_date) = self.return_date {
            booking.return_date = return_date;
        }
        if let Some(total_price) = self.total_price {
            booking.total_price = total_price;
        }
        if let Some(status) = self.status {
            booking.status = status;
        }
        if let Some(has_driver) = self.has_driver {
            booking.has_driver = has_driver;
        }
        if self.driver_name.is_some() {
            booking.driver_name.clone_from(&self.driver_name);
        }
        if self.driver_phone.is_some() {
            booking.driver_phone.clone_from(&self.driver_phone);
        }
        if self.driver_id_proof.is_some() {
            booking.driver_id_proof.clone_from(&self.driver_id_proof);
        }
    }
}

/// Driver assigned by an administrator when approving a booking that requested one.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct DriverDetails {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub id_proof: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, JsonSchema)]
#[serde(default)]
pub struct ApproveBookingRequest {
    pub driver: Option<DriverDetails>,
}

#[derive(Deserialize, Debug, Clone, JsonSchema)]
pub struct QuoteRequest {
    pub car_id: u64,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    #[serde(default)]
    pub has_driver: bool,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
pub struct QuoteResponse {
    pub days: i64,
    pub daily_rate: i64,
    pub total_price: i64,
}

/// What the storefront's booking form submits; the price is computed server-side.
#[derive(Deserialize, Debug, Clone, JsonSchema)]
pub struct BookingIntentRequest {
    pub user_id: u64,
    pub car_id: u64,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    #[serde(default)]
    pub has_driver: bool,
    #[serde(default)]
    pub driver_id_proof: Option<String>,
}
