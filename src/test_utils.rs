use crate::Config;
use crate::models::booking::{BookingRequest, BookingStatus};
use crate::models::car::CarRequest;
use chrono::NaiveDate;
use rocket::local::asynchronous::Client;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A unique store path in a fresh directory under the system temp dir. The document itself
/// is not created; the directory is removed on drop.
pub struct TempStorePath {
    path: PathBuf,
}

impl TempStorePath {
    pub fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("drive-easy-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("temp store dir");
        Self { path: dir.join("db.json") }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempStorePath {
    fn drop(&mut self) {
        if let Some(dir) = self.path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

pub fn test_config(store: &TempStorePath) -> Config {
    let mut config = Config::default();
    config.store.path = store.path().to_string_lossy().into_owned();
    config
}

/// Rocket client backed by a freshly seeded file store.
pub async fn test_client(store: &TempStorePath) -> Client {
    Client::tracked(crate::build_rocket(test_config(store))).await.expect("valid rocket instance")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn car_request(name: &str, brand: &str, price_per_day: i64) -> CarRequest {
    CarRequest {
        id: None,
        name: name.to_string(),
        brand: brand.to_string(),
        price_per_day,
        fuel_type: "Petrol".to_string(),
        image: "data:image/png;base64,iVBORw0KGgo=".to_string(),
        availability: true,
        rc_doc: Some("data:application/pdf;base64,JVBERi0=".to_string()),
        insurance_doc: None,
    }
}

/// Three-day pending booking (2024-06-01 to 2024-06-04) without a driver.
pub fn booking_request(user_id: u64, car_id: u64) -> BookingRequest {
    BookingRequest {
        user_id,
        car_id,
        pickup_date: date(2024, 6, 1),
        return_date: date(2024, 6, 4),
        total_price: 13500,
        status: BookingStatus::Pending,
        has_driver: false,
        driver_name: None,
        driver_phone: None,
        driver_id_proof: None,
    }
}
