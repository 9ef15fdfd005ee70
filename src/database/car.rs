use crate::database::json_repository::{JsonRepository, next_id};
use crate::error::app_error::AppError;
use crate::models::car::{Car, CarRequest};
use tracing::debug;

#[async_trait::async_trait]
pub trait CarRepository {
    async fn list_cars(&self) -> Result<Vec<Car>, AppError>;
    async fn get_car_by_id(&self, id: u64) -> Result<Option<Car>, AppError>;
    /// Full-record insert-or-update keyed by the request id.
    async fn upsert_car(&self, request: &CarRequest) -> Result<Car, AppError>;
    /// Returns whether a car was removed. Bookings that reference it are left dangling.
    async fn delete_car(&self, id: u64) -> Result<bool, AppError>;
}

#[async_trait::async_trait]
impl CarRepository for JsonRepository {
    async fn list_cars(&self) -> Result<Vec<Car>, AppError> {
        Ok(self.store.read().await?.cars)
    }

    async fn get_car_by_id(&self, id: u64) -> Result<Option<Car>, AppError> {
        let snapshot = self.store.read().await?;
        Ok(snapshot.cars.into_iter().find(|car| car.id == id))
    }

    async fn upsert_car(&self, request: &CarRequest) -> Result<Car, AppError> {
        let request = request.clone();
        self.store
            .try_update(move |snapshot| {
                let id = match request.requested_id() {
                    Some(id) => id,
                    None => next_id(snapshot.cars.iter().map(|car| car.id))?,
                };
                let car = request.into_car(id);
                match snapshot.cars.iter_mut().find(|existing| existing.id == id) {
                    Some(existing) => *existing = car.clone(),
                    None => snapshot.cars.push(car.clone()),
                }
                Ok(car)
            })
            .await
    }

    async fn delete_car(&self, id: u64) -> Result<bool, AppError> {
        let removed = self
            .store
            .mutate(move |snapshot| {
                let before = snapshot.cars.len();
                snapshot.cars.retain(|car| car.id != id);
                (snapshot.cars.len() != before).then_some(())
            })
            .await?;

        if removed.is_none() {
            debug!(car_id = id, "delete requested for unknown car");
        }
        Ok(removed.is_some())
    }
}
