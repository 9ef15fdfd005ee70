use crate::database::json_repository::{JsonRepository, next_id};
use crate::db::Snapshot;
use crate::error::app_error::AppError;
use crate::models::booking::{Booking, BookingPatch, BookingRequest, BookingStatus, BookingView, DriverDetails};

#[async_trait::async_trait]
pub trait BookingRepository {
    /// Every booking with its car and user attached as they are right now.
    async fn list_bookings(&self) -> Result<Vec<BookingView>, AppError>;
    async fn list_bookings_for_user(&self, user_id: u64) -> Result<Vec<BookingView>, AppError>;
    async fn get_booking_by_id(&self, id: u64) -> Result<Option<Booking>, AppError>;
    /// Stores the booking as given; the price is not recomputed.
    async fn create_booking(&self, request: &BookingRequest) -> Result<Booking, AppError>;
    /// Merges `patch` onto the booking. `None` when no booking has this id.
    async fn update_booking(&self, id: u64, patch: &BookingPatch) -> Result<Option<Booking>, AppError>;
    async fn update_booking_status(&self, id: u64, status: BookingStatus, driver: Option<&DriverDetails>) -> Result<Option<Booking>, AppError>;
    /// Decides a patch from the stored booking and applies it in the same store cycle.
    /// An error from `decide` leaves the booking untouched; `None` when no booking has this id.
    async fn modify_booking<F>(&self, id: u64, decide: F) -> Result<Option<Booking>, AppError>
    where
        F: FnOnce(&Booking) -> Result<BookingPatch, AppError> + Send + 'static;
}

fn join(snapshot: &Snapshot, booking: &Booking) -> BookingView {
    BookingView {
        booking: booking.clone(),
        car: snapshot.cars.iter().find(|car| car.id == booking.car_id).cloned(),
        user: snapshot.users.iter().find(|user| user.id == booking.user_id).cloned(),
    }
}

#[async_trait::async_trait]
impl BookingRepository for JsonRepository {
    async fn list_bookings(&self) -> Result<Vec<BookingView>, AppError> {
        let snapshot = self.store.read().await?;
        Ok(snapshot.bookings.iter().map(|booking| join(&snapshot, booking)).collect())
    }

    async fn list_bookings_for_user(&self, user_id: u64) -> Result<Vec<BookingView>, AppError> {
        let snapshot = self.store.read().await?;
        Ok(snapshot
            .bookings
            .iter()
            .filter(|booking| booking.user_id == user_id)
            .map(|booking| join(&snapshot, booking))
            .collect())
    }

    async fn get_booking_by_id(&self, id: u64) -> Result<Option<Booking>, AppError> {
        let snapshot = self.store.read().await?;
        Ok(snapshot.bookings.into_iter().find(|booking| booking.id == id))
    }

    async fn create_booking(&self, request: &BookingRequest) -> Result<Booking, AppError> {
        let request = request.clone();
        self.store
            .try_update(move |snapshot| {
                let id = next_id(snapshot.bookings.iter().map(|booking| booking.id))?;
                let booking = request.into_booking(id);
                snapshot.bookings.push(booking.clone());
                Ok(booking)
            })
            .await
    }

    async fn update_booking(&self, id: u64, patch: &BookingPatch) -> Result<Option<Booking>, AppError> {
        let patch = patch.clone();
        self.store
            .mutate(move |snapshot| {
                let booking = snapshot.bookings.iter_mut().find(|booking| booking.id == id)?;
                patch.apply(booking);
                Some(booking.clone())
            })
            .await
    }

    async fn update_booking_status(&self, id: u64, status: BookingStatus, driver: Option<&DriverDetails>) -> Result<Option<Booking>, AppError> {
        self.update_booking(id, &BookingPatch::status(status, driver)).await
    }

    async fn modify_booking<F>(&self, id: u64, decide: F) -> Result<Option<Booking>, AppError>
    where
        F: FnOnce(&Booking) -> Result<BookingPatch, AppError> + Send + 'static,
    {
        self.store
            .try_mutate(move |snapshot| {
                let Some(booking) = snapshot.bookings.iter_mut().find(|booking| booking.id == id) else {
                    return Ok(None);
                };
                let patch = decide(booking)?;
                patch.apply(booking);
                Ok(Some(booking.clone()))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::car::CarRepository;
    use crate::db::{MemoryStore, StoreHandle};
    use crate::test_utils::{booking_request, car_request};

    fn repo() -> JsonRepository {
        JsonRepository {
            store: StoreHandle::new(MemoryStore::new()),
        }
    }

    #[tokio::test]
    async fn create_assigns_ids_and_keeps_caller_price() {
        let repo = repo();
        let mut request = booking_request(2, 1);
        request.total_price = 1;

        let first = repo.create_booking(&request).await.unwrap();
        let second = repo.create_booking(&booking_request(2, 3)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.total_price, 1);
        assert_eq!(first.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn listing_joins_current_car_and_user() {
        let repo = repo();
        repo.create_booking(&booking_request(2, 1)).await.unwrap();

        let mut renamed = car_request("Scorpio-N Carbon", "Mahindra", 5000);
        renamed.id = Some(1);
        repo.upsert_car(&renamed).await.unwrap();

        let views = repo.list_bookings().await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].car.as_ref().map(|car| car.name.as_str()), Some("Scorpio-N Carbon"));
        assert_eq!(views[0].user.as_ref().map(|user| user.email.as_str()), Some("user@driveeasy.com"));
    }

    #[tokio::test]
    async fn dangling_references_join_as_absent() {
        let repo = repo();
        repo.create_booking(&booking_request(77, 3)).await.unwrap();
        repo.delete_car(3).await.unwrap();

        let views = repo.list_bookings().await.unwrap();

        assert!(views[0].car.is_none());
        assert!(views[0].user.is_none());
        assert_eq!(views[0].booking.car_id, 3);
    }

    #[tokio::test]
    async fn bookings_for_user_filters_by_owner() {
        let repo = repo();
        repo.create_booking(&booking_request(1, 1)).await.unwrap();
        repo.create_booking(&booking_request(2, 2)).await.unwrap();
        repo.create_booking(&booking_request(2, 3)).await.unwrap();

        let mine = repo.list_bookings_for_user(2).await.unwrap();

        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|view| view.booking.user_id == 2));
    }

    #[tokio::test]
    async fn status_update_on_unknown_id_changes_nothing() {
        let repo = repo();
        repo.create_booking(&booking_request(2, 1)).await.unwrap();
        let before = repo.list_bookings().await.unwrap();

        let updated = repo.update_booking_status(9, BookingStatus::Approved, None).await.unwrap();

        assert!(updated.is_none());
        assert_eq!(repo.list_bookings().await.unwrap(), before);
    }

    #[tokio::test]
    async fn refused_modification_is_not_saved() {
        let repo = repo();
        repo.create_booking(&booking_request(2, 1)).await.unwrap();
        let before = repo.list_bookings().await.unwrap();

        let result = repo
            .modify_booking(1, |booking| {
                assert_eq!(booking.status, BookingStatus::Pending);
                Err(AppError::BadRequest("not now".to_string()))
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(repo.list_bookings().await.unwrap(), before);
        assert!(repo.modify_booking(9, |_| Ok(BookingPatch::default())).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn status_update_only_touches_the_target() {
        let repo = repo();
        repo.create_booking(&booking_request(2, 1)).await.unwrap();
        repo.create_booking(&booking_request(2, 2)).await.unwrap();
        let untouched = repo.get_booking_by_id(2).await.unwrap();

        let driver = DriverDetails {
            name: "Sunil".to_string(),
            phone: "9822222222".to_string(),
            id_proof: Some("data:image/png;base64,AAAA".to_string()),
        };
        let updated = repo
            .update_booking_status(1, BookingStatus::Approved, Some(&driver))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.status, BookingStatus::Approved);
        assert_eq!(updated.driver_name.as_deref(), Some("Sunil"));
        assert_eq!(updated.driver_id_proof.as_deref(), Some("data:image/png;base64,AAAA"));
        assert_eq!(updated.total_price, booking_request(2, 1).total_price);
        assert_eq!(repo.get_booking_by_id(2).await.unwrap(), untouched);
    }
}
