use crate::database::booking::BookingRepository;
use crate::database::car::CarRepository;
use crate::database::json_repository::JsonRepository;
use crate::error::app_error::AppError;
use crate::models::booking::{Booking, BookingPatch, BookingStatus, DriverDetails};
use crate::models::dashboard::DashboardStats;
use tracing::info;

/// Booking moderation and headline figures for the admin console.
pub struct AdminService<'a> {
    repository: &'a JsonRepository,
}

impl<'a> AdminService<'a> {
    pub fn new(repository: &'a JsonRepository) -> Self {
        AdminService { repository }
    }

    /// Checks the move from the stored status and writes it in one store cycle, so two
    /// concurrent decisions on the same booking cannot both succeed.
    async fn transition(&self, id: u64, next: BookingStatus, driver: Option<DriverDetails>) -> Result<Booking, AppError> {
        let updated = self
            .repository
            .modify_booking(id, move |booking| {
                if !booking.status.can_transition_to(next) {
                    return Err(AppError::InvalidStatusTransition {
                        from: booking.status,
                        to: next,
                    });
                }

                let driver = if next == BookingStatus::Approved && booking.has_driver {
                    match driver {
                        Some(details) if !details.name.trim().is_empty() && !details.phone.trim().is_empty() => Some(details),
                        _ => return Err(AppError::BadRequest("Driver name and phone are required for this booking".to_string())),
                    }
                } else {
                    None
                };

                Ok(BookingPatch::status(next, driver.as_ref()))
            })
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        info!(booking_id = id, status = %next, "booking status changed");
        Ok(updated)
    }

    /// Approves a pending booking. A booking that asked for a driver needs one assigned;
    /// driver details sent for any other booking are dropped.
    pub async fn approve(&self, id: u64, driver: Option<&DriverDetails>) -> Result<Booking, AppError> {
        self.transition(id, BookingStatus::Approved, driver.cloned()).await
    }

    pub async fn reject(&self, id: u64) -> Result<Booking, AppError> {
        self.transition(id, BookingStatus::Rejected, None).await
    }

    pub async fn complete(&self, id: u64) -> Result<Booking, AppError> {
        self.transition(id, BookingStatus::Completed, None).await
    }

    pub async fn stats(&self) -> Result<DashboardStats, AppError> {
        let bookings = self.repository.list_bookings().await?;
        let cars = self.repository.list_cars().await?;

        let total_revenue = bookings
            .iter()
            .filter(|view| view.booking.status == BookingStatus::Completed)
            .try_fold(0i64, |total, view| total.checked_add(view.booking.total_price))
            .ok_or_else(|| AppError::BadRequest("Completed revenue exceeds the supported range".to_string()))?;

        Ok(DashboardStats {
            pending_requests: bookings.iter().filter(|view| view.booking.status == BookingStatus::Pending).count(),
            active_fleet: cars.iter().filter(|car| car.availability).count(),
            total_revenue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FileStore, MemoryStore, StoreHandle};
    use crate::test_utils::{TempStorePath, booking_request, car_request};

    fn repo() -> JsonRepository {
        JsonRepository {
            store: StoreHandle::new(MemoryStore::new()),
        }
    }

    fn driver() -> DriverDetails {
        DriverDetails {
            name: "Arjun".to_string(),
            phone: "9844444444".to_string(),
            id_proof: Some("data:image/png;base64,AAAA".to_string()),
        }
    }

    #[tokio::test]
    async fn driver_booking_needs_driver_details() {
        let repo = repo();
        let mut request = booking_request(2, 1);
        request.has_driver = true;
        let booking = repo.create_booking(&request).await.unwrap();
        let admin = AdminService::new(&repo);

        assert!(matches!(admin.approve(booking.id, None).await, Err(AppError::BadRequest(_))));

        let approved = admin.approve(booking.id, Some(&driver())).await.unwrap();
        assert_eq!(approved.status, BookingStatus::Approved);
        assert_eq!(approved.driver_name.as_deref(), Some("Arjun"));
        assert_eq!(approved.driver_phone.as_deref(), Some("9844444444"));
    }

    #[tokio::test]
    async fn self_drive_approval_ignores_driver_details() {
        let repo = repo();
        let booking = repo.create_booking(&booking_request(2, 1)).await.unwrap();

        let approved = AdminService::new(&repo).approve(booking.id, Some(&driver())).await.unwrap();

        assert_eq!(approved.status, BookingStatus::Approved);
        assert_eq!(approved.driver_name, None);
    }

    #[tokio::test]
    async fn lifecycle_follows_console_transitions() {
        let repo = repo();
        let booking = repo.create_booking(&booking_request(2, 1)).await.unwrap();
        let admin = AdminService::new(&repo);

        assert!(matches!(
            admin.complete(booking.id).await,
            Err(AppError::InvalidStatusTransition {
                from: BookingStatus::Pending,
                to: BookingStatus::Completed
            })
        ));

        admin.approve(booking.id, None).await.unwrap();
        assert!(matches!(admin.reject(booking.id).await, Err(AppError::InvalidStatusTransition { .. })));

        let completed = admin.complete(booking.id).await.unwrap();
        assert_eq!(completed.status, BookingStatus::Completed);
    }

    #[tokio::test]
    async fn rejected_bookings_stay_rejected() {
        let repo = repo();
        let booking = repo.create_booking(&booking_request(2, 1)).await.unwrap();
        let admin = AdminService::new(&repo);

        admin.reject(booking.id).await.unwrap();

        assert!(matches!(admin.approve(booking.id, None).await, Err(AppError::InvalidStatusTransition { .. })));
    }

    #[tokio::test]
    async fn unknown_booking_is_not_found() {
        let repo = repo();
        let admin = AdminService::new(&repo);

        assert!(matches!(admin.reject(5).await, Err(AppError::NotFound(_))));
        assert!(matches!(admin.approve(5, None).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn stats_count_pending_fleet_and_completed_revenue() {
        let repo = repo();
        let mut hidden = car_request("Old Bolero", "Mahindra", 2000);
        hidden.availability = false;
        repo.upsert_car(&hidden).await.unwrap();

        let admin = AdminService::new(&repo);
        let completed = repo.create_booking(&booking_request(2, 1)).await.unwrap();
        admin.approve(completed.id, None).await.unwrap();
        admin.complete(completed.id).await.unwrap();
        let approved = repo.create_booking(&booking_request(2, 2)).await.unwrap();
        admin.approve(approved.id, None).await.unwrap();
        repo.create_booking(&booking_request(2, 3)).await.unwrap();

        let stats = admin.stats().await.unwrap();

        assert_eq!(stats.pending_requests, 1);
        assert_eq!(stats.active_fleet, 3);
        assert_eq!(stats.total_revenue, 13500);
    }

    #[tokio::test]
    async fn concurrent_decisions_on_one_booking_let_exactly_one_through() {
        let path = TempStorePath::new();
        let repo = JsonRepository {
            store: StoreHandle::new(FileStore::new(path.path(), false)),
        };
        let admin = AdminService::new(&repo);

        for _ in 0..25 {
            let booking = repo.create_booking(&booking_request(2, 1)).await.unwrap();

            let (approved, rejected) = tokio::join!(admin.approve(booking.id, None), admin.reject(booking.id));

            let stored = repo.get_booking_by_id(booking.id).await.unwrap().unwrap();
            match (approved, rejected) {
                (Ok(_), Err(AppError::InvalidStatusTransition { .. })) => assert_eq!(stored.status, BookingStatus::Approved),
                (Err(AppError::InvalidStatusTransition { .. }), Ok(_)) => assert_eq!(stored.status, BookingStatus::Rejected),
                (approved, rejected) => panic!("expected exactly one decision to win, got {:?} and {:?}", approved, rejected),
            }
        }
    }

    #[tokio::test]
    async fn revenue_overflow_is_reported_not_wrapped() {
        let repo = repo();
        let admin = AdminService::new(&repo);
        for _ in 0..2 {
            let mut request = booking_request(2, 1);
            request.total_price = i64::MAX;
            request.status = BookingStatus::Completed;
            repo.create_booking(&request).await.unwrap();
        }

        assert!(matches!(admin.stats().await, Err(AppError::BadRequest(_))));
    }
}
