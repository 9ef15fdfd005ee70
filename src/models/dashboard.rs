use rocket::serde::Serialize;
use schemars::JsonSchema;

/// Headline figures for the admin console.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
pub struct DashboardStats {
    pub pending_requests: usize,
    /// Cars currently listed as available.
    pub active_fleet: usize,
    /// Sum of `total_price` over completed bookings.
    pub total_revenue: i64,
}
