pub mod admin;
pub mod booking;
pub mod pricing;
pub mod session;
pub mod storefront;
