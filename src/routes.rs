pub mod booking;
pub mod car;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod user;
