pub mod booking;
pub mod car;
pub mod dashboard;
pub mod health;
pub mod session;
pub mod user;
