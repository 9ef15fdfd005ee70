pub mod booking;
pub mod car;
pub mod json_repository;
pub mod user;
