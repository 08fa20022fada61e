pub mod booking_repository;
pub mod profile_repository;
pub mod vehicle_repository;
