// Application layer - session ownership and the live connection
pub mod device_repository;
pub mod live_service;
pub mod session_service;
