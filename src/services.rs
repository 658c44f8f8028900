pub mod access_code_service;
pub mod auth;
pub mod dashboard_service;
pub mod document_service;
pub mod job_tracker;
pub mod pricing;
pub mod quote_service;
pub mod room_calculator;
pub mod surface_calculator;
pub mod tenancy_service;
