pub mod access_code;
pub mod auth;
pub mod dashboard;
pub mod projects;
pub mod quotes;
pub mod settings;
pub mod tenancy;
