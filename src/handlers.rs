pub mod access_codes;
pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod projects;
pub mod public;
pub mod quotes;
pub mod settings;
pub mod tenancy;
