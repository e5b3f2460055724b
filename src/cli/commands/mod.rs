pub mod auth;
pub mod profile;
pub mod records;
pub mod theme;
