pub mod announcements;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod uploads;
