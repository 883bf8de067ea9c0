pub mod auth;
pub mod pages;
pub mod projects;
pub mod recovery;
pub mod uploads;
