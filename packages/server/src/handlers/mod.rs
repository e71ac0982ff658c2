pub mod admin;
pub mod auth;
pub mod movie;
pub mod review;
