mod auth;
mod movie;
mod review;
