pub mod admin;
pub mod ask;
pub mod home_route;
