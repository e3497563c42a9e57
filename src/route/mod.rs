pub mod auth;
pub mod model;
pub mod post;
pub mod profile;
