//! Database models and request/response DTOs.

pub mod user;

pub use user::*;
