//! User domain
//!
//! This module provides the user entity, validation rules, and the
//! repository trait the persistence layer implements.

mod entity;
mod repository;
mod validation;

pub use entity::{User, ROLE_DEFAULT};
pub use repository::UserRepository;
pub use validation::{
    validate_password, validate_username, validate_username_present, UserValidationError,
};

#[cfg(test)]
pub use repository::MockUserRepository;
