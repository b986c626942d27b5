//! User infrastructure module
//!
//! Password encoding with Argon2, the in-memory, JSON file, and PostgreSQL
//! user stores, and the user manager that ties them together.

mod factory;
mod file_repository;
mod password;
mod postgres_repository;
mod repository;
mod service;

pub use factory::{create_user_repository, UserStoreType};
pub use file_repository::JsonFileUserRepository;
pub use password::{Argon2Encoder, PasswordEncoder};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{CreateUserRequest, UserManager};
