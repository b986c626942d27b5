//! Infrastructure layer - Storage, password encoding, and logging

pub mod logging;
pub mod user;
