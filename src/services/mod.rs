//! Business logic services

pub mod chat;
pub mod crops;
pub mod location;
pub mod weather;
