//! HTTP request handlers

pub mod chat;
pub mod health;
pub mod weather;

pub use chat::{chat_planting, chat_water};
pub use health::health_check;
pub use weather::get_weather;
