//! Core types for Nexx notifications

mod entity;
mod notification;

pub use entity::*;
pub use notification::*;
