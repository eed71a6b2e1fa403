//! Infrastructure layer: concrete implementations of the domain interfaces.

pub mod auth;
pub mod bot;
pub mod dto;
pub mod message_pusher;
