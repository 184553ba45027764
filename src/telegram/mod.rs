pub mod client;
pub mod diagnostics;
pub mod models;
mod throttle;

pub use client::TelegramClient;
pub use models::{Message, ReplyTarget, Update};
