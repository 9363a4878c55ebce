pub mod client;

pub use client::{TelegramConfig, TelegramNotifier, DEFAULT_TELEGRAM_API_URL};
