//! AI features powered by the OpenRouter API

pub mod client;
pub mod report;

pub use client::OpenRouterClient;
