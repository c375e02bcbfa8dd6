pub mod chat;
pub mod classify;
pub mod config;
pub mod controller;
pub mod envelope;
pub mod gemini;
pub mod language;
pub mod links;
pub mod prompt;
pub mod render;
pub mod server;
pub mod types;
