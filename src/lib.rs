pub mod app;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod display;
pub mod input;
pub mod service;

pub use chat::{
    ChatCoordinator, ChatSnapshot, CompletionOutcome, Message, MessageStore, SubmitOutcome,
};
pub use config::Config;
pub use crate::core::error::HeartTalkError;
pub use service::{CompletionService, ServiceStatus};
