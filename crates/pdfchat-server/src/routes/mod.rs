pub mod chat;
pub mod config;
pub mod document;
pub mod edit;
pub mod health;
