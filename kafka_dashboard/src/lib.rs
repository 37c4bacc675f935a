#![allow(clippy::too_many_arguments)]

pub mod admin;
pub mod backend;
pub mod collectors;
pub mod commands;
pub mod connection_settings;
pub mod consumer;
pub mod error;
pub mod models;
pub mod producer;
pub mod queries;
pub mod relay;
pub mod snapshot;
pub mod watcher;
