pub mod api;
pub mod app;
pub mod auth;
pub mod chat;
pub mod cli;
pub mod config;
pub mod highlight;
pub mod models;
pub mod normalize;
pub mod paths;
pub mod persistence;
pub mod render;
pub mod store;
