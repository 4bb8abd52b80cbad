pub mod access;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod platform;
pub mod protocol;
pub mod query;
pub mod render;
pub mod store;
