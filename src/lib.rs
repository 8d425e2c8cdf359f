pub mod augment;
pub mod catalog;
pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod ratings;
pub mod render;
