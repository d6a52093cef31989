// src/lib.rs
pub mod config;
pub mod server;
pub mod startup;
