// src/content/providers/mod.rs
pub mod http;
pub mod sample;
