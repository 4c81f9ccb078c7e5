// src/handlers/mod.rs

pub mod play;
pub mod quiz;
