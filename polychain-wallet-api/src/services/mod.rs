//! HTTP handlers

pub mod ethereum;
pub mod health;
pub mod wallet;
