//! Utility helpers.

pub mod retry;
