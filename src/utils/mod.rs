//! Utility functions and helpers

pub mod atomic;
