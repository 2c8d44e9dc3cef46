//! Gentleman State CLI Library

pub mod commands;
