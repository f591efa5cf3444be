//! # Pipeline Sample Library
//!
//! This library exposes the core modules of the application for integration testing.

pub mod account;
pub mod clients;
pub mod lifecycle;
pub mod model;
pub mod primes;
