//! Pure data structures implementing the [`Resource`](actor_pipeline::Resource) trait.

pub mod account;

pub use account::*;
