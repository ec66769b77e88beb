//! Concrete providers.

pub mod twitter;

pub use twitter::Twitter;
