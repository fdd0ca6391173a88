//! Common types shared across the site crates.

pub mod error;

pub use error::{SiteError, SiteResult};
