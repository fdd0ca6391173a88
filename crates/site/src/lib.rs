//! Scenic Serenity Arts site assembly.
//!
//! This crate ties the components together:
//! - Page metadata table (`pages.json`)
//! - Site configuration
//! - Page runtime: assembly, input routing, timers and visibility

pub mod config;
pub mod page;
pub mod pages;

pub use config::SiteConfig;
pub use page::Page;
pub use pages::{PageData, PageTable};

/// Site version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
