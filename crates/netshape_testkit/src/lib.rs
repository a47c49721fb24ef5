//! # netshape testkit
//!
//! Test utilities for netshape.
//!
//! This crate provides:
//! - Feature builders and a small sample canal network
//! - Temporary directories with GeoJSON and `.prj` helpers
//! - Seeded in-memory remotes
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use netshape_testkit::prelude::*;
//!
//! #[test]
//! fn imports_sample() {
//!     let dir = TestDir::new();
//!     let links = dir.write_layer("canals", Some(2056), &sample_links());
//!     // ... run an import
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
