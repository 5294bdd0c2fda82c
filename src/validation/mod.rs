//! Validation utilities
//!
//! Re-reads slice output with hound and midly

mod roundtrip;

pub use roundtrip::{validate_slices, SliceReport};
