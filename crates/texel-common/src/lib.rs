//! Common utilities for Texel.
//!
//! This crate provides foundational types and utilities used across all Texel crates:
//!
//! - [`BinaryReader`] - Zero-copy little-endian reading from byte slices
//! - [`ReadExt`] - Fixed-size structure reads from `std::io::Read` streams
//! - [`bits`] - Masked bit-field extraction for packed pixel layouts

mod error;
mod reader;

pub mod bits;

pub use error::{Error, Result};
pub use reader::{BinaryReader, ReadExt, MAX_PREALLOC};
