//! Shared foundational types used across the Tessel block toolkit.
//!
//! This crate provides the two-state [`Bit`] carried by constant and memory
//! pins, and the [`ContentHash`] used to key cached block images.

#![warn(missing_docs)]

pub mod bit;
pub mod hash;

pub use bit::Bit;
pub use hash::ContentHash;
