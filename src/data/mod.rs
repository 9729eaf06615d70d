//! # Exact number representations
//!
//! This module provides the arithmetic the enumeration is built on: a division routine for 128-bit
//! unsigned values and a bounded-denominator rational number represented as a continued fraction.
pub mod rational;
pub mod uint128;
