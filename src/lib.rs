//! # Adversarial inputs for floating point conversion
//!
//! This crate enumerates the floating point numbers whose conversion to and from short decimal
//! strings is maximally difficult: values whose rounding boundary (the binary midpoint between two
//! adjacent floats, or the boundary of a decimal half-ulp) lies extraordinarily close to a short
//! decimal number. Shortest-formatting and correctly-rounded parsing algorithms must resolve such
//! near-ties with full precision, which makes these numbers the standard torture inputs for
//! implementations in the style of Ryū, Grisu or Dragon4.
//!
//! The enumeration reduces the search to walking bounded-denominator rationals in a narrow
//! interval, in ascending order, using a continued fraction representation of the Stern-Brocot
//! tree. No floating point conversion algorithm lives in this crate; it only produces inputs.
pub mod data;
pub mod enumerate;
