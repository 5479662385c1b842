//! Wardley Core Types and Definitions
//!
//! This crate provides the foundational types shared by the parser, the
//! model aggregator and the rewrite engine. It includes:
//!
//! - **Geometry**: Normalized positions, pixel points and the transforms
//!   between them ([`geometry`] module)
//! - **Evolution**: Stage boundaries and labels along the maturity axis
//!   ([`evolution`] module)
//! - **Semantic**: The parsed map model ([`semantic`] module)

pub mod evolution;
pub mod geometry;
pub mod semantic;
