//! imfx compiles a tiny image-composition expression language into a flat
//! postfix program and interprets it over a set of raster images.
//!
//! An expression is a single image reference followed by chained transforms,
//! e.g. `0.ft(1280x720).pi(1.gb(150)).fl(640x640)`. Parsing emits operand and
//! tag words directly into a [`Program`]; evaluation reads the finished
//! program from its end, reconstructing sub-expression boundaries purely from
//! operator arity.

#![forbid(unsafe_code)]

pub mod dump;
pub mod error;
pub mod eval;
pub mod ops;
pub mod parse;
pub mod program;

pub use error::{ImfxError, ImfxResult};
pub use eval::evaluate;
pub use parse::parse;
pub use program::{Op, Program, Word};
