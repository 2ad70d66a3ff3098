//! Text utilities for authored content.

mod format;
mod math;

pub use format::format_text;
pub use math::{segment_math_text, MathSegments, Span};
