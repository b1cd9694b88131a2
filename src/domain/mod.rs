//! Domain layer for C Guardian
//!
//! Pure business objects for style checking: violations, reports, and the
//! crate-wide error type. Independent of file systems and terminal output.

pub mod violations;

// Re-export main domain types for convenience
pub use violations::*;
