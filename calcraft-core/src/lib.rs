//! CalCraft Core Library
//!
//! This library provides the calendar engine behind CalCraft: ICS parsing,
//! month grid layout, event overlay and sequential page export.

pub mod compose;
pub mod error;
pub mod export;
pub mod grid;
pub mod ics;
pub mod sources;
pub mod types;

// Re-export core types and error handling
pub use error::{Error, Result};
pub use types::*;

/// Commonly used items
pub mod prelude {
    pub use crate::{compose::*, export::*, grid::*, ics::*, sources::*, types::*};
}
