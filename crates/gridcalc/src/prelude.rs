//! Prelude module - common imports for gridcalc users
//!
//! ```rust
//! use gridcalc::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellError,
    CellMut,
    CellRef,
    CellValue,
    Position,
    Size,

    // Error types
    Error,
    Result,

    // Main types
    PrintOptions,
    Sheet,
};
