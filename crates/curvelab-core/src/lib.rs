//! # CurveLab Core
//!
//! Core types and the validated yield curve table for the CurveLab
//! Treasury analytics workspace.
//!
//! This crate provides the foundational building blocks used throughout CurveLab:
//!
//! - **Types**: Domain-specific types like [`Date`] and [`Maturity`]
//! - **Curve Table**: [`CurveTable`], the immutable dates × maturities grid of
//!   zero-coupon yields that every analytics transform reads
//! - **Errors**: [`CoreError`], covering schema, ordering and empty-dataset
//!   failures raised once at load time
//!
//! ## Design Philosophy
//!
//! - **Validate Once**: The schema is fixed and checked at load; transforms
//!   never look up columns dynamically
//! - **Missing Is a Value**: A gap in the data is `None`, never an error
//! - **Immutable Inputs**: Every transform produces a new derived structure
//!
//! ## Example
//!
//! ```rust
//! use curvelab_core::prelude::*;
//!
//! let d1 = Date::from_ymd(2024, 1, 2).unwrap();
//! let rows = vec![
//!     RawRow::new(d1).with("2y", Some(4.33)).with("10y", Some(3.95)),
//! ];
//! let table = CurveTable::load(rows).unwrap();
//! assert_eq!(table.value_at(d1, Maturity::Y10), Some(3.95));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]

pub mod error;
pub mod table;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::table::{CurvePoint, CurveTable, RawRow};
    pub use crate::types::{Date, Maturity};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use table::{CurvePoint, CurveTable, RawRow};
pub use types::{Date, Maturity};
