//! Recover strategy-framework worksheets (IFE, EFE, SPACE, BCG, Porter's Five
//! Forces) from the free-text markdown an AI advisor answers with.
//!
//! Pipeline: text → sections → tables → rows → typed records → one
//! [`FrameworkResult`]. Every parsing function is total over arbitrary input;
//! `None` is the only "nothing found" signal.

pub mod analysis;
pub mod config;
pub mod detect;
pub mod error;
pub mod parser;

pub use detect::detect_frameworks;
pub use error::{Error, Result};
pub use parser::{parse, parse_framework_data, probe_all, FrameworkKind, FrameworkResult};
