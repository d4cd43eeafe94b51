//! Document parsing and data structures module
//!
//! This module turns converted word-processor markup into a document tree
//! and linearizes that tree into plain text.

pub mod extract;
pub mod io;
pub mod markup;
pub mod models;

pub use extract::*;
pub use io::{SourceFormat, base_name, is_markup_file, list_candidates, validate_source};
pub use markup::parse_markup;
pub use models::*;
