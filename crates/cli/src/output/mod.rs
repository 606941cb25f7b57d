//! The result envelope every command prints, and its payloads.


mod data;
mod format;
mod model;
mod result_builder;

pub use data::*;
pub use format::OutputFormat;
pub use model::*;
pub use result_builder::{ResultBuilder, TextOutput, print_result};
