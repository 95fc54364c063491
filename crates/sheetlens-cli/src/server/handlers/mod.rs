//! API request handlers.

mod analysis;
mod data;

pub use analysis::*;
pub use data::*;
