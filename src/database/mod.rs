mod base;
pub mod sqlite;
mod types;

pub use base::{CurriculosDB, CurriculosDBError};
pub use types::{ApplicationRecord, ResumeLocation};
