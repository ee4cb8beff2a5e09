//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Create / update DTOs where the table is written through a repository

pub mod administrative_document;
pub mod invitation;
pub mod resident;
pub mod toewijzingen;
pub mod youth_overview;
