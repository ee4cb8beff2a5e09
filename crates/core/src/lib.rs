//! Domain logic for the Opvang resident-management backend.
//!
//! Everything in this crate is free of I/O: storage layout rules, the
//! filename-to-resident matcher, duplicate planning, field whitelists and
//! the outbound request queue are all usable from the db, storage and api
//! crates alike.

pub mod document_kind;
pub mod duplicates;
pub mod error;
pub mod invitation;
pub mod matching;
pub mod request_queue;
pub mod resident;
pub mod staff_grid;
pub mod storage_layout;
pub mod types;
pub mod youth_overview;
