//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod administrative_document_repo;
pub mod grid_repo;
pub mod invitation_repo;
pub mod resident_repo;
pub mod staff_repo;
pub mod youth_overview_repo;

pub use administrative_document_repo::AdministrativeDocumentRepo;
pub use grid_repo::GridRepo;
pub use invitation_repo::InvitationRepo;
pub use resident_repo::ResidentRepo;
pub use staff_repo::StaffRepo;
pub use youth_overview_repo::YouthOverviewRepo;
