//! Record structs for every persisted Planit collection.
//!
//! Field names follow the published JSON data files (`camelCase`), so a record
//! fetched from the remote, stored, and read back serializes to the same shape.
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema`.

mod catalog;
mod course;
mod number;
mod plan;
mod requirement;

pub use catalog::{CatalogEntry, CatalogRecord, Catalogs, catalog_faculties, catalog_programs};
pub use course::{Connections, Course, ExamDate};
pub use number::to_finite_number;
pub use plan::{PLAN_STATE_VERSION, PlanState, PlannedSemester};
pub use requirement::{RequirementNode, RequirementRecord, RequirementsSelection};
