mod catalog;
mod course;
mod degree;
mod plan;
mod requirements;

pub use catalog::CatalogCommands;
pub use course::CourseCommands;
pub use degree::DegreeCommands;
pub use plan::PlanCommands;
pub use requirements::{RequirementsCommands, SelectionArgs};
