pub mod catalog;
pub mod course;
pub mod degree;
pub mod dispatch;
pub mod plan;
pub mod requirements;
pub mod schema;
pub mod shared;
pub mod sync;
