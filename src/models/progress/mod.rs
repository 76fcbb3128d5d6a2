pub mod entities;
pub mod gate;
pub mod responses;

pub use entities::{CourseProgress, ProgressKind};
pub use gate::can_complete_section;
