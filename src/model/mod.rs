mod error;
mod sprint;
mod story;

pub use error::{PlanningError, Result};
pub use sprint::{SprintCalendar, SprintWindow};
pub use story::{StoryRecord, UNASSIGNED};
