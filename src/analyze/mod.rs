mod analyzer;
mod classifier;
mod model;

pub use analyzer::{Analyzer, SprintPlanning};
pub use classifier::{classify, StoryOrigin};
pub use model::{AssigneeGroup, AssigneesAnalyzed, PlannedStory, PlanningAnalyzed};
