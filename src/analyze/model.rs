use crate::analyze::StoryOrigin;
use crate::model::{SprintWindow, StoryRecord};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PlannedStory {
    pub story: StoryRecord,
    pub origin: StoryOrigin,
}

impl PlannedStory {
    pub fn new(story: StoryRecord, origin: StoryOrigin) -> Self {
        Self { story, origin }
    }

    /// Points still open from the previous sprint. Only carryover stories have any.
    pub fn remaining_points(&self) -> Option<u32> {
        match self.origin {
            StoryOrigin::Carryover => Some(self.story.story_points),
            StoryOrigin::New => None,
        }
    }

    pub fn final_points(&self) -> u32 {
        self.remaining_points().unwrap_or(self.story.story_points)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AssigneeGroup {
    pub assignee: String,
    pub stories: Vec<PlannedStory>,
    /// Sum of initial points, kept as `u64` so large estimates cannot overflow.
    pub total_points: u64,
}

impl AssigneeGroup {
    pub fn new(assignee: impl ToString) -> Self {
        Self {
            assignee: assignee.to_string(),
            stories: vec![],
            total_points: 0,
        }
    }

    pub fn push(&mut self, story: PlannedStory) {
        self.total_points += u64::from(story.story.story_points);
        self.stories.push(story);
    }

    /// Moves carryover stories to the top. `sort_by_key` is stable, so input order
    /// is kept inside each half.
    pub fn finalize(&mut self) {
        self.stories.sort_by_key(|s| !s.origin.is_carryover());
    }

    pub fn final_points(&self) -> u64 {
        self.stories.iter().map(|s| u64::from(s.final_points())).sum()
    }
}

pub type AssigneesAnalyzed = Vec<AssigneeGroup>;

#[derive(Debug, Clone)]
pub struct PlanningAnalyzed {
    pub number: u32,
    pub current: SprintWindow,
    pub previous: SprintWindow,
    pub assignees: AssigneesAnalyzed,
}

impl PlanningAnalyzed {
    pub fn total_points(&self) -> u64 {
        self.assignees.iter().map(|a| a.total_points).sum()
    }

    pub fn final_points(&self) -> u64 {
        self.assignees.iter().map(AssigneeGroup::final_points).sum()
    }

    pub fn story_count(&self) -> usize {
        self.assignees.iter().map(|a| a.stories.len()).sum()
    }
}
