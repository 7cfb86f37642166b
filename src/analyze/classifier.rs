use crate::model::StoryRecord;

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum StoryOrigin {
    Carryover,
    New,
}

impl StoryOrigin {
    pub fn is_carryover(self) -> bool {
        self == StoryOrigin::Carryover
    }

    /// Value of the `Carryover Story` column; the remaining points formula tests for `Y`.
    pub fn flag(self) -> &'static str {
        match self {
            StoryOrigin::Carryover => "Y",
            StoryOrigin::New => "N",
        }
    }
}

/// A story carries over when it was already part of the previous sprint.
pub fn classify(story: &StoryRecord, previous_sprint_name: &str) -> StoryOrigin {
    if story.in_sprint(previous_sprint_name) {
        StoryOrigin::Carryover
    } else {
        StoryOrigin::New
    }
}
