use crate::analyze::{
    classify, AssigneeGroup, AssigneesAnalyzed, PlannedStory, PlanningAnalyzed, StoryOrigin,
};
use crate::model::{PlanningError, Result, SprintCalendar, SprintWindow, StoryRecord};
use indexmap::IndexMap;
use itertools::Itertools;

/// Everything needed to plan one sprint: both sprint windows and the exported stories.
#[derive(Debug, Clone)]
pub struct SprintPlanning {
    pub number: u32,
    pub current: SprintWindow,
    pub previous: SprintWindow,
    pub stories: Vec<StoryRecord>,
}

impl SprintPlanning {
    pub fn resolve(number: u32, calendar: &SprintCalendar, stories: Vec<StoryRecord>) -> Result<Self> {
        let current = calendar.require(number)?.clone();
        let Some(previous_number) = number.checked_sub(1) else {
            return Err(PlanningError::MissingData(format!(
                "sprint #{number} has no previous sprint"
            )));
        };
        let previous = calendar.require(previous_number)?.clone();
        if stories.is_empty() {
            return Err(PlanningError::MissingData(
                "the story export contains no stories".to_string(),
            ));
        }
        Ok(Self {
            number,
            current,
            previous,
            stories,
        })
    }
}

pub trait Analyzer {
    fn analyze_assignees(&self) -> PlanningAnalyzed;
}

impl Analyzer for SprintPlanning {
    fn analyze_assignees(&self) -> PlanningAnalyzed {
        let planned = self
            .stories
            .iter()
            .map(|story| PlannedStory::new(story.clone(), classify(story, &self.previous.name)))
            .collect::<Vec<_>>();

        let origins = planned.iter().counts_by(|s| s.origin);
        tracing::info!(
            sprint = %self.current.name,
            previous = %self.previous.name,
            carryover = origins.get(&StoryOrigin::Carryover).copied().unwrap_or(0),
            new = origins.get(&StoryOrigin::New).copied().unwrap_or(0),
            "classified stories"
        );

        let mut assignees = aggregate(planned);
        for group in &mut assignees {
            group.finalize();
            tracing::debug!(
                assignee = %group.assignee,
                stories = group.stories.len(),
                points = group.total_points,
                "assignee group"
            );
        }

        PlanningAnalyzed {
            number: self.number,
            current: self.current.clone(),
            previous: self.previous.clone(),
            assignees,
        }
    }
}

/// Groups stories by assignee in first-seen order, accumulating points per group.
/// Stories keep their input order inside each group.
pub fn aggregate(stories: impl IntoIterator<Item = PlannedStory>) -> AssigneesAnalyzed {
    stories
        .into_iter()
        .fold(IndexMap::<String, AssigneeGroup>::new(), |mut groups, story| {
            let assignee = story.story.assignee_name().to_string();
            groups
                .entry(assignee)
                .or_insert_with_key(|name| AssigneeGroup::new(name))
                .push(story);
            groups
        })
        .into_values()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UNASSIGNED;

    const CALENDAR: &str = r#"{
        "40": { "name": "FASTR1i40", "since": "2025-01-06", "until": "2025-01-17" },
        "41": { "name": "FASTR1i41", "since": "2025-01-20", "until": "2025-01-31" }
    }"#;

    fn story(key: &str, assignee: &str, points: u32, sprints: Vec<&str>) -> StoryRecord {
        StoryRecord::new(key, "Story", "Summary", assignee, "To Do", "Medium", points, sprints)
    }

    fn planned(key: &str, assignee: &str, points: u32, origin: StoryOrigin) -> PlannedStory {
        PlannedStory::new(story(key, assignee, points, vec![]), origin)
    }

    fn keys(group: &AssigneeGroup) -> Vec<&str> {
        group.stories.iter().map(|s| s.story.key.as_str()).collect()
    }

    #[test]
    fn test_aggregate_groups_in_first_seen_order() {
        let groups = aggregate(vec![
            planned("A-1", "A", 3, StoryOrigin::Carryover),
            planned("B-1", "B", 5, StoryOrigin::New),
            planned("A-2", "A", 2, StoryOrigin::New),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].assignee, "A");
        assert_eq!(groups[0].total_points, 5);
        assert_eq!(keys(&groups[0]), vec!["A-1", "A-2"]);
        assert_eq!(groups[1].assignee, "B");
        assert_eq!(groups[1].total_points, 5);
        assert_eq!(keys(&groups[1]), vec!["B-1"]);
    }

    #[test]
    fn test_aggregate_conserves_points_and_stories() {
        let stories = vec![
            planned("1", "Carol", 8, StoryOrigin::New),
            planned("2", "", 1, StoryOrigin::New),
            planned("3", "Dave", 0, StoryOrigin::Carryover),
            planned("4", "Carol", 13, StoryOrigin::Carryover),
            planned("5", "Erin", 2, StoryOrigin::New),
            planned("6", " ", 3, StoryOrigin::New),
        ];
        let input_points: u64 = stories.iter().map(|s| u64::from(s.story.story_points)).sum();
        let groups = aggregate(stories.clone());

        let group_points: u64 = groups.iter().map(|g| g.total_points).sum();
        assert_eq!(group_points, input_points);

        for story in &stories {
            let owners = groups
                .iter()
                .filter(|g| g.stories.contains(story))
                .collect::<Vec<_>>();
            assert_eq!(owners.len(), 1);
            assert_eq!(owners[0].assignee, story.story.assignee_name());
        }
    }

    #[test]
    fn test_aggregate_collects_blank_assignees_as_unassigned() {
        let groups = aggregate(vec![
            planned("1", "", 1, StoryOrigin::New),
            planned("2", "Alice", 2, StoryOrigin::New),
            planned("3", "  ", 3, StoryOrigin::New),
        ]);
        assert_eq!(groups[0].assignee, UNASSIGNED);
        assert_eq!(keys(&groups[0]), vec!["1", "3"]);
        assert_eq!(groups[0].total_points, 4);
    }

    #[test]
    fn test_aggregate_sums_large_estimates_without_overflow() {
        let groups = aggregate(vec![
            planned("1", "Alice", 3_000_000_000, StoryOrigin::New),
            planned("2", "Alice", 3_000_000_000, StoryOrigin::Carryover),
            planned("3", "Bob", u32::MAX, StoryOrigin::New),
        ]);
        assert_eq!(groups[0].total_points, 6_000_000_000);
        assert_eq!(groups[0].final_points(), 6_000_000_000);

        let calendar = SprintCalendar::parse(CALENDAR).unwrap();
        let planning = SprintPlanning {
            number: 41,
            current: calendar.require(41).unwrap().clone(),
            previous: calendar.require(40).unwrap().clone(),
            stories: vec![
                story("1", "Alice", u32::MAX, vec!["FASTR1i40"]),
                story("2", "Alice", u32::MAX, vec![]),
            ],
        };
        let analyzed = planning.analyze_assignees();
        assert_eq!(analyzed.total_points(), 2 * u64::from(u32::MAX));
        assert_eq!(analyzed.final_points(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let stories = vec![
            planned("1", "X", 1, StoryOrigin::New),
            planned("2", "Y", 2, StoryOrigin::Carryover),
            planned("3", "X", 3, StoryOrigin::Carryover),
        ];
        assert_eq!(aggregate(stories.clone()), aggregate(stories));
    }

    #[test]
    fn test_analyze_classifies_and_finalizes() {
        let calendar = SprintCalendar::parse(CALENDAR).unwrap();
        let stories = vec![
            story("A-1", "A", 3, vec!["FASTR1i40", "FASTR1i41"]),
            story("B-1", "B", 5, vec!["FASTR1i41"]),
            story("A-2", "A", 2, vec!["FASTR1i41"]),
            story("A-3", "A", 1, vec!["FASTR1i40"]),
        ];
        let planning = SprintPlanning::resolve(41, &calendar, stories).unwrap();
        let analyzed = planning.analyze_assignees();

        assert_eq!(analyzed.current.name, "FASTR1i41");
        assert_eq!(analyzed.previous.name, "FASTR1i40");
        assert_eq!(analyzed.assignees.len(), 2);
        assert_eq!(keys(&analyzed.assignees[0]), vec!["A-1", "A-3", "A-2"]);
        assert_eq!(analyzed.assignees[0].stories[0].origin, StoryOrigin::Carryover);
        assert_eq!(analyzed.assignees[0].stories[2].origin, StoryOrigin::New);
        assert_eq!(analyzed.total_points(), 11);
        assert_eq!(analyzed.final_points(), 11);
        assert_eq!(analyzed.story_count(), 4);
    }

    #[test]
    fn test_resolve_requires_previous_sprint() {
        let calendar = SprintCalendar::parse(CALENDAR).unwrap();
        let err = SprintPlanning::resolve(40, &calendar, vec![story("1", "A", 1, vec![])]).unwrap_err();
        assert!(matches!(err, PlanningError::MissingData(_)));
    }

    #[test]
    fn test_resolve_requires_stories() {
        let calendar = SprintCalendar::parse(CALENDAR).unwrap();
        let err = SprintPlanning::resolve(41, &calendar, vec![]).unwrap_err();
        assert!(matches!(err, PlanningError::MissingData(_)));
    }
}
