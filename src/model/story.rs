use crate::model::{PlanningError, Result};
use indexmap::{IndexMap, IndexSet};
use serde_json::{from_str, Value};
use std::fs;

pub const UNASSIGNED: &str = "Unassigned";

/// One row of the Jira sprint export.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StoryRecord {
    pub key: String,
    pub issue_type: String,
    pub summary: String,
    pub assignee: String,
    pub status: String,
    pub priority: String,
    pub story_points: u32,
    /// Every sprint the story has been part of.
    pub sprints: IndexSet<String>,
}

// Create
impl StoryRecord {
    pub fn from_config(path: &str) -> Result<Vec<Self>> {
        let json_str = fs::read_to_string(path)?;
        Self::parse(&json_str)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        key: impl ToString,
        issue_type: impl ToString,
        summary: impl ToString,
        assignee: impl ToString,
        status: impl ToString,
        priority: impl ToString,
        story_points: u32,
        sprints: Vec<impl ToString>,
    ) -> Self {
        Self {
            key: key.to_string(),
            issue_type: issue_type.to_string(),
            summary: summary.to_string(),
            assignee: assignee.to_string(),
            status: status.to_string(),
            priority: priority.to_string(),
            story_points,
            sprints: sprints.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Assignee name used for grouping; blank assignees fall into [`UNASSIGNED`].
    pub fn assignee_name(&self) -> &str {
        match self.assignee.trim() {
            "" => UNASSIGNED,
            name => name,
        }
    }

    pub fn in_sprint(&self, sprint_name: &str) -> bool {
        self.sprints.contains(sprint_name)
    }
}

// Parser
impl StoryRecord {
    pub(crate) fn parse(json_str: &str) -> Result<Vec<Self>> {
        let elements: IndexMap<String, Value> = from_str(json_str)?;
        let mut result = Vec::new();
        for (key, details) in elements {
            let Some(issue_type) = details["issueType"].as_str() else {
                return Err(PlanningError::missing_field(&key, "issueType"));
            };
            let Some(summary) = details["summary"].as_str() else {
                return Err(PlanningError::missing_field(&key, "summary"));
            };
            let Some(status) = details["status"].as_str() else {
                return Err(PlanningError::missing_field(&key, "status"));
            };
            let Some(priority) = details["priority"].as_str() else {
                return Err(PlanningError::missing_field(&key, "priority"));
            };
            let assignee = match &details["assignee"] {
                Value::Null => "",
                Value::String(assignee) => assignee.as_str(),
                _ => return Err(PlanningError::invalid_field(&key, "assignee", "not a string")),
            };
            let story_points = match &details["storyPoints"] {
                Value::Null => 0,
                value => match value.as_u64().and_then(|p| u32::try_from(p).ok()) {
                    Some(points) => points,
                    None => {
                        return Err(PlanningError::invalid_field(
                            &key,
                            "storyPoints",
                            format!("expected a non-negative integer, got {value}"),
                        ))
                    }
                },
            };
            let sprints = match &details["sprints"] {
                Value::Null => vec![],
                Value::Array(sprints) => {
                    let mut names = Vec::with_capacity(sprints.len());
                    for sprint in sprints {
                        let Some(name) = sprint.as_str() else {
                            return Err(PlanningError::invalid_field(
                                &key,
                                "sprints",
                                format!("expected sprint names, got {sprint}"),
                            ));
                        };
                        names.push(name.to_string());
                    }
                    names
                }
                _ => return Err(PlanningError::invalid_field(&key, "sprints", "not an array")),
            };
            let new = Self::new(
                &key,
                issue_type,
                summary,
                assignee,
                status,
                priority,
                story_points,
                sprints,
            );
            result.push(new);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"{
        "FAST-2": {
            "issueType": "Story", "summary": "Second", "assignee": "Bob",
            "status": "To Do", "priority": "High", "storyPoints": 5,
            "sprints": ["FASTR1i41"]
        },
        "FAST-1": {
            "issueType": "Bug", "summary": "First", "assignee": null,
            "status": "In Progress", "priority": "Medium", "storyPoints": null,
            "sprints": ["FASTR1i40", "FASTR1i41", "FASTR1i40"]
        },
        "FAST-3": {
            "issueType": "Task", "summary": "Third",
            "status": "To Do", "priority": "Low"
        }
    }"#;

    #[test]
    fn test_parse_keeps_file_order() {
        let stories = StoryRecord::parse(EXPORT).unwrap();
        let keys = stories.iter().map(|s| s.key.as_str()).collect::<Vec<_>>();
        assert_eq!(keys, vec!["FAST-2", "FAST-1", "FAST-3"]);
    }

    #[test]
    fn test_parse_optional_fields() {
        let stories = StoryRecord::parse(EXPORT).unwrap();

        assert_eq!(stories[0].story_points, 5);
        assert_eq!(stories[0].assignee_name(), "Bob");

        assert_eq!(stories[1].story_points, 0);
        assert_eq!(stories[1].assignee_name(), UNASSIGNED);
        assert_eq!(stories[1].sprints.len(), 2);
        assert!(stories[1].in_sprint("FASTR1i40"));

        assert!(stories[2].sprints.is_empty());
        assert_eq!(stories[2].assignee_name(), UNASSIGNED);
    }

    #[test]
    fn test_blank_assignee_is_unassigned() {
        let story = StoryRecord::new("K", "Story", "S", "   ", "To Do", "Low", 1, vec!["A"]);
        assert_eq!(story.assignee_name(), UNASSIGNED);
    }

    #[test]
    fn test_parse_rejects_negative_points() {
        let err = StoryRecord::parse(
            r#"{"FAST-9": {"issueType": "Story", "summary": "S", "status": "To Do",
                "priority": "Low", "storyPoints": -2}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PlanningError::InvalidField { ref field, .. } if field == "storyPoints"));
    }

    #[test]
    fn test_parse_rejects_non_string_sprint() {
        let err = StoryRecord::parse(
            r#"{"FAST-9": {"issueType": "Story", "summary": "S", "status": "To Do",
                "priority": "Low", "sprints": ["FASTR1i41", 40]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PlanningError::InvalidField { ref field, .. } if field == "sprints"));
    }

    #[test]
    fn test_parse_rejects_missing_summary() {
        let err = StoryRecord::parse(
            r#"{"FAST-9": {"issueType": "Story", "status": "To Do", "priority": "Low"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PlanningError::MissingField { ref field, .. } if field == "summary"));
    }
}
