use crate::model::{PlanningError, Result};
use chrono::{DateTime, NaiveDate};
use indexmap::IndexMap;
use serde_json::{from_str, Value};
use std::fs;

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct SprintWindow {
    pub name: String,
    pub since: NaiveDate,
    pub until: NaiveDate,
}

// Create
impl SprintWindow {
    pub fn new(name: impl ToString, since: NaiveDate, until: NaiveDate) -> Self {
        Self {
            name: name.to_string(),
            since,
            until,
        }
    }

    /// Human readable `NAME (dd.mm.yyyy - dd.mm.yyyy)` label used in report titles.
    pub fn label(&self) -> String {
        format!(
            "{} ({} - {})",
            self.name,
            self.since.format("%d.%m.%Y"),
            self.until.format("%d.%m.%Y"),
        )
    }
}

/// Sprint number to sprint window lookup, in file order.
#[derive(Debug, Clone, Default)]
pub struct SprintCalendar {
    sprints: IndexMap<u32, SprintWindow>,
}

impl SprintCalendar {
    pub fn from_config(path: &str) -> Result<Self> {
        let json_str = fs::read_to_string(path)?;
        Self::parse(&json_str)
    }

    pub fn get(&self, number: u32) -> Option<&SprintWindow> {
        self.sprints.get(&number)
    }

    /// Looks up a sprint that must exist for the run to continue.
    pub fn require(&self, number: u32) -> Result<&SprintWindow> {
        self.get(number).ok_or_else(|| {
            PlanningError::MissingData(format!("sprint #{number} is not in the sprint calendar"))
        })
    }

    pub fn len(&self) -> usize {
        self.sprints.len()
    }
}

// Parser
impl SprintCalendar {
    pub(crate) fn parse(json_str: &str) -> Result<Self> {
        let elements: IndexMap<String, Value> = from_str(json_str)?;
        let mut sprints = IndexMap::new();
        for (number, details) in elements {
            let Ok(parsed) = number.trim().parse::<u32>() else {
                return Err(PlanningError::invalid_field(
                    &number,
                    "sprint number",
                    "not an unsigned integer",
                ));
            };
            let Some(name) = details["name"].as_str() else {
                return Err(PlanningError::missing_field(&number, "name"));
            };
            let Some(since) = details["since"].as_str() else {
                return Err(PlanningError::missing_field(&number, "since"));
            };
            let Some(until) = details["until"].as_str() else {
                return Err(PlanningError::missing_field(&number, "until"));
            };
            let window = SprintWindow::new(name, parse_date(since)?, parse_date(until)?);
            sprints.insert(parsed, window);
        }
        Ok(Self { sprints })
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    match DateTime::parse_from_rfc3339(value) {
        Ok(datetime) => Ok(datetime.date_naive()),
        Err(_) => Err(PlanningError::InvalidDate(value.to_string())),
    }
}
