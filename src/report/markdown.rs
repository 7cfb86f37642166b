use crate::analyze::{AssigneeGroup, PlanningAnalyzed};
use crate::model::{PlanningError, Result};
use crate::report::cells::SUMMARY_SHEET_NAME;
use crate::report::ReportSink;
use markdown_builder::Markdown;
use markdown_table::{Heading, HeadingAlignment, MarkdownTable};

/// Markdown rendition of the planning workbook with computed values.
pub struct MarkdownReport;

impl ReportSink for MarkdownReport {
    fn file_extension(&self) -> &'static str {
        "md"
    }

    fn render(&self, plan: &PlanningAnalyzed) -> Result<Vec<u8>> {
        let mut doc = Markdown::new();

        doc.header1(format!("{} IPM Planning", plan.current.name));
        doc.paragraph(format!(
            "Sprint #{}: {}. Carryover checked against {}.",
            plan.number,
            plan.current.label(),
            plan.previous.label(),
        ));

        doc.add_summary(plan)?;
        for group in &plan.assignees {
            doc.add_assignee(group)?;
        }

        Ok(doc.render().as_bytes().to_vec())
    }
}

trait MarkdownExt {
    fn add_summary(&mut self, plan: &PlanningAnalyzed) -> Result<()>;
    fn add_assignee(&mut self, group: &AssigneeGroup) -> Result<()>;
}

impl MarkdownExt for Markdown {
    fn add_summary(&mut self, plan: &PlanningAnalyzed) -> Result<()> {
        self.header2(SUMMARY_SHEET_NAME);

        let header = vec![
            Heading::new("Assignee".to_string(), None),
            Heading::new("Initial Story Points".to_string(), Some(HeadingAlignment::Center)),
            Heading::new("Final Story Points".to_string(), Some(HeadingAlignment::Center)),
        ];

        let mut table = plan
            .assignees
            .iter()
            .map(|group| {
                vec![
                    escape(&group.assignee),
                    group.total_points.to_string(),
                    group.final_points().to_string(),
                ]
            })
            .collect::<Vec<_>>();
        table.push(vec![
            "**Total**".to_string(),
            format!("**{}**", plan.total_points()),
            format!("**{}**", plan.final_points()),
        ]);

        self.add_table(table, header)
    }

    fn add_assignee(&mut self, group: &AssigneeGroup) -> Result<()> {
        self.header2(escape(&group.assignee));

        let header = [
            ("Key", None),
            ("Issue Type", None),
            ("Summary", None),
            ("Status", Some(HeadingAlignment::Center)),
            ("Priority", Some(HeadingAlignment::Center)),
            ("Initial Story Points", Some(HeadingAlignment::Center)),
            ("Carryover Story", Some(HeadingAlignment::Center)),
            ("Remaining Story Points", Some(HeadingAlignment::Center)),
            ("Final Story Points", Some(HeadingAlignment::Center)),
        ]
        .into_iter()
        .map(|(title, alignment)| Heading::new(title.to_string(), alignment))
        .collect::<Vec<_>>();

        let mut table = group
            .stories
            .iter()
            .map(|planned| {
                let story = &planned.story;
                vec![
                    escape(&story.key),
                    escape(&story.issue_type),
                    escape(&story.summary),
                    escape(&story.status),
                    escape(&story.priority),
                    story.story_points.to_string(),
                    planned.origin.flag().to_string(),
                    planned
                        .remaining_points()
                        .map(|p| p.to_string())
                        .unwrap_or_default(),
                    planned.final_points().to_string(),
                ]
            })
            .collect::<Vec<_>>();
        table.push(vec![
            "**Total**".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            format!("**{}**", group.total_points),
            String::new(),
            String::new(),
            format!("**{}**", group.final_points()),
        ]);

        self.add_table(table, header)
    }
}

trait MarkdownTableExt {
    fn add_table(&mut self, table: Vec<Vec<String>>, header: Vec<Heading>) -> Result<()>;
}

impl MarkdownTableExt for Markdown {
    fn add_table(&mut self, table: Vec<Vec<String>>, header: Vec<Heading>) -> Result<()> {
        let mut md_table = MarkdownTable::new(table);
        md_table.with_headings(header);
        let rendered = md_table
            .as_markdown()
            .map_err(|e| PlanningError::Markdown(format!("{e:?}")))?;
        self.paragraph(rendered);
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
