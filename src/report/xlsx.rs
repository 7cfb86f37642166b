use crate::analyze::{AssigneeGroup, PlanningAnalyzed};
use crate::model::Result;
use crate::report::cells::*;
use crate::report::ReportSink;
use rust_xlsxwriter::{
    DocProperties, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet,
};

const STORY_HEADERS: [(&str, f64); 10] = [
    ("Key", 12.0),
    ("Issue Type", 9.0),
    ("Summary", 70.0),
    ("Assignee", 18.0),
    ("Status", 14.0),
    ("Priority", 12.0),
    ("Initial Story Points", 12.0),
    ("Carryover Story", 12.0),
    ("Remaining Story Points", 12.0),
    ("Final Story Points", 12.0),
];

const SUMMARY_HEADERS: [(&str, f64); 3] = [
    ("Assignee", 20.0),
    ("Initial Story Points", 14.0),
    ("Final Story Points", 14.0),
];

/// Planning workbook: an `All Assignees` summary tab and one tab per assignee.
#[derive(Clone, Debug)]
pub struct XlsxReport {
    /// Write spreadsheet formulas instead of computed values
    pub use_formulas: bool,
}

struct XlsxFormats {
    header: Format,
    left: Format,
    center: Format,
    last_row: Format,
    totals: Format,
}

impl XlsxReport {
    pub fn new(use_formulas: bool) -> Self {
        Self { use_formulas }
    }

    fn create_formats(&self) -> XlsxFormats {
        let header = Format::new()
            .set_font_name("Calibri")
            .set_font_size(13)
            .set_font_color(0xFFFFFF)
            .set_text_wrap()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_bold()
            .set_background_color(0x4472C4)
            .set_pattern(FormatPattern::Solid)
            .set_border(FormatBorder::Thin);

        let left = Format::new()
            .set_font_size(12)
            .set_align(FormatAlign::Left)
            .set_indent(1);

        let center = Format::new()
            .set_font_size(12)
            .set_align(FormatAlign::Center);

        let last_row = Format::new()
            .set_font_size(12)
            .set_align(FormatAlign::Center)
            .set_border_bottom(FormatBorder::Double);

        let totals = Format::new()
            .set_font_size(13)
            .set_align(FormatAlign::Center)
            .set_bold();

        XlsxFormats {
            header,
            left,
            center,
            last_row,
            totals,
        }
    }

    fn add_summary_sheet(
        &self,
        workbook: &mut Workbook,
        plan: &PlanningAnalyzed,
        sheet_names: &[String],
        formats: &XlsxFormats,
    ) -> Result<()> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SUMMARY_SHEET_NAME)?;
        write_headers(sheet, &SUMMARY_HEADERS, &formats.header)?;

        let mut row = 0;
        for (index, (group, sheet_name)) in plan.assignees.iter().zip(sheet_names).enumerate() {
            row += 1;
            let format = if index + 1 == plan.assignees.len() {
                &formats.last_row
            } else {
                &formats.center
            };
            sheet.write_with_format(row, SUMMARY_COL_ASSIGNEE, group.assignee.as_str(), &formats.left)?;

            let group_totals = totals_row(group.stories.len());
            if self.use_formulas {
                let initial = sheet_reference(sheet_name, group_totals, COL_INITIAL_POINTS);
                let final_ = sheet_reference(sheet_name, group_totals, COL_FINAL_POINTS);
                sheet.write_formula_with_format(row, SUMMARY_COL_INITIAL_POINTS, initial.as_str(), format)?;
                sheet.write_formula_with_format(row, SUMMARY_COL_FINAL_POINTS, final_.as_str(), format)?;
            } else {
                sheet.write_with_format(row, SUMMARY_COL_INITIAL_POINTS, group.total_points as f64, format)?;
                sheet.write_with_format(row, SUMMARY_COL_FINAL_POINTS, group.final_points() as f64, format)?;
            }
        }

        let totals = row + 1;
        if self.use_formulas {
            let initial = sum_formula(SUMMARY_COL_INITIAL_POINTS, 1, row);
            let final_ = sum_formula(SUMMARY_COL_FINAL_POINTS, 1, row);
            sheet.write_formula_with_format(totals, SUMMARY_COL_INITIAL_POINTS, initial.as_str(), &formats.totals)?;
            sheet.write_formula_with_format(totals, SUMMARY_COL_FINAL_POINTS, final_.as_str(), &formats.totals)?;
        } else {
            sheet.write_with_format(totals, SUMMARY_COL_INITIAL_POINTS, plan.total_points() as f64, &formats.totals)?;
            sheet.write_with_format(totals, SUMMARY_COL_FINAL_POINTS, plan.final_points() as f64, &formats.totals)?;
        }
        sheet.set_freeze_panes(1, 0)?;
        Ok(())
    }

    fn add_assignee_sheet(
        &self,
        workbook: &mut Workbook,
        group: &AssigneeGroup,
        sheet_name: &str,
        formats: &XlsxFormats,
    ) -> Result<()> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name)?;
        write_headers(sheet, &STORY_HEADERS, &formats.header)?;
        for col in COL_ISSUE_TYPE..=COL_FINAL_POINTS {
            sheet.set_column_format(col, &formats.center)?;
        }

        for (index, planned) in group.stories.iter().enumerate() {
            let row = story_row(index);
            let story = &planned.story;
            sheet.write_with_format(row, COL_KEY, story.key.as_str(), &formats.left)?;
            sheet.write_with_format(row, COL_ISSUE_TYPE, story.issue_type.as_str(), &formats.left)?;
            sheet.write_with_format(row, COL_SUMMARY, story.summary.as_str(), &formats.left)?;
            sheet.write_with_format(row, COL_ASSIGNEE, story.assignee_name(), &formats.left)?;
            sheet.write_with_format(row, COL_STATUS, story.status.as_str(), &formats.center)?;
            sheet.write_with_format(row, COL_PRIORITY, story.priority.as_str(), &formats.center)?;
            sheet.write_with_format(row, COL_INITIAL_POINTS, f64::from(story.story_points), &formats.center)?;
            sheet.write_with_format(row, COL_CARRYOVER, planned.origin.flag(), &formats.center)?;

            if self.use_formulas {
                let remaining = remaining_points_formula(row);
                let final_ = final_points_formula(row);
                sheet.write_formula_with_format(row, COL_REMAINING_POINTS, remaining.as_str(), &formats.center)?;
                sheet.write_formula_with_format(row, COL_FINAL_POINTS, final_.as_str(), &formats.center)?;
            } else {
                match planned.remaining_points() {
                    Some(points) => sheet.write_with_format(row, COL_REMAINING_POINTS, f64::from(points), &formats.center)?,
                    None => sheet.write_blank(row, COL_REMAINING_POINTS, &formats.center)?,
                };
                sheet.write_with_format(row, COL_FINAL_POINTS, f64::from(planned.final_points()), &formats.center)?;
            }
        }

        let spacer = spacer_row(group.stories.len());
        for col in COL_KEY..=COL_FINAL_POINTS {
            sheet.write_blank(spacer, col, &formats.last_row)?;
        }

        let totals = totals_row(group.stories.len());
        if self.use_formulas {
            let initial = sum_formula(COL_INITIAL_POINTS, 1, spacer);
            let final_ = sum_formula(COL_FINAL_POINTS, 1, spacer);
            sheet.write_formula_with_format(totals, COL_INITIAL_POINTS, initial.as_str(), &formats.totals)?;
            sheet.write_formula_with_format(totals, COL_FINAL_POINTS, final_.as_str(), &formats.totals)?;
        } else {
            sheet.write_with_format(totals, COL_INITIAL_POINTS, group.total_points as f64, &formats.totals)?;
            sheet.write_with_format(totals, COL_FINAL_POINTS, group.final_points() as f64, &formats.totals)?;
        }
        sheet.set_freeze_panes(1, 0)?;

        tracing::debug!(
            sheet = sheet_name,
            table = %table_range(1, COL_KEY, COL_FINAL_POINTS, spacer - 1),
            "assignee tab"
        );
        Ok(())
    }
}

impl ReportSink for XlsxReport {
    fn file_extension(&self) -> &'static str {
        "xlsx"
    }

    fn render(&self, plan: &PlanningAnalyzed) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let properties = DocProperties::new()
            .set_title(format!("{} IPM Planning", plan.current.name))
            .set_subject(plan.current.label())
            .set_comment(format!("Carryover checked against {}", plan.previous.label()));
        workbook.set_properties(&properties);

        let formats = self.create_formats();
        let sheet_names = worksheet_names(plan.assignees.iter().map(|a| a.assignee.as_str()));

        self.add_summary_sheet(&mut workbook, plan, &sheet_names, &formats)?;
        for (group, sheet_name) in plan.assignees.iter().zip(&sheet_names) {
            self.add_assignee_sheet(&mut workbook, group, sheet_name, &formats)?;
        }

        Ok(workbook.save_to_buffer()?)
    }
}

fn write_headers(sheet: &mut Worksheet, headers: &[(&str, f64)], format: &Format) -> Result<()> {
    for (col, (title, width)) in headers.iter().enumerate() {
        let col = col as u16;
        sheet.set_column_width(col, *width)?;
        sheet.write_with_format(0, col, *title, format)?;
    }
    Ok(())
}
