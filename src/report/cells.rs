//! A1 addresses and formulas for the planning workbook.
//!
//! Rows and columns are 0-based everywhere except in the produced strings,
//! which use the spreadsheet's 1-based row numbers.
//!
//! Assignee tab layout:
//!
//! ```text
//! row 0        header
//! row 1        blank, for stories added during the planning meeting
//! row 2..n+1   stories (carryover first)
//! row n+2      blank, bottom bordered
//! row n+3      totals of G and J
//! ```

use std::collections::HashSet;

pub const COL_KEY: u16 = 0;
pub const COL_ISSUE_TYPE: u16 = 1;
pub const COL_SUMMARY: u16 = 2;
pub const COL_ASSIGNEE: u16 = 3;
pub const COL_STATUS: u16 = 4;
pub const COL_PRIORITY: u16 = 5;
pub const COL_INITIAL_POINTS: u16 = 6;
pub const COL_CARRYOVER: u16 = 7;
pub const COL_REMAINING_POINTS: u16 = 8;
pub const COL_FINAL_POINTS: u16 = 9;

pub const SUMMARY_COL_ASSIGNEE: u16 = 0;
pub const SUMMARY_COL_INITIAL_POINTS: u16 = 1;
pub const SUMMARY_COL_FINAL_POINTS: u16 = 2;

pub const SUMMARY_SHEET_NAME: &str = "All Assignees";

const MAX_SHEET_NAME_LEN: usize = 31;
const INVALID_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// `0 -> A`, `25 -> Z`, `26 -> AA`.
pub fn column_name(col: u16) -> String {
    let mut n = col as u32 + 1;
    let mut name = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    name.iter().rev().collect()
}

pub fn cell(row: u32, col: u16) -> String {
    format!("{}{}", column_name(col), row + 1)
}

/// Range covering a table whose header sits on the 1-based `top_row`, followed by
/// `num_data_rows` rows of data and one extra trailing row.
pub fn table_range(top_row: u32, left_col: u16, right_col: u16, num_data_rows: u32) -> String {
    format!(
        "{}{}:{}{}",
        column_name(left_col),
        top_row,
        column_name(right_col),
        top_row + num_data_rows + 1
    )
}

pub fn story_row(index: usize) -> u32 {
    index as u32 + 2
}

pub fn spacer_row(story_count: usize) -> u32 {
    story_row(story_count)
}

pub fn totals_row(story_count: usize) -> u32 {
    story_row(story_count) + 1
}

/// Carryover stories start with their initial points still open, new stories with nothing.
pub fn remaining_points_formula(row: u32) -> String {
    format!(
        "=IF({}=\"Y\", {}, \"\")",
        cell(row, COL_CARRYOVER),
        cell(row, COL_INITIAL_POINTS)
    )
}

pub fn final_points_formula(row: u32) -> String {
    format!(
        "=IF({}=\"\", {}, {})",
        cell(row, COL_REMAINING_POINTS),
        cell(row, COL_INITIAL_POINTS),
        cell(row, COL_REMAINING_POINTS)
    )
}

pub fn sum_formula(col: u16, first_row: u32, last_row: u32) -> String {
    format!("=SUM({}:{})", cell(first_row, col), cell(last_row, col))
}

pub fn sheet_reference(sheet: &str, row: u32, col: u16) -> String {
    format!("='{}'!{}", sheet.replace('\'', "''"), cell(row, col))
}

/// Worksheet names for the assignee tabs, in the given order.
///
/// Names are stripped of characters Excel rejects, truncated to 31 characters and
/// made unique (case-insensitively, including against the summary tab) with a
/// ` (n)` suffix.
pub fn worksheet_names<'a>(assignees: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::from([SUMMARY_SHEET_NAME.to_lowercase()]);
    let mut names = Vec::new();
    for assignee in assignees {
        let base = sanitize_sheet_name(assignee);
        let mut name = base.clone();
        let mut suffix = 1;
        while taken.contains(&name.to_lowercase()) {
            suffix += 1;
            let tail = format!(" ({suffix})");
            name = truncate(&base, MAX_SHEET_NAME_LEN - tail.len()) + &tail;
        }
        taken.insert(name.to_lowercase());
        names.push(name);
    }
    names
}

fn sanitize_sheet_name(name: &str) -> String {
    let cleaned = name
        .chars()
        .map(|c| if INVALID_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect::<String>();
    let cleaned = truncate(cleaned.trim().trim_matches('\''), MAX_SHEET_NAME_LEN);
    let cleaned = cleaned.trim().trim_end_matches('\'').to_string();
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("history") {
        format!("{cleaned}_")
    } else {
        cleaned
    }
}

fn truncate(name: &str, max_chars: usize) -> String {
    name.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_name() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(7), "H");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(51), "AZ");
        assert_eq!(column_name(52), "BA");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
    }

    #[test]
    fn test_cell() {
        assert_eq!(cell(0, 0), "A1");
        assert_eq!(cell(2, COL_INITIAL_POINTS), "G3");
    }

    #[test]
    fn test_table_range() {
        assert_eq!(table_range(1, 0, 7, 10), "A1:H12");
        assert_eq!(table_range(1, COL_KEY, COL_FINAL_POINTS, 0), "A1:J2");
    }

    #[test]
    fn test_rows_of_assignee_tab() {
        assert_eq!(story_row(0), 2);
        assert_eq!(story_row(4), 6);
        assert_eq!(spacer_row(3), 5);
        assert_eq!(totals_row(3), 6);
    }

    #[test]
    fn test_story_formulas_use_one_based_rows() {
        let row = story_row(0);
        assert_eq!(remaining_points_formula(row), r#"=IF(H3="Y", G3, "")"#);
        assert_eq!(final_points_formula(row), r#"=IF(I3="", G3, I3)"#);
    }

    #[test]
    fn test_sum_formula() {
        assert_eq!(sum_formula(COL_INITIAL_POINTS, 1, spacer_row(3)), "=SUM(G2:G6)");
        assert_eq!(sum_formula(SUMMARY_COL_FINAL_POINTS, 1, 4), "=SUM(C2:C5)");
    }

    #[test]
    fn test_sheet_reference_quotes_names() {
        assert_eq!(sheet_reference("Alice", totals_row(3), COL_INITIAL_POINTS), "='Alice'!G7");
        assert_eq!(sheet_reference("Pat O'Neil", 6, COL_FINAL_POINTS), "='Pat O''Neil'!J7");
    }

    #[test]
    fn test_worksheet_names_are_valid_and_unique() {
        let names = worksheet_names(vec![
            "Alice",
            "alice",
            "Team [A/B]",
            "All Assignees",
            "A very long assignee name that will not fit",
            "A very long assignee name that will not fit either",
            "'",
        ]);
        assert_eq!(names[0], "Alice");
        assert_eq!(names[1], "alice (2)");
        assert_eq!(names[2], "Team _A_B_");
        assert_eq!(names[3], "All Assignees (2)");
        assert_eq!(names[4], "A very long assignee name that");
        assert_eq!(names[5], "A very long assignee name t (2)");
        assert_eq!(names[6], "_");
        assert!(names.iter().all(|n| n.chars().count() <= 31));
    }
}
