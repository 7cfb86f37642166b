use crate::model::{PlanningError, Result};
use std::io::{BufRead, Write};
use std::ops::RangeInclusive;

pub const SPRINT_NUMBERS: RangeInclusive<u32> = 40..=99;

const BANNER: &str = "\
*********************************************
***                                       ***
***    Enter the Sprint Number to Plan    ***
***                                       ***
*********************************************";

/// Accepts a plain run of ASCII digits inside [`SPRINT_NUMBERS`].
pub fn validate_sprint_number(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    let invalid = |reason: String| PlanningError::InvalidSprintNumber {
        input: trimmed.to_string(),
        reason,
    };

    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("enter two digit sprint number only".to_string()));
    }
    let number = trimmed
        .parse::<u32>()
        .map_err(|_| invalid("enter two digit sprint number only".to_string()))?;
    if !SPRINT_NUMBERS.contains(&number) {
        return Err(invalid(format!(
            "valid sprint numbers are between {} & {} inclusive",
            SPRINT_NUMBERS.start(),
            SPRINT_NUMBERS.end()
        )));
    }
    Ok(number)
}

/// Asks for a sprint number until a valid one is entered, at most `max_attempts` times.
pub fn prompt_sprint_number<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    max_attempts: usize,
) -> Result<u32> {
    for attempt in 1..=max_attempts {
        writeln!(output, "\n{BANNER}")?;
        write!(output, "\nEnter Sprint Number to plan (should be two digits only) ==> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(PlanningError::InputClosed);
        }

        match validate_sprint_number(&line) {
            Ok(number) => return Ok(number),
            Err(err) => {
                tracing::debug!(attempt, %err, "rejected sprint number");
                writeln!(output, "\n{err}")?;
            }
        }
    }
    Err(PlanningError::PromptExhausted {
        attempts: max_attempts,
    })
}
