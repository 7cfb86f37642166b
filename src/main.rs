mod analyze;
mod model;
mod prompt;
mod report;
mod utils;

use crate::analyze::{Analyzer, SprintPlanning};
use crate::prompt::{prompt_sprint_number, validate_sprint_number};
use crate::report::{report_create, ReportFormat};
use crate::utils::MultiProgressNew;
use clap::{ArgAction, Parser};
use indicatif::{MultiProgress, ProgressBar};
use model::{Result, SprintCalendar, StoryRecord};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Builds the IPM planning workbook for a sprint")]
struct Args {
    #[arg(long = "sprints", default_value = "Input files/FAST Sprint Start-End Dates.json")]
    sprints_path: String,
    #[arg(long = "stories", default_value = "Input files/Jira Sprint Planning Data.json")]
    stories_path: String,
    #[arg(long = "output-dir", default_value = "Output files")]
    output_dir: PathBuf,
    /// Sprint number to plan; asked on the console when omitted
    #[arg(long = "sprint")]
    sprint: Option<String>,
    #[arg(long = "format", value_enum, default_value_t = ReportFormat::Xlsx)]
    format: ReportFormat,
    /// Write computed values instead of spreadsheet formulas
    #[arg(long = "values")]
    values: bool,
    #[arg(long = "max-attempts", default_value_t = 10)]
    max_attempts: usize,
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "planning report failed");
            eprintln!("\n****** {err} ******");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let number = match &args.sprint {
        Some(sprint) => validate_sprint_number(sprint)?,
        None => prompt_sprint_number(&mut io::stdin().lock(), &mut io::stdout(), args.max_attempts)?,
    };
    tracing::info!(sprint = number, "sprint number accepted");

    let (calendar, stories) = parse_configs(args)?;
    let planning = SprintPlanning::resolve(number, &calendar, stories)?;
    println!(
        "\nStarting to Create IPM Planning Spreadsheet {}",
        planning.current.name
    );

    let plan = planning.analyze_assignees();

    let multi_progress = MultiProgress::default();
    let report_pb = multi_progress.add_step("Writing IPM Planning report ...");
    let sinks = args.format.sinks(!args.values);
    let written = match report_create(&plan, &sinks, &args.output_dir) {
        Ok(written) => written,
        Err(err) => {
            report_pb.abandon_with_message("❌ IPM Planning report was not written");
            return Err(err);
        }
    };
    report_pb.finish_with_message(format!(
        "✅ Completed IPM Planning report ({} assignees, {} stories, {} points)",
        plan.assignees.len(),
        plan.story_count(),
        plan.total_points(),
    ));

    for path in written {
        println!("   {}", path.display());
    }
    println!("\nCompleted Create IPM Planning Spreadsheet");
    Ok(())
}

fn parse_configs(args: &Args) -> Result<(SprintCalendar, Vec<StoryRecord>)> {
    fn parse_config<T, F>(path: &str, pb: &ProgressBar, parser: F, count: fn(&T) -> usize) -> Result<T>
    where
        F: FnOnce(&str) -> Result<T>,
    {
        pb.set_message(format!("Read file `{}` ...", path));
        match parser(path) {
            Ok(parsed) => {
                pb.finish_with_message(format!(
                    "✅ Completed parsing file `{}` (find {} elements)",
                    path,
                    count(&parsed)
                ));
                Ok(parsed)
            }
            Err(err) => {
                pb.abandon_with_message(format!("❌ Failed parsing file `{}`", path));
                Err(err)
            }
        }
    }

    let multi_progress = MultiProgress::default();

    let sprints_pb = multi_progress.add_step("Waiting sprint calendar");
    let calendar = parse_config(
        &args.sprints_path,
        &sprints_pb,
        SprintCalendar::from_config,
        SprintCalendar::len,
    )?;

    let stories_pb = multi_progress.add_step("Waiting story export");
    let stories = parse_config(
        &args.stories_path,
        &stories_pb,
        StoryRecord::from_config,
        Vec::len,
    )?;

    Ok((calendar, stories))
}
