pub mod cells;
pub mod markdown;
pub mod xlsx;

use crate::analyze::PlanningAnalyzed;
use crate::model::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub use markdown::MarkdownReport;
pub use xlsx::XlsxReport;

/// Renders an analyzed sprint into the bytes of one report file.
pub trait ReportSink {
    fn file_extension(&self) -> &'static str;
    fn render(&self, plan: &PlanningAnalyzed) -> Result<Vec<u8>>;
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ReportFormat {
    Xlsx,
    Markdown,
    All,
}

impl ReportFormat {
    pub fn sinks(self, use_formulas: bool) -> Vec<Box<dyn ReportSink>> {
        let xlsx = || Box::new(XlsxReport::new(use_formulas)) as Box<dyn ReportSink>;
        let markdown = || Box::new(MarkdownReport) as Box<dyn ReportSink>;
        match self {
            ReportFormat::Xlsx => vec![xlsx()],
            ReportFormat::Markdown => vec![markdown()],
            ReportFormat::All => vec![xlsx(), markdown()],
        }
    }
}

pub fn report_file_name(plan: &PlanningAnalyzed, extension: &str) -> String {
    format!("{} IPM Planning.{extension}", plan.current.name)
}

/// Renders every sink before touching the filesystem, so a failing sink leaves
/// no report behind. Returns the written paths.
pub fn report_create(
    plan: &PlanningAnalyzed,
    sinks: &[Box<dyn ReportSink>],
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let rendered = sinks
        .iter()
        .map(|sink| -> Result<(String, Vec<u8>)> {
            let bytes = sink.render(plan)?;
            Ok((report_file_name(plan, sink.file_extension()), bytes))
        })
        .collect::<Result<Vec<_>>>()?;

    fs::create_dir_all(output_dir)?;
    let mut written = vec![];
    for (file_name, bytes) in rendered {
        let path = output_dir.join(file_name);
        write_atomic(&path, &bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "report written");
        written.push(path);
    }
    Ok(written)
}

/// Writes through a temporary file in the target directory; the target only
/// appears once the content is complete.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
