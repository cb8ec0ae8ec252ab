use crate::output::OutputResult;
use crate::review::CrawlReport;
use std::path::{Path, PathBuf};

/// Writes a crawl report to `path`, replacing whatever was there
///
/// The rows go to a sibling temp file first and land via rename, so a
/// failure partway through never truncates a previously committed report.
///
/// # Arguments
///
/// * `path` - Destination CSV path
/// * `report` - The completed crawl to persist
pub fn write_report(path: &Path, report: &CrawlReport) -> OutputResult<()> {
    let staging = staging_path(path);
    write_rows(&staging, report)?;
    std::fs::rename(&staging, path)?;
    Ok(())
}

fn write_rows(path: &Path, report: &CrawlReport) -> OutputResult<()> {
    // The title row has one field, data rows have two
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;

    writer.write_record([report.title.as_str()])?;
    for row in &report.rows {
        writer.write_record([row.rating.to_string(), row.text.clone()])?;
    }

    writer.flush()?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
