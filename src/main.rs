use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;

mod config;
mod error;
mod logging;
pub mod models;
mod report;
mod services;

use services::analysis;
use services::charts;
use services::sheets::{self, SheetKind};
use services::workbook::DivorceWorkbook;

fn main() -> Result<()> {
    logging::init_logging()?;

    let mut config = config::load_config()?;
    // A path on the command line beats the environment.
    if let Some(path) = env::args().nth(1) {
        config.workbook_path = PathBuf::from(path);
    }
    tracing::info!(
        workbook = %config.workbook_path.display(),
        out_dir = %config.out_dir.display(),
        "starting divorce statistics analysis"
    );

    let start = Instant::now();
    let mut workbook = match DivorceWorkbook::open(&config.workbook_path) {
        Ok(workbook) => workbook,
        Err(err) => {
            tracing::error!("failed to load workbook: {err}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        "workbook opened in {:?}, {} sheets found",
        start.elapsed(),
        workbook.sheet_names().len()
    );

    fs::create_dir_all(&config.out_dir)?;

    let mut cleaned = Vec::new();
    let mut profiles = Vec::new();
    for kind in SheetKind::ALL {
        let sheet_start = Instant::now();
        let (source_sheet, frame) = workbook.frame(kind)?;
        let sheet = sheets::clean(kind, frame, &source_sheet)?;
        let profile = analysis::profile_sheet(&sheet)?;

        report::print_sheet_report(&sheet, &profile, &config)?;
        let csv_path = report::write_long_csv(&sheet, &config.out_dir)?;
        tracing::info!(
            sheet = %kind,
            csv = %csv_path.display(),
            "sheet processed in {:?}",
            sheet_start.elapsed()
        );

        profiles.push(profile);
        cleaned.push(sheet);
    }

    let json_path = config.out_dir.join("summary.json");
    report::write_json(&profiles, &json_path)?;
    tracing::info!(summary = %json_path.display(), "wrote JSON summary");

    let chart_start = Instant::now();
    let chart_paths = charts::render_all(&cleaned, &config)?;
    tracing::info!(
        "rendered {} charts in {:?}",
        chart_paths.len(),
        chart_start.elapsed()
    );

    tracing::info!("analysis finished in {:?}", start.elapsed());
    Ok(())
}
