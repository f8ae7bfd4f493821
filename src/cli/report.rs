use std::io::Write;
use std::path::{Path, PathBuf};

use crate::client::{parse_envelope, Client};
use crate::error::{ReportError, Result};
use crate::filters::ReportFilter;
use crate::models::ReportRow;
use crate::render::{csv, html, print, text, Format};
use crate::reports::{ReportKind, ReportOutput};
use crate::settings::{load_settings, Settings};
use crate::view::ReportView;

pub fn run(
    kind: ReportKind,
    filter: ReportFilter,
    input: Option<PathBuf>,
    format: Option<Format>,
    output: Option<String>,
) -> Result<()> {
    let settings = load_settings();
    let rows = load_rows(kind, &filter, input.as_deref(), &settings)?;
    let report = kind.build(rows, kind.meta(&filter, &settings.currency));
    log::info!("{} grand total {}", kind.title(), report.sheet.grand_total);

    let format = format
        .or_else(|| output.as_deref().and_then(Format::from_path))
        .unwrap_or(if output.is_some() { Format::Csv } else { Format::Text });
    let rendered = render(&report, format, &settings)?;

    match output.as_deref() {
        Some("-") => write_stdout(&rendered),
        None if format == Format::Text => write_stdout(&rendered),
        Some(path) => write_file(&rendered, Path::new(path), format),
        None => {
            let name = csv::file_name(kind.file_stem(), &kind.file_params(&filter));
            let path = settings.export_dir().join(name).with_extension(format.extension());
            write_file(&rendered, &path, format)
        }
    }
}

/// Rows for one run: a saved response when `--input` is given, otherwise a
/// validated fetch through a fresh report view.
fn load_rows(
    kind: ReportKind,
    filter: &ReportFilter,
    input: Option<&Path>,
    settings: &Settings,
) -> Result<Vec<ReportRow>> {
    let mut view = ReportView::new();
    let ticket = view.begin()?;
    let result = match input {
        Some(path) => {
            log::info!("reading saved response {}", path.display());
            std::fs::read_to_string(path)
                .map_err(ReportError::from)
                .and_then(|body| parse_envelope(&body))
        }
        None => {
            let spec = kind.request(filter)?;
            let client = Client::new(settings.require_api_base()?)?;
            client.fetch_rows(&spec)
        }
    };
    view.finish(ticket, result)?;
    log::debug!("view {:?} holding {} rows", view.state(), view.rows().len());
    let rows = view.take_rows();
    view.close();
    Ok(rows)
}

fn render(report: &ReportOutput, format: Format, settings: &Settings) -> Result<String> {
    let out = match format {
        Format::Text => {
            let mut out = text::render(&report.sheet);
            if let Some(totals) = &report.category_totals {
                out.push_str("\n\n");
                out.push_str(&text::category_summary(totals, report.style));
            }
            out.push('\n');
            out
        }
        Format::Html => html::table(&report.sheet),
        Format::Csv => csv::render(&report.sheet)?,
        Format::Print => {
            let generated = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
            print::document(
                &report.sheet,
                &print::PrintHeader {
                    company: &settings.company_name,
                    printed_by: &settings.employee_no,
                    generated: &generated,
                },
            )
        }
    };
    Ok(out)
}

fn write_stdout(rendered: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn write_file(rendered: &str, path: &Path, format: Format) -> Result<()> {
    log::info!("writing {} ({})", path.display(), format.mime());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, rendered)?;
    println!("Wrote {}", path.display());
    Ok(())
}
