use std::path::Path;

use tablers::TableSettings;

use crate::cli::TextFormat;
use crate::shared::{ProgressReporter, open_pdf_with, resolve_pages};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &TextFormat,
    password: Option<&str>,
) -> Result<(), i32> {
    let pdf = open_pdf_with(file, None, password)?;
    let page_count = pdf.page_count();
    let page_indices = resolve_pages(pages, page_count)?;
    let progress = ProgressReporter::new(page_indices.len());

    let settings = TableSettings::default();

    let mut total_chars: usize = 0;
    let mut total_tables: usize = 0;
    let mut page_infos: Vec<serde_json::Value> = Vec::new();

    for (i, &idx) in page_indices.iter().enumerate() {
        progress.report(i + 1);

        let page = pdf.page(idx).map_err(|e| {
            eprintln!("Error reading page {}: {e}", idx + 1);
            1
        })?;

        let chars_count = page.chars().len();
        let lines_count = page.lines().len();
        let rects_count = page.rects().len();
        let curves_count = page.curves().len();
        let tables_count = page.find_tables(&settings).map_or(0, |t| t.len());

        total_chars += chars_count;
        total_tables += tables_count;

        match format {
            TextFormat::Text => {
                println!("Page {}:", idx + 1);
                println!("  Dimensions: {:.2} x {:.2}", page.width(), page.height());
                println!("  Rotation: {}°", page.rotation());
                println!("  Chars: {chars_count}");
                println!("  Lines: {lines_count}");
                println!("  Rects: {rects_count}");
                println!("  Curves: {curves_count}");
                println!("  Tables: {tables_count}");
            }
            TextFormat::Json => {
                page_infos.push(serde_json::json!({
                    "page": idx + 1,
                    "width": page.width(),
                    "height": page.height(),
                    "rotation": page.rotation(),
                    "chars": chars_count,
                    "lines": lines_count,
                    "rects": rects_count,
                    "curves": curves_count,
                    "tables": tables_count,
                }));
            }
        }
    }

    progress.finish();

    match format {
        TextFormat::Text => {
            println!();
            println!("Pages: {page_count}");
            println!();
            println!("Summary:");
            println!("  Total chars: {total_chars}");
            println!("  Total tables: {total_tables}");
        }
        TextFormat::Json => {
            let output = serde_json::json!({
                "pages": page_count,
                "page_info": page_infos,
                "summary": {
                    "total_chars": total_chars,
                    "total_tables": total_tables,
                },
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        }
    }

    Ok(())
}
