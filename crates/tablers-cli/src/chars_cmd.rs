use std::path::Path;

use tablers::UnicodeNorm;

use crate::cli::OutputFormat;
use crate::shared::{ProgressReporter, csv_escape, open_pdf_with, resolve_pages};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &OutputFormat,
    unicode_norm: Option<UnicodeNorm>,
    password: Option<&str>,
) -> Result<(), i32> {
    let pdf = open_pdf_with(file, unicode_norm, password)?;
    let page_indices = resolve_pages(pages, pdf.page_count())?;
    let progress = ProgressReporter::new(page_indices.len());

    match format {
        OutputFormat::Text => write_text(&pdf, &page_indices, &progress),
        OutputFormat::Json => write_json(&pdf, &page_indices, &progress),
        OutputFormat::Csv => write_csv(&pdf, &page_indices, &progress),
    }
}

fn write_text(
    pdf: &tablers::Pdf,
    page_indices: &[usize],
    progress: &ProgressReporter,
) -> Result<(), i32> {
    println!("page\ttext\tx0\ttop\tx1\tbottom\tfontname\tsize");

    for (i, &idx) in page_indices.iter().enumerate() {
        progress.report(i + 1);

        let page = pdf.page(idx).map_err(|e| {
            eprintln!("Error reading page {}: {e}", idx + 1);
            1
        })?;

        for ch in page.chars() {
            println!(
                "{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{}\t{:.2}",
                idx + 1,
                ch.text,
                ch.bbox.x0,
                ch.bbox.top,
                ch.bbox.x1,
                ch.bbox.bottom,
                ch.fontname,
                ch.size,
            );
        }
    }

    progress.finish();
    Ok(())
}

fn write_json(
    pdf: &tablers::Pdf,
    page_indices: &[usize],
    progress: &ProgressReporter,
) -> Result<(), i32> {
    let mut all_chars = Vec::new();

    for (i, &idx) in page_indices.iter().enumerate() {
        progress.report(i + 1);

        let page = pdf.page(idx).map_err(|e| {
            eprintln!("Error reading page {}: {e}", idx + 1);
            1
        })?;

        for ch in page.chars() {
            all_chars.push(serde_json::json!({
                "page": idx + 1,
                "text": ch.text,
                "x0": ch.bbox.x0,
                "top": ch.bbox.top,
                "x1": ch.bbox.x1,
                "bottom": ch.bbox.bottom,
                "fontname": ch.fontname,
                "size": ch.size,
            }));
        }
    }

    progress.finish();
    println!("{}", serde_json::to_string(&all_chars).unwrap());
    Ok(())
}

fn write_csv(
    pdf: &tablers::Pdf,
    page_indices: &[usize],
    progress: &ProgressReporter,
) -> Result<(), i32> {
    println!("page,text,x0,top,x1,bottom,fontname,size");

    for (i, &idx) in page_indices.iter().enumerate() {
        progress.report(i + 1);

        let page = pdf.page(idx).map_err(|e| {
            eprintln!("Error reading page {}: {e}", idx + 1);
            1
        })?;

        for ch in page.chars() {
            println!(
                "{},{},{:.2},{:.2},{:.2},{:.2},{},{:.2}",
                idx + 1,
                csv_escape(&ch.text),
                ch.bbox.x0,
                ch.bbox.top,
                ch.bbox.x1,
                ch.bbox.bottom,
                csv_escape(&ch.fontname),
                ch.size,
            );
        }
    }

    progress.finish();
    Ok(())
}
