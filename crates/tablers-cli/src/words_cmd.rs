use std::path::Path;

use tablers::{Pdf, UnicodeNorm, WordOptions};

use crate::cli::OutputFormat;
use crate::shared::{csv_escape, direction_str, open_pdf_with, resolve_pages};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &OutputFormat,
    x_tolerance: f64,
    y_tolerance: f64,
    unicode_norm: Option<UnicodeNorm>,
    password: Option<&str>,
) -> Result<(), i32> {
    let pdf = open_pdf_with(file, unicode_norm, password)?;
    let page_indices = resolve_pages(pages, pdf.page_count())?;

    let opts = WordOptions {
        x_tolerance,
        y_tolerance,
        ..WordOptions::default()
    };

    match format {
        OutputFormat::Text => write_text(&pdf, &page_indices, &opts),
        OutputFormat::Json => write_json(&pdf, &page_indices, &opts),
        OutputFormat::Csv => write_csv(&pdf, &page_indices, &opts),
    }
}

fn write_text(pdf: &Pdf, page_indices: &[usize], opts: &WordOptions) -> Result<(), i32> {
    println!("page\ttext\tx0\ttop\tx1\tbottom\tdoctop\tdirection");

    for &idx in page_indices {
        let page = pdf.page(idx).map_err(|e| {
            eprintln!("Error reading page {}: {e}", idx + 1);
            1
        })?;

        let words = page.extract_words(opts);
        for w in &words {
            println!(
                "{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{}",
                idx + 1,
                w.text,
                w.bbox.x0,
                w.bbox.top,
                w.bbox.x1,
                w.bbox.bottom,
                w.doctop,
                direction_str(&w.direction),
            );
        }
    }

    Ok(())
}

fn write_json(pdf: &Pdf, page_indices: &[usize], opts: &WordOptions) -> Result<(), i32> {
    let mut all_words = Vec::new();

    for &idx in page_indices {
        let page = pdf.page(idx).map_err(|e| {
            eprintln!("Error reading page {}: {e}", idx + 1);
            1
        })?;

        let words = page.extract_words(opts);
        for w in &words {
            all_words.push(serde_json::json!({
                "page": idx + 1,
                "text": w.text,
                "x0": w.bbox.x0,
                "top": w.bbox.top,
                "x1": w.bbox.x1,
                "bottom": w.bbox.bottom,
                "doctop": w.doctop,
                "direction": direction_str(&w.direction),
            }));
        }
    }

    let json_str = serde_json::to_string(&all_words).unwrap();
    println!("{json_str}");

    Ok(())
}

fn write_csv(pdf: &Pdf, page_indices: &[usize], opts: &WordOptions) -> Result<(), i32> {
    println!("page,text,x0,top,x1,bottom");

    for &idx in page_indices {
        let page = pdf.page(idx).map_err(|e| {
            eprintln!("Error reading page {}: {e}", idx + 1);
            1
        })?;

        let words = page.extract_words(opts);
        for w in &words {
            println!(
                "{},{},{:.2},{:.2},{:.2},{:.2}",
                idx + 1,
                csv_escape(&w.text),
                w.bbox.x0,
                w.bbox.top,
                w.bbox.x1,
                w.bbox.bottom,
            );
        }
    }

    Ok(())
}
