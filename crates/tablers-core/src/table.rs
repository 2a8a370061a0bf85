//! Table detection: edge snapping, intersection lattice, cell enumeration,
//! table assembly, and cell-text attribution.
//!
//! The pipeline mirrors pdfplumber's table finder:
//! snap edges onto shared grid lines, join collinear segments, intersect
//! horizontal and vertical edges into a lattice of points, enumerate the
//! smallest rectangle anchored at each point, group adjacent cells into
//! tables, and attribute words to cells by center containment.

use crate::edges::{Edge, EdgeSource};
use crate::error::PdfError;
use crate::geometry::{BBox, Orientation};
use crate::painting::Color;
use crate::words::{Word, WordOptions};

/// Which cue a table axis (rows or columns) is detected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Use ruling lines and rect borders (default).
    #[default]
    Lines,
    /// Like [`Strategy::Lines`], but only `Line`/`Rect` sources — curves excluded.
    LinesStrict,
    /// Infer edges from the alignment of extracted words.
    Text,
    /// Use the coordinates supplied via `TableSettings::explicit_lines`.
    Explicit,
}

/// Explicit grid line coordinates for [`Strategy::Explicit`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplicitLines {
    /// `top` coordinates of horizontal grid lines.
    pub horizontal_lines: Vec<f64>,
    /// `x0` coordinates of vertical grid lines.
    pub vertical_lines: Vec<f64>,
}

/// Settings controlling table detection.
#[derive(Debug, Clone)]
pub struct TableSettings {
    /// Strategy used to find column boundaries.
    pub vertical_strategy: Strategy,
    /// Strategy used to find row boundaries.
    pub horizontal_strategy: Strategy,
    /// Coordinates used when either strategy is [`Strategy::Explicit`].
    pub explicit_lines: Option<ExplicitLines>,
    /// Default snapping tolerance (both axes), in page units.
    pub snap_tolerance: f64,
    /// Override of [`Self::snap_tolerance`] for the x axis.
    pub snap_x_tolerance: Option<f64>,
    /// Override of [`Self::snap_tolerance`] for the y axis.
    pub snap_y_tolerance: Option<f64>,
    /// Default gap tolerance for merging collinear edge segments.
    pub join_tolerance: f64,
    /// Override of [`Self::join_tolerance`] for the x axis.
    pub join_x_tolerance: Option<f64>,
    /// Override of [`Self::join_tolerance`] for the y axis.
    pub join_y_tolerance: Option<f64>,
    /// Minimum edge length to keep, applied once edges are canonicalized
    /// (snapped, joined). Shorter edges are dropped before lattice construction.
    pub edge_min_length: f64,
    /// Minimum edge length to keep before snapping/joining — a coarser,
    /// earlier pass that discards stray marks prior to canonicalization.
    pub edge_min_length_prefilter: f64,
    /// Minimum number of words sharing a column start required for [`Strategy::Text`].
    pub min_words_vertical: usize,
    /// Minimum number of words sharing a text line required for [`Strategy::Text`].
    pub min_words_horizontal: usize,
    /// Default tolerance used when testing whether edges cross.
    pub intersection_tolerance: f64,
    /// Override of [`Self::intersection_tolerance`] for the x axis.
    pub intersection_x_tolerance: Option<f64>,
    /// Override of [`Self::intersection_tolerance`] for the y axis.
    pub intersection_y_tolerance: Option<f64>,
    /// Horizontal tolerance used when grouping words into lines during cell-text attribution.
    pub text_x_tolerance: f64,
    /// Vertical tolerance used when grouping words into lines during cell-text attribution.
    pub text_y_tolerance: f64,
    /// Word-extraction settings used when deriving words for [`Strategy::Text`]
    /// and for cell-text attribution, kept independent of the outer
    /// geometric tolerances above.
    pub text_settings: WordOptions,
    /// If false, a table consisting of exactly one cell is discarded.
    pub include_single_cell: bool,
    /// Minimum row count a table must have to be kept.
    pub min_rows: usize,
    /// Minimum column count a table must have to be kept.
    pub min_columns: usize,
    /// If true, strip leading/trailing whitespace from attributed cell text.
    pub need_strip: bool,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            vertical_strategy: Strategy::Lines,
            horizontal_strategy: Strategy::Lines,
            explicit_lines: None,
            snap_tolerance: 3.0,
            snap_x_tolerance: None,
            snap_y_tolerance: None,
            join_tolerance: 3.0,
            join_x_tolerance: None,
            join_y_tolerance: None,
            edge_min_length: 3.0,
            edge_min_length_prefilter: 3.0,
            min_words_vertical: 3,
            min_words_horizontal: 1,
            intersection_tolerance: 3.0,
            intersection_x_tolerance: None,
            intersection_y_tolerance: None,
            text_x_tolerance: 3.0,
            text_y_tolerance: 3.0,
            text_settings: WordOptions::default(),
            include_single_cell: true,
            min_rows: 1,
            min_columns: 1,
            need_strip: true,
        }
    }
}

impl TableSettings {
    fn snap_x(&self) -> f64 {
        self.snap_x_tolerance.unwrap_or(self.snap_tolerance)
    }
    fn snap_y(&self) -> f64 {
        self.snap_y_tolerance.unwrap_or(self.snap_tolerance)
    }
    fn join_x(&self) -> f64 {
        self.join_x_tolerance.unwrap_or(self.join_tolerance)
    }
    fn join_y(&self) -> f64 {
        self.join_y_tolerance.unwrap_or(self.join_tolerance)
    }
    fn intersection_x(&self) -> f64 {
        self.intersection_x_tolerance
            .unwrap_or(self.intersection_tolerance)
    }
    fn intersection_y(&self) -> f64 {
        self.intersection_y_tolerance
            .unwrap_or(self.intersection_tolerance)
    }

    /// Validate that every tolerance/count field satisfies its non-negative
    /// precondition. Zero is accepted; negative values are rejected with a
    /// [`PdfError::ValidationError`] naming the offending field.
    pub fn validate(&self) -> Result<(), PdfError> {
        let checks: &[(&str, f64)] = &[
            ("snap_tolerance", self.snap_tolerance),
            ("join_tolerance", self.join_tolerance),
            ("edge_min_length", self.edge_min_length),
            ("edge_min_length_prefilter", self.edge_min_length_prefilter),
            ("intersection_tolerance", self.intersection_tolerance),
            ("text_x_tolerance", self.text_x_tolerance),
            ("text_y_tolerance", self.text_y_tolerance),
        ];
        for (field, value) in checks {
            if *value < 0.0 {
                return Err(PdfError::non_negative(field));
            }
        }
        for (field, value) in [
            ("snap_x_tolerance", self.snap_x_tolerance),
            ("snap_y_tolerance", self.snap_y_tolerance),
            ("join_x_tolerance", self.join_x_tolerance),
            ("join_y_tolerance", self.join_y_tolerance),
            ("intersection_x_tolerance", self.intersection_x_tolerance),
            ("intersection_y_tolerance", self.intersection_y_tolerance),
        ] {
            if value.is_some_and(|v| v < 0.0) {
                return Err(PdfError::non_negative(field));
            }
        }
        Ok(())
    }
}

/// A point where a horizontal and vertical edge cross (within tolerance).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// x coordinate of the crossing.
    pub x: f64,
    /// y coordinate of the crossing (distance from top of page).
    pub y: f64,
}

/// A rectangular cell bounded by edges on all four sides.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// The cell's bounding box.
    pub bbox: BBox,
    /// Text attributed to this cell, or `None` if no words fell inside it.
    pub text: Option<String>,
}

/// A detected table: its bounding box and cells arranged into rows and columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Bounding box enclosing every cell in the table.
    pub bbox: BBox,
    /// All cells, in no particular order.
    pub cells: Vec<Cell>,
    /// Cells grouped into rows, top to bottom; each row sorted left to right.
    pub rows: Vec<Vec<Cell>>,
    /// Cells grouped into columns, left to right; each column sorted top to bottom.
    pub columns: Vec<Vec<Cell>>,
    /// Whether [`extract_text_for_cells`] was run against this table's cells.
    pub text_extracted: bool,
    /// Index of the page this table was found on.
    pub page_index: usize,
}

impl Table {
    /// Render the table as CSV (RFC 4180 quoting for commas, quotes, and
    /// newlines). Rows are newline-separated with no trailing newline.
    ///
    /// Errors with [`PdfError::InvalidState`] if cell text was never
    /// attributed (see [`extract_text_for_cells`]).
    pub fn to_csv(&self) -> Result<String, PdfError> {
        self.require_text_extracted("to_csv")?;
        Ok(self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| csv_field(c.text.as_deref().unwrap_or("")))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Render the table as a GitHub-flavored Markdown table, with no
    /// trailing newline after the last row.
    ///
    /// The first row is treated as the header. Errors with
    /// [`PdfError::InvalidState`] if cell text was never attributed.
    pub fn to_markdown(&self) -> Result<String, PdfError> {
        self.require_text_extracted("to_markdown")?;
        let mut out = String::new();
        let Some(header) = self.rows.first() else {
            return Ok(out);
        };
        out.push_str("| ");
        out.push_str(
            &header
                .iter()
                .map(|c| md_field(c.text.as_deref().unwrap_or("")))
                .collect::<Vec<_>>()
                .join(" | "),
        );
        out.push_str(" |\n|");
        for _ in header {
            out.push_str(" --- |");
        }
        for row in self.rows.iter().skip(1) {
            out.push('\n');
            out.push_str("| ");
            out.push_str(
                &row.iter()
                    .map(|c| md_field(c.text.as_deref().unwrap_or("")))
                    .collect::<Vec<_>>()
                    .join(" | "),
            );
            out.push_str(" |");
        }
        Ok(out)
    }

    /// Render the table as a minimal `<table>` element, one `<tr>` per row,
    /// with no leading indentation and no trailing newline.
    ///
    /// Errors with [`PdfError::InvalidState`] if cell text was never
    /// attributed.
    pub fn to_html(&self) -> Result<String, PdfError> {
        self.require_text_extracted("to_html")?;
        let mut out = String::from("<table>\n");
        for row in &self.rows {
            out.push_str("<tr>");
            for cell in row {
                out.push_str("<td>");
                out.push_str(&html_escape(cell.text.as_deref().unwrap_or("")));
                out.push_str("</td>");
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</table>");
        Ok(out)
    }

    fn require_text_extracted(&self, method: &str) -> Result<(), PdfError> {
        if self.text_extracted {
            Ok(())
        } else {
            Err(PdfError::InvalidState(format!(
                "{method} called on a table with text_extracted == false; call extract_text_for_cells first"
            )))
        }
    }
}

fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn md_field(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', "<br>")
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Cluster sorted values within `tolerance` of their running neighbor.
///
/// Returns clusters of original indices, in ascending order of value.
fn cluster_sorted(values: &[f64], tolerance: f64) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap());

    let mut clusters: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut last_val = f64::NAN;
    for i in order {
        if current.is_empty() || (values[i] - last_val).abs() <= tolerance {
            current.push(i);
        } else {
            clusters.push(std::mem::take(&mut current));
            current.push(i);
        }
        last_val = values[i];
    }
    if !current.is_empty() {
        clusters.push(current);
    }
    clusters
}

/// Rank of each value's cluster, 0-indexed ascending by cluster value.
fn cluster_rank(values: &[f64], tolerance: f64) -> Vec<usize> {
    let clusters = cluster_sorted(values, tolerance);
    let mut rank = vec![0usize; values.len()];
    for (ci, cluster) in clusters.iter().enumerate() {
        for &i in cluster {
            rank[i] = ci;
        }
    }
    rank
}

/// Snap horizontal edges onto shared `top` values and vertical edges onto
/// shared `x0` values, independently, within the given tolerances.
pub fn snap_edges(edges: &[Edge], x_tolerance: f64, y_tolerance: f64) -> Vec<Edge> {
    let mut result = edges.to_vec();

    let h_idx: Vec<usize> = result
        .iter()
        .enumerate()
        .filter(|(_, e)| e.orientation == Orientation::Horizontal)
        .map(|(i, _)| i)
        .collect();
    let h_vals: Vec<f64> = h_idx.iter().map(|&i| result[i].top).collect();
    for cluster in cluster_sorted(&h_vals, y_tolerance) {
        let avg = cluster.iter().map(|&ci| h_vals[ci]).sum::<f64>() / cluster.len() as f64;
        for &ci in &cluster {
            let idx = h_idx[ci];
            result[idx].top = avg;
            result[idx].bottom = avg;
        }
    }

    let v_idx: Vec<usize> = result
        .iter()
        .enumerate()
        .filter(|(_, e)| e.orientation == Orientation::Vertical)
        .map(|(i, _)| i)
        .collect();
    let v_vals: Vec<f64> = v_idx.iter().map(|&i| result[i].x0).collect();
    for cluster in cluster_sorted(&v_vals, x_tolerance) {
        let avg = cluster.iter().map(|&ci| v_vals[ci]).sum::<f64>() / cluster.len() as f64;
        for &ci in &cluster {
            let idx = v_idx[ci];
            result[idx].x0 = avg;
            result[idx].x1 = avg;
        }
    }

    result
}

/// Merge collinear, overlapping-or-near-adjacent edges of a single orientation
/// into the smallest set of longer segments.
///
/// `edges` must already share the same orientation; edges on different grid
/// lines (different `top` for horizontal, different `x0` for vertical) are
/// joined independently of each other.
pub fn join_edge_group(edges: &[Edge], orientation: Orientation, tolerance: f64) -> Vec<Edge> {
    let fixed: Vec<f64> = edges
        .iter()
        .map(|e| if orientation == Orientation::Horizontal { e.top } else { e.x0 })
        .collect();

    let mut output = Vec::new();
    for cluster in cluster_sorted(&fixed, 1e-6) {
        let fixed_val = fixed[cluster[0]];
        let mut intervals: Vec<(f64, f64, f64, Color, EdgeSource)> = cluster
            .iter()
            .map(|&i| {
                let e = &edges[i];
                let (s, end) = if orientation == Orientation::Horizontal {
                    (e.x0, e.x1)
                } else {
                    (e.top, e.bottom)
                };
                (s, end, e.width, e.color, e.source)
            })
            .collect();
        intervals.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        let mut merged: Vec<(f64, f64, f64, Color, EdgeSource)> = Vec::new();
        for (s, e, width, color, source) in intervals {
            if let Some(last) = merged.last_mut() {
                if s <= last.1 + tolerance {
                    last.1 = last.1.max(e);
                    continue;
                }
            }
            merged.push((s, e, width, color, source));
        }

        for (s, e, width, color, source) in merged {
            let edge = if orientation == Orientation::Horizontal {
                Edge { x0: s, top: fixed_val, x1: e, bottom: fixed_val, orientation, source, width, color }
            } else {
                Edge { x0: fixed_val, top: s, x1: fixed_val, bottom: e, orientation, source, width, color }
            };
            output.push(edge);
        }
    }
    output
}

/// Find every point where a horizontal edge crosses a vertical edge, within tolerance.
pub fn edges_to_intersections(
    h_edges: &[Edge],
    v_edges: &[Edge],
    x_tolerance: f64,
    y_tolerance: f64,
) -> Vec<Intersection> {
    let mut points: Vec<Intersection> = Vec::new();
    for h in h_edges {
        for v in v_edges {
            let x_hits = v.x0 >= h.x0 - x_tolerance && v.x0 <= h.x1 + x_tolerance;
            let y_hits = h.top >= v.top - y_tolerance && h.top <= v.bottom + y_tolerance;
            if x_hits && y_hits {
                let pt = Intersection { x: v.x0, y: h.top };
                if !points
                    .iter()
                    .any(|p| (p.x - pt.x).abs() < 1e-6 && (p.y - pt.y).abs() < 1e-6)
                {
                    points.push(pt);
                }
            }
        }
    }
    points
}

/// Enumerate the smallest bordered rectangle anchored at each intersection point.
///
/// For each point, scans right for the nearest point bordered by a horizontal
/// edge and down for the nearest point bordered by a vertical edge; emits a
/// cell only if the resulting rectangle's remaining two sides are also
/// bordered by edges and its bottom-right corner is itself an intersection.
pub fn intersections_to_cells(
    intersections: &[Intersection],
    h_edges: &[Edge],
    v_edges: &[Edge],
    x_tolerance: f64,
    y_tolerance: f64,
) -> Vec<Cell> {
    let h_spans = |y: f64, x0: f64, x1: f64| {
        h_edges
            .iter()
            .any(|e| (e.top - y).abs() <= y_tolerance && e.x0 <= x0 + x_tolerance && e.x1 >= x1 - x_tolerance)
    };
    let v_spans = |x: f64, y0: f64, y1: f64| {
        v_edges
            .iter()
            .any(|e| (e.x0 - x).abs() <= x_tolerance && e.top <= y0 + y_tolerance && e.bottom >= y1 - y_tolerance)
    };
    let has_point = |x: f64, y: f64| {
        intersections
            .iter()
            .any(|p| (p.x - x).abs() < 1e-6 && (p.y - y).abs() < 1e-6)
    };

    let mut cells = Vec::new();
    for p in intersections {
        let right = intersections
            .iter()
            .filter(|q| (q.y - p.y).abs() < 1e-6 && q.x > p.x + 1e-6)
            .filter(|q| h_spans(p.y, p.x, q.x))
            .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
        let down = intersections
            .iter()
            .filter(|q| (q.x - p.x).abs() < 1e-6 && q.y > p.y + 1e-6)
            .filter(|q| v_spans(p.x, p.y, q.y))
            .min_by(|a, b| a.y.partial_cmp(&b.y).unwrap());

        if let (Some(r), Some(d)) = (right, down) {
            let (cx, cy) = (r.x, d.y);
            if has_point(cx, cy) && h_spans(cy, p.x, cx) && v_spans(cx, p.y, cy) {
                cells.push(Cell { bbox: BBox::new(p.x, p.y, cx, cy), text: None });
            }
        }
    }
    cells
}

fn cells_touch(a: &Cell, b: &Cell) -> bool {
    let tol = 1e-3;
    let x_overlap = a.bbox.x0 < b.bbox.x1 - tol && b.bbox.x0 < a.bbox.x1 - tol;
    let y_overlap = a.bbox.top < b.bbox.bottom - tol && b.bbox.top < a.bbox.bottom - tol;
    let y_touch = (a.bbox.bottom - b.bbox.top).abs() < tol || (b.bbox.bottom - a.bbox.top).abs() < tol;
    let x_touch = (a.bbox.x1 - b.bbox.x0).abs() < tol || (b.bbox.x1 - a.bbox.x0).abs() < tol;
    (x_overlap && y_touch) || (y_overlap && x_touch)
}

/// Group cells sharing an edge into tables, and split each table into rows and columns.
pub fn cells_to_tables(cells: &[Cell]) -> Vec<Table> {
    let n = cells.len();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], x: usize) -> usize {
        if parent[x] != x {
            let root = find(parent, parent[x]);
            parent[x] = root;
        }
        parent[x]
    }

    for i in 0..n {
        for j in (i + 1)..n {
            if cells_touch(&cells[i], &cells[j]) {
                let ri = find(&mut parent, i);
                let rj = find(&mut parent, j);
                if ri != rj {
                    parent[ri] = rj;
                }
            }
        }
    }

    let mut groups: std::collections::HashMap<usize, Vec<usize>> = std::collections::HashMap::new();
    for i in 0..n {
        let root = find(&mut parent, i);
        groups.entry(root).or_default().push(i);
    }

    let mut tables: Vec<Table> = groups
        .into_values()
        .map(|idxs| {
            let table_cells: Vec<Cell> = idxs.iter().map(|&i| cells[i].clone()).collect();
            let bbox = table_cells
                .iter()
                .map(|c| c.bbox)
                .reduce(|a, b| a.union(&b))
                .expect("non-empty connected component");

            let tops: Vec<f64> = table_cells.iter().map(|c| c.bbox.top).collect();
            let lefts: Vec<f64> = table_cells.iter().map(|c| c.bbox.x0).collect();
            let row_rank = cluster_rank(&tops, 1e-3);
            let col_rank = cluster_rank(&lefts, 1e-3);
            let num_rows = row_rank.iter().max().map(|m| m + 1).unwrap_or(0);
            let num_cols = col_rank.iter().max().map(|m| m + 1).unwrap_or(0);

            let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); num_rows];
            let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); num_cols];
            for (i, cell) in table_cells.iter().enumerate() {
                rows[row_rank[i]].push(cell.clone());
                columns[col_rank[i]].push(cell.clone());
            }
            for row in &mut rows {
                row.sort_by(|a, b| a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap());
            }
            for col in &mut columns {
                col.sort_by(|a, b| a.bbox.top.partial_cmp(&b.bbox.top).unwrap());
            }

            Table { bbox, cells: table_cells, rows, columns, text_extracted: false, page_index: 0 }
        })
        .collect();

    tables.sort_by(|a, b| {
        a.bbox
            .top
            .partial_cmp(&b.bbox.top)
            .unwrap()
            .then(a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap())
    });
    tables
}

/// Attribute words to cells by center containment, joining words on a line
/// with a space and joining lines with `\n`.
///
/// A cell with no contained words gets `text: None` — it is still a real
/// cell in the returned table, just an empty one.
///
/// When `need_strip` is true, leading/trailing whitespace is trimmed from
/// the attributed text before it is stored.
pub fn extract_text_for_cells(
    cells: &[Cell],
    words: &[Word],
    x_tolerance: f64,
    y_tolerance: f64,
    need_strip: bool,
) -> Vec<Cell> {
    let _ = x_tolerance; // reserved: word splitting happens upstream during word assembly
    cells
        .iter()
        .map(|cell| {
            let mut matched: Vec<&Word> =
                words.iter().filter(|w| cell.bbox.contains_point(w.bbox.center())).collect();

            if matched.is_empty() {
                return Cell { bbox: cell.bbox, text: None };
            }

            matched.sort_by(|a, b| {
                a.bbox
                    .top
                    .partial_cmp(&b.bbox.top)
                    .unwrap()
                    .then(a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap())
            });

            let mut lines: Vec<Vec<&Word>> = Vec::new();
            for w in matched {
                if let Some(line) = lines.last_mut() {
                    if (w.bbox.top - line[0].bbox.top).abs() <= y_tolerance {
                        line.push(w);
                        continue;
                    }
                }
                lines.push(vec![w]);
            }

            let text = lines
                .iter()
                .map(|line| line.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" "))
                .collect::<Vec<_>>()
                .join("\n");
            let text = if need_strip { text.trim().to_string() } else { text };
            Cell { bbox: cell.bbox, text: Some(text) }
        })
        .collect()
}

/// Derive synthetic edges from the alignment of word bounding boxes, for [`Strategy::Text`].
///
/// A horizontal edge is emitted at the top and bottom of every text line with
/// at least `min_words_horizontal` words; a vertical edge is emitted at every
/// column start shared by at least `min_words_vertical` words.
pub fn words_to_edges_stream(words: &[Word], min_words_vertical: usize, min_words_horizontal: usize) -> Vec<Edge> {
    if words.is_empty() {
        return Vec::new();
    }
    let min_x = words.iter().map(|w| w.bbox.x0).fold(f64::INFINITY, f64::min);
    let max_x = words.iter().map(|w| w.bbox.x1).fold(f64::NEG_INFINITY, f64::max);
    let min_y = words.iter().map(|w| w.bbox.top).fold(f64::INFINITY, f64::min);
    let max_y = words.iter().map(|w| w.bbox.bottom).fold(f64::NEG_INFINITY, f64::max);

    let mut edges = Vec::new();

    let tops: Vec<f64> = words.iter().map(|w| w.bbox.top).collect();
    let line_rank = cluster_rank(&tops, 3.0);
    let num_lines = line_rank.iter().max().map(|m| m + 1).unwrap_or(0);
    let mut line_count = vec![0usize; num_lines];
    let mut line_top = vec![f64::INFINITY; num_lines];
    let mut line_bottom = vec![f64::NEG_INFINITY; num_lines];
    for (i, w) in words.iter().enumerate() {
        let l = line_rank[i];
        line_count[l] += 1;
        line_top[l] = line_top[l].min(w.bbox.top);
        line_bottom[l] = line_bottom[l].max(w.bbox.bottom);
    }
    for l in 0..num_lines {
        if line_count[l] >= min_words_horizontal {
            for y in [line_top[l], line_bottom[l]] {
                edges.push(Edge {
                    x0: min_x,
                    top: y,
                    x1: max_x,
                    bottom: y,
                    orientation: Orientation::Horizontal,
                    source: EdgeSource::Stream,
                    width: 1.0,
                    color: Color::black(),
                });
            }
        }
    }

    let lefts: Vec<f64> = words.iter().map(|w| w.bbox.x0).collect();
    let col_rank = cluster_rank(&lefts, 3.0);
    let num_cols = col_rank.iter().max().map(|m| m + 1).unwrap_or(0);
    let mut col_count = vec![0usize; num_cols];
    let mut col_x = vec![0.0; num_cols];
    for (i, w) in words.iter().enumerate() {
        let c = col_rank[i];
        col_count[c] += 1;
        col_x[c] = w.bbox.x0;
    }
    for c in 0..num_cols {
        if col_count[c] >= min_words_vertical {
            edges.push(Edge {
                x0: col_x[c],
                top: min_y,
                x1: col_x[c],
                bottom: max_y,
                orientation: Orientation::Vertical,
                source: EdgeSource::Stream,
                width: 1.0,
                color: Color::black(),
            });
        }
    }

    edges
}

/// Convert explicit grid line coordinates into full-span edges across `bbox`.
pub fn explicit_lines_to_edges(explicit: &ExplicitLines, bbox: &BBox) -> Vec<Edge> {
    let mut edges = Vec::new();
    for &y in &explicit.horizontal_lines {
        edges.push(Edge {
            x0: bbox.x0,
            top: y,
            x1: bbox.x1,
            bottom: y,
            orientation: Orientation::Horizontal,
            source: EdgeSource::Explicit,
            width: 1.0,
            color: Color::black(),
        });
    }
    for &x in &explicit.vertical_lines {
        edges.push(Edge {
            x0: x,
            top: bbox.top,
            x1: x,
            bottom: bbox.bottom,
            orientation: Orientation::Vertical,
            source: EdgeSource::Explicit,
            width: 1.0,
            color: Color::black(),
        });
    }
    edges
}

/// Runs the table-detection pipeline against a page's edges and words.
pub struct TableFinder {
    edges: Vec<Edge>,
    words: Vec<Word>,
    bbox: BBox,
    settings: TableSettings,
    page_index: usize,
}

impl TableFinder {
    /// Construct a finder over the page's raw edges and words.
    ///
    /// Returns [`PdfError::ValidationError`] if any tolerance or threshold
    /// in `settings` is negative.
    pub fn new(edges: Vec<Edge>, words: Vec<Word>, bbox: BBox, settings: TableSettings) -> Result<Self, PdfError> {
        settings.validate()?;
        Ok(Self { edges, words, bbox, settings, page_index: 0 })
    }

    /// Set the page index stamped onto every [`Table`] this finder produces.
    pub fn with_page_index(mut self, page_index: usize) -> Self {
        self.page_index = page_index;
        self
    }

    /// The raw edges this finder was constructed with.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The settings this finder was constructed with.
    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    fn axis_edges(&self, strategy: Strategy, orientation: Orientation) -> Vec<Edge> {
        match strategy {
            Strategy::Explicit => {
                let explicit = self.settings.explicit_lines.clone().unwrap_or_default();
                explicit_lines_to_edges(&explicit, &self.bbox)
                    .into_iter()
                    .filter(|e| e.orientation == orientation)
                    .collect()
            }
            Strategy::Text => words_to_edges_stream(
                &self.words,
                self.settings.min_words_vertical,
                self.settings.min_words_horizontal,
            )
            .into_iter()
            .filter(|e| e.orientation == orientation)
            .collect(),
            Strategy::Lines => self
                .edges
                .iter()
                .filter(|e| e.orientation == orientation)
                .cloned()
                .collect(),
            Strategy::LinesStrict => self
                .edges
                .iter()
                .filter(|e| {
                    e.orientation == orientation
                        && matches!(
                            e.source,
                            EdgeSource::Line
                                | EdgeSource::RectTop
                                | EdgeSource::RectBottom
                                | EdgeSource::RectLeft
                                | EdgeSource::RectRight
                        )
                })
                .cloned()
                .collect(),
        }
    }

    /// Run the full pipeline and return every table found.
    pub fn find_tables(&self) -> Vec<Table> {
        let mut h_edges = self.axis_edges(self.settings.horizontal_strategy, Orientation::Horizontal);
        let mut v_edges = self.axis_edges(self.settings.vertical_strategy, Orientation::Vertical);

        // Prefilter: drop stray marks before snapping/joining canonicalizes the grid.
        let prefilter_len = self.settings.edge_min_length_prefilter;
        h_edges.retain(|e| (e.x1 - e.x0).abs() >= prefilter_len);
        v_edges.retain(|e| (e.bottom - e.top).abs() >= prefilter_len);

        let combined: Vec<Edge> = h_edges.into_iter().chain(v_edges).collect();
        let combined = snap_edges(&combined, self.settings.snap_x(), self.settings.snap_y());

        let h: Vec<Edge> = combined
            .iter()
            .filter(|e| e.orientation == Orientation::Horizontal)
            .cloned()
            .collect();
        let v: Vec<Edge> = combined
            .iter()
            .filter(|e| e.orientation == Orientation::Vertical)
            .cloned()
            .collect();

        let mut h = join_edge_group(&h, Orientation::Horizontal, self.settings.join_x());
        let mut v = join_edge_group(&v, Orientation::Vertical, self.settings.join_y());

        // Postfilter: re-check length now that collinear segments have been merged.
        let min_len = self.settings.edge_min_length;
        h.retain(|e| (e.x1 - e.x0).abs() >= min_len);
        v.retain(|e| (e.bottom - e.top).abs() >= min_len);

        let intersections = edges_to_intersections(&h, &v, self.settings.intersection_x(), self.settings.intersection_y());
        let cells = intersections_to_cells(&intersections, &h, &v, self.settings.intersection_x(), self.settings.intersection_y());
        let cells = extract_text_for_cells(
            &cells,
            &self.words,
            self.settings.text_x_tolerance,
            self.settings.text_y_tolerance,
            self.settings.need_strip,
        );

        let mut tables = cells_to_tables(&cells);
        tables.retain(|t| {
            (self.settings.include_single_cell || t.cells.len() > 1)
                && t.rows.len() >= self.settings.min_rows
                && t.columns.len() >= self.settings.min_columns
        });
        for table in &mut tables {
            table.text_extracted = !self.words.is_empty();
            table.page_index = self.page_index;
        }
        tables
    }
}
