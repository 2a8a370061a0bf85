//! Content stream interpreter.
//!
//! Interprets tokenized PDF content stream operators, maintaining graphics and
//! text state, and emitting events to a [`ContentHandler`]. Handles Form XObject
//! recursion via the `Do` operator.

use std::collections::HashMap;

use crate::cid_font::{
    CidFontMetrics, extract_cid_font_metrics, get_descendant_font, get_type0_encoding,
    is_type0_font, parse_predefined_cmap_name,
};
use crate::cjk_encoding::encoding_for_cmap;
use crate::cmap::CMap;
use crate::error::BackendError;
use crate::lopdf_backend::ObjectNameStrExt;
use crate::font_metrics::{FontMetrics, extract_font_metrics};
use crate::handler::{CharEvent, ContentHandler, ImageEvent, PaintOp, PathEvent};
use crate::interpreter_state::InterpreterState;
use crate::lopdf_backend::object_to_f64;
use crate::text_renderer::{
    RawChar, TjElement, show_string, show_string_cid, show_string_legacy_cjk,
    show_string_with_positioning, show_string_with_positioning_legacy_cjk,
    show_string_with_positioning_mode,
};
use crate::text_state::TextState;
use crate::tokenizer::{Operand, tokenize};
use tablers_core::ExtractOptions;
use tablers_core::PathBuilder;

/// Cached font information for the interpreter.
struct CachedFont {
    metrics: FontMetrics,
    cmap: Option<CMap>,
    base_name: String,
    /// CID font metrics (present for Type0/CID fonts).
    cid_metrics: Option<CidFontMetrics>,
    /// Whether this is a CID (composite/Type0) font.
    is_cid_font: bool,
    /// Writing mode: 0 = horizontal, 1 = vertical.
    /// Used in US-041 for vertical writing mode support.
    #[allow(dead_code)]
    writing_mode: u8,
    /// Legacy predefined CJK CMap encoding (e.g. GBK-EUC-H), when the Type0
    /// font's encoding is not Identity-H/V. `None` for simple fonts and for
    /// Identity-encoded CID fonts.
    legacy_cjk_encoding: Option<&'static encoding_rs::Encoding>,
}

/// Interpret a content stream and emit events to the handler.
///
/// Processes tokenized PDF operators, updates graphics/text state, and calls
/// handler methods for text, path, and image events. Handles Form XObject
/// recursion via the `Do` operator.
///
/// # Arguments
///
/// * `doc` - The lopdf document (for resolving references)
/// * `stream_bytes` - Decoded content stream bytes
/// * `resources` - Resources dictionary for this scope
/// * `handler` - Event callback handler
/// * `options` - Resource limits and settings
/// * `depth` - Current recursion depth (0 for page-level)
/// * `gstate` - Current graphics/interpreter state
/// * `tstate` - Current text state
#[allow(clippy::too_many_arguments)]
pub(crate) fn interpret_content_stream(
    doc: &lopdf::Document,
    stream_bytes: &[u8],
    resources: &lopdf::Dictionary,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
    depth: usize,
    gstate: &mut InterpreterState,
    tstate: &mut TextState,
) -> Result<(), BackendError> {
    if depth > options.max_recursion_depth {
        return Err(BackendError::Interpreter(format!(
            "Form XObject recursion depth {} exceeds limit {}",
            depth, options.max_recursion_depth
        )));
    }

    let operators = tokenize(stream_bytes)?;
    let mut font_cache: HashMap<String, CachedFont> = HashMap::new();
    let mut path_builder = PathBuilder::new(*gstate.ctm());
    let mut mc_stack: Vec<(Option<String>, Option<u32>)> = Vec::new();

    for op in &operators {
        match op.name.as_str() {
            // --- Graphics state operators ---
            "q" => gstate.save_state(),
            "Q" => {
                gstate.restore_state();
            }
            "cm" => {
                if op.operands.len() >= 6 {
                    let a = get_f64(&op.operands, 0).unwrap_or(1.0);
                    let b = get_f64(&op.operands, 1).unwrap_or(0.0);
                    let c = get_f64(&op.operands, 2).unwrap_or(0.0);
                    let d = get_f64(&op.operands, 3).unwrap_or(1.0);
                    let e = get_f64(&op.operands, 4).unwrap_or(0.0);
                    let f = get_f64(&op.operands, 5).unwrap_or(0.0);
                    gstate.concat_matrix(a, b, c, d, e, f);
                }
            }
            "w" => {
                if let Some(v) = get_f64(&op.operands, 0) {
                    gstate.set_line_width(v);
                }
            }

            // --- Color operators ---
            "G" => {
                if let Some(g) = get_f32(&op.operands, 0) {
                    gstate.set_stroking_gray(g);
                }
            }
            "g" => {
                if let Some(g) = get_f32(&op.operands, 0) {
                    gstate.set_non_stroking_gray(g);
                }
            }
            "RG" => {
                if op.operands.len() >= 3 {
                    let r = get_f32(&op.operands, 0).unwrap_or(0.0);
                    let g = get_f32(&op.operands, 1).unwrap_or(0.0);
                    let b = get_f32(&op.operands, 2).unwrap_or(0.0);
                    gstate.set_stroking_rgb(r, g, b);
                }
            }
            "rg" => {
                if op.operands.len() >= 3 {
                    let r = get_f32(&op.operands, 0).unwrap_or(0.0);
                    let g = get_f32(&op.operands, 1).unwrap_or(0.0);
                    let b = get_f32(&op.operands, 2).unwrap_or(0.0);
                    gstate.set_non_stroking_rgb(r, g, b);
                }
            }
            "K" => {
                if op.operands.len() >= 4 {
                    let c = get_f32(&op.operands, 0).unwrap_or(0.0);
                    let m = get_f32(&op.operands, 1).unwrap_or(0.0);
                    let y = get_f32(&op.operands, 2).unwrap_or(0.0);
                    let k = get_f32(&op.operands, 3).unwrap_or(0.0);
                    gstate.set_stroking_cmyk(c, m, y, k);
                }
            }
            "k" => {
                if op.operands.len() >= 4 {
                    let c = get_f32(&op.operands, 0).unwrap_or(0.0);
                    let m = get_f32(&op.operands, 1).unwrap_or(0.0);
                    let y = get_f32(&op.operands, 2).unwrap_or(0.0);
                    let k = get_f32(&op.operands, 3).unwrap_or(0.0);
                    gstate.set_non_stroking_cmyk(c, m, y, k);
                }
            }
            "SC" | "SCN" => {
                let components: Vec<f32> = op.operands.iter().filter_map(operand_to_f32).collect();
                gstate.set_stroking_color(&components);
            }
            "sc" | "scn" => {
                let components: Vec<f32> = op.operands.iter().filter_map(operand_to_f32).collect();
                gstate.set_non_stroking_color(&components);
            }

            // --- Text state operators ---
            "BT" => tstate.begin_text(),
            "ET" => tstate.end_text(),
            "Tf" => {
                if op.operands.len() >= 2 {
                    let font_name = operand_to_name(&op.operands[0]);
                    let size = get_f64(&op.operands, 1).unwrap_or(0.0);
                    tstate.set_font(font_name.clone(), size);
                    load_font_if_needed(doc, resources, &font_name, &mut font_cache);
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    let a = get_f64(&op.operands, 0).unwrap_or(1.0);
                    let b = get_f64(&op.operands, 1).unwrap_or(0.0);
                    let c = get_f64(&op.operands, 2).unwrap_or(0.0);
                    let d = get_f64(&op.operands, 3).unwrap_or(1.0);
                    let e = get_f64(&op.operands, 4).unwrap_or(0.0);
                    let f = get_f64(&op.operands, 5).unwrap_or(0.0);
                    tstate.set_text_matrix(a, b, c, d, e, f);
                }
            }
            "Td" => {
                if op.operands.len() >= 2 {
                    let tx = get_f64(&op.operands, 0).unwrap_or(0.0);
                    let ty = get_f64(&op.operands, 1).unwrap_or(0.0);
                    tstate.move_text_position(tx, ty);
                }
            }
            "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_f64(&op.operands, 0).unwrap_or(0.0);
                    let ty = get_f64(&op.operands, 1).unwrap_or(0.0);
                    tstate.move_text_position_and_set_leading(tx, ty);
                }
            }
            "T*" => tstate.move_to_next_line(),
            "Tc" => {
                if let Some(v) = get_f64(&op.operands, 0) {
                    tstate.set_char_spacing(v);
                }
            }
            "Tw" => {
                if let Some(v) = get_f64(&op.operands, 0) {
                    tstate.set_word_spacing(v);
                }
            }
            "Tz" => {
                if let Some(v) = get_f64(&op.operands, 0) {
                    tstate.set_h_scaling(v);
                }
            }
            "TL" => {
                if let Some(v) = get_f64(&op.operands, 0) {
                    tstate.set_leading(v);
                }
            }
            "Tr" => {
                if let Some(v) = get_i64(&op.operands, 0) {
                    if let Some(mode) = crate::text_state::TextRenderMode::from_i64(v) {
                        tstate.set_render_mode(mode);
                    }
                }
            }
            "Ts" => {
                if let Some(v) = get_f64(&op.operands, 0) {
                    tstate.set_rise(v);
                }
            }

            // --- Text rendering operators ---
            "Tj" => {
                handle_tj(tstate, gstate, handler, &op.operands, &font_cache, &mc_stack);
            }
            "TJ" => {
                handle_tj_array(tstate, gstate, handler, &op.operands, &font_cache, &mc_stack);
            }
            "'" => {
                // T* then Tj
                tstate.move_to_next_line();
                handle_tj(tstate, gstate, handler, &op.operands, &font_cache, &mc_stack);
            }
            "\"" => {
                // aw ac (string) "
                if op.operands.len() >= 3 {
                    if let Some(aw) = get_f64(&op.operands, 0) {
                        tstate.set_word_spacing(aw);
                    }
                    if let Some(ac) = get_f64(&op.operands, 1) {
                        tstate.set_char_spacing(ac);
                    }
                    tstate.move_to_next_line();
                    // Show the string (3rd operand)
                    let string_operands = vec![op.operands[2].clone()];
                    handle_tj(
                        tstate,
                        gstate,
                        handler,
                        &string_operands,
                        &font_cache,
                        &mc_stack,
                    );
                }
            }

            // --- Marked content operators ---
            "BDC" => {
                let tag = op.operands.first().and_then(operand_to_name_opt);
                let mcid = op
                    .operands
                    .get(1)
                    .and_then(|props| resolve_mcid(doc, resources, props));
                mc_stack.push((tag, mcid));
            }
            "BMC" => {
                let tag = op.operands.first().and_then(operand_to_name_opt);
                mc_stack.push((tag, None));
            }
            "EMC" => {
                mc_stack.pop();
            }

            // --- XObject operator ---
            "Do" => {
                if let Some(Operand::Name(name)) = op.operands.first() {
                    handle_do(
                        doc, resources, handler, options, depth, gstate, tstate, name,
                    )?;
                }
            }

            // --- Path construction operators ---
            "m" => {
                if op.operands.len() >= 2 {
                    let x = get_f64(&op.operands, 0).unwrap_or(0.0);
                    let y = get_f64(&op.operands, 1).unwrap_or(0.0);
                    path_builder.set_ctm(*gstate.ctm());
                    path_builder.move_to(x, y);
                }
            }
            "l" => {
                if op.operands.len() >= 2 {
                    let x = get_f64(&op.operands, 0).unwrap_or(0.0);
                    let y = get_f64(&op.operands, 1).unwrap_or(0.0);
                    path_builder.set_ctm(*gstate.ctm());
                    path_builder.line_to(x, y);
                }
            }
            "c" => {
                if op.operands.len() >= 6 {
                    let x1 = get_f64(&op.operands, 0).unwrap_or(0.0);
                    let y1 = get_f64(&op.operands, 1).unwrap_or(0.0);
                    let x2 = get_f64(&op.operands, 2).unwrap_or(0.0);
                    let y2 = get_f64(&op.operands, 3).unwrap_or(0.0);
                    let x3 = get_f64(&op.operands, 4).unwrap_or(0.0);
                    let y3 = get_f64(&op.operands, 5).unwrap_or(0.0);
                    path_builder.set_ctm(*gstate.ctm());
                    path_builder.curve_to(x1, y1, x2, y2, x3, y3);
                }
            }
            "v" => {
                if op.operands.len() >= 4 {
                    let x2 = get_f64(&op.operands, 0).unwrap_or(0.0);
                    let y2 = get_f64(&op.operands, 1).unwrap_or(0.0);
                    let x3 = get_f64(&op.operands, 2).unwrap_or(0.0);
                    let y3 = get_f64(&op.operands, 3).unwrap_or(0.0);
                    path_builder.set_ctm(*gstate.ctm());
                    path_builder.curve_to_v(x2, y2, x3, y3);
                }
            }
            "y" => {
                if op.operands.len() >= 4 {
                    let x1 = get_f64(&op.operands, 0).unwrap_or(0.0);
                    let y1 = get_f64(&op.operands, 1).unwrap_or(0.0);
                    let x3 = get_f64(&op.operands, 2).unwrap_or(0.0);
                    let y3 = get_f64(&op.operands, 3).unwrap_or(0.0);
                    path_builder.set_ctm(*gstate.ctm());
                    path_builder.curve_to_y(x1, y1, x3, y3);
                }
            }
            "h" => path_builder.close_path(),
            "re" => {
                if op.operands.len() >= 4 {
                    let x = get_f64(&op.operands, 0).unwrap_or(0.0);
                    let y = get_f64(&op.operands, 1).unwrap_or(0.0);
                    let w = get_f64(&op.operands, 2).unwrap_or(0.0);
                    let h = get_f64(&op.operands, 3).unwrap_or(0.0);
                    path_builder.set_ctm(*gstate.ctm());
                    path_builder.rectangle(x, y, w, h);
                }
            }

            // --- Path painting operators ---
            "S" => emit_path_event(&mut path_builder, gstate, handler, PathPaintKind::Stroke),
            "s" => emit_path_event(&mut path_builder, gstate, handler, PathPaintKind::CloseAndStroke),
            "f" | "F" => emit_path_event(&mut path_builder, gstate, handler, PathPaintKind::Fill),
            "f*" => emit_path_event(&mut path_builder, gstate, handler, PathPaintKind::FillEvenOdd),
            "B" => emit_path_event(&mut path_builder, gstate, handler, PathPaintKind::FillAndStroke),
            "B*" => emit_path_event(
                &mut path_builder,
                gstate,
                handler,
                PathPaintKind::FillEvenOddAndStroke,
            ),
            "b" => emit_path_event(
                &mut path_builder,
                gstate,
                handler,
                PathPaintKind::CloseFillAndStroke,
            ),
            "b*" => emit_path_event(
                &mut path_builder,
                gstate,
                handler,
                PathPaintKind::CloseFillEvenOddAndStroke,
            ),
            "n" => {
                path_builder.end_path();
            }
            // W/W* mark the clipping path; clipping itself isn't tracked, and the
            // path is left intact for the paint operator (usually `n`) that follows.
            "W" | "W*" => {}

            // Other operators (marked content, compatibility, etc.) - no state to track
            _ => {}
        }
    }

    Ok(())
}

/// Which path-painting operator triggered [`emit_path_event`].
enum PathPaintKind {
    Stroke,
    CloseAndStroke,
    Fill,
    FillEvenOdd,
    FillAndStroke,
    FillEvenOddAndStroke,
    CloseFillAndStroke,
    CloseFillEvenOddAndStroke,
}

/// Paint the accumulated path and emit a [`PathEvent`] to the handler.
///
/// Empty paths (e.g. a bare `S` with no preceding construction operators)
/// produce no event.
fn emit_path_event(
    path_builder: &mut PathBuilder,
    gstate: &InterpreterState,
    handler: &mut dyn ContentHandler,
    kind: PathPaintKind,
) {
    let gs = gstate.graphics_state();
    let painted = match kind {
        PathPaintKind::Stroke => path_builder.stroke(gs),
        PathPaintKind::CloseAndStroke => path_builder.close_and_stroke(gs),
        PathPaintKind::Fill => path_builder.fill(gs),
        PathPaintKind::FillEvenOdd => path_builder.fill_even_odd(gs),
        PathPaintKind::FillAndStroke => path_builder.fill_and_stroke(gs),
        PathPaintKind::FillEvenOddAndStroke => path_builder.fill_even_odd_and_stroke(gs),
        PathPaintKind::CloseFillAndStroke => path_builder.close_fill_and_stroke(gs),
        PathPaintKind::CloseFillEvenOddAndStroke => {
            path_builder.close_fill_even_odd_and_stroke(gs)
        }
    };

    if painted.path.segments.is_empty() {
        return;
    }

    let paint_op = if painted.stroke && painted.fill {
        PaintOp::FillAndStroke
    } else if painted.fill {
        PaintOp::Fill
    } else {
        PaintOp::Stroke
    };

    handler.on_path_painted(PathEvent {
        segments: painted.path.segments,
        paint_op,
        line_width: painted.line_width,
        stroking_color: painted.stroke.then_some(painted.stroke_color),
        non_stroking_color: painted.fill.then_some(painted.fill_color),
        ctm: gstate.ctm_array(),
        fill_rule: painted.fill.then_some(painted.fill_rule),
    });
}

// --- Operand extraction helpers ---

fn get_f64(operands: &[Operand], index: usize) -> Option<f64> {
    operands.get(index).and_then(Operand::as_f64)
}

fn get_f32(operands: &[Operand], index: usize) -> Option<f32> {
    get_f64(operands, index).map(|v| v as f32)
}

fn get_i64(operands: &[Operand], index: usize) -> Option<i64> {
    operands.get(index).and_then(Operand::as_i64)
}

fn operand_to_f32(o: &Operand) -> Option<f32> {
    o.as_f64().map(|v| v as f32)
}

fn operand_to_name(o: &Operand) -> String {
    o.as_name().unwrap_or_default().to_string()
}

fn operand_to_name_opt(o: &Operand) -> Option<String> {
    o.as_name().map(str::to_string)
}

fn operand_to_u32(o: &Operand) -> Option<u32> {
    o.as_i64().map(|i| i as u32)
}

/// Resolve the MCID for a `BDC` operator's properties operand, which is
/// either an inline dictionary or a name referencing `/Resources/Properties`.
fn resolve_mcid(doc: &lopdf::Document, resources: &lopdf::Dictionary, props: &Operand) -> Option<u32> {
    match props {
        Operand::Dictionary(entries) => entries
            .iter()
            .find(|(k, _)| k == "MCID")
            .and_then(|(_, v)| operand_to_u32(v)),
        Operand::Name(name) => {
            let props_obj = resources.get(b"Properties").ok()?;
            let props_obj = resolve_ref(doc, props_obj);
            let props_dict = props_obj.as_dict().ok()?;
            let entry = props_dict.get(name.as_bytes()).ok()?;
            let entry = resolve_ref(doc, entry);
            let entry_dict = entry.as_dict().ok()?;
            entry_dict
                .get(b"MCID")
                .ok()
                .and_then(|o| o.as_i64().ok())
                .map(|v| v as u32)
        }
        _ => None,
    }
}

fn current_mcid(mc_stack: &[(Option<String>, Option<u32>)]) -> Option<u32> {
    mc_stack.iter().rev().find_map(|(_, mcid)| *mcid)
}

fn current_tag(mc_stack: &[(Option<String>, Option<u32>)]) -> Option<String> {
    mc_stack.last().and_then(|(tag, _)| tag.clone())
}

fn operand_to_string_bytes(o: &Operand) -> Option<&[u8]> {
    match o {
        Operand::LiteralString(s) | Operand::HexString(s) => Some(s),
        _ => None,
    }
}

// --- Font loading ---

fn load_font_if_needed(
    doc: &lopdf::Document,
    resources: &lopdf::Dictionary,
    font_name: &str,
    cache: &mut HashMap<String, CachedFont>,
) {
    if cache.contains_key(font_name) {
        return;
    }

    // Look up /Resources/Font/<font_name>
    let font_dict = (|| -> Option<&lopdf::Dictionary> {
        let fonts_obj = resources.get(b"Font").ok()?;
        let fonts_obj = resolve_ref(doc, fonts_obj);
        let fonts_dict = fonts_obj.as_dict().ok()?;
        let font_obj = fonts_dict.get(font_name.as_bytes()).ok()?;
        let font_obj = resolve_ref(doc, font_obj);
        font_obj.as_dict().ok()
    })();

    let (metrics, cmap, base_name, cid_metrics, is_cid_font, writing_mode, legacy_cjk_encoding) =
        if let Some(fd) = font_dict {
            if is_type0_font(fd) {
                // Type0 (composite/CID) font
                let (cid_met, wm, legacy_cjk) = load_cid_font(doc, fd);
                let metrics = if let Some(ref cm) = cid_met {
                    // Create a FontMetrics from CID font data for backward compat
                    FontMetrics::new(
                        Vec::new(),
                        0,
                        0,
                        cm.default_width(),
                        cm.ascent(),
                        cm.descent(),
                        cm.font_bbox(),
                    )
                } else {
                    FontMetrics::default_metrics()
                };

                // Extract ToUnicode CMap if present
                let cmap = extract_tounicode_cmap(doc, fd);

                let base_name = fd
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name_str().ok())
                    .unwrap_or(font_name)
                    .to_string();

                (metrics, cmap, base_name, cid_met, true, wm, legacy_cjk)
            } else {
                // Simple font
                let metrics = extract_font_metrics(doc, fd)
                    .unwrap_or_else(|_| FontMetrics::default_metrics());
                let cmap = extract_tounicode_cmap(doc, fd);
                let base_name = fd
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name_str().ok())
                    .unwrap_or(font_name)
                    .to_string();

                (metrics, cmap, base_name, None, false, 0, None)
            }
        } else {
            (
                FontMetrics::default_metrics(),
                None,
                font_name.to_string(),
                None,
                false,
                0,
                None,
            )
        };

    cache.insert(
        font_name.to_string(),
        CachedFont {
            metrics,
            cmap,
            base_name,
            cid_metrics,
            is_cid_font,
            writing_mode,
            legacy_cjk_encoding,
        },
    );
}

/// Extract ToUnicode CMap from a font dictionary.
fn extract_tounicode_cmap(doc: &lopdf::Document, fd: &lopdf::Dictionary) -> Option<CMap> {
    let tounicode_obj = fd.get(b"ToUnicode").ok()?;
    let tounicode_obj = resolve_ref(doc, tounicode_obj);
    let stream = tounicode_obj.as_stream().ok()?;
    let data = decode_stream(stream).ok()?;
    CMap::parse(&data).ok()
}

/// Load CID font information from a Type0 font dictionary.
fn load_cid_font(
    doc: &lopdf::Document,
    type0_dict: &lopdf::Dictionary,
) -> (Option<CidFontMetrics>, u8, Option<&'static encoding_rs::Encoding>) {
    let encoding_name = get_type0_encoding(type0_dict);

    // Determine writing mode from encoding name
    let writing_mode = encoding_name
        .as_deref()
        .and_then(parse_predefined_cmap_name)
        .map(|info| info.writing_mode)
        .unwrap_or(0);

    // Identity-H/V carries no legacy byte encoding; predefined CJK CMaps do.
    let legacy_cjk_encoding = encoding_name.as_deref().and_then(encoding_for_cmap);

    // Get descendant CIDFont dictionary
    let cid_metrics = get_descendant_font(doc, type0_dict)
        .and_then(|desc| extract_cid_font_metrics(doc, desc).ok());

    (cid_metrics, writing_mode, legacy_cjk_encoding)
}

// --- Text rendering ---

/// Build a width lookup function for a cached font.
/// For CID fonts, uses CidFontMetrics; for simple fonts, uses FontMetrics.
fn get_width_fn(cached: Option<&CachedFont>) -> Box<dyn Fn(u32) -> f64 + '_> {
    match cached {
        Some(cf) if cf.is_cid_font => {
            if let Some(ref cid_met) = cf.cid_metrics {
                Box::new(move |code: u32| cid_met.get_width(code))
            } else {
                Box::new(move |code: u32| cf.metrics.get_width(code))
            }
        }
        Some(cf) => Box::new(move |code: u32| cf.metrics.get_width(code)),
        None => {
            let default_metrics = FontMetrics::default_metrics();
            Box::new(move |code: u32| default_metrics.get_width(code))
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_tj(
    tstate: &mut TextState,
    gstate: &InterpreterState,
    handler: &mut dyn ContentHandler,
    operands: &[Operand],
    font_cache: &HashMap<String, CachedFont>,
    mc_stack: &[(Option<String>, Option<u32>)],
) {
    let string_bytes = match operands.first().and_then(operand_to_string_bytes) {
        Some(bytes) => bytes,
        None => return,
    };

    let cached = font_cache.get(&tstate.font_name);
    let width_fn = get_width_fn(cached);
    let raw_chars = show_string_for_font(tstate, string_bytes, &*width_fn, cached);

    emit_char_events(raw_chars, tstate, gstate, handler, cached, mc_stack);
}

/// Dispatch a `Tj` string to the right decoder for the active font: legacy
/// predefined CJK CMap, Identity CID (2-byte codes), or a simple font.
fn show_string_for_font(
    tstate: &mut TextState,
    string_bytes: &[u8],
    width_fn: &dyn Fn(u32) -> f64,
    cached: Option<&CachedFont>,
) -> Vec<(RawChar, Option<String>)> {
    match cached {
        Some(cf) if cf.legacy_cjk_encoding.is_some() => {
            show_string_legacy_cjk(tstate, string_bytes, width_fn, cf.legacy_cjk_encoding.unwrap())
                .into_iter()
                .map(|(rc, unicode)| (rc, Some(unicode)))
                .collect()
        }
        Some(cf) if cf.is_cid_font => show_string_cid(tstate, string_bytes, width_fn)
            .into_iter()
            .map(|rc| (rc, None))
            .collect(),
        _ => show_string(tstate, string_bytes, width_fn)
            .into_iter()
            .map(|rc| (rc, None))
            .collect(),
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_tj_array(
    tstate: &mut TextState,
    gstate: &InterpreterState,
    handler: &mut dyn ContentHandler,
    operands: &[Operand],
    font_cache: &HashMap<String, CachedFont>,
    mc_stack: &[(Option<String>, Option<u32>)],
) {
    let array = match operands.first() {
        Some(Operand::Array(arr)) => arr,
        _ => return,
    };

    // Convert Operand array to TjElement array
    let elements: Vec<TjElement> = array
        .iter()
        .filter_map(|o| match o {
            Operand::LiteralString(s) | Operand::HexString(s) => Some(TjElement::String(s.clone())),
            _ => o.as_f64().map(TjElement::Adjustment),
        })
        .collect();

    let cached = font_cache.get(&tstate.font_name);
    let width_fn = get_width_fn(cached);
    let raw_chars: Vec<(RawChar, Option<String>)> = match cached {
        Some(cf) if cf.legacy_cjk_encoding.is_some() => show_string_with_positioning_legacy_cjk(
            tstate,
            &elements,
            &*width_fn,
            cf.legacy_cjk_encoding.unwrap(),
        )
        .into_iter()
        .map(|(rc, unicode)| (rc, Some(unicode)))
        .collect(),
        Some(cf) => show_string_with_positioning_mode(tstate, &elements, &*width_fn, cf.is_cid_font)
            .into_iter()
            .map(|rc| (rc, None))
            .collect(),
        None => show_string_with_positioning(tstate, &elements, &*width_fn)
            .into_iter()
            .map(|rc| (rc, None))
            .collect(),
    };

    emit_char_events(raw_chars, tstate, gstate, handler, cached, mc_stack);
}

#[allow(clippy::too_many_arguments)]
fn emit_char_events(
    raw_chars: Vec<(RawChar, Option<String>)>,
    tstate: &TextState,
    gstate: &InterpreterState,
    handler: &mut dyn ContentHandler,
    cached: Option<&CachedFont>,
    mc_stack: &[(Option<String>, Option<u32>)],
) {
    let ctm = gstate.ctm_array();
    let font_name = cached.map_or_else(|| tstate.font_name.clone(), |c| c.base_name.clone());
    let mcid = current_mcid(mc_stack);
    let tag = current_tag(mc_stack);
    let ascent = cached.map_or_else(|| FontMetrics::default_metrics().ascent(), |c| c.metrics.ascent());
    let descent = cached.map_or_else(|| FontMetrics::default_metrics().descent(), |c| c.metrics.descent());

    for (rc, resolved_unicode) in raw_chars {
        // A legacy CJK decoder resolves Unicode directly from its encoding;
        // otherwise fall back to the font's /ToUnicode CMap, if any.
        let unicode = resolved_unicode.or_else(|| {
            cached.and_then(|c| {
                c.cmap
                    .as_ref()
                    .and_then(|cm| cm.lookup(rc.char_code).map(|s| s.to_string()))
            })
        });

        // Use CID font metrics for displacement if available
        let displacement = match cached {
            Some(cf) if cf.is_cid_font => cf
                .cid_metrics
                .as_ref()
                .map_or(600.0, |cm| cm.get_width(rc.char_code)),
            Some(cf) => cf.metrics.get_width(rc.char_code),
            None => 600.0,
        };

        handler.on_char(CharEvent {
            char_code: rc.char_code,
            unicode,
            font_name: font_name.clone(),
            font_size: tstate.font_size,
            text_matrix: rc.text_matrix,
            ctm,
            displacement,
            char_spacing: tstate.char_spacing,
            word_spacing: tstate.word_spacing,
            h_scaling: tstate.h_scaling_normalized(),
            rise: tstate.rise,
            ascent,
            descent,
            mcid,
            tag: tag.clone(),
        });
    }
}

// --- Do operator: XObject handling ---

#[allow(clippy::too_many_arguments)]
fn handle_do(
    doc: &lopdf::Document,
    resources: &lopdf::Dictionary,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
    depth: usize,
    gstate: &mut InterpreterState,
    tstate: &mut TextState,
    name: &str,
) -> Result<(), BackendError> {
    // Look up /Resources/XObject/<name>
    let xobj_dict = resources.get(b"XObject").map_err(|_| {
        BackendError::Interpreter(format!(
            "no /XObject dictionary in resources for Do /{name}"
        ))
    })?;
    let xobj_dict = resolve_ref(doc, xobj_dict);
    let xobj_dict = xobj_dict.as_dict().map_err(|_| {
        BackendError::Interpreter("/XObject resource is not a dictionary".to_string())
    })?;

    let xobj_entry = xobj_dict.get(name.as_bytes()).map_err(|_| {
        BackendError::Interpreter(format!("XObject /{name} not found in resources"))
    })?;

    let xobj_id = xobj_entry.as_reference().map_err(|_| {
        BackendError::Interpreter(format!("XObject /{name} is not an indirect reference"))
    })?;

    let xobj = doc.get_object(xobj_id).map_err(|e| {
        BackendError::Interpreter(format!("failed to resolve XObject /{name}: {e}"))
    })?;

    let stream = xobj
        .as_stream()
        .map_err(|e| BackendError::Interpreter(format!("XObject /{name} is not a stream: {e}")))?;

    let subtype = stream
        .dict
        .get(b"Subtype")
        .ok()
        .and_then(|o| o.as_name_str().ok())
        .unwrap_or("");

    match subtype {
        "Form" => handle_form_xobject(
            doc, stream, name, resources, handler, options, depth, gstate, tstate,
        ),
        "Image" => {
            handle_image_xobject(stream, name, gstate, handler);
            Ok(())
        }
        _ => {
            // Unknown XObject subtype â€” ignore
            Ok(())
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_form_xobject(
    doc: &lopdf::Document,
    stream: &lopdf::Stream,
    name: &str,
    parent_resources: &lopdf::Dictionary,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
    depth: usize,
    gstate: &mut InterpreterState,
    tstate: &mut TextState,
) -> Result<(), BackendError> {
    // Save graphics state
    gstate.save_state();

    // Apply /Matrix if present (transforms Form XObject space to parent space)
    if let Ok(matrix_obj) = stream.dict.get(b"Matrix") {
        if let Ok(arr) = matrix_obj.as_array() {
            if arr.len() == 6 {
                let vals: Result<Vec<f64>, _> = arr.iter().map(object_to_f64).collect();
                if let Ok(vals) = vals {
                    gstate.concat_matrix(vals[0], vals[1], vals[2], vals[3], vals[4], vals[5]);
                }
            }
        }
    }

    // Get Form XObject's resources (fall back to parent resources)
    let form_resources_dict;
    let form_resources = if let Ok(res_obj) = stream.dict.get(b"Resources") {
        let res_obj = resolve_ref(doc, res_obj);
        match res_obj.as_dict() {
            Ok(d) => d,
            Err(_) => parent_resources,
        }
    } else {
        // Check if /Resources is an inline dictionary (common for Form XObjects)
        // The dict.get already handles this, so use parent as fallback
        // But also check if it's an indirect reference in the dict
        if let Ok(res_ref) = stream.dict.get(b"Resources") {
            if let Ok(id) = res_ref.as_reference() {
                if let Ok(obj) = doc.get_object(id) {
                    if let Ok(d) = obj.as_dict() {
                        form_resources_dict = d.clone();
                        &form_resources_dict
                    } else {
                        parent_resources
                    }
                } else {
                    parent_resources
                }
            } else {
                parent_resources
            }
        } else {
            parent_resources
        }
    };

    // Decode stream content
    let content_bytes = decode_stream(stream).map_err(|e| {
        BackendError::Interpreter(format!("failed to decode Form XObject /{name} stream: {e}"))
    })?;

    // Recursively interpret the Form XObject content stream
    interpret_content_stream(
        doc,
        &content_bytes,
        form_resources,
        handler,
        options,
        depth + 1,
        gstate,
        tstate,
    )?;

    // Restore graphics state
    gstate.restore_state();

    Ok(())
}

fn handle_image_xobject(
    stream: &lopdf::Stream,
    name: &str,
    gstate: &InterpreterState,
    handler: &mut dyn ContentHandler,
) {
    let width = stream
        .dict
        .get(b"Width")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(0) as u32;

    let height = stream
        .dict
        .get(b"Height")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(0) as u32;

    let colorspace = stream
        .dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| o.as_name_str().ok())
        .map(|s| s.to_string());

    let bits_per_component = stream
        .dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .map(|v| v as u32);

    let filter = stream
        .dict
        .get(b"Filter")
        .ok()
        .and_then(|o| o.as_name_str().ok())
        .map(|s| s.to_string());

    handler.on_image(ImageEvent {
        name: name.to_string(),
        ctm: gstate.ctm_array(),
        width,
        height,
        colorspace,
        bits_per_component,
        filter,
    });
}

// --- Helpers ---

/// Resolve an indirect reference, returning the referenced object.
/// If the object is not a reference, returns it as-is.
fn resolve_ref<'a>(doc: &'a lopdf::Document, obj: &'a lopdf::Object) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Decode a PDF stream, decompressing if necessary.
fn decode_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    // Check if stream has filters
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Interpreter(format!("stream decompression failed: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}
