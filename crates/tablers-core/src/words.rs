use crate::geometry::BBox;
use crate::text::Char;

/// Default punctuation set used when `split_at_punctuation` is `"all"`.
const DEFAULT_PUNCTUATION: &str = "!\"'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Ligature expansion table: each entry maps a precomposed ligature
/// character to the sequence of plain letters it stands for.
const LIGATURES: &[(&str, &[&str])] = &[
    ("\u{FB03}", &["f", "f", "i"]),
    ("\u{FB04}", &["f", "f", "l"]),
    ("\u{FB00}", &["f", "f"]),
    ("\u{FB01}", &["f", "i"]),
    ("\u{FB02}", &["f", "l"]),
];

/// Options for word extraction, matching pdfplumber defaults.
#[derive(Debug, Clone)]
pub struct WordOptions {
    /// Maximum horizontal distance between characters to group into a word.
    pub x_tolerance: f64,
    /// Maximum vertical distance between characters to group into a word.
    pub y_tolerance: f64,
    /// If true, include blank/space characters in words instead of splitting on them.
    pub keep_blank_chars: bool,
    /// If true, use the text flow order from the PDF content stream instead of spatial ordering.
    pub use_text_flow: bool,
    /// If true, order characters within a rotated, right-reading line in
    /// clockwise order instead of the default counter-clockwise order.
    pub text_read_in_clockwise: bool,
    /// Punctuation characters that force a word boundary even without a
    /// spatial gap. `None` disables punctuation splitting, `Some("all")`
    /// uses [`DEFAULT_PUNCTUATION`], and any other string is taken as the
    /// literal set of split characters.
    pub split_at_punctuation: Option<String>,
    /// If true, expand ligature glyphs (`fi`, `fl`, `ffi`, `ffl`, `ff`) into
    /// their constituent letters before word assembly.
    pub expand_ligatures: bool,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
            keep_blank_chars: false,
            use_text_flow: false,
            text_read_in_clockwise: false,
            split_at_punctuation: None,
            expand_ligatures: true,
        }
    }
}

/// A word extracted from a PDF page.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// The text content of this word.
    pub text: String,
    /// Bounding box encompassing all constituent characters.
    pub bbox: BBox,
    /// Clockwise rotation in degrees shared by every character in this word.
    pub rotation: i32,
    /// The characters that make up this word.
    pub chars: Vec<Char>,
}

/// Extracts words from a sequence of characters based on spatial proximity.
pub struct WordExtractor;

impl WordExtractor {
    /// Extract words from the given characters using the specified options.
    ///
    /// Characters are grouped into words based on spatial proximity:
    /// - Characters within `x_tolerance` horizontally and `y_tolerance` vertically
    ///   are grouped together.
    /// - By default, whitespace characters split words. Set `keep_blank_chars`
    ///   to include them.
    /// - By default, characters are sorted spatially (top-to-bottom, left-to-right),
    ///   normalizing each rotation quadrant into an upright reading frame first.
    ///   Set `use_text_flow` to preserve PDF content stream order instead.
    pub fn extract(chars: &[Char], options: &WordOptions) -> Vec<Word> {
        if chars.is_empty() {
            return Vec::new();
        }

        let expanded = if options.expand_ligatures {
            expand_ligatures(chars)
        } else {
            chars.to_vec()
        };

        if options.use_text_flow {
            return Self::extract_line(&expanded.iter().collect::<Vec<_>>(), options);
        }

        let mut by_rotation: [Vec<&Char>; 4] = [Vec::new(), Vec::new(), Vec::new(), Vec::new()];
        for ch in &expanded {
            by_rotation[rotation_bucket(ch.rotation)].push(ch);
        }

        let mut words = Vec::new();
        for group in &by_rotation {
            if group.is_empty() {
                continue;
            }
            let mut sorted = group.clone();
            sorted.sort_by(|a, b| {
                let (_, atop, ax0, _) = virtual_coords(&a.bbox, a.rotation);
                let (_, btop, bx0, _) = virtual_coords(&b.bbox, b.rotation);
                let ax0 = if options.text_read_in_clockwise { -ax0 } else { ax0 };
                let bx0 = if options.text_read_in_clockwise { -bx0 } else { bx0 };
                atop.partial_cmp(&btop)
                    .unwrap()
                    .then(ax0.partial_cmp(&bx0).unwrap())
            });
            words.extend(Self::extract_line(&sorted, options));
        }
        words
    }

    /// Group an already-ordered run of characters into words by vertical
    /// line, horizontal gap, and (if enabled) punctuation boundaries.
    fn extract_line(sorted_chars: &[&Char], options: &WordOptions) -> Vec<Word> {
        let punctuation = punctuation_set(options);
        let mut words = Vec::new();
        let mut current_chars: Vec<Char> = Vec::new();
        let mut last_virtual: Option<(f64, f64, f64, f64)> = None;

        for &ch in sorted_chars {
            let is_blank = ch.text.chars().all(|c| c.is_whitespace());
            let v = virtual_coords(&ch.bbox, ch.rotation);

            if is_blank && !options.keep_blank_chars {
                if !current_chars.is_empty() {
                    words.push(Self::make_word(&current_chars));
                    current_chars.clear();
                }
                last_virtual = None;
                continue;
            }

            let is_punct = punctuation
                .as_ref()
                .is_some_and(|set| ch.text.chars().all(|c| set.contains(c)) && !ch.text.is_empty());
            let prev_is_punct = current_chars.last().is_some_and(|last| {
                punctuation.as_ref().is_some_and(|set| {
                    last.text.chars().all(|c| set.contains(c)) && !last.text.is_empty()
                })
            });

            let should_split = if let Some((_, last_top, _, last_x1)) = last_virtual {
                let x_gap = v.0 - last_x1;
                let y_diff = (v.1 - last_top).abs();
                x_gap > options.x_tolerance || y_diff > options.y_tolerance || is_punct || prev_is_punct
            } else {
                false
            };

            if should_split && !current_chars.is_empty() {
                words.push(Self::make_word(&current_chars));
                current_chars.clear();
            }

            current_chars.push(ch.clone());
            last_virtual = Some(v);
        }

        if !current_chars.is_empty() {
            words.push(Self::make_word(&current_chars));
        }

        words
    }

    fn make_word(chars: &[Char]) -> Word {
        let text: String = chars.iter().map(|c| c.text.as_str()).collect();
        let bbox = chars
            .iter()
            .map(|c| c.bbox)
            .reduce(|a, b| a.union(&b))
            .expect("make_word called with non-empty chars");
        Word {
            text,
            bbox,
            rotation: chars.first().map(|c| c.rotation).unwrap_or(0),
            chars: chars.to_vec(),
        }
    }
}

/// Bucket a rotation value into one of the four quadrants, defaulting
/// unexpected values to upright (0).
fn rotation_bucket(rotation: i32) -> usize {
    match rotation.rem_euclid(360) {
        90 => 1,
        180 => 2,
        270 => 3,
        _ => 0,
    }
}

/// Map a character's bbox into an upright reading frame: `(vx0, vtop, vx1,
/// vbottom)` where increasing `vx0` is the reading direction and increasing
/// `vtop` moves to the next line, matching the convention used for
/// unrotated (0°) text.
fn virtual_coords(bbox: &BBox, rotation: i32) -> (f64, f64, f64, f64) {
    match rotation_bucket(rotation) {
        1 => (bbox.top, bbox.x0, bbox.bottom, bbox.x1), // 90: top-to-bottom, lines stack rightward
        2 => (-bbox.x1, -bbox.bottom, -bbox.x0, -bbox.top), // 180: right-to-left, upside down
        3 => (-bbox.bottom, -bbox.x1, -bbox.top, -bbox.x0), // 270: bottom-to-top, lines stack leftward
        _ => (bbox.x0, bbox.top, bbox.x1, bbox.bottom),
    }
}

fn punctuation_set(options: &WordOptions) -> Option<String> {
    options.split_at_punctuation.as_ref().map(|set| {
        if set == "all" {
            DEFAULT_PUNCTUATION.to_string()
        } else {
            set.clone()
        }
    })
}

/// Expand ligature glyphs into their constituent letters, splitting the
/// original glyph's x-extent uniformly across the replacement characters.
fn expand_ligatures(chars: &[Char]) -> Vec<Char> {
    let mut out = Vec::with_capacity(chars.len());
    for ch in chars {
        let Some((_, letters)) = LIGATURES.iter().find(|(glyph, _)| *glyph == ch.text) else {
            out.push(ch.clone());
            continue;
        };
        let n = letters.len() as f64;
        let width = (ch.bbox.x1 - ch.bbox.x0) / n;
        for (i, letter) in letters.iter().enumerate() {
            let x0 = ch.bbox.x0 + width * i as f64;
            let x1 = x0 + width;
            out.push(Char {
                text: (*letter).to_string(),
                bbox: BBox::new(x0, ch.bbox.top, x1, ch.bbox.bottom),
                ..ch.clone()
            });
        }
    }
    out
}
