//! CJK encoding support for predefined CMap encodings.
//!
//! Handles decoding of CJK-encoded byte strings in PDF content streams when
//! fonts use predefined CMaps like GBK-EUC-H, ETen-B5-H, 90ms-RKSJ-H, etc.
//! These encodings use variable-length byte sequences (1 or 2 bytes per char)
//! that require encoding-aware decoding for correct text extraction.

use encoding_rs::Encoding;

/// A decoded character from a CJK-encoded byte string.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedChar {
    /// The raw character code from the byte stream (1 or 2 bytes combined).
    pub char_code: u32,
    /// The Unicode string for this character.
    pub unicode: String,
    /// Number of bytes consumed from the input (1 or 2).
    pub byte_len: usize,
}

impl DecodedChar {
    /// Whether this character is the single-byte space code (32).
    ///
    /// Word spacing (PDF 32000-1:2008 §9.3.3) applies only to the
    /// single-byte code 32, not to a double-byte code that happens to
    /// equal 32 once combined.
    pub fn is_space(&self) -> bool {
        self.byte_len == 1 && self.char_code == 32
    }
}

/// Detect the `encoding_rs` encoding from a predefined CMap name.
///
/// Returns the corresponding `encoding_rs::Encoding` for known CJK CMap names.
/// Returns `None` for Identity-H/V or unknown CMap names.
pub fn encoding_for_cmap(cmap_name: &str) -> Option<&'static Encoding> {
    // Strip -H/-V suffix for matching
    let base = cmap_name
        .strip_suffix("-H")
        .or_else(|| cmap_name.strip_suffix("-V"))
        .unwrap_or(cmap_name);

    match base {
        // Chinese Simplified: GBK/GB2312 encoding
        "GBK-EUC" | "GB-EUC" | "UniGB-UCS2" | "UniGB-UTF16" => Some(encoding_rs::GBK),

        // Chinese Traditional: Big5 encoding
        "B5pc" | "ETen-B5" | "HKscs-B5" | "UniCNS-UCS2" | "UniCNS-UTF16" => Some(encoding_rs::BIG5),

        // Japanese: Shift-JIS encoding
        "90ms-RKSJ" | "90pv-RKSJ" | "83pv-RKSJ" | "78-RKSJ" | "Add-RKSJ" | "Ext-RKSJ" => {
            Some(encoding_rs::SHIFT_JIS)
        }

        // Japanese: EUC-JP encoding
        "EUC" if cmap_name.contains("JIS") || cmap_name.contains("Japan") => {
            Some(encoding_rs::EUC_JP)
        }

        // Korean: EUC-KR encoding
        "KSC-EUC" | "KSCms-UHC" | "UniKS-UCS2" | "UniKS-UTF16" => Some(encoding_rs::EUC_KR),

        // Identity or unknown — not a legacy CJK encoding
        _ => None,
    }
}

/// Decode a CJK-encoded byte string into individual characters with Unicode text.
///
/// For each character in the byte string:
/// - Determines the byte length (1 or 2 bytes) based on the encoding
/// - Extracts the raw character code
/// - Converts to Unicode using `encoding_rs`
///
/// Returns a vector of decoded characters, each with its char code, Unicode text,
/// and byte length.
pub fn decode_cjk_string(bytes: &[u8], encoding: &'static Encoding) -> Vec<DecodedChar> {
    let mut result = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];

        // Determine if this is a single-byte or double-byte character
        let (char_code, byte_len) = if is_lead_byte(byte, encoding) && i + 1 < bytes.len() {
            // Two-byte character
            let code = u32::from(byte) << 8 | u32::from(bytes[i + 1]);
            (code, 2)
        } else {
            // Single-byte character
            (u32::from(byte), 1)
        };

        // Decode the bytes to Unicode using encoding_rs
        let char_bytes = &bytes[i..i + byte_len];
        let unicode = decode_bytes_to_unicode(char_bytes, encoding);

        result.push(DecodedChar {
            char_code,
            unicode,
            byte_len,
        });

        i += byte_len;
    }

    result
}

/// Check if a byte is a lead byte (first byte of a 2-byte sequence) for the given encoding.
fn is_lead_byte(byte: u8, encoding: &'static Encoding) -> bool {
    if encoding == encoding_rs::GBK {
        // GBK: lead byte range 0x81-0xFE
        (0x81..=0xFE).contains(&byte)
    } else if encoding == encoding_rs::BIG5 {
        // Big5: lead byte range 0x81-0xFE
        (0x81..=0xFE).contains(&byte)
    } else if encoding == encoding_rs::SHIFT_JIS {
        // Shift-JIS: lead byte ranges 0x81-0x9F and 0xE0-0xFC
        (0x81..=0x9F).contains(&byte) || (0xE0..=0xFC).contains(&byte)
    } else if encoding == encoding_rs::EUC_JP {
        // EUC-JP: lead byte range 0xA1-0xFE (and 0x8E for half-width katakana)
        (0xA1..=0xFE).contains(&byte) || byte == 0x8E
    } else if encoding == encoding_rs::EUC_KR {
        // EUC-KR: lead byte range 0x81-0xFE
        (0x81..=0xFE).contains(&byte)
    } else {
        false
    }
}

/// Decode a single character's bytes to a Unicode string using encoding_rs.
fn decode_bytes_to_unicode(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}
