//! Color space resolution for advanced PDF color spaces.
//!
//! Resolves ICCBased, Indexed, Separation, and DeviceN color spaces
//! from PDF resource dictionaries to concrete `Color` values.

use tablers_core::painting::Color;

/// A resolved PDF color space with enough information to convert
/// component values to a `Color`.
#[derive(Debug, Clone)]
pub enum ResolvedColorSpace {
    /// DeviceGray (1 component).
    DeviceGray,
    /// DeviceRGB (3 components).
    DeviceRGB,
    /// DeviceCMYK (4 components).
    DeviceCMYK,
    /// ICCBased color space: stores the number of components and the
    /// alternate color space to use for conversion.
    ICCBased {
        /// Number of color components (1, 3, or 4).
        num_components: u32,
        /// Alternate color space for fallback conversion.
        alternate: Box<ResolvedColorSpace>,
    },
    /// Indexed color space: a palette-based color space.
    Indexed {
        /// Base color space that palette entries are specified in.
        base: Box<ResolvedColorSpace>,
        /// Maximum valid index value.
        hival: u32,
        /// Color lookup table: `(hival + 1) * num_base_components` bytes.
        lookup_table: Vec<u8>,
    },
    /// Separation color space (single-component spot color).
    /// Best-effort: uses the alternate color space.
    Separation {
        /// Alternate color space (fallback).
        alternate: Box<ResolvedColorSpace>,
    },
    /// DeviceN color space (multi-component named colors).
    /// Best-effort: uses the alternate color space.
    DeviceN {
        /// Number of color components.
        num_components: u32,
        /// Alternate color space (fallback).
        alternate: Box<ResolvedColorSpace>,
    },
}

impl ResolvedColorSpace {
    /// Number of components expected for this color space.
    pub fn num_components(&self) -> u32 {
        match self {
            ResolvedColorSpace::DeviceGray => 1,
            ResolvedColorSpace::DeviceRGB => 3,
            ResolvedColorSpace::DeviceCMYK => 4,
            ResolvedColorSpace::ICCBased { num_components, .. } => *num_components,
            ResolvedColorSpace::Indexed { .. } => 1,
            ResolvedColorSpace::Separation { .. } => 1,
            ResolvedColorSpace::DeviceN { num_components, .. } => *num_components,
        }
    }

    /// Convert color components to a `Color` value using this color space.
    pub fn resolve_color(&self, components: &[f32]) -> Color {
        match self {
            ResolvedColorSpace::DeviceGray => {
                let g = components.first().copied().unwrap_or(0.0);
                gray_to_color(g)
            }
            ResolvedColorSpace::DeviceRGB => {
                let r = components.first().copied().unwrap_or(0.0);
                let g = components.get(1).copied().unwrap_or(0.0);
                let b = components.get(2).copied().unwrap_or(0.0);
                rgb_to_color(r, g, b)
            }
            ResolvedColorSpace::DeviceCMYK => {
                let c = components.first().copied().unwrap_or(0.0);
                let m = components.get(1).copied().unwrap_or(0.0);
                let y = components.get(2).copied().unwrap_or(0.0);
                let k = components.get(3).copied().unwrap_or(0.0);
                cmyk_to_color(c, m, y, k)
            }
            ResolvedColorSpace::ICCBased { alternate, .. } => {
                // Use the alternate color space for interpretation
                alternate.resolve_color(components)
            }
            ResolvedColorSpace::Indexed {
                base,
                hival,
                lookup_table,
            } => {
                let index = components.first().copied().unwrap_or(0.0) as u32;
                let index = index.min(*hival);
                let base_n = base.num_components() as usize;
                let offset = index as usize * base_n;
                if offset + base_n <= lookup_table.len() {
                    let base_components: Vec<f32> = lookup_table[offset..offset + base_n]
                        .iter()
                        .map(|&b| b as f32 / 255.0)
                        .collect();
                    base.resolve_color(&base_components)
                } else {
                    color_from_components(components)
                }
            }
            ResolvedColorSpace::Separation { alternate } => {
                // Best-effort: pass the tint value through to the alternate space.
                // Without evaluating the tint transform function, we use a simple
                // approximation: treat the single tint component as if it's
                // a grayscale value in the alternate space.
                let tint = components.first().copied().unwrap_or(0.0);
                match alternate.as_ref() {
                    ResolvedColorSpace::DeviceGray => gray_to_color(tint),
                    ResolvedColorSpace::DeviceRGB => rgb_to_color(tint, tint, tint),
                    ResolvedColorSpace::DeviceCMYK => cmyk_to_color(0.0, 0.0, 0.0, 1.0 - tint),
                    _ => color_from_components(components),
                }
            }
            ResolvedColorSpace::DeviceN { alternate, .. } => {
                // Best-effort: pass components to alternate space
                alternate.resolve_color(components)
            }
        }
    }
}

/// Convert a DeviceGray component to RGB.
pub(crate) fn gray_to_color(g: f32) -> Color {
    Color::new(g as f64, g as f64, g as f64)
}

/// Build a `Color` from DeviceRGB components.
pub(crate) fn rgb_to_color(r: f32, g: f32, b: f32) -> Color {
    Color::new(r as f64, g as f64, b as f64)
}

/// Convert DeviceCMYK components to RGB using the standard naive formula.
pub(crate) fn cmyk_to_color(c: f32, m: f32, y: f32, k: f32) -> Color {
    let (c, m, y, k) = (c as f64, m as f64, y as f64, k as f64);
    Color::new((1.0 - c) * (1.0 - k), (1.0 - m) * (1.0 - k), (1.0 - y) * (1.0 - k))
}

/// Infer a color from a raw component slice when no color space is known.
pub(crate) fn color_from_components(components: &[f32]) -> Color {
    match components.len() {
        1 => gray_to_color(components[0]),
        3 => rgb_to_color(components[0], components[1], components[2]),
        4 => cmyk_to_color(components[0], components[1], components[2], components[3]),
        _ => Color::black(),
    }
}

/// Default color space inferred from component count (fallback behavior).
pub fn default_color_space_from_components(n: usize) -> ResolvedColorSpace {
    match n {
        1 => ResolvedColorSpace::DeviceGray,
        3 => ResolvedColorSpace::DeviceRGB,
        4 => ResolvedColorSpace::DeviceCMYK,
        _ => ResolvedColorSpace::DeviceGray, // fallback
    }
}

/// Infer the alternate color space from the number of ICC profile components.
fn alternate_from_num_components(n: u32) -> ResolvedColorSpace {
    match n {
        1 => ResolvedColorSpace::DeviceGray,
        3 => ResolvedColorSpace::DeviceRGB,
        4 => ResolvedColorSpace::DeviceCMYK,
        _ => ResolvedColorSpace::DeviceRGB, // default fallback
    }
}

/// Resolve a color space name to a `ResolvedColorSpace`.
///
/// Handles both simple device color spaces (DeviceGray, DeviceRGB, DeviceCMYK)
/// and named color spaces looked up in the page Resources.
pub fn resolve_color_space_name(
    name: &str,
    doc: &lopdf::Document,
    resources: &lopdf::Dictionary,
) -> Option<ResolvedColorSpace> {
    match name {
        "DeviceGray" | "G" => Some(ResolvedColorSpace::DeviceGray),
        "DeviceRGB" | "RGB" => Some(ResolvedColorSpace::DeviceRGB),
        "DeviceCMYK" | "CMYK" => Some(ResolvedColorSpace::DeviceCMYK),
        _ => {
            // Look up in Resources /ColorSpace dictionary
            if let Ok(cs_dict) = resources.get(b"ColorSpace").and_then(|o| o.as_dict()) {
                if let Ok(cs_obj) = cs_dict.get(name.as_bytes()) {
                    return resolve_color_space_object(cs_obj, doc);
                }
            }
            None
        }
    }
}

/// Resolve a color space from a lopdf Object (name or array).
pub fn resolve_color_space_object(
    obj: &lopdf::Object,
    doc: &lopdf::Document,
) -> Option<ResolvedColorSpace> {
    match obj {
        lopdf::Object::Name(name) => {
            let name_str = String::from_utf8_lossy(name);
            match name_str.as_ref() {
                "DeviceGray" | "G" => Some(ResolvedColorSpace::DeviceGray),
                "DeviceRGB" | "RGB" => Some(ResolvedColorSpace::DeviceRGB),
                "DeviceCMYK" | "CMYK" => Some(ResolvedColorSpace::DeviceCMYK),
                _ => None,
            }
        }
        lopdf::Object::Array(arr) => resolve_color_space_array(arr, doc),
        lopdf::Object::Reference(id) => {
            if let Ok(resolved) = doc.get_object(*id) {
                resolve_color_space_object(resolved, doc)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Resolve a color space array like [/ICCBased stream_ref] or [/Indexed base hival lookup].
fn resolve_color_space_array(
    arr: &[lopdf::Object],
    doc: &lopdf::Document,
) -> Option<ResolvedColorSpace> {
    if arr.is_empty() {
        return None;
    }

    let cs_type = match &arr[0] {
        lopdf::Object::Name(n) => String::from_utf8_lossy(n).to_string(),
        _ => return None,
    };

    match cs_type.as_str() {
        "ICCBased" => resolve_icc_based(arr, doc),
        "Indexed" | "I" => resolve_indexed(arr, doc),
        "Separation" => resolve_separation(arr, doc),
        "DeviceN" => resolve_device_n(arr, doc),
        "DeviceGray" | "G" => Some(ResolvedColorSpace::DeviceGray),
        "DeviceRGB" | "RGB" => Some(ResolvedColorSpace::DeviceRGB),
        "DeviceCMYK" | "CMYK" => Some(ResolvedColorSpace::DeviceCMYK),
        _ => None,
    }
}

/// Resolve [/ICCBased stream_ref].
fn resolve_icc_based(arr: &[lopdf::Object], doc: &lopdf::Document) -> Option<ResolvedColorSpace> {
    if arr.len() < 2 {
        return None;
    }

    // Get the ICC profile stream
    let stream_obj = match &arr[1] {
        lopdf::Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };

    let stream = match stream_obj {
        lopdf::Object::Stream(s) => s,
        _ => return None,
    };

    // Get /N (number of components)
    let num_components = stream
        .dict
        .get(b"N")
        .ok()
        .and_then(|o| match o {
            lopdf::Object::Integer(n) => Some(*n as u32),
            _ => None,
        })
        .unwrap_or(3); // default to 3 (RGB)

    // Try to get /Alternate color space
    let alternate = stream
        .dict
        .get(b"Alternate")
        .ok()
        .and_then(|o| resolve_color_space_object(o, doc))
        .unwrap_or_else(|| alternate_from_num_components(num_components));

    Some(ResolvedColorSpace::ICCBased {
        num_components,
        alternate: Box::new(alternate),
    })
}

/// Resolve [/Indexed base hival lookup].
fn resolve_indexed(arr: &[lopdf::Object], doc: &lopdf::Document) -> Option<ResolvedColorSpace> {
    if arr.len() < 4 {
        return None;
    }

    // Base color space
    let base = resolve_color_space_object(&arr[1], doc)
        .or_else(|| {
            // Try resolving as reference
            if let lopdf::Object::Reference(id) = &arr[1] {
                doc.get_object(*id)
                    .ok()
                    .and_then(|o| resolve_color_space_object(o, doc))
            } else {
                None
            }
        })
        .unwrap_or(ResolvedColorSpace::DeviceRGB);

    // hival (maximum valid index)
    let hival = match &arr[2] {
        lopdf::Object::Integer(n) => *n as u32,
        _ => return None,
    };

    // Lookup table - can be a string or a stream
    let lookup_table = match &arr[3] {
        lopdf::Object::String(bytes, _) => bytes.clone(),
        lopdf::Object::Reference(id) => {
            if let Ok(obj) = doc.get_object(*id) {
                match obj {
                    lopdf::Object::Stream(s) => s
                        .decompressed_content()
                        .unwrap_or_else(|_| s.content.clone()),
                    lopdf::Object::String(bytes, _) => bytes.clone(),
                    _ => return None,
                }
            } else {
                return None;
            }
        }
        lopdf::Object::Stream(s) => s
            .decompressed_content()
            .unwrap_or_else(|_| s.content.clone()),
        _ => return None,
    };

    Some(ResolvedColorSpace::Indexed {
        base: Box::new(base),
        hival,
        lookup_table,
    })
}

/// Resolve [/Separation name alternateSpace tintTransform].
fn resolve_separation(arr: &[lopdf::Object], doc: &lopdf::Document) -> Option<ResolvedColorSpace> {
    if arr.len() < 4 {
        return None;
    }

    // alternateSpace is at index 2
    let alternate =
        resolve_color_space_object(&arr[2], doc).unwrap_or(ResolvedColorSpace::DeviceCMYK);

    Some(ResolvedColorSpace::Separation {
        alternate: Box::new(alternate),
    })
}

/// Resolve [/DeviceN names alternateSpace tintTransform].
fn resolve_device_n(arr: &[lopdf::Object], doc: &lopdf::Document) -> Option<ResolvedColorSpace> {
    if arr.len() < 4 {
        return None;
    }

    // names is an array at index 1
    let num_components = match &arr[1] {
        lopdf::Object::Array(names) => names.len() as u32,
        _ => return None,
    };

    // alternateSpace is at index 2
    let alternate =
        resolve_color_space_object(&arr[2], doc).unwrap_or(ResolvedColorSpace::DeviceCMYK);

    Some(ResolvedColorSpace::DeviceN {
        num_components,
        alternate: Box::new(alternate),
    })
}
