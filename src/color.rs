use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use eframe::egui::Color32;
use once_cell::sync::Lazy;
use palette::Srgb;

// ---------------------------------------------------------------------------
// Line colour rotation
// ---------------------------------------------------------------------------

/// Qualitative 8-colour palette (ColorBrewer "Dark2").
pub const LINE_PALETTE: [Color32; 8] = [
    Color32::from_rgb(0x1b, 0x9e, 0x77),
    Color32::from_rgb(0xd9, 0x5f, 0x02),
    Color32::from_rgb(0x75, 0x70, 0xb3),
    Color32::from_rgb(0xe7, 0x29, 0x8a),
    Color32::from_rgb(0x66, 0xa6, 0x1e),
    Color32::from_rgb(0xe6, 0xab, 0x02),
    Color32::from_rgb(0xa6, 0x76, 0x1d),
    Color32::from_rgb(0x66, 0x66, 0x66),
];

static GLOBAL_CURSOR: Lazy<PaletteCursor> = Lazy::new(PaletteCursor::new);

/// Position in [`LINE_PALETTE`].  Clones share the same position.
#[derive(Debug, Clone, Default)]
pub struct PaletteCursor(Arc<AtomicUsize>);

impl PaletteCursor {
    /// A cursor of its own, starting at the first palette entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cursor shared by every model created without an explicit one.
    pub fn global() -> Self {
        GLOBAL_CURSOR.clone()
    }

    /// Hand out the next colour and advance, wrapping after the last entry.
    pub fn next_color(&self) -> Color32 {
        let n = LINE_PALETTE.len();
        let idx = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |i| Some((i + 1) % n))
            .unwrap_or(0);
        LINE_PALETTE[idx % n]
    }
}

// ---------------------------------------------------------------------------
// Colour specifications
// ---------------------------------------------------------------------------

/// Parse a user-supplied colour.
///
/// Accepted forms:
/// * `#rgb`, `#rrggbb`, `#rrggbbaa` (the `#` is optional for 6/8 digits)
/// * CSS / X11 names such as `steelblue`
/// * one-letter shorthands `b g r c m y k w`
/// * a grey level between `0.0` and `1.0`
pub fn parse_color(spec: &str) -> Option<Color32> {
    let s = spec.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(c) = shorthand(s) {
        return Some(c);
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() == 8 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(Color32::from_rgba_unmultiplied(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            byte(6)?,
        ));
    }
    if s.starts_with('#') || (hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())) {
        if let Ok(rgb) = Srgb::<u8>::from_str(s) {
            return Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue));
        }
        return None;
    }

    if let Some(rgb) = palette::named::from_str(&s.to_ascii_lowercase()) {
        return Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue));
    }

    match s.parse::<f32>() {
        Ok(level) if (0.0..=1.0).contains(&level) => {
            let v = (level * 255.0).round() as u8;
            Some(Color32::from_rgb(v, v, v))
        }
        _ => None,
    }
}

fn shorthand(s: &str) -> Option<Color32> {
    let c = match s {
        "b" => Color32::from_rgb(0, 0, 255),
        "g" => Color32::from_rgb(0, 128, 0),
        "r" => Color32::from_rgb(255, 0, 0),
        "c" => Color32::from_rgb(0, 191, 191),
        "m" => Color32::from_rgb(191, 0, 191),
        "y" => Color32::from_rgb(191, 191, 0),
        "k" => Color32::from_rgb(0, 0, 0),
        "w" => Color32::from_rgb(255, 255, 255),
        _ => return None,
    };
    Some(c)
}

/// `#rrggbbaa`, lower case.
pub fn to_hex(color: Color32) -> String {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
}
