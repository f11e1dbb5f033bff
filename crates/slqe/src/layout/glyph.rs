//! Nominal glyph boxes used by the small-exponent heuristic.
//!
//! The heuristic compares how large a detection is relative to how large its
//! glyph nominally is: a script drawn at a smaller point size than its base
//! shows a lower detected/nominal area ratio. Any metric source works; the
//! reference one is the Helvetica AFM table (font units, 1000/em).

/// Source of nominal glyph sizes `(width, height)`.
pub trait GlyphMetrics {
    /// `None` when the glyph is unknown; callers then skip the size test.
    fn nominal_box(&self, c: char) -> Option<(f64, f64)>;
}

/// Helvetica character bounding boxes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReferenceGlyphs;

/// Size for uppercase letters not in the table (cap height 718).
const UPPERCASE_FALLBACK: (f64, f64) = (640.0, 718.0);

impl GlyphMetrics for ReferenceGlyphs {
    fn nominal_box(&self, c: char) -> Option<(f64, f64)> {
        // (llx, lly, urx, ury)
        let (llx, lly, urx, ury) = match c {
            '0' => (37, -19, 519, 703),
            '1' => (101, 0, 359, 703),
            '2' => (26, 0, 507, 703),
            '3' => (34, -19, 522, 703),
            '4' => (25, 0, 523, 703),
            '5' => (32, -19, 514, 688),
            '6' => (38, -19, 518, 703),
            '7' => (37, 0, 523, 688),
            '8' => (38, -19, 517, 703),
            '9' => (42, -19, 514, 703),
            'a' => (36, -15, 530, 538),
            'b' => (58, -15, 517, 718),
            'c' => (30, -15, 477, 538),
            'd' => (35, -15, 499, 718),
            'e' => (40, -15, 516, 538),
            'f' => (14, 0, 262, 728),
            'g' => (35, -220, 499, 538),
            'h' => (65, 0, 491, 718),
            'i' => (67, 0, 155, 718),
            'j' => (-16, -210, 155, 718),
            'k' => (67, 0, 501, 718),
            'l' => (67, 0, 155, 718),
            'm' => (65, 0, 769, 538),
            'n' => (65, 0, 491, 538),
            'o' => (35, -14, 521, 538),
            'p' => (58, -207, 517, 538),
            'q' => (35, -207, 494, 538),
            'r' => (77, 0, 332, 538),
            's' => (32, -15, 464, 538),
            't' => (14, -7, 257, 669),
            'u' => (68, -15, 489, 523),
            'v' => (8, 0, 492, 523),
            'w' => (14, 0, 709, 523),
            'x' => (11, 0, 490, 523),
            'y' => (11, -214, 489, 523),
            'z' => (31, 0, 469, 523),
            '(' => (68, -207, 299, 733),
            ')' => (34, -207, 265, 733),
            '[' => (63, -196, 250, 722),
            ']' => (28, -196, 215, 722),
            '{' | '}' => (42, -196, 292, 722),
            '+' => (34, 0, 550, 505),
            '-' => (44, 232, 289, 322),
            c if c.is_ascii_uppercase() => return Some(UPPERCASE_FALLBACK),
            _ => return None,
        };
        Some(((urx - llx) as f64, (ury - lly) as f64))
    }
}
