use std::fmt::Write;

/// XML 1.0 valid char ranges:
/// - 0x09, 0x0A, 0x0D
/// - 0x20..=0xD7FF
/// - 0xE000..=0xFFFD
/// - 0x10000..=0x10FFFF
fn is_valid_xml_char(c: char) -> bool {
    matches!(
        c as u32,
        0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF
    )
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if !is_valid_xml_char(c) {
            continue;
        }
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Shortest decimal form of a coordinate: `16` rather than `16.0`, and
/// never `-0`.
///
/// Output is always positional, so `1e-7` prints as `0.0000001`. SVG parsers
/// read both forms the same.
pub fn num(value: f64) -> String {
    // Adding +0.0 turns -0.0 into +0.0 and leaves everything else alone.
    format!("{}", value + 0.0)
}

/// Appends ` M x y` followed by ` L x y` for each remaining point.
pub fn push_polyline(path: &mut String, points: &[(f64, f64)]) {
    for (i, (x, y)) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(path, " {} {} {}", cmd, num(*x), num(*y));
    }
}
