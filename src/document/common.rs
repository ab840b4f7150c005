//! Text helpers shared by the order document and the catalog page.

/// Pads numbers to the width of a digit.
pub const FIGURE_SPACE: char = '\u{2007}';
/// Stands in for a missing decimal comma.
pub const PUNCTUATION_SPACE: char = '\u{2008}';
pub const MULTIPLICATION_SIGN: char = '\u{00D7}';

fn pad_left(value: &str, width: usize) -> String {
    let len = value.chars().count();
    let mut padded: String = std::iter::repeat(FIGURE_SPACE)
        .take(width.saturating_sub(len))
        .collect();
    padded.push_str(value);
    padded
}

fn pad_right(value: &str, width: usize) -> String {
    let len = value.chars().count();
    let mut padded = value.to_string();
    padded.extend(std::iter::repeat(FIGURE_SPACE).take(width.saturating_sub(len)));
    padded
}

/// Split `12`, `12.5` or `12,5` into integer and fractional digits.
fn split_decimal(value: &str) -> Option<(&str, Option<&str>)> {
    let (integer, fraction) = match value.find(|c: char| c == '.' || c == ',') {
        Some(pos) => (&value[..pos], Some(&value[pos + 1..])),
        None => (value, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(integer) || !fraction.map_or(true, all_digits) {
        return None;
    }
    Some((integer, fraction))
}

/// Format a package size such as `6 x 0.5` so that columns line up.
///
/// Up to three `x`-separated dimensions are kept. When the last one is a
/// decimal number its integer part is padded to two digits and its fraction
/// to a comma plus two digits; a lone number is read as `1 × n`. The
/// dimension before the last is padded to two digits as well.
pub fn format_size(size: Option<&str>) -> String {
    let Some(size) = size.filter(|s| !s.is_empty()) else {
        return String::new();
    };

    let mut parts: Vec<String> = size.rsplitn(3, 'x').map(|p| p.trim().to_string()).collect();
    parts.reverse();

    let aligned = split_decimal(&parts[parts.len() - 1]).map(|(integer, fraction)| {
        let fraction = match fraction {
            Some(digits) => format!(",{}", digits),
            None => PUNCTUATION_SPACE.to_string(),
        };
        format!("{}{}", pad_left(integer, 2), pad_right(&fraction, 3))
    });
    if let Some(aligned) = aligned {
        if parts.len() == 1 {
            parts.insert(0, "1".to_string());
        }
        let last = parts.len() - 1;
        parts[last] = aligned;
    }

    if parts.len() > 1 {
        let second_last = parts.len() - 2;
        parts[second_last] = pad_left(&parts[second_last], 2);
    }

    parts.join(&format!(" {} ", MULTIPLICATION_SIGN))
}

/// Escape text for the body of a LaTeX document.
///
/// Newlines become forced line breaks; the padding glyphs produced by
/// [`format_size`] become invisible boxes of the same width.
pub fn escape_latex(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '~' => escaped.push_str(r"{\textasciitilde}"),
            '^' => escaped.push_str(r"{\textasciicircum}"),
            '\\' => escaped.push_str(r"{\textbackslash}"),
            '\u{2082}' => escaped.push_str(r"\textsubscript{2}"),
            '\n' => escaped.push_str("\\\\\n"),
            MULTIPLICATION_SIGN => escaped.push_str(r"{\texttimes}"),
            FIGURE_SPACE => escaped.push_str(r"\phantom{0}"),
            PUNCTUATION_SPACE => escaped.push_str(r"\phantom{,}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Sanitize a string for use in filenames.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_' || ch == '.')
            && !last_dash
            && !result.is_empty()
        {
            result.push('-');
            last_dash = true;
        }
    }

    let result = result.trim_matches('-');
    if result.is_empty() {
        return fallback.to_string();
    }
    result.to_string()
}
