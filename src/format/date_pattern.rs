/// strftime specifiers that always render as digits.
const NUMERIC_SPECIFIERS: &str = "wdmyYHIMSfjUWuV";

/// Converts a strftime pattern into a lazy regex fragment matching the
/// dates it renders.
pub fn date_to_pattern(date_format: &str) -> String {
    let mut pattern = String::new();
    let mut chars = date_format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
            continue;
        }
        match chars.next() {
            Some('%') => pattern.push('%'),
            Some(spec) if NUMERIC_SPECIFIERS.contains(spec) => pattern.push_str(r"\d+?"),
            Some(_) => pattern.push_str(".+?"),
            None => pattern.push('%'),
        }
    }
    pattern
}
