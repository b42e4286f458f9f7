use thiserror::Error;

/// `(name, line1, line2)` of one element set.
pub type TleLines = (Option<String>, String, String);

/// A non-blank line that does not belong to a complete element set.
#[derive(Debug, Error, PartialEq)]
#[error("line {line} ('{text}') is not part of a complete element set")]
pub struct UnpairedLine {
    pub line: usize,
    pub text: String,
}

/// Split TLE text into element sets.
///
/// Accepts both 2-line and 3-line (named) sets and ignores blank lines. Any
/// other leftover line (a name without its set, a line 1 without a line 2,
/// a corrupted line prefix) is an error so that a broken set is never
/// silently dropped.
pub fn parse_multi_tle(content: &str) -> Result<Vec<TleLines>, UnpairedLine> {
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .collect();

    let is_line1 = |i: usize| lines.get(i).is_some_and(|(_, l)| l.starts_with("1 "));
    let is_line2 = |i: usize| lines.get(i).is_some_and(|(_, l)| l.starts_with("2 "));

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if is_line1(i) && is_line2(i + 1) {
            result.push((None, lines[i].1.to_string(), lines[i + 1].1.to_string()));
            i += 2;
        } else if !is_line1(i) && !is_line2(i) && is_line1(i + 1) && is_line2(i + 2) {
            let name = lines[i].1.strip_prefix("0 ").unwrap_or(lines[i].1).trim();
            result.push((
                Some(name.to_string()),
                lines[i + 1].1.to_string(),
                lines[i + 2].1.to_string(),
            ));
            i += 3;
        } else {
            let (line, text) = lines[i];
            return Err(UnpairedLine {
                line,
                text: text.to_string(),
            });
        }
    }

    Ok(result)
}
