//! Text helpers shared by the block parsers
//!
//! Extracted block bodies are dedented before evaluation, and then padded with blank
//! lines so that line `n` of the evaluated source is line `n` of the document. Anything
//! an evaluator reports by line number (parse errors, tracebacks) then points into the
//! document rather than into the block.

/// Remove the whitespace prefix common to every non-blank line.
///
/// Lines holding only whitespace are emptied and do not count towards the prefix.
pub fn dedent(text: &str) -> String {
    let margin = text
        .split('\n')
        .filter(|line| !is_blank(line))
        .map(leading_whitespace)
        .reduce(common_prefix)
        .unwrap_or("");

    text.split('\n')
        .map(|line| if is_blank(line) { "" } else { &line[margin.len()..] })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefix `body` with the blank lines and pragma lines that put its first line on
/// document line `newlines_before + 1`.
///
/// Each pragma takes the place of one blank line, so pragmas land on the lines just
/// above the body.
pub fn align(body: &str, newlines_before: usize, pragmas: &[String]) -> String {
    let mut source = "\n".repeat(newlines_before.saturating_sub(pragmas.len()));
    for pragma in pragmas {
        source.push_str(pragma);
        source.push('\n');
    }
    source.push_str(body);
    source
}

/// Byte offset of the newline that ends an indented block body.
///
/// The body starts at `from` and continues up to the first newline that is either the
/// last character of the text, or followed by a non-blank line indented by `indent`
/// bytes of spaces and tabs or fewer. Without such a newline the body runs to the end
/// of the text.
pub fn indented_body_end(text: &str, from: usize, indent: usize) -> usize {
    let mut search = from;
    while let Some(found) = text[search..].find('\n') {
        let newline = search + found;
        let next = &text[newline + 1..];
        if next.is_empty() {
            return newline;
        }
        let depth = leading_whitespace(next).len();
        let dedented = next[depth..]
            .chars()
            .next()
            .map_or(false, |c| !c.is_whitespace());
        if depth <= indent && dedented {
            return newline;
        }
        search = newline + 1;
    }
    text.len()
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start_matches([' ', '\t']).len()]
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}
