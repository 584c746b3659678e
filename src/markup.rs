//! Minimal markup for bot replies.
//!
//! DESIGN
//! ======
//! Replies may carry a constrained subset of HTML: bold (`<b>`, `<strong>`)
//! and line breaks (`<br>`, `<br/>`). Instead of trusting the endpoint to have
//! sanitized its output, the client parses that subset into styled spans and
//! renders every other tag as literal text. A handful of character entities
//! are decoded so `&lt;` and friends read naturally.

#[cfg(test)]
#[path = "markup_test.rs"]
mod tests;

/// Upper bound on entity length, `&` and `;` included.
const MAX_ENTITY_LEN: usize = 10;

/// Upper bound on the characters scanned for a closing `>`. Every recognized
/// tag is far shorter; longer ones are literal anyway.
const MAX_TAG_LEN: usize = 16;

/// A run of text with uniform styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

/// Parsed bot content: lines of styled spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    lines: Vec<Vec<Span>>,
}

impl Markup {
    /// Parse `source`, keeping unknown tags as literal text.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut builder = Builder::default();
        let mut rest = source;

        while let Some(ch) = rest.chars().next() {
            match ch {
                '<' => {
                    if let Some((tag, after)) = split_tag(rest) {
                        if builder.apply_tag(tag) {
                            rest = after;
                            continue;
                        }
                    }
                }
                '&' => {
                    if let Some((decoded, after)) = split_entity(rest) {
                        builder.push(decoded);
                        rest = after;
                        continue;
                    }
                }
                '\n' => {
                    builder.break_line();
                    rest = &rest[1..];
                    continue;
                }
                _ => {}
            }
            builder.push(ch);
            rest = &rest[ch.len_utf8()..];
        }

        builder.finish()
    }

    #[must_use]
    pub fn lines(&self) -> &[Vec<Span>] {
        &self.lines
    }

    /// Text with styling removed and breaks as `\n`.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.iter().map(|span| span.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.lines
            .iter()
            .flatten()
            .all(|span| span.text.trim().is_empty())
    }
}

// =============================================================================
// BUILDER
// =============================================================================

#[derive(Default)]
struct Builder {
    lines: Vec<Vec<Span>>,
    current_line: Vec<Span>,
    buffer: String,
    bold_depth: u32,
}

impl Builder {
    fn push(&mut self, ch: char) {
        self.buffer.push(ch);
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.buffer);
        self.current_line.push(Span { text, bold: self.bold_depth > 0 });
    }

    fn break_line(&mut self) {
        self.flush();
        self.lines.push(std::mem::take(&mut self.current_line));
    }

    /// Apply a recognized tag. Returns `false` for tags outside the subset.
    fn apply_tag(&mut self, raw: &str) -> bool {
        let trimmed = raw.trim();
        let (name, self_closing) = match trimmed.strip_suffix('/') {
            Some(name) => (name.trim_end(), true),
            None => (trimmed, false),
        };
        if name.contains(char::is_whitespace) {
            return false;
        }
        match (name.to_ascii_lowercase().as_str(), self_closing) {
            ("b" | "strong", false) => {
                self.flush();
                self.bold_depth = self.bold_depth.saturating_add(1);
                true
            }
            ("/b" | "/strong", false) => {
                self.flush();
                self.bold_depth = self.bold_depth.saturating_sub(1);
                true
            }
            ("br", _) => {
                self.break_line();
                true
            }
            _ => false,
        }
    }

    fn finish(mut self) -> Markup {
        self.break_line();
        Markup { lines: self.lines }
    }
}

// =============================================================================
// LEXING
// =============================================================================

/// Split `<inner>` off the front of `rest`. `rest` must start with `<`.
fn split_tag(rest: &str) -> Option<(&str, &str)> {
    let (end, delimiter) = rest
        .char_indices()
        .skip(1)
        .take(MAX_TAG_LEN)
        .find(|(_, c)| matches!(*c, '<' | '>'))?;
    if delimiter == '<' {
        return None;
    }
    Some((&rest[1..end], &rest[end + 1..]))
}

/// Decode an entity at the front of `rest`. `rest` must start with `&`.
fn split_entity(rest: &str) -> Option<(char, &str)> {
    let (end, _) = rest
        .char_indices()
        .take(MAX_ENTITY_LEN)
        .find(|(_, c)| *c == ';')?;
    let name = &rest[1..end];
    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" | "#39" => '\'',
        "nbsp" => '\u{a0}',
        _ => decode_numeric(name)?,
    };
    Some((decoded, &rest[end + 1..]))
}

fn decode_numeric(name: &str) -> Option<char> {
    let digits = name.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse::<u32>(),
    };
    match code {
        Ok(value) => char::from_u32(value),
        Err(_) => None,
    }
}
