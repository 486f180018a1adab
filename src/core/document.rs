//! # Answer Documents
//!
//! Splits a card's markdown answer into prose blocks and fenced code blocks
//! before any markdown parsing happens. Card answers are written loosely: a
//! fence may open in the middle of a sentence (`Text ```js`), the closing fence
//! may be followed by more prose on the same line, and many answers never
//! close their last fence at all. A strict CommonMark parser turns the first
//! two into inline code spans, so fences are lifted out here and only the
//! prose between them goes through `pulldown_cmark`.
//!
//! ```text
//! "Text ```js\nconst x=1;\n``` more"
//!   → Prose("Text"), Code { language: "js", code: "const x=1;" }, Prose("more")
//! ```

/// A top-level piece of an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Prose(String),
    Code {
        /// First word of the fence info string.
        language: Option<String>,
        /// Body between the fences, one trailing newline stripped.
        code: String,
    },
}

struct Opening {
    /// Byte offset of the first fence character.
    start: usize,
    /// Byte offset just past the newline ending the info string.
    body_start: usize,
    marker: u8,
    len: usize,
    language: Option<String>,
}

struct Closing {
    /// Byte offset of the line holding the closing run.
    line_start: usize,
    /// Byte offset past the closing run and any spaces after it.
    end: usize,
}

/// Split markdown into prose and fenced code blocks, in document order.
pub fn split_blocks(markdown: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut rest = markdown;

    while let Some(open) = find_opening(rest) {
        push_prose(&mut blocks, &rest[..open.start]);
        let body = &rest[open.body_start..];
        match find_closing(body, open.marker, open.len) {
            Some(close) => {
                push_code(&mut blocks, open.language, &body[..close.line_start]);
                rest = &body[close.end..];
            }
            None => {
                // Unterminated fences run to the end of the answer.
                push_code(&mut blocks, open.language, body);
                rest = "";
            }
        }
    }
    push_prose(&mut blocks, rest);
    blocks
}

/// Strip exactly one trailing newline (and its carriage return, if any).
pub fn strip_trailing_newline(code: &str) -> &str {
    code.strip_suffix('\n')
        .map(|c| c.strip_suffix('\r').unwrap_or(c))
        .unwrap_or(code)
}

fn push_prose(blocks: &mut Vec<Block>, text: &str) {
    let text = skip_blank_lines(text).trim_end();
    if !text.is_empty() {
        blocks.push(Block::Prose(text.to_string()));
    }
}

fn push_code(blocks: &mut Vec<Block>, language: Option<String>, body: &str) {
    blocks.push(Block::Code {
        language,
        code: strip_trailing_newline(body).to_string(),
    });
}

fn skip_blank_lines(text: &str) -> &str {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if !line.trim().is_empty() || !line.ends_with('\n') {
            break;
        }
        offset += line.len();
    }
    &text[offset..]
}

fn find_opening(text: &str) -> Option<Opening> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let marker = bytes[i];
        if marker != b'`' && marker != b'~' {
            i += 1;
            continue;
        }
        let len = run_length(&bytes[i..], marker);
        if len < 3 {
            i += len;
            continue;
        }

        let info_start = i + len;
        let Some(newline) = text[info_start..].find('\n') else {
            // A fence needs a body line.
            return None;
        };
        let info = &text[info_start..info_start + newline];

        let valid = match marker {
            // Backtick info strings can't hold backticks: "```foo``` bar" is
            // an inline span, and its closing run must not be re-read as a fence.
            b'`' => !info.contains('`'),
            // Tilde fences only open at the start of a line, so "~~~" inside
            // struck-through prose stays prose.
            _ => at_line_start(text, i),
        };
        if !valid {
            i = info_start + newline + 1;
            continue;
        }

        return Some(Opening {
            start: i,
            body_start: info_start + newline + 1,
            marker,
            len,
            language: info.split_whitespace().next().map(str::to_string),
        });
    }
    None
}

fn find_closing(body: &str, marker: u8, min_len: usize) -> Option<Closing> {
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
        let run = run_length(&line.as_bytes()[indent..], marker);
        if run >= min_len {
            let after = &line[indent + run..];
            // "```js" on its own line opens a block, it doesn't close one.
            if after.is_empty() || after.starts_with(char::is_whitespace) {
                let spaces = after.len() - after.trim_start_matches([' ', '\t']).len();
                return Some(Closing {
                    line_start: offset,
                    end: offset + indent + run + spaces,
                });
            }
        }
        offset += line.len();
    }
    None
}

fn run_length(bytes: &[u8], marker: u8) -> usize {
    bytes.iter().take_while(|&&b| b == marker).count()
}

fn at_line_start(text: &str, index: usize) -> bool {
    let line = text[..index].rsplit('\n').next().unwrap_or("");
    line.len() <= 3 && line.bytes().all(|b| b == b' ')
}
