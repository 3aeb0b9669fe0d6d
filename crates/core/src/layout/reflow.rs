//! Greedy chunk placement under a fixed right margin.
//!
//! Between-chunk breaks emit a space plus the continuation character, so a
//! rejoin restores exactly one separating blank. Breaks inside a long quoted
//! literal emit the continuation character directly after the literal's own
//! space, leaving the content unchanged on rejoin. When neither applies the
//! chunk is split at the last column as a final fallback.

use super::{LONG_STRING_MIN_BREAK, LayoutConfig, command_chunks};
use crate::grammar::ast::CommandNode;
use crate::grammar::scan::ScanState;

/// Format a command (with an optional label) into continuation-marked lines
/// that all fit within `config.right_margin`.
pub fn reflow(node: &CommandNode, label: Option<&str>, config: &LayoutConfig) -> String {
    let chunks = command_chunks(node);
    let mut w = Writer {
        cfg: config,
        lines: Vec::new(),
        line: String::new(),
        fresh: false,
    };

    if let Some(lab) = label {
        pad_to(&mut w.line, config.label_position);
        w.line.push_str(lab);
        w.line.push(':');
        if w.line.len() < config.left_margin {
            pad_to(&mut w.line, config.left_margin);
        } else {
            w.line.push(' ');
        }
    } else {
        pad_to(&mut w.line, config.left_margin);
    }
    w.line.push_str(&node.name);

    let has_comment = node.comment.is_some();
    let count = chunks.len();
    for (i, chunk) in chunks.iter().enumerate() {
        let first_pad = (i == 0).then_some(config.kwd_position);
        let last = i + 1 == count && !has_comment;
        w.place_chunk(chunk, first_pad, last);
    }

    if let Some(comment) = &node.comment {
        w.place_comment(comment);
    }

    w.finish()
}

struct Writer<'a> {
    cfg: &'a LayoutConfig,
    lines: Vec<String>,
    line: String,
    /// The current line holds only its continuation indent so far.
    fresh: bool,
}

impl Writer<'_> {
    fn finish(mut self) -> String {
        self.lines.push(self.line);
        self.lines.join("\n")
    }

    fn newline(&mut self) {
        let mut next = String::new();
        pad_to(&mut next, self.cfg.cont_indent);
        self.lines.push(std::mem::replace(&mut self.line, next));
        self.fresh = true;
    }

    /// End the current line at a between-chunk break point.
    fn break_between(&mut self) {
        self.line.push(' ');
        self.line.push(self.cfg.continuation_char);
        self.newline();
    }

    /// Place one atomic chunk, breaking to a continuation line (or splitting
    /// the chunk itself) when it cannot fit. Every placement of a non-final
    /// chunk keeps two columns in reserve for a later ` +`.
    fn place_chunk(&mut self, chunk: &str, first_pad: Option<usize>, last: bool) {
        let margin = self.cfg.right_margin;
        let reserve = if last { 0 } else { 2 };
        let sep = if self.fresh {
            0
        } else if let Some(col) = first_pad {
            if col > self.line.len() + 1 {
                col - self.line.len()
            } else {
                1
            }
        } else {
            1
        };

        if self.line.len() + sep + chunk.len() + reserve <= margin {
            for _ in 0..sep {
                self.line.push(' ');
            }
            self.line.push_str(chunk);
            self.fresh = false;
            return;
        }

        if !self.fresh && self.cfg.cont_indent + chunk.len() + reserve <= margin {
            self.break_between();
            self.line.push_str(chunk);
            self.fresh = false;
            return;
        }

        // Oversized even for a fresh line; split inside the chunk.
        if !self.fresh {
            if self.line.len() + sep + 2 > margin {
                self.break_between();
            } else {
                for _ in 0..sep {
                    self.line.push(' ');
                }
            }
        }
        self.place_long(chunk, last);
    }

    fn place_long(&mut self, chunk: &str, last: bool) {
        let margin = self.cfg.right_margin;
        let allow_quote_breaks = longest_quoted_run(chunk) >= LONG_STRING_MIN_BREAK;
        let mut state = ScanState::new();
        let mut rest = chunk;

        loop {
            let reserve = if last { 0 } else { 2 };
            if self.line.len() + rest.len() + reserve <= margin {
                self.line.push_str(rest);
                self.fresh = false;
                return;
            }

            // Room left for content, keeping one column for the marker.
            let avail = margin.saturating_sub(self.line.len() + 1);
            if avail == 0 && !self.fresh {
                self.break_between();
                continue;
            }

            // Prefer the last space inside a quoted literal before the
            // margin; the space stays on this line so the rejoined content
            // is untouched. A space followed by another space is not a
            // candidate: the next line must never begin with a blank,
            // because rejoining strips a continuation line's leading blanks.
            let mut cut_at_space = None;
            if allow_quote_breaks {
                let mut st = state;
                for (i, ch) in rest.char_indices() {
                    if i >= avail {
                        break;
                    }
                    if ch == ' ' && st.in_quote() && !rest[i + 1..].starts_with(' ') {
                        cut_at_space = Some(i);
                    }
                    st.step(ch);
                }
            }

            let cut = match cut_at_space {
                Some(i) => i + 1,
                None => {
                    // Last resort: fill the line and split mid-token.
                    let mut cut = avail.min(rest.len());
                    while cut > 0 && !rest.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    // Back the split off any blank run so the tail starts
                    // with content; a blank at the head of a continuation
                    // line would vanish on rejoin.
                    while cut > 0 && rest[cut..].starts_with(' ') {
                        cut -= 1;
                    }
                    if cut == 0 {
                        // Forced progress: carry through the first char and
                        // any blanks stuck to it, even past the margin.
                        rest.char_indices()
                            .find(|&(i, ch)| i > 0 && ch != ' ')
                            .map_or(rest.len(), |(i, _)| i)
                    } else {
                        cut
                    }
                }
            };

            let (head, tail) = rest.split_at(cut);
            for ch in head.chars() {
                state.step(ch);
            }
            self.line.push_str(head);
            self.line.push(self.cfg.continuation_char);
            self.newline();
            rest = tail;
        }
    }

    /// Append a trailing comment, inline when it fits, otherwise word-wrapped
    /// across continuation lines.
    fn place_comment(&mut self, comment: &str) {
        if self.line.len() + 1 + comment.len() <= self.cfg.right_margin {
            self.line.push(' ');
            self.line.push_str(comment);
            return;
        }
        let words: Vec<&str> = comment.split_whitespace().collect();
        let count = words.len();
        for (i, word) in words.iter().enumerate() {
            self.place_chunk(word, None, i + 1 == count);
        }
    }
}

fn pad_to(line: &mut String, col: usize) {
    while line.len() < col {
        line.push(' ');
    }
}

/// Length of the longest quoted span (opening quote plus content) in `text`.
fn longest_quoted_run(text: &str) -> usize {
    let mut state = ScanState::new();
    let mut run = 0usize;
    let mut max = 0usize;
    for ch in text.chars() {
        state.step(ch);
        if state.in_quote() {
            run += 1;
            max = max.max(run);
        } else {
            run = 0;
        }
    }
    max
}
