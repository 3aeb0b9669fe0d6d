//! Logical-record assembly for CL source members.
//!
//! A physical line ending with the continuation character continues onto the
//! next line: the marker is dropped, and the next line's leading blanks are
//! stripped before joining. A break made inside a quoted literal carries no
//! blank before the marker, so plain concatenation restores the literal
//! exactly; a between-token break keeps its one separating blank on the
//! first line.

/// One logical record assembled from one or more physical lines.
#[derive(Debug, Clone)]
pub(crate) struct Record {
    /// The joined logical command text.
    pub(crate) text: String,
    /// The original physical lines, newline-joined, exactly as read.
    pub(crate) raw: String,
    /// 1-based number of the first physical line.
    pub(crate) line: usize,
}

/// Assemble logical records from raw member text.
///
/// Blank lines become empty records so the formatter can preserve them.
pub(crate) fn join_records(input: &str, cont: char) -> Vec<Record> {
    let mut out = Vec::new();
    let mut lines = input.lines().enumerate();

    while let Some((i, first)) = lines.next() {
        let mut raw = first.to_string();
        let mut text = String::new();
        let mut cur = first.trim_end();

        loop {
            match cur.strip_suffix(cont) {
                Some(head) if !head.is_empty() || cur.len() == 1 => {
                    text.push_str(head);
                    match lines.next() {
                        Some((_, next)) => {
                            raw.push('\n');
                            raw.push_str(next);
                            cur = next.trim_start().trim_end();
                        }
                        None => break,
                    }
                }
                _ => {
                    text.push_str(cur);
                    break;
                }
            }
        }

        out.push(Record {
            text,
            raw,
            line: i + 1,
        });
    }

    out
}
