//! Line-level normalization passes for generated protobuf markdown.
//!
//! Both passes run in a single forward scan. The duplicate-heading pass
//! rewrites the line *after* the current one, so that line is seen in its
//! corrected form when the scan reaches it. Nothing is re-scanned.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::{Correction, CorrectionKind, Normalized};

/// Whitespace before a `##`+ heading marker.
static HEADING_INDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+(##+)").expect("heading indent regex"));

/// Run both passes over `content`.
///
/// CRLF and lone CR line endings are read as LF, so the output always uses LF.
pub(crate) fn run(content: &str) -> Normalized {
    let content = to_lf(content);
    let mut lines: Vec<String> = content.split_inclusive('\n').map(str::to_owned).collect();
    let mut corrections = Vec::new();
    let mut output = String::with_capacity(content.len());

    for i in 0..lines.len() {
        trace!(line_no = i + 1, line = lines[i].trim(), "processing line");

        // Pass 1: duplicated heading word on the following line
        if let Some(heading) = heading_word(&lines[i]).map(str::to_owned) {
            if let Some(next) = lines.get_mut(i + 1) {
                if let Some(fixed) = strip_duplicate(next, &heading) {
                    corrections.push(Correction {
                        line: i + 2,
                        kind: CorrectionKind::DuplicateHeading { heading },
                        before: next.trim().to_string(),
                        after: fixed.trim().to_string(),
                    });
                    *next = fixed;
                }
            }
        }

        // Pass 2: un-indent heading markers
        let line = &lines[i];
        let dedented = dedent_heading(line);
        if dedented != *line {
            corrections.push(Correction {
                line: i + 1,
                kind: CorrectionKind::HeadingIndent,
                before: line.trim_end().to_string(),
                after: dedented.trim_end().to_string(),
            });
        }
        output.push_str(&dedented);
    }

    Normalized {
        content: output,
        corrections,
    }
}

fn to_lf(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

/// First word of a level-3 heading (`### Word ...`), if `line` is one.
fn heading_word(line: &str) -> Option<&str> {
    if !line.trim().starts_with("### ") {
        return None;
    }
    line.split_whitespace().nth(1)
}

/// Remove the first occurrence of `heading` from `line` and trim it.
///
/// Returns `None` when `line` does not contain `heading`.
fn strip_duplicate(line: &str, heading: &str) -> Option<String> {
    if !line.contains(heading) {
        return None;
    }
    let removed = line.replacen(heading, "", 1);
    Some(format!("{}\n", removed.trim()))
}

/// Drop leading whitespace in front of `##`, `###`, ... markers.
fn dedent_heading(line: &str) -> String {
    HEADING_INDENT_RE.replace(line, "$1").into_owned()
}
