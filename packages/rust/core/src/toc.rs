//! TOC (Table of Contents) parser.
//!
//! Reads the bullet-list table of contents that `protoc-gen-doc` emits at the
//! top of a category page and turns it into navigation [`Section`]s:
//!
//! ```text
//! - [akash/node/query.proto](#akash_node_query-proto)     -> Section "Node-Query"
//!     - [QueryRequest](#akash.node.QueryRequest)          -> Link under it
//! ```
//!
//! Whether a bullet opens a section is decided by the marker substring in its
//! label alone. Indentation is ignored: lines are trimmed before matching, so
//! nested bullets and top-level bullets without the marker both become links
//! of the most recent section.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument, trace};

use protonav_shared::{Category, Link, ProtonavError, Result, Section, SectionRules};

/// Matches `- [Label](#anchor)` at the start of a trimmed line.
static TOC_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- \[(.*?)\]\(#(.*?)\)").expect("toc link regex"));

/// Parse a TOC from markdown text.
pub fn parse_toc(content: &str, category: Category, rules: &SectionRules) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut current: Option<Section> = None;

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(caps) = TOC_LINK_RE.captures(line) else {
            continue;
        };
        let label = &caps[1];
        let anchor = &caps[2];

        if label.contains(rules.marker.as_str()) {
            if let Some(done) = current.take() {
                sections.push(done);
            }
            let name = format_section_name(label, rules);
            trace!(%label, %name, "opened section");
            current = Some(Section::new(name));
        } else if let Some(section) = current.as_mut() {
            section
                .links
                .push(Link::new(label, category.link_target(anchor)));
        } else {
            trace!(%label, "dropping link outside any section");
        }
    }

    if let Some(done) = current.take() {
        sections.push(done);
    }

    sections
}

/// Read `path` and parse its TOC.
#[instrument(skip(path, rules), fields(path = %path.display()))]
pub fn parse_toc_file(path: &Path, category: Category, rules: &SectionRules) -> Result<Vec<Section>> {
    let content = std::fs::read_to_string(path).map_err(|e| ProtonavError::io(path, e))?;
    let sections = parse_toc(&content, category, rules);

    debug!(
        sections = sections.len(),
        links = sections.iter().map(|s| s.links.len()).sum::<usize>(),
        "parsed TOC"
    );

    Ok(sections)
}

/// Format a `.proto` path label with the default rules.
///
/// `akash/node/query.proto` becomes `Node-Query`.
pub fn format_parent_section(label: &str) -> String {
    format_section_name(label, &SectionRules::default())
}

/// Format a section label: drop the prefix and marker, then capitalize each
/// path segment and join with `-`.
pub fn format_section_name(label: &str, rules: &SectionRules) -> String {
    let mut stripped = label.to_string();
    if !rules.strip_prefix.is_empty() {
        stripped = stripped.replace(rules.strip_prefix.as_str(), "");
    }
    if !rules.marker.is_empty() {
        stripped = stripped.replace(rules.marker.as_str(), "");
    }

    stripped
        .split('/')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join("-")
}

/// Uppercase the first character and lowercase the rest.
fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) => {
            let upper: String = c.to_uppercase().collect();
            format!("{upper}{}", chars.as_str().to_lowercase())
        }
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
