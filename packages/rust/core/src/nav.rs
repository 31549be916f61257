//! Site navigation updater.
//!
//! Owns exactly one entry of the site config's top-level `nav` sequence: the
//! single-key mapping named by `nav_section`. Each run replaces that entry's
//! value with the `Node` and `Provider` subtrees, in that order, and leaves the
//! rest of the document, including key order, untouched.

use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::{debug, info, instrument};

use protonav_shared::{Category, ProtonavError, Result, Section};

const NAV_KEY: &str = "nav";

/// Replace the `nav_section` entry of `doc` with the node and provider subtrees.
///
/// A null document or a missing/null `nav` is treated as empty. When no `nav`
/// element holds `nav_section`, `{nav_section: [...]}` is appended.
pub fn apply_navigation(
    doc: &mut Value,
    nav_section: &str,
    node: &[Section],
    provider: &[Section],
) -> Result<()> {
    if doc.is_null() {
        *doc = Value::Mapping(Mapping::new());
    }
    let root = doc
        .as_mapping_mut()
        .ok_or_else(|| ProtonavError::validation("site config must be a YAML mapping"))?;

    if root.get(NAV_KEY).is_none_or(Value::is_null) {
        root.insert(Value::String(NAV_KEY.into()), Value::Sequence(Vec::new()));
    }
    let nav = root
        .get_mut(NAV_KEY)
        .and_then(Value::as_sequence_mut)
        .ok_or_else(|| ProtonavError::validation("`nav` must be a sequence"))?;

    let subtree_value = Value::Sequence(vec![
        category_entry(Category::Node, node)?,
        category_entry(Category::Provider, provider)?,
    ]);

    let existing = nav
        .iter()
        .position(|entry| entry.as_mapping().is_some_and(|m| m.contains_key(nav_section)));

    match existing {
        Some(index) => {
            debug!(index, "replacing existing navigation entry");
            if let Some(slot) = nav[index]
                .as_mapping_mut()
                .and_then(|m| m.get_mut(nav_section))
            {
                *slot = subtree_value;
            }
        }
        None => {
            debug!("appending new navigation entry");
            let mut entry = Mapping::new();
            entry.insert(Value::String(nav_section.to_string()), subtree_value);
            nav.push(Value::Mapping(entry));
        }
    }

    Ok(())
}

/// `{Category: [sections...]}`
fn category_entry(category: Category, sections: &[Section]) -> Result<Value> {
    let sections = serde_yaml::to_value(sections)
        .map_err(|e| ProtonavError::parse(format!("failed to build {category} navigation: {e}")))?;
    let mut entry = Mapping::new();
    entry.insert(Value::String(category.display_name().into()), sections);
    Ok(Value::Mapping(entry))
}

/// Load the site config at `path`, apply the navigation, and write it back.
#[instrument(skip(path, node, provider), fields(path = %path.display()))]
pub fn update_site_config(
    path: &Path,
    nav_section: &str,
    node: &[Section],
    provider: &[Section],
) -> Result<()> {
    let content = std::fs::read_to_string(path).map_err(|e| ProtonavError::io(path, e))?;
    let mut doc: Value = serde_yaml::from_str(&content).map_err(|e| {
        ProtonavError::parse(format!("failed to parse {}: {e}", path.display()))
    })?;

    apply_navigation(&mut doc, nav_section, node, provider)?;

    let rendered = serde_yaml::to_string(&doc).map_err(|e| {
        ProtonavError::parse(format!("failed to serialize {}: {e}", path.display()))
    })?;
    std::fs::write(path, rendered).map_err(|e| ProtonavError::io(path, e))?;

    info!(
        node_sections = node.len(),
        provider_sections = provider.len(),
        "site navigation updated"
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use protonav_shared::Link;

    const SECTION: &str = "Protobuf Documentation";

    fn fixture_path(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(name)
    }

    fn section(name: &str, links: &[(&str, &str)]) -> Section {
        Section {
            name: name.into(),
            links: links.iter().map(|(l, t)| Link::new(*l, *t)).collect(),
        }
    }

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).expect("valid yaml")
    }

    fn keys(value: &Value) -> Vec<String> {
        value
            .as_mapping()
            .expect("mapping")
            .keys()
            .map(|k| k.as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn creates_section_when_missing() {
        let mut doc = yaml("site_name: Docs\nnav:\n  - Home: index.md\n  - About: about.md\n");
        let node = [section("Node-Query", &[("QueryRequest", "node/#queryrequest")])];

        apply_navigation(&mut doc, SECTION, &node, &[]).unwrap();

        let nav = doc["nav"].as_sequence().unwrap();
        assert_eq!(nav.len(), 3);
        assert_eq!(nav[0]["Home"], Value::String("index.md".into()));
        assert_eq!(nav[1]["About"], Value::String("about.md".into()));

        let proto = &nav[2][SECTION];
        assert_eq!(
            proto[0]["Node"][0]["Node-Query"][0]["QueryRequest"],
            Value::String("node/#queryrequest".into())
        );
        assert_eq!(proto[1]["Provider"], Value::Sequence(vec![]));
    }

    #[test]
    fn subtrees_are_node_then_provider() {
        let mut doc = yaml("nav: []\n");
        let node = [section("Node-Query", &[("Query", "node/#query")])];
        let provider = [section("Provider-Lease", &[("Lease", "provider/#lease")])];

        apply_navigation(&mut doc, SECTION, &node, &provider).unwrap();

        let proto = doc["nav"][0][SECTION].as_sequence().unwrap();
        assert_eq!(proto.len(), 2);
        assert_eq!(keys(&proto[0]), vec!["Node"]);
        assert_eq!(keys(&proto[0]["Node"][0]), vec!["Node-Query"]);
        assert_eq!(keys(&proto[1]), vec!["Provider"]);
        assert_eq!(
            proto[1]["Provider"][0]["Provider-Lease"][0]["Lease"],
            Value::String("provider/#lease".into())
        );
    }

    #[test]
    fn replaces_existing_section_in_place() {
        let mut doc = yaml(
            "nav:\n  - Home: index.md\n  - Protobuf Documentation:\n      - Stale: old.md\n  - About: about.md\n",
        );
        apply_navigation(&mut doc, SECTION, &[], &[]).unwrap();

        let nav = doc["nav"].as_sequence().unwrap();
        assert_eq!(nav.len(), 3);
        let proto = nav[1][SECTION].as_sequence().unwrap();
        assert_eq!(proto.len(), 2);
        assert_eq!(keys(&proto[0]), vec!["Node"]);
        assert_eq!(keys(&proto[1]), vec!["Provider"]);
        assert!(nav[2]["About"].is_string());
    }

    #[test]
    fn second_run_does_not_accumulate() {
        let mut doc = yaml("nav: []\n");
        let old_node = [section("Node-Old", &[("Gone", "node/#gone")])];
        let old_provider = [section("Provider-Old", &[])];
        let new_node = [section("Node-New", &[("Fresh", "node/#fresh")])];

        apply_navigation(&mut doc, SECTION, &old_node, &old_provider).unwrap();
        apply_navigation(&mut doc, SECTION, &new_node, &[]).unwrap();

        let nav = doc["nav"].as_sequence().unwrap();
        assert_eq!(nav.len(), 1);
        let proto = nav[0][SECTION].as_sequence().unwrap();
        assert_eq!(proto.len(), 2);
        assert_eq!(keys(&proto[0]["Node"][0]), vec!["Node-New"]);
        assert_eq!(proto[1]["Provider"], Value::Sequence(vec![]));
    }

    #[test]
    fn missing_nav_is_created_at_end() {
        let mut doc = yaml("site_name: Docs\ntheme:\n  name: material\n");
        apply_navigation(&mut doc, SECTION, &[], &[]).unwrap();

        assert_eq!(keys(&doc), vec!["site_name", "theme", "nav"]);
        assert_eq!(doc["nav"].as_sequence().unwrap().len(), 1);
    }

    #[test]
    fn null_nav_and_empty_document_are_treated_as_empty() {
        let mut doc = yaml("nav:\n");
        apply_navigation(&mut doc, SECTION, &[], &[]).unwrap();
        assert_eq!(doc["nav"].as_sequence().unwrap().len(), 1);

        let mut empty = Value::Null;
        apply_navigation(&mut empty, SECTION, &[], &[]).unwrap();
        assert_eq!(keys(&empty), vec!["nav"]);
    }

    #[test]
    fn string_nav_entries_are_skipped() {
        let mut doc = yaml("nav:\n  - index.md\n  - Protobuf Documentation: proto.md\n");
        apply_navigation(&mut doc, SECTION, &[], &[]).unwrap();

        let nav = doc["nav"].as_sequence().unwrap();
        assert_eq!(nav.len(), 2);
        assert_eq!(nav[0], Value::String("index.md".into()));
        assert_eq!(nav[1][SECTION].as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn non_sequence_nav_is_rejected() {
        let mut doc = yaml("nav:\n  Home: index.md\n");
        let err = apply_navigation(&mut doc, SECTION, &[], &[]).unwrap_err();
        assert!(matches!(err, ProtonavError::Validation { .. }));
    }

    #[test]
    fn non_mapping_document_is_rejected() {
        let mut doc = yaml("- just\n- a list\n");
        let err = apply_navigation(&mut doc, SECTION, &[], &[]).unwrap_err();
        assert!(matches!(err, ProtonavError::Validation { .. }));
    }

    #[test]
    fn update_site_config_rewrites_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mkdocs.yml");
        std::fs::copy(fixture_path("site/mkdocs.yml"), &path).unwrap();

        let node = [section("Node-Query", &[("QueryRequest", "node/#akash.node.QueryRequest")])];
        let provider = [section("Provider-Lease-V1-Lease", &[])];
        update_site_config(&path, SECTION, &node, &provider).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains('{'), "expected block style:\n{written}");
        assert!(!written.contains("Stale"));

        let doc = yaml(&written);
        assert_eq!(keys(&doc), vec!["site_name", "theme", "nav", "markdown_extensions"]);
        assert_eq!(doc["markdown_extensions"][0]["toc"]["permalink"], Value::Bool(true));

        let nav = doc["nav"].as_sequence().unwrap();
        assert_eq!(nav.len(), 3);
        assert_eq!(
            nav[1][SECTION][0]["Node"][0]["Node-Query"][0]["QueryRequest"],
            Value::String("node/#akash.node.QueryRequest".into())
        );
        assert!(nav[1][SECTION][1]["Provider"][0].get("Provider-Lease-V1-Lease").is_some());
    }

    #[test]
    fn update_site_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = update_site_config(&dir.path().join("absent.yml"), SECTION, &[], &[]).unwrap_err();
        assert!(matches!(err, ProtonavError::Io { .. }));
    }

    #[test]
    fn update_site_config_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mkdocs.yml");
        std::fs::write(&path, "nav: [unterminated\n").unwrap();

        let err = update_site_config(&path, SECTION, &[], &[]).unwrap_err();
        assert!(matches!(err, ProtonavError::Parse { .. }));
    }
}
