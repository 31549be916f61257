//! End-to-end `sync` pipeline: normalize → parse TOC → update site nav.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use protonav_markdown::{NormalizeReport, normalize_file};
use protonav_shared::{Category, CategoryNav, Result, SyncConfig};

use crate::{nav, toc};

/// Outcome of normalizing one category page.
#[derive(Debug)]
pub enum NormalizeStatus {
    /// The file was rewritten.
    Updated { corrections: usize },
    /// Nothing to fix.
    Unchanged,
    /// The file could not be read or written; the run continued without it.
    Failed { error: String },
}

impl From<&NormalizeReport> for NormalizeStatus {
    fn from(report: &NormalizeReport) -> Self {
        if report.written() {
            Self::Updated {
                corrections: report.corrections.len(),
            }
        } else {
            Self::Unchanged
        }
    }
}

/// Per-category part of a [`SyncReport`].
#[derive(Debug)]
pub struct CategorySummary {
    pub category: Category,
    pub normalize: NormalizeStatus,
    pub sections: usize,
    pub links: usize,
}

/// Result of the `sync` pipeline.
#[derive(Debug)]
pub struct SyncReport {
    pub categories: Vec<CategorySummary>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes.
    fn done(&self, report: &SyncReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _report: &SyncReport) {}
}

/// Run the full `sync` pipeline.
///
/// 1. Normalize each category page (failures are logged and skipped)
/// 2. Parse each page's TOC
/// 3. Rewrite the site config's navigation entry
#[instrument(skip_all, fields(site_config = %config.site_config.display()))]
pub fn sync_navigation(config: &SyncConfig, progress: &dyn ProgressReporter) -> Result<SyncReport> {
    run_sync(config, progress, normalize_file)
}

fn run_sync(
    config: &SyncConfig,
    progress: &dyn ProgressReporter,
    normalize: impl Fn(&Path) -> Result<NormalizeReport>,
) -> Result<SyncReport> {
    let start = Instant::now();

    // --- Phase 1: Normalize ---
    progress.phase("Normalizing markdown");
    let statuses: Vec<NormalizeStatus> = Category::ALL
        .iter()
        .map(|&category| {
            let path = config.doc_path(category);
            match normalize(path) {
                Ok(report) => NormalizeStatus::from(&report),
                Err(e) => {
                    warn!(%category, error = %e, "normalization skipped");
                    NormalizeStatus::Failed {
                        error: e.to_string(),
                    }
                }
            }
        })
        .collect();

    // --- Phase 2: Parse TOCs ---
    progress.phase("Parsing tables of contents");
    let node = toc::parse_toc_file(&config.node_doc, Category::Node, &config.rules)?;
    let provider = toc::parse_toc_file(&config.provider_doc, Category::Provider, &config.rules)?;

    // --- Phase 3: Update site nav ---
    progress.phase("Updating site navigation");
    nav::update_site_config(&config.site_config, &config.nav_section, &node, &provider)?;

    let subtrees = [
        CategoryNav {
            category: Category::Node,
            sections: node,
        },
        CategoryNav {
            category: Category::Provider,
            sections: provider,
        },
    ];

    let categories = subtrees
        .iter()
        .zip(statuses)
        .map(|(tree, normalize)| CategorySummary {
            category: tree.category,
            normalize,
            sections: tree.sections.len(),
            links: tree.link_count(),
        })
        .collect();

    let report = SyncReport {
        categories,
        elapsed: start.elapsed(),
    };

    info!(elapsed_ms = report.elapsed.as_millis() as u64, "sync complete");
    progress.done(&report);

    Ok(report)
}
