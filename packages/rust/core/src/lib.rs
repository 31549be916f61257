//! Core domain logic for protonav.
//!
//! This crate ties markdown normalization, TOC parsing, and the site
//! navigation update into the end-to-end `sync` workflow.

pub mod nav;
pub mod pipeline;
pub mod toc;
