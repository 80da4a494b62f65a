//! citysuggest-cli
//! ===============
//!
//! Command-line interface for the `citysuggest-core` autocomplete engine.
//!
//! This crate primarily provides a binary (`citysuggest`). The library target
//! only exists so the crate has a rendered documentation page.
//!
//! Quick start
//! -----------
//!
//! ```text
//! citysuggest --help
//! citysuggest stats
//! citysuggest suggest Mont --latitude 45.50884 --longitude -73.58781
//! citysuggest --input cities15000.txt.gz --filter CA,US build-cache cities.catalog.bin
//! ```
//!
//! For programmatic access use the [`citysuggest-core`] crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
