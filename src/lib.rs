//! # duct-gallery
//!
//! A build-time README generator for galleries of [duct] execution examples.
//! Your filesystem is the data source: each subdirectory of the gallery root
//! is one entry, described by a fixed naming convention (`command.sh`,
//! optional `setup.sh`, `plots/`).
//!
//! # Architecture: Scan → Process → Render Pipeline
//!
//! The tool runs a sequential pipeline over the gallery root:
//!
//! ```text
//! 1. Scan      entries/  →  Gallery          (filesystem → validated entries)
//! 2. Process   entry     →  plots/usage.png  (scripts + external plot tool)
//! 3. Render    entries   →  README.md        (one markdown document)
//! ```
//!
//! Entries are processed one at a time in scan order. Any failure while
//! processing an entry — a failing script, a missing usage report, a plot
//! tool error — drops that entry with a warning and the run continues. Only
//! four conditions are fatal: a missing gallery root, an unwritable output
//! location, zero valid entries after scanning, and zero entries surviving
//! processing.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`entry`] | `GalleryEntry` model, file-naming convention, per-mode validation |
//! | [`scan`] | Walks the gallery root, collecting valid entries and rejection reasons |
//! | [`config`] | Optional `gallery.toml` at the root: mode, timeouts, plot tool |
//! | [`exec`] | Bounded shell-script execution behind the [`exec::ScriptRunner`] trait |
//! | [`usage`] | Resolves the usage report named by the `.duct/*info.json` sidecar |
//! | [`plot`] | External plot tool invocation behind the [`plot::Plotter`] trait |
//! | [`render`] | Pure markdown rendering with relative plot links |
//! | [`pipeline`] | Orchestration: discover, execute, resolve, plot, render, write |
//! | [`output`] | CLI output formatting — pure `format_*` builders, `print_*` wrappers |
//!
//! # Design Decisions
//!
//! ## Subprocesses Are Collaborators, Not Core Logic
//!
//! Script execution and plot generation sit behind narrow traits
//! ([`exec::ScriptRunner`], [`plot::Plotter`]). The orchestration and
//! rendering logic never spawn processes directly, so the pipeline is
//! testable with fakes, and the real implementations stay small: run one
//! program, bound it with a timeout, capture its output, report pass/fail.
//! A timed-out or crashed subprocess is a per-entry failure, never a panic
//! and never a propagated error.
//!
//! ## Two Modes, One Flag
//!
//! `execute` mode runs each entry's scripts and generates a fresh plot.
//! `prerendered` mode skips execution entirely and documents plots that
//! already exist in each entry's `plots/` directory. The mode changes what
//! validation requires: `execute` needs runnable scripts, `prerendered`
//! needs at least one existing `.png`. The default lives in `gallery.toml`
//! and the `--mode` flag overrides it.
//!
//! ## Whole-File Output
//!
//! The output document is rendered fully in memory and written exactly once
//! at the end of a successful run. A failed run never leaves a partial
//! document behind.
//!
//! [duct]: https://github.com/con/duct

pub mod config;
pub mod entry;
pub mod exec;
pub mod output;
pub mod pipeline;
pub mod plot;
pub mod render;
pub mod scan;
pub mod usage;
