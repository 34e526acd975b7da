//! A streaming HEVC tile-split rewrite filter.
//!
//! Ingests a single HEVC elementary stream whose pictures are encoded with
//! motion-constrained tiles, and emits one independent HEVC elementary
//! stream per tile, each decodable in isolation by an ordinary,
//! full-frame-assuming decoder.
//!
//! The bitstream-level work — rewriting SPS/PPS/slice-segment headers and
//! mapping slice addresses to tiles — lives in the [`h265`] crate this one
//! depends on. This crate owns the orchestration: tracking the active
//! decoder configuration, opening and tearing down one output per tile, and
//! fanning each access unit's NALs out to the tile(s) that should receive
//! them.
//!
//! ## Component Overview
//!
//! - [`SplitController`]: the stateful core, driven by `configure` once per
//!   input format and `process_access_unit` once per input access unit.
//! - [`FilterHost`]: the narrow slice of the embedding filter-graph's
//!   contract this crate needs, so the controller can be exercised against
//!   an in-memory fake in tests and wired to a real host outside this
//!   crate's scope.
//! - [`SliceHeaderLocator`]: likewise for the external HEVC NAL parser that
//!   locates a slice segment header's variable-length bit offsets.
//! - [`SplitConfig`]: construction-time options.
//! - [`SplitError`]: the error type surfaced by both entry points.
//!
//! This crate performs no threading or blocking I/O of its own; `configure`
//! and `process_access_unit` are expected to be called serially by the host.
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unreachable_pub)]

mod config;
mod controller;
mod error;
mod host;
mod nal_parser;

pub use config::SplitConfig;
pub use controller::SplitController;
pub use error::SplitError;
pub use host::{FilterHost, TileId, TileProperties};
pub use nal_parser::{ParsedSlice, SliceHeaderLocator};
