//! The host filter-graph contract, modeled as a plain trait.
//!
//! Packet scheduling, PID creation, capability negotiation, and property
//! propagation are all host responsibilities (§6 of the design); this crate
//! only needs the narrow slice of that contract described by [`FilterHost`],
//! which lets [`crate::SplitController`] be exercised against an in-memory
//! fake in tests and wired to a real filter graph by an adapter outside this
//! crate's scope.

use crate::error::SplitError;

/// Identifies one of the controller's output PIDs, i.e. one tile.
///
/// Tiles are numbered row-major over the tile grid: `id = row * num_cols +
/// col`. This is purely an output-ordering convention for the host, distinct
/// from the `(row, col)` pair the controller otherwise carries for geometry
/// lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub usize);

/// Output PID capability/properties set once per tile at configure time.
///
/// Mirrors the host contract's "Set output properties per tile" list (§6):
/// `width`, `height`, `crop_position`, `original_size`, `decoder_config`.
#[derive(Debug, Clone, PartialEq)]
pub struct TileProperties {
    /// Tile width in luma samples, clipped to the picture edge.
    pub width: u32,
    /// Tile height in luma samples, clipped to the picture edge.
    pub height: u32,
    /// Top-left corner of the tile in the input picture's coordinate system.
    pub crop_position: (i32, i32),
    /// The full input picture's dimensions, for players that want to relate
    /// the tile back to the original frame.
    pub original_size: (i32, i32),
    /// The rewritten HEVC decoder configuration record (hvcC) advertising
    /// this tile's own picture size, muxed to bytes.
    pub decoder_config: Vec<u8>,
}

/// The narrow slice of the filter-graph host contract the split controller
/// depends on.
///
/// An implementor owns PID lifecycle and the actual packet objects; the
/// controller only ever hands it a `TileId` plus the bytes and timing of one
/// already-assembled output access unit.
pub trait FilterHost {
    /// Opens (or reconfigures) the output PID for `tile`, advertising `props`.
    /// Called once per tile during `configure`, after any prior PID with the
    /// same id has been closed.
    fn open_tile(&mut self, tile: TileId, props: &TileProperties) -> Result<(), SplitError>;

    /// Tears down the output PID for `tile`. Called for every existing tile
    /// before `configure` allocates the new set, and when the input PID is
    /// removed.
    fn close_tile(&mut self, tile: TileId) -> Result<(), SplitError>;

    /// Sends one fully assembled, length-prefixed access unit to `tile`'s
    /// output, with DTS/CTS copied verbatim from the source access unit.
    fn send_packet(&mut self, tile: TileId, data: Vec<u8>, dts: i64, cts: i64) -> Result<(), SplitError>;

    /// Propagates end-of-stream to `tile`'s output after any buffered packet
    /// has already been flushed.
    fn send_eos(&mut self, tile: TileId) -> Result<(), SplitError>;
}
