//! The one piece of HEVC NAL parsing this crate does not own.
//!
//! Parsing VPS/SPS/PPS and NAL unit headers is fully specified and lives in
//! [`h265`], which this controller depends on directly — there's nothing
//! external about it. Locating the two bit offsets inside a slice segment
//! header's variable-length middle section (SAO, reference-picture-set
//! selection, the prediction weight table, QP deltas, deblocking overrides,
//! entry points) is different: decoding that whole section in full never
//! changes what this filter does with it, it only has to know where it ends.
//! `h265::rewrite_slice` already takes those offsets as a precomputed input
//! rather than re-deriving them (see its module doc), so the controller in
//! turn takes them from whatever NAL parser populated them for the host.

use h265::{PpsRbsp, SliceHeaderState, SpsRbsp};

use crate::error::SplitError;

/// The facts about one parsed slice segment that [`crate::SplitController`]
/// needs to route and rewrite it: the address naming its tile, and the bit
/// offsets `h265::rewrite_slice` needs to relocate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedSlice {
    /// `slice_segment_address` as coded in the source, a raster CTB index in
    /// the *input* picture. Zero when `first_slice_segment_in_pic_flag` was
    /// set (the field isn't coded at all in that case).
    pub slice_segment_address: u64,
    /// The bit offsets `h265::rewrite_slice` copies through verbatim.
    pub header_state: SliceHeaderState,
}

/// Locates a slice segment header's bit offsets against the active SPS/PPS.
///
/// An implementor owns whatever full slice-header decode is needed to find
/// `entry_point_start_bits`/`header_size_bits`; the controller only ever asks
/// for the result. This mirrors [`crate::FilterHost`]'s treatment of the host
/// filter-graph contract: a narrow trait so the controller can be exercised
/// against an in-memory fake in tests and wired to a real NAL parser outside
/// this crate's scope.
pub trait SliceHeaderLocator {
    /// Parses the slice segment NAL `in_slice` (NAL unit header included,
    /// emulation prevention bytes intact) against the given active SPS/PPS.
    fn locate_slice_header(
        &mut self,
        in_slice: &[u8],
        sps: &SpsRbsp,
        pps: &PpsRbsp,
    ) -> Result<ParsedSlice, SplitError>;
}
