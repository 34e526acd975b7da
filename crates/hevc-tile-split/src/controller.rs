//! The split controller (C5): fans one HEVC access unit out to its tiles.

use std::collections::HashMap;
use std::io;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use h265::{NALUnitType, PpsRbsp, SpsRbsp, TileGeometry};
use tracing::{debug, info, warn};

use crate::config::SplitConfig;
use crate::error::SplitError;
use crate::host::{FilterHost, TileId, TileProperties};
use crate::nal_parser::SliceHeaderLocator;

/// Input-Config: derived once from the decoder configuration record, rebuilt
/// whenever its CRC changes.
struct InputConfig {
    nal_length_size: u8,
    sps_id: u64,
    pps_id: u64,
    config_crc: u32,
}

/// Tile-Output: one per tile, identified by its position in
/// [`SplitController::tiles`] (`row * num_cols + col`, matching the
/// [`TileId`] handed to [`FilterHost`]).
struct TileOutput {
    geometry: TileGeometry,
    cur_packet: Option<Vec<u8>>,
}

/// Reads a big-endian length prefix of `size` bytes (1, 2, 3, or 4).
fn read_length_prefix(mut bytes: &[u8], size: u8) -> io::Result<usize> {
    Ok(match size {
        1 => bytes.read_u8()? as usize,
        2 => bytes.read_u16::<BigEndian>()? as usize,
        3 => {
            let hi = bytes.read_u8()? as usize;
            let lo = bytes.read_u16::<BigEndian>()? as usize;
            (hi << 16) | lo
        }
        4 => bytes.read_u32::<BigEndian>()? as usize,
        _ => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "NAL length-prefix size must be 1, 2, 3, or 4",
            ));
        }
    })
}

/// Writes `value` as a big-endian length prefix of exactly `size` bytes.
///
/// Grounded on GPAC's `bsnal`, reused here for every tile that receives a
/// copy of a broadcast NAL as well as for routed slice NALs.
fn write_length_prefix(out: &mut Vec<u8>, size: u8, value: usize) -> io::Result<()> {
    match size {
        1 => out.write_u8(value as u8)?,
        2 => out.write_u16::<BigEndian>(value as u16)?,
        3 => {
            out.write_u8((value >> 16) as u8)?;
            out.write_u16::<BigEndian>(value as u16)?;
        }
        4 => out.write_u32::<BigEndian>(value as u32)?,
        _ => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "NAL length-prefix size must be 1, 2, 3, or 4",
            ));
        }
    }
    Ok(())
}

/// One rewritten NAL, staged for a tile's `cur_packet` but not yet appended.
///
/// Collecting these across a whole access unit before touching any
/// `cur_packet` is what gives `process_access_unit` its atomicity: a failure
/// partway through the scan returns before any tile has been mutated, so a
/// dropped packet never leaves a partial one behind.
enum Addition {
    /// Routed to exactly one tile (a VCL NAL).
    One { tile: usize, bytes: Vec<u8> },
    /// Rewritten once per tile because the rewrite depends on tile geometry
    /// (an inline SPS).
    PerTile { bytes_per_tile: Vec<Vec<u8>> },
    /// The same bytes appended to every tile (an inline PPS, VPS, or any
    /// other non-VCL NAL).
    Broadcast { bytes: Vec<u8> },
}

/// Fans one HEVC elementary stream out to N independent per-tile streams.
///
/// Owns the active SPS/PPS tables, the current tile set, and each tile's
/// in-progress output access unit. `configure` and `process_access_unit` are
/// called serially by the host (§5 of the design); this type performs no
/// threading of its own.
pub struct SplitController {
    config: SplitConfig,
    input: Option<InputConfig>,
    sps_table: HashMap<u64, SpsRbsp>,
    pps_table: HashMap<u64, PpsRbsp>,
    num_cols: u64,
    tiles: Vec<TileOutput>,
}

impl SplitController {
    /// Creates a controller with no input configured yet.
    pub fn new(config: SplitConfig) -> Self {
        Self {
            config,
            input: None,
            sps_table: HashMap::new(),
            pps_table: HashMap::new(),
            num_cols: 1,
            tiles: Vec::new(),
        }
    }

    /// Handles a (re)configuration of the input PID: parses `decoder_config`
    /// (an HEVC decoder configuration record), tears down any existing tiles,
    /// and opens one output tile per entry in the PPS's tile grid.
    ///
    /// A no-op, per testable property 6, if `decoder_config`'s checksum
    /// matches the one already configured.
    pub fn configure(&mut self, host: &mut impl FilterHost, decoder_config: &[u8]) -> Result<(), SplitError> {
        let crc = crc32fast::hash(decoder_config);
        if self.input.as_ref().is_some_and(|input| input.config_crc == crc) {
            debug!(crc, "decoder config unchanged, keeping existing tiles");
            return Ok(());
        }

        for id in 0..self.tiles.len() {
            host.close_tile(TileId(id))?;
        }
        self.tiles.clear();
        self.sps_table.clear();
        self.pps_table.clear();

        let record = h265::HEVCDecoderConfigurationRecord::demux(io::Cursor::new(decoder_config))
            .map_err(|e| SplitError::from_io("decoder configuration record", e))?;
        let nal_length_size = record.length_size_minus_one + 1;

        let mut first_sps_id = None;
        let mut first_pps_id = None;

        for array in &record.arrays {
            match array.nal_unit_type {
                NALUnitType::SpsNut => {
                    for nalu in &array.nalus {
                        let sps = h265::SpsNALUnit::parse(io::Cursor::new(nalu.as_ref()))
                            .map_err(|e| SplitError::from_io("inline SPS", e))?;
                        if self.config.reject_multilayer && sps.nal_unit_header.nuh_layer_id != 0 {
                            return Err(SplitError::NonCompliantBitstream(format!(
                                "SPS nuh_layer_id {} != 0",
                                sps.nal_unit_header.nuh_layer_id
                            )));
                        }
                        first_sps_id.get_or_insert(sps.rbsp.sps_seq_parameter_set_id);
                        self.sps_table.insert(sps.rbsp.sps_seq_parameter_set_id, sps.rbsp);
                    }
                }
                NALUnitType::PpsNut => {
                    for nalu in &array.nalus {
                        let pps = h265::PpsNALUnit::parse(io::Cursor::new(nalu.as_ref()))
                            .map_err(|e| SplitError::from_io("inline PPS", e))?;
                        if self.config.reject_multilayer && pps.nal_unit_header.nuh_layer_id != 0 {
                            return Err(SplitError::NonCompliantBitstream(format!(
                                "PPS nuh_layer_id {} != 0",
                                pps.nal_unit_header.nuh_layer_id
                            )));
                        }
                        first_pps_id.get_or_insert(pps.rbsp.pps_pic_parameter_set_id);
                        self.pps_table.insert(pps.rbsp.pps_pic_parameter_set_id, pps.rbsp);
                    }
                }
                _ => {}
            }
        }

        let sps_id =
            first_sps_id.ok_or_else(|| SplitError::NonCompliantBitstream("decoder config carries no SPS".into()))?;
        let pps_id =
            first_pps_id.ok_or_else(|| SplitError::NonCompliantBitstream("decoder config carries no PPS".into()))?;
        let sps = self.sps_table.get(&sps_id).expect("sps_id was just inserted");
        let pps = self.pps_table.get(&pps_id).expect("pps_id was just inserted");

        let (num_rows, num_cols) = match &pps.tile_grid {
            Some(grid) => (grid.num_tile_rows(), grid.num_tile_columns()),
            None => (1, 1),
        };
        self.num_cols = num_cols;

        let input_width = sps.pic_width_in_luma_samples.get();
        let input_height = sps.pic_height_in_luma_samples.get();

        info!(
            input_width,
            input_height,
            rows = num_rows,
            cols = num_cols,
            "configuring hevc tile split"
        );

        let mut tiles = Vec::with_capacity((num_rows * num_cols) as usize);
        for row in 0..num_rows {
            for col in 0..num_cols {
                let geometry = h265::tile_sizes(sps, pps, row, col);

                let mut tile_record = record.clone();
                for array in &mut tile_record.arrays {
                    match array.nal_unit_type {
                        NALUnitType::SpsNut => {
                            for nalu in &mut array.nalus {
                                let rewritten = h265::rewrite_sps(nalu.as_ref(), 0, geometry.width, geometry.height)
                                    .map_err(|e| SplitError::from_io("tile decoder config SPS", e))?;
                                *nalu = rewritten.into();
                            }
                        }
                        NALUnitType::PpsNut => {
                            for nalu in &mut array.nalus {
                                let rewritten = h265::rewrite_pps_no_grid(nalu.as_ref())
                                    .map_err(|e| SplitError::from_io("tile decoder config PPS", e))?;
                                *nalu = rewritten.into();
                            }
                        }
                        // VPS and everything else (SEI arrays) pass through unchanged:
                        // they carry no per-tile geometry.
                        _ => {}
                    }
                }

                let mut decoder_config = Vec::with_capacity(tile_record.size() as usize);
                tile_record
                    .mux(&mut decoder_config)
                    .map_err(|e| SplitError::from_io("tile decoder config mux", e))?;

                let id = TileId(tiles.len());
                let props = TileProperties {
                    width: geometry.width as u32,
                    height: geometry.height as u32,
                    crop_position: (geometry.x as i32, geometry.y as i32),
                    original_size: (input_width as i32, input_height as i32),
                    decoder_config,
                };
                host.open_tile(id, &props)?;

                tiles.push(TileOutput { geometry, cur_packet: None });
            }
        }

        self.tiles = tiles;
        self.input = Some(InputConfig { nal_length_size, sps_id, pps_id, config_crc: crc });
        Ok(())
    }

    /// Processes one input access unit: iterates its length-prefixed NALs,
    /// routes each VCL NAL to its owning tile (rewriting its slice header to
    /// land at address 0 of that tile's own picture), and broadcasts every
    /// non-VCL NAL — rewriting inline SPS/PPS the same way `configure` does —
    /// to all tiles.
    ///
    /// On any parse failure the whole access unit is dropped and a warning is
    /// logged; no partial output is ever sent for it (per §7's failure
    /// semantics), since every rewrite is staged into an [`Addition`] and only
    /// committed to a tile's `cur_packet` once the entire scan has succeeded.
    pub fn process_access_unit(
        &mut self,
        host: &mut impl FilterHost,
        locator: &mut impl SliceHeaderLocator,
        data: &[u8],
        dts: i64,
        cts: i64,
    ) -> Result<(), SplitError> {
        let input = self
            .input
            .as_ref()
            .ok_or_else(|| SplitError::NotSupported("process_access_unit called before configure".into()))?;
        let nal_length_size = input.nal_length_size;
        let sps = self
            .sps_table
            .get(&input.sps_id)
            .ok_or_else(|| SplitError::NonCompliantBitstream("active SPS no longer present".into()))?;
        let pps = self
            .pps_table
            .get(&input.pps_id)
            .ok_or_else(|| SplitError::NonCompliantBitstream("active PPS no longer present".into()))?;
        let ctb_size = sps.ctb_size_y();
        let num_cols = self.num_cols;
        let num_tiles = self.tiles.len();

        let mut additions = Vec::new();
        let mut cursor = 0usize;

        while cursor < data.len() {
            let prefix_len = nal_length_size as usize;
            if cursor + prefix_len > data.len() {
                return Err(SplitError::from_io(
                    "access unit NAL length prefix",
                    io::Error::from(io::ErrorKind::UnexpectedEof),
                ));
            }
            let len = read_length_prefix(&data[cursor..cursor + prefix_len], nal_length_size)
                .map_err(|e| SplitError::from_io("access unit NAL length prefix", e))?;
            cursor += prefix_len;

            if cursor + len > data.len() {
                return Err(SplitError::from_io(
                    "access unit NAL payload",
                    io::Error::from(io::ErrorKind::UnexpectedEof),
                ));
            }
            let nal = &data[cursor..cursor + len];
            cursor += len;

            let header =
                h265::NALUnitHeader::parse(io::Cursor::new(nal)).map_err(|e| SplitError::from_io("NAL unit header", e))?;
            if self.config.reject_multilayer && header.nuh_layer_id != 0 {
                return Err(SplitError::NonCompliantBitstream(format!(
                    "nuh_layer_id {} != 0",
                    header.nuh_layer_id
                )));
            }

            if header.nal_unit_type.is_vcl() {
                let parsed = locator.locate_slice_header(nal, sps, pps)?;
                let location = h265::locate(sps, pps, parsed.slice_segment_address);
                let tile_index = (location.row * num_cols + location.col) as usize;
                let tile = self.tiles.get(tile_index).ok_or_else(|| {
                    SplitError::NonCompliantBitstream(format!(
                        "slice_segment_address {} maps to tile ({}, {}) outside the {}-tile grid",
                        parsed.slice_segment_address, location.row, location.col, num_tiles
                    ))
                })?;

                let rewritten = h265::rewrite_slice(
                    nal,
                    header.nal_unit_type,
                    pps,
                    ctb_size,
                    tile.geometry.width,
                    tile.geometry.height,
                    0,
                    parsed.header_state,
                )
                .map_err(|e| SplitError::from_io("slice header rewrite", e))?;

                let mut framed = Vec::with_capacity(prefix_len + rewritten.len());
                write_length_prefix(&mut framed, nal_length_size, rewritten.len())
                    .map_err(|e| SplitError::from_io("slice length prefix", e))?;
                framed.extend_from_slice(&rewritten);
                additions.push(Addition::One { tile: tile_index, bytes: framed });
            } else if header.nal_unit_type == NALUnitType::SpsNut {
                let mut bytes_per_tile = Vec::with_capacity(num_tiles);
                for tile in &self.tiles {
                    let rewritten = h265::rewrite_sps(nal, header.nuh_layer_id, tile.geometry.width, tile.geometry.height)
                        .map_err(|e| SplitError::from_io("inline SPS rewrite", e))?;
                    let mut framed = Vec::with_capacity(prefix_len + rewritten.len());
                    write_length_prefix(&mut framed, nal_length_size, rewritten.len())
                        .map_err(|e| SplitError::from_io("inline SPS length prefix", e))?;
                    framed.extend_from_slice(&rewritten);
                    bytes_per_tile.push(framed);
                }
                additions.push(Addition::PerTile { bytes_per_tile });
            } else if header.nal_unit_type == NALUnitType::PpsNut {
                let rewritten =
                    h265::rewrite_pps_no_grid(nal).map_err(|e| SplitError::from_io("inline PPS rewrite", e))?;
                let mut framed = Vec::with_capacity(prefix_len + rewritten.len());
                write_length_prefix(&mut framed, nal_length_size, rewritten.len())
                    .map_err(|e| SplitError::from_io("inline PPS length prefix", e))?;
                framed.extend_from_slice(&rewritten);
                additions.push(Addition::Broadcast { bytes: framed });
            } else {
                // VPS passes through unchanged (no per-tile geometry); AUD, EOS,
                // EOB, FD, and SEI are broadcast verbatim too.
                let mut framed = Vec::with_capacity(prefix_len + len);
                write_length_prefix(&mut framed, nal_length_size, len)
                    .map_err(|e| SplitError::from_io("broadcast NAL length prefix", e))?;
                framed.extend_from_slice(nal);
                additions.push(Addition::Broadcast { bytes: framed });
            }
        }

        let scratch_capacity = self.config.scratch_capacity;
        for addition in additions {
            match addition {
                Addition::One { tile, bytes } => {
                    self.tiles[tile]
                        .cur_packet
                        .get_or_insert_with(|| Vec::with_capacity(scratch_capacity))
                        .extend_from_slice(&bytes);
                }
                Addition::PerTile { bytes_per_tile } => {
                    for (tile, bytes) in self.tiles.iter_mut().zip(bytes_per_tile) {
                        tile.cur_packet
                            .get_or_insert_with(|| Vec::with_capacity(scratch_capacity))
                            .extend_from_slice(&bytes);
                    }
                }
                Addition::Broadcast { bytes } => {
                    for tile in &mut self.tiles {
                        tile.cur_packet
                            .get_or_insert_with(|| Vec::with_capacity(scratch_capacity))
                            .extend_from_slice(&bytes);
                    }
                }
            }
        }

        for id in 0..self.tiles.len() {
            if let Some(packet) = self.tiles[id].cur_packet.take() {
                host.send_packet(TileId(id), packet, dts, cts)?;
            }
        }

        Ok(())
    }

    /// Flushes any buffered packet and propagates end-of-stream to every
    /// tile. Ordinary operation never leaves a packet buffered across a
    /// `process_access_unit` call, so the flush below is defensive.
    pub fn eos(&mut self, host: &mut impl FilterHost) -> Result<(), SplitError> {
        for id in 0..self.tiles.len() {
            if let Some(packet) = self.tiles[id].cur_packet.take() {
                warn!(tile = id, "flushing unterminated packet at end of stream");
                host.send_packet(TileId(id), packet, 0, 0)?;
            }
            host.send_eos(TileId(id))?;
        }
        Ok(())
    }

    /// Tears down every tile. Called when the input PID itself is removed.
    pub fn teardown(&mut self, host: &mut impl FilterHost) -> Result<(), SplitError> {
        for id in 0..self.tiles.len() {
            host.close_tile(TileId(id))?;
        }
        self.tiles.clear();
        self.input = None;
        self.sps_table.clear();
        self.pps_table.clear();
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use std::num::NonZero;

    use bytes_util::{BitReader, BitWriter};
    use expgolomb::{BitReaderExpGolombExt, BitWriterExpGolombExt};
    use h265::SliceHeaderState;

    use super::*;
    use crate::nal_parser::ParsedSlice;

    /// A real, previously-captured 1920x1080 SPS (`ctb_size_y = 32`,
    /// `pic_width_in_luma_samples = 1920`, `pic_height_in_luma_samples =
    /// 1088` before an 8-pixel conformance-window crop to 1080), reused from
    /// `h265::sps::tests::test_sps_parse2` so tile arithmetic in these tests
    /// runs against a fixture already validated against the wire format
    /// rather than a hand-invented one.
    const SPS_1920X1080: &[u8] = &[
        0x42, 0x01, 0x01, 0x01, 0x40, 0x00, 0x00, 0x03, 0x00, 0x90, 0x00, 0x00, 0x03, 0x00, 0x00, 0x03, 0x00, 0x78,
        0xa0, 0x03, 0xc0, 0x80, 0x11, 0x07, 0xcb, 0x96, 0xb4, 0xa4, 0x25, 0x92, 0xe3, 0x01, 0x6a, 0x02, 0x02, 0x02,
        0x08, 0x00, 0x00, 0x03, 0x00, 0x08, 0x00, 0x00, 0x03, 0x00, 0xf3, 0x00, 0x2e, 0xf2, 0x88, 0x00, 0x02, 0x62,
        0x5a, 0x00, 0x00, 0x13, 0x12, 0xd0, 0x20,
    ];

    fn parse_sps_1920x1080() -> SpsRbsp {
        h265::SpsNALUnit::parse(io::Cursor::new(SPS_1920X1080)).unwrap().rbsp
    }

    /// Builds a gridless, no-extension PPS whose `pps_seq_parameter_set_id`
    /// matches `sps`, following the same field order as
    /// `h265::pps::tests::build_pps`.
    fn build_pps(sps: &SpsRbsp, num_cols: u64, num_rows: u64) -> Vec<u8> {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bit(false).unwrap();
        writer.write_bits(NALUnitType::PpsNut as u64, 6).unwrap();
        writer.write_bits(0, 6).unwrap();
        writer.write_bits(1, 3).unwrap();

        writer.write_exp_golomb(0).unwrap(); // pps_pic_parameter_set_id
        writer.write_exp_golomb(sps.sps_seq_parameter_set_id).unwrap();
        writer.write_bit(false).unwrap(); // dependent_slice_segments_enabled_flag
        writer.write_bit(false).unwrap(); // output_flag_present_flag
        writer.write_bits(0, 3).unwrap(); // num_extra_slice_header_bits
        writer.write_bit(false).unwrap(); // sign_data_hiding_enabled_flag
        writer.write_bit(false).unwrap(); // cabac_init_present_flag
        writer.write_exp_golomb(0).unwrap(); // num_ref_idx_l0_default_active_minus1
        writer.write_exp_golomb(0).unwrap(); // num_ref_idx_l1_default_active_minus1
        writer.write_signed_exp_golomb(0).unwrap(); // init_qp_minus26
        writer.write_bit(false).unwrap(); // constrained_intra_pred_flag
        writer.write_bit(false).unwrap(); // transform_skip_enabled_flag
        writer.write_bit(false).unwrap(); // cu_qp_delta_enabled_flag
        writer.write_signed_exp_golomb(0).unwrap(); // pps_cb_qp_offset
        writer.write_signed_exp_golomb(0).unwrap(); // pps_cr_qp_offset
        writer.write_bit(false).unwrap(); // pps_slice_chroma_qp_offsets_present_flag
        writer.write_bit(false).unwrap(); // weighted_pred_flag
        writer.write_bit(false).unwrap(); // weighted_bipred_flag
        writer.write_bit(false).unwrap(); // transquant_bypass_enabled_flag

        let tiles_enabled = num_cols > 1 || num_rows > 1;
        writer.write_bit(tiles_enabled).unwrap(); // tiles_enabled_flag
        writer.write_bit(false).unwrap(); // entropy_coding_sync_enabled_flag
        if tiles_enabled {
            writer.write_exp_golomb(num_cols - 1).unwrap();
            writer.write_exp_golomb(num_rows - 1).unwrap();
            writer.write_bit(true).unwrap(); // uniform_spacing_flag
            writer.write_bit(true).unwrap(); // loop_filter_across_tiles_enabled_flag
        }
        writer.write_bit(true).unwrap(); // pps_loop_filter_across_slices_enabled_flag
        writer.write_bit(false).unwrap(); // deblocking_filter_control_present_flag
        writer.write_bit(false).unwrap(); // pps_scaling_list_data_present_flag
        writer.write_bit(false).unwrap(); // lists_modification_present_flag
        writer.write_exp_golomb(0).unwrap(); // log2_parallel_merge_level_minus2
        writer.write_bit(false).unwrap(); // slice_segment_header_extension_present_flag
        writer.write_bit(false).unwrap(); // pps_extension_present_flag
        writer.write_bit(true).unwrap(); // rbsp_trailing_bits stop bit
        writer.finish().unwrap()
    }

    /// Builds a minimal I-slice at the given `slice_segment_address`, and
    /// independently re-derives the bit offsets a real NAL parser would
    /// record, the same way `h265::slice::tests::build_idr_slice` does.
    fn build_slice(pps: &PpsRbsp, bits_slice_segment_address: u8, address: u64) -> (Vec<u8>, ParsedSlice) {
        let first = address == 0;
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bit(false).unwrap();
        writer.write_bits(h265::NALUnitType::IdrWRadl as u64, 6).unwrap();
        writer.write_bits(0, 6).unwrap();
        writer.write_bits(1, 3).unwrap();

        writer.write_bit(first).unwrap(); // first_slice_segment_in_pic_flag
        writer.write_bit(false).unwrap(); // no_output_of_prior_pics_flag (RAP)
        writer.write_exp_golomb(pps.pps_pic_parameter_set_id).unwrap();
        if !first {
            if pps.dependent_slice_segments_enabled_flag {
                writer.write_bit(false).unwrap(); // dependent_slice_segment_flag
            }
            writer.write_bits(address, bits_slice_segment_address).unwrap();
        }

        writer.write_exp_golomb(2).unwrap(); // slice_type = I
        writer.write_exp_golomb(0).unwrap(); // num_entry_point_offsets

        writer.write_bit(true).unwrap(); // alignment stop bit
        writer.align().unwrap();

        let mut data = writer.finish().unwrap();
        data.extend_from_slice(&[0x11, 0x22, 0x33]);

        let mut reader = BitReader::new(io::Cursor::new(&data));
        reader.read_bits(16).unwrap();
        let first_read = reader.read_bit().unwrap();
        assert_eq!(first_read, first);
        reader.read_bit().unwrap();
        reader.read_exp_golomb().unwrap();
        if !first {
            if pps.dependent_slice_segments_enabled_flag {
                reader.read_bit().unwrap();
            }
            reader.read_bits(bits_slice_segment_address).unwrap();
        }
        reader.read_exp_golomb().unwrap(); // slice_type
        let entry_point_start_bits = reader.bit_stream_position().unwrap();
        reader.read_exp_golomb().unwrap(); // num_entry_point_offsets
        let header_size_bits = reader.bit_stream_position().unwrap();

        (
            data,
            ParsedSlice {
                slice_segment_address: address,
                header_state: SliceHeaderState {
                    entry_point_start_bits,
                    header_size_bits,
                    bits_slice_segment_address,
                },
            },
        )
    }

    /// A [`SliceHeaderLocator`] driven entirely from fixtures built by
    /// [`build_slice`], keyed by the address embedded in the slice bytes.
    struct FixtureLocator {
        parsed: HashMap<Vec<u8>, ParsedSlice>,
    }

    impl FixtureLocator {
        fn new() -> Self {
            Self { parsed: HashMap::new() }
        }

        fn register(&mut self, nal: Vec<u8>, parsed: ParsedSlice) {
            self.parsed.insert(nal, parsed);
        }
    }

    impl SliceHeaderLocator for FixtureLocator {
        fn locate_slice_header(
            &mut self,
            in_slice: &[u8],
            _sps: &SpsRbsp,
            _pps: &PpsRbsp,
        ) -> Result<ParsedSlice, SplitError> {
            self.parsed
                .get(in_slice)
                .copied()
                .ok_or_else(|| SplitError::NonCompliantBitstream("no fixture registered for this slice".into()))
        }
    }

    #[derive(Default)]
    struct MockHost {
        opened: Vec<(TileId, TileProperties)>,
        closed: Vec<TileId>,
        packets: Vec<(TileId, Vec<u8>, i64, i64)>,
        eos: Vec<TileId>,
    }

    impl FilterHost for MockHost {
        fn open_tile(&mut self, tile: TileId, props: &TileProperties) -> Result<(), SplitError> {
            self.opened.push((tile, props.clone()));
            Ok(())
        }

        fn close_tile(&mut self, tile: TileId) -> Result<(), SplitError> {
            self.closed.push(tile);
            Ok(())
        }

        fn send_packet(&mut self, tile: TileId, data: Vec<u8>, dts: i64, cts: i64) -> Result<(), SplitError> {
            self.packets.push((tile, data, dts, cts));
            Ok(())
        }

        fn send_eos(&mut self, tile: TileId) -> Result<(), SplitError> {
            self.eos.push(tile);
            Ok(())
        }
    }

    fn nalu_length_prefixed(nal: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + nal.len());
        out.extend_from_slice(&(nal.len() as u32).to_be_bytes());
        out.extend_from_slice(nal);
        out
    }

    fn config_record(sps: &[u8], pps: &[u8]) -> Vec<u8> {
        // length_size_minus_one = 3 (4-byte length prefixes), one SPS and one
        // PPS array, one NAL each. Field layout mirrors
        // `h265::config::tests`.
        let mut writer = BitWriter::new(Vec::new());
        writer.write_u8(1).unwrap(); // configuration_version
        writer.write_bits(0, 2).unwrap(); // general_profile_space
        writer.write_bit(false).unwrap(); // general_tier_flag
        writer.write_bits(1, 5).unwrap(); // general_profile_idc
        writer.write_u32::<BigEndian>(0).unwrap(); // general_profile_compatibility_flags
        writer.write_u48::<BigEndian>(0).unwrap(); // general_constraint_indicator_flags
        writer.write_u8(120).unwrap(); // general_level_idc
        writer.write_bits(0xF, 4).unwrap(); // reserved
        writer.write_bits(0, 12).unwrap(); // min_spatial_segmentation_idc
        writer.write_bits(0x3F, 6).unwrap(); // reserved
        writer.write_bits(0, 2).unwrap(); // parallelism_type
        writer.write_bits(0x3F, 6).unwrap(); // reserved
        writer.write_bits(1, 2).unwrap(); // chroma_format_idc
        writer.write_bits(0x1F, 5).unwrap(); // reserved
        writer.write_bits(0, 3).unwrap(); // bit_depth_luma_minus8
        writer.write_bits(0x1F, 5).unwrap(); // reserved
        writer.write_bits(0, 3).unwrap(); // bit_depth_chroma_minus8
        writer.write_u16::<BigEndian>(0).unwrap(); // avg_frame_rate
        writer.write_bits(0, 2).unwrap(); // constant_frame_rate
        writer.write_bits(1, 3).unwrap(); // num_temporal_layers
        writer.write_bit(true).unwrap(); // temporal_id_nested
        writer.write_bits(3, 2).unwrap(); // length_size_minus_one

        writer.write_u8(2).unwrap(); // num_of_arrays

        writer.write_bit(true).unwrap(); // array_completeness
        writer.write_bit(false).unwrap(); // reserved
        writer.write_bits(NALUnitType::SpsNut as u64, 6).unwrap();
        writer.write_u16::<BigEndian>(1).unwrap(); // num_nalus
        writer.write_u16::<BigEndian>(sps.len() as u16).unwrap();
        let mut bytes = writer.finish().unwrap();
        bytes.extend_from_slice(sps);

        let mut writer = BitWriter::new(bytes);
        writer.write_bit(true).unwrap(); // array_completeness
        writer.write_bit(false).unwrap(); // reserved
        writer.write_bits(NALUnitType::PpsNut as u64, 6).unwrap();
        writer.write_u16::<BigEndian>(1).unwrap(); // num_nalus
        writer.write_u16::<BigEndian>(pps.len() as u16).unwrap();
        let mut bytes = writer.finish().unwrap();
        bytes.extend_from_slice(pps);
        bytes
    }

    #[test]
    fn test_configure_opens_one_tile_per_grid_cell() {
        let sps = parse_sps_1920x1080();
        let pps_bytes = build_pps(&sps, 2, 2);
        let record = config_record(SPS_1920X1080, &pps_bytes);

        let mut controller = SplitController::new(SplitConfig::default());
        let mut host = MockHost::default();
        controller.configure(&mut host, &record).unwrap();

        assert_eq!(host.opened.len(), 4);
        assert_eq!(controller.tiles.len(), 4);
        // 1920x1080 at ctb=32: W_ctb=60, H_ctb=34, split 2x2 -> 30x17 CTBs -> 960x544 each tile.
        for (_, props) in &host.opened {
            assert_eq!(props.width, 960);
            assert_eq!(props.height, 544);
            assert_eq!(props.original_size, (1920, 1080));
        }
    }

    #[test]
    fn test_configure_is_noop_when_config_crc_unchanged() {
        let sps = parse_sps_1920x1080();
        let pps_bytes = build_pps(&sps, 1, 1);
        let record = config_record(SPS_1920X1080, &pps_bytes);

        let mut controller = SplitController::new(SplitConfig::default());
        let mut host = MockHost::default();
        controller.configure(&mut host, &record).unwrap();
        controller.configure(&mut host, &record).unwrap();

        // No close_tile calls: the second configure recognized the same CRC.
        assert!(host.closed.is_empty());
        assert_eq!(host.opened.len(), 1);
    }

    #[test]
    fn test_configure_rebuilds_tiles_on_config_change() {
        let sps = parse_sps_1920x1080();
        let record_2x2 = config_record(SPS_1920X1080, &build_pps(&sps, 2, 2));
        let record_1x1 = config_record(SPS_1920X1080, &build_pps(&sps, 1, 1));

        let mut controller = SplitController::new(SplitConfig::default());
        let mut host = MockHost::default();
        controller.configure(&mut host, &record_2x2).unwrap();
        controller.configure(&mut host, &record_1x1).unwrap();

        assert_eq!(host.closed.len(), 4);
        assert_eq!(host.opened.len(), 4 + 1);
    }

    #[test]
    fn test_process_access_unit_routes_vcl_nal_to_its_tile() {
        let sps = parse_sps_1920x1080();
        let pps_bytes = build_pps(&sps, 2, 2);
        let record = config_record(SPS_1920X1080, &pps_bytes);

        let mut controller = SplitController::new(SplitConfig::default());
        let mut host = MockHost::default();
        controller.configure(&mut host, &record).unwrap();

        let pps = h265::PpsNALUnit::parse(io::Cursor::new(&pps_bytes)).unwrap().rbsp;
        // W_ctb = 60, H_ctb = 34, 2x2 grid -> col split at 30, row split at 17.
        // address 31 -> slY = 31 % 60 = 31, slX = 31 / 60 = 0 -> row 0, col (31>=30) 1.
        let bits_address = 11; // ceil_log2(60*34) = ceil_log2(2040) = 11
        let (slice_bytes, parsed) = build_slice(&pps, bits_address, 31);

        let mut locator = FixtureLocator::new();
        locator.register(slice_bytes.clone(), parsed);

        let au = nalu_length_prefixed(&slice_bytes);
        controller.process_access_unit(&mut host, &mut locator, &au, 100, 100).unwrap();

        assert_eq!(host.packets.len(), 1, "exactly one tile should have received the slice");
        let (tile, packet, dts, cts) = &host.packets[0];
        assert_eq!(*tile, TileId(1), "row 0, col 1 -> tile index 1 in a 2x2 row-major grid");
        assert_eq!(*dts, 100);
        assert_eq!(*cts, 100);

        // The routed NAL must carry first_slice_segment_in_pic_flag = 1 and no address.
        let len = u32::from_be_bytes(packet[0..4].try_into().unwrap()) as usize;
        let mut reader = BitReader::new(io::Cursor::new(&packet[4..4 + len]));
        reader.read_bits(16).unwrap();
        assert!(reader.read_bit().unwrap());
    }

    #[test]
    fn test_process_access_unit_broadcasts_non_vcl_nal_to_every_tile() {
        let sps = parse_sps_1920x1080();
        let pps_bytes = build_pps(&sps, 2, 2);
        let record = config_record(SPS_1920X1080, &pps_bytes);

        let mut controller = SplitController::new(SplitConfig::default());
        let mut host = MockHost::default();
        controller.configure(&mut host, &record).unwrap();

        // A type-35 (AUD) NAL, broadcast verbatim to every tile: header bytes
        // encode nal_unit_type=35, nuh_layer_id=0, nuh_temporal_id_plus1=1.
        let aud = [(NALUnitType::AudNut as u8) << 1, 0x01, 0x50];
        let au = nalu_length_prefixed(&aud);

        let mut locator = FixtureLocator::new();
        controller.process_access_unit(&mut host, &mut locator, &au, 0, 0).unwrap();

        assert_eq!(host.packets.len(), 4);
        for (_, packet, _, _) in &host.packets {
            let len = u32::from_be_bytes(packet[0..4].try_into().unwrap()) as usize;
            assert_eq!(&packet[4..4 + len], &aud[..]);
        }
    }

    #[test]
    fn test_process_access_unit_rejects_before_configure() {
        let mut controller = SplitController::new(SplitConfig::default());
        let mut host = MockHost::default();
        let mut locator = FixtureLocator::new();
        let err = controller
            .process_access_unit(&mut host, &mut locator, &[], 0, 0)
            .unwrap_err();
        assert!(matches!(err, SplitError::NotSupported(_)));
    }

    #[test]
    fn test_eos_propagates_to_every_tile() {
        let sps = parse_sps_1920x1080();
        let pps_bytes = build_pps(&sps, 1, 1);
        let record = config_record(SPS_1920X1080, &pps_bytes);

        let mut controller = SplitController::new(SplitConfig::default());
        let mut host = MockHost::default();
        controller.configure(&mut host, &record).unwrap();
        controller.eos(&mut host).unwrap();

        assert_eq!(host.eos, vec![TileId(0)]);
    }

    #[test]
    fn test_teardown_closes_every_tile_and_clears_state() {
        let sps = parse_sps_1920x1080();
        let pps_bytes = build_pps(&sps, 2, 1);
        let record = config_record(SPS_1920X1080, &pps_bytes);

        let mut controller = SplitController::new(SplitConfig::default());
        let mut host = MockHost::default();
        controller.configure(&mut host, &record).unwrap();
        controller.teardown(&mut host).unwrap();

        assert_eq!(host.closed.len(), 2);
        assert!(controller.tiles.is_empty());
        assert!(controller.input.is_none());
    }
}
