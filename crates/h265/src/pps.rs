//! Picture parameter set.

use std::io;

use bytes_util::nal_emulation_prevention::EmulationPreventionIo;
use bytes_util::{BitReader, range_check};
use expgolomb::BitReaderExpGolombExt;

use crate::NALUnitType;
use crate::nal_unit_header::NALUnitHeader;

/// Picture parameter set contained in a NAL unit.
///
/// Mirrors [`SpsNALUnit`](crate::SpsNALUnit): the NAL unit header is kept
/// alongside the parsed RBSP body.
#[derive(Debug, Clone, PartialEq)]
pub struct PpsNALUnit {
    /// The NAL unit header.
    pub nal_unit_header: NALUnitHeader,
    /// The PPS RBSP.
    pub rbsp: PpsRbsp,
}

impl PpsNALUnit {
    /// Parses a PPS NAL unit from the given reader.
    pub fn parse(mut reader: impl io::Read) -> io::Result<Self> {
        let nal_unit_header = NALUnitHeader::parse(&mut reader)?;
        if nal_unit_header.nal_unit_type != NALUnitType::PpsNut {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "nal_unit_type is not PPS_NUT",
            ));
        }

        let rbsp = PpsRbsp::parse(reader)?;

        Ok(PpsNALUnit {
            nal_unit_header,
            rbsp,
        })
    }
}

/// Per-column/per-row tile sizing when `uniform_spacing_flag` is `false`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExplicitTileSizes {
    /// `column_width_minus1[i]` for `i` in `[0, num_tile_columns_minus1)`.
    pub column_width_minus1: Vec<u64>,
    /// `row_height_minus1[i]` for `i` in `[0, num_tile_rows_minus1)`.
    pub row_height_minus1: Vec<u64>,
}

/// Tile grid geometry carried by a [`PpsRbsp`] when `tiles_enabled_flag` is `true`.
///
/// `pps_tile_columns_grid()`/`pps_tile_rows_grid()` in ISO/IEC 23008-2 - 7.3.2.3.1.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    /// This value plus 1 specifies the number of tile columns partitioning the picture.
    pub num_tile_columns_minus1: u64,
    /// This value plus 1 specifies the number of tile rows partitioning the picture.
    pub num_tile_rows_minus1: u64,
    /// Equal to `true` specifies that the tile column boundaries and likewise the tile
    /// row boundaries are distributed uniformly across the picture.
    ///
    /// Equal to `false` specifies that the tile column boundaries and likewise the tile
    /// row boundaries are not distributed uniformly across the picture and are
    /// explicitly signalled in [`ExplicitTileSizes`].
    pub uniform_spacing_flag: bool,
    /// The explicit column/row sizes, present when `uniform_spacing_flag` is `false`.
    pub explicit_sizes: Option<ExplicitTileSizes>,
    /// Equal to `true` specifies that in-loop filtering operations may be performed
    /// across tile boundaries in pictures referring to the PPS.
    pub loop_filter_across_tiles_enabled_flag: bool,
}

impl TileGrid {
    /// `num_tile_columns_minus1 + 1`.
    pub fn num_tile_columns(&self) -> u64 {
        self.num_tile_columns_minus1 + 1
    }

    /// `num_tile_rows_minus1 + 1`.
    pub fn num_tile_rows(&self) -> u64 {
        self.num_tile_rows_minus1 + 1
    }
}

/// Picture parameter set RBSP.
///
/// `pic_parameter_set_rbsp()`
///
/// - ISO/IEC 23008-2 - 7.3.2.3.1
/// - ISO/IEC 23008-2 - 7.4.3.3.1
///
/// Only the fields needed to locate tile boundaries, route slice segments to
/// the tile that owns them, and rewrite the PPS into a grid-free one are
/// decoded. The PPS range/multilayer/3D/SCC extensions (gated behind
/// `pps_extension_present_flag`) carry no information relevant to any of
/// that, so their payloads are not parsed; [`rewrite_pps_no_grid`] only needs
/// to copy them through byte-for-byte, which it does without decoding them.
#[derive(Debug, Clone, PartialEq)]
pub struct PpsRbsp {
    /// Identifies the PPS for reference by other syntax elements.
    ///
    /// The value is in range \[0, 63\].
    pub pps_pic_parameter_set_id: u64,
    /// Specifies the value of `sps_seq_parameter_set_id` for the active SPS.
    ///
    /// The value is in range \[0, 15\].
    pub pps_seq_parameter_set_id: u64,
    /// Equal to `true` specifies that `dependent_slice_segment_flag` may be present in
    /// slice segment headers referring to the PPS.
    pub dependent_slice_segments_enabled_flag: bool,
    /// Equal to `true` indicates that `pic_output_flag` is present in slice headers
    /// referring to the PPS.
    pub output_flag_present_flag: bool,
    /// Specifies the number of extra slice header bits present in slice headers
    /// referring to the PPS.
    pub num_extra_slice_header_bits: u8,
    /// Specifies whether sign bit hiding is enabled for transform coefficient levels.
    pub sign_data_hiding_enabled_flag: bool,
    /// Equal to `true` specifies that `cabac_init_flag` is present in slice headers
    /// referring to the PPS.
    pub cabac_init_present_flag: bool,
    /// This value plus 1 specifies the inferred value of `num_ref_idx_l0_active_minus1`
    /// for slices with `slice_type` equal to P or B that do not contain
    /// `num_ref_idx_active_override_flag`.
    pub num_ref_idx_l0_default_active_minus1: u64,
    /// This value plus 1 specifies the inferred value of `num_ref_idx_l1_active_minus1`
    /// for slices with `slice_type` equal to B that do not contain
    /// `num_ref_idx_active_override_flag`.
    pub num_ref_idx_l1_default_active_minus1: u64,
    /// This value plus 26 specifies the initial value of `SliceQpY` for each slice
    /// referring to the PPS.
    pub init_qp_minus26: i64,
    /// Equal to `true` specifies that constrained intra prediction is used.
    pub constrained_intra_pred_flag: bool,
    /// Equal to `true` specifies that the transform skip mode may be used.
    pub transform_skip_enabled_flag: bool,
    /// Equal to `true` specifies that `cu_qp_delta_abs` may be present in the transform
    /// unit syntax.
    pub cu_qp_delta_enabled_flag: bool,
    /// Specifies the difference between the luma coding block size and the minimum
    /// luma coding block size of coding units that convey `cu_qp_delta_abs` and
    /// `cu_qp_delta_sign_flag`, present only when `cu_qp_delta_enabled_flag` is `true`.
    pub diff_cu_qp_delta_depth: u64,
    /// Specifies the initial value of the Cb chroma quantization parameter offset
    /// relative to luma.
    pub pps_cb_qp_offset: i64,
    /// Specifies the initial value of the Cr chroma quantization parameter offset
    /// relative to luma.
    pub pps_cr_qp_offset: i64,
    /// Equal to `true` specifies that `slice_cb_qp_offset` and `slice_cr_qp_offset` are
    /// present in the associated slice headers.
    pub pps_slice_chroma_qp_offsets_present_flag: bool,
    /// Specifies whether weighted prediction is applied to P slices.
    pub weighted_pred_flag: bool,
    /// Specifies whether explicit weighted prediction is applied to B slices.
    pub weighted_bipred_flag: bool,
    /// Equal to `true` specifies that transform_skip_context, transform bypass, and
    /// related transquant-bypass decoding is enabled for coding units referring to
    /// the PPS.
    pub transquant_bypass_enabled_flag: bool,
    /// Equal to `true` specifies that there is more than one tile in pictures
    /// referring to the PPS.
    pub tiles_enabled_flag: bool,
    /// Equal to `true` specifies that entropy coding synchronization is used (WPP).
    pub entropy_coding_sync_enabled_flag: bool,
    /// The tile grid geometry, present when `tiles_enabled_flag` is `true`.
    pub tile_grid: Option<TileGrid>,
    /// Equal to `true` specifies that in-loop filtering operations may be performed
    /// across slice boundaries in pictures referring to the PPS.
    pub pps_loop_filter_across_slices_enabled_flag: bool,
    /// Equal to `true` specifies that a `deblocking_filter_control_present_flag` is
    /// present in the PPS.
    pub deblocking_filter_control_present_flag: bool,
    /// Equal to `true` specifies that `deblocking_filter_override_flag` is present in
    /// the slice headers referring to the PPS.
    pub deblocking_filter_override_enabled_flag: bool,
    /// Equal to `true` specifies the deblocking filter is disabled by default for
    /// slices referring to the PPS.
    pub pps_deblocking_filter_disabled_flag: bool,
    /// This value times 2 specifies the default deblocking parameter offset for beta.
    pub pps_beta_offset_div2: i64,
    /// This value times 2 specifies the default deblocking parameter offset for tC.
    pub pps_tc_offset_div2: i64,
    /// Equal to `true` specifies that `pps_scaling_list_data()` is present in the PPS.
    pub pps_scaling_list_data_present_flag: bool,
    /// Equal to `true` specifies that `ref_pic_lists_modification()` may be present in
    /// slice headers referring to the PPS.
    pub lists_modification_present_flag: bool,
    /// Specifies the value of the variable `Log2ParMrgLevel` used in the derivation
    /// process for luma motion vectors for merge mode.
    pub log2_parallel_merge_level_minus2: u64,
    /// Equal to `true` specifies that `slice_segment_header_extension_length` is
    /// present in slice headers referring to the PPS.
    pub slice_segment_header_extension_present_flag: bool,
    /// Equal to `true` specifies that a PPS extension is present.
    pub pps_extension_present_flag: bool,
}

impl PpsRbsp {
    /// Parses a PPS RBSP from the given reader.
    ///
    /// Uses [`EmulationPreventionIo`] to handle emulation prevention bytes.
    pub fn parse(reader: impl io::Read) -> io::Result<Self> {
        let mut bit_reader = BitReader::new(EmulationPreventionIo::new(reader));

        let pps_pic_parameter_set_id = bit_reader.read_exp_golomb()?;
        range_check!(pps_pic_parameter_set_id, 0, 63)?;

        let pps_seq_parameter_set_id = bit_reader.read_exp_golomb()?;
        range_check!(pps_seq_parameter_set_id, 0, 15)?;

        let dependent_slice_segments_enabled_flag = bit_reader.read_bit()?;
        let output_flag_present_flag = bit_reader.read_bit()?;
        let num_extra_slice_header_bits = bit_reader.read_bits(3)? as u8;
        let sign_data_hiding_enabled_flag = bit_reader.read_bit()?;
        let cabac_init_present_flag = bit_reader.read_bit()?;

        let num_ref_idx_l0_default_active_minus1 = bit_reader.read_exp_golomb()?;
        range_check!(num_ref_idx_l0_default_active_minus1, 0, 14)?;
        let num_ref_idx_l1_default_active_minus1 = bit_reader.read_exp_golomb()?;
        range_check!(num_ref_idx_l1_default_active_minus1, 0, 14)?;

        let init_qp_minus26 = bit_reader.read_signed_exp_golomb()?;

        let constrained_intra_pred_flag = bit_reader.read_bit()?;
        let transform_skip_enabled_flag = bit_reader.read_bit()?;

        let cu_qp_delta_enabled_flag = bit_reader.read_bit()?;
        let diff_cu_qp_delta_depth = if cu_qp_delta_enabled_flag {
            bit_reader.read_exp_golomb()?
        } else {
            0
        };

        let pps_cb_qp_offset = bit_reader.read_signed_exp_golomb()?;
        range_check!(pps_cb_qp_offset, -12, 12)?;
        let pps_cr_qp_offset = bit_reader.read_signed_exp_golomb()?;
        range_check!(pps_cr_qp_offset, -12, 12)?;

        let pps_slice_chroma_qp_offsets_present_flag = bit_reader.read_bit()?;
        let weighted_pred_flag = bit_reader.read_bit()?;
        let weighted_bipred_flag = bit_reader.read_bit()?;
        let transquant_bypass_enabled_flag = bit_reader.read_bit()?;
        let tiles_enabled_flag = bit_reader.read_bit()?;
        let entropy_coding_sync_enabled_flag = bit_reader.read_bit()?;

        let tile_grid = if tiles_enabled_flag {
            let num_tile_columns_minus1 = bit_reader.read_exp_golomb()?;
            let num_tile_rows_minus1 = bit_reader.read_exp_golomb()?;
            let uniform_spacing_flag = bit_reader.read_bit()?;

            let explicit_sizes = if !uniform_spacing_flag {
                let mut column_width_minus1 = Vec::with_capacity(num_tile_columns_minus1 as usize);
                for _ in 0..num_tile_columns_minus1 {
                    column_width_minus1.push(bit_reader.read_exp_golomb()?);
                }

                let mut row_height_minus1 = Vec::with_capacity(num_tile_rows_minus1 as usize);
                for _ in 0..num_tile_rows_minus1 {
                    row_height_minus1.push(bit_reader.read_exp_golomb()?);
                }

                Some(ExplicitTileSizes {
                    column_width_minus1,
                    row_height_minus1,
                })
            } else {
                None
            };

            let loop_filter_across_tiles_enabled_flag = bit_reader.read_bit()?;

            Some(TileGrid {
                num_tile_columns_minus1,
                num_tile_rows_minus1,
                uniform_spacing_flag,
                explicit_sizes,
                loop_filter_across_tiles_enabled_flag,
            })
        } else {
            None
        };

        let pps_loop_filter_across_slices_enabled_flag = bit_reader.read_bit()?;

        let deblocking_filter_control_present_flag = bit_reader.read_bit()?;
        let mut deblocking_filter_override_enabled_flag = false;
        let mut pps_deblocking_filter_disabled_flag = false;
        let mut pps_beta_offset_div2 = 0;
        let mut pps_tc_offset_div2 = 0;
        if deblocking_filter_control_present_flag {
            deblocking_filter_override_enabled_flag = bit_reader.read_bit()?;
            pps_deblocking_filter_disabled_flag = bit_reader.read_bit()?;
            if !pps_deblocking_filter_disabled_flag {
                pps_beta_offset_div2 = bit_reader.read_signed_exp_golomb()?;
                pps_tc_offset_div2 = bit_reader.read_signed_exp_golomb()?;
            }
        }

        let pps_scaling_list_data_present_flag = bit_reader.read_bit()?;
        if pps_scaling_list_data_present_flag {
            crate::ScalingListData::parse(&mut bit_reader)?;
        }

        let lists_modification_present_flag = bit_reader.read_bit()?;
        let log2_parallel_merge_level_minus2 = bit_reader.read_exp_golomb()?;
        let slice_segment_header_extension_present_flag = bit_reader.read_bit()?;
        let pps_extension_present_flag = bit_reader.read_bit()?;

        // pps_range_extension_flag, pps_multilayer_extension_flag, pps_3d_extension_flag,
        // pps_scc_extension_flag, pps_extension_4bits and the extension payloads they
        // gate are intentionally not parsed: nothing downstream needs them, and
        // rewrite_pps_no_grid copies them through as an opaque byte/bit tail.

        Ok(PpsRbsp {
            pps_pic_parameter_set_id,
            pps_seq_parameter_set_id,
            dependent_slice_segments_enabled_flag,
            output_flag_present_flag,
            num_extra_slice_header_bits,
            sign_data_hiding_enabled_flag,
            cabac_init_present_flag,
            num_ref_idx_l0_default_active_minus1,
            num_ref_idx_l1_default_active_minus1,
            init_qp_minus26,
            constrained_intra_pred_flag,
            transform_skip_enabled_flag,
            cu_qp_delta_enabled_flag,
            diff_cu_qp_delta_depth,
            pps_cb_qp_offset,
            pps_cr_qp_offset,
            pps_slice_chroma_qp_offsets_present_flag,
            weighted_pred_flag,
            weighted_bipred_flag,
            transquant_bypass_enabled_flag,
            tiles_enabled_flag,
            entropy_coding_sync_enabled_flag,
            tile_grid,
            pps_loop_filter_across_slices_enabled_flag,
            deblocking_filter_control_present_flag,
            deblocking_filter_override_enabled_flag,
            pps_deblocking_filter_disabled_flag,
            pps_beta_offset_div2,
            pps_tc_offset_div2,
            pps_scaling_list_data_present_flag,
            lists_modification_present_flag,
            log2_parallel_merge_level_minus2,
            slice_segment_header_extension_present_flag,
            pps_extension_present_flag,
        })
    }
}

/// Rewrites a PPS NAL unit so that its tile grid is removed (`tiles_enabled_flag`
/// forced to `false`), matching the single-tile-per-stream output of a split.
///
/// Everything before the tile grid is copied through field-by-field (not as a raw
/// bit copy) because `tiles_enabled_flag` itself must be overwritten; everything
/// after `pps_loop_filter_across_slices_enabled_flag` — including any PPS
/// extension — is copied through bit-for-bit without being interpreted, since its
/// position does not move when tiles are dropped.
///
/// `entropy_coding_sync_enabled_flag` is preserved as-is: WPP and tiles are
/// orthogonal PPS features and removing the tile grid does not affect WPP.
///
/// Grounded on GPAC's `rewrite_pps_no_grid` (`hevcsplit.c`).
pub fn rewrite_pps_no_grid(in_pps: &[u8]) -> io::Result<Vec<u8>> {
    use std::io::{Read as _, Write as _};

    use bytes_util::BitWriter;
    use expgolomb::BitWriterExpGolombExt;

    let raw = bytes_util::remove_emulation_prevention(in_pps)?;
    let mut bit_reader = BitReader::new(io::Cursor::new(&raw));
    let mut bit_writer = BitWriter::new(Vec::new());

    // NAL unit header: 16 bits, copied verbatim.
    bit_writer.write_bits(bit_reader.read_bits(16)?, 16)?;

    bit_writer.write_exp_golomb(bit_reader.read_exp_golomb()?)?; // pps_pic_parameter_set_id
    bit_writer.write_exp_golomb(bit_reader.read_exp_golomb()?)?; // pps_seq_parameter_set_id

    // dependent_slice_segments_enabled_flag .. cabac_init_present_flag (7 bits)
    bit_writer.write_bits(bit_reader.read_bits(7)?, 7)?;

    bit_writer.write_exp_golomb(bit_reader.read_exp_golomb()?)?; // num_ref_idx_l0_default_active_minus1
    bit_writer.write_exp_golomb(bit_reader.read_exp_golomb()?)?; // num_ref_idx_l1_default_active_minus1
    bit_writer.write_signed_exp_golomb(bit_reader.read_signed_exp_golomb()?)?; // init_qp_minus26

    // constrained_intra_pred_flag, transform_skip_enabled_flag
    bit_writer.write_bits(bit_reader.read_bits(2)?, 2)?;

    let cu_qp_delta_enabled_flag = bit_reader.read_bit()?;
    bit_writer.write_bit(cu_qp_delta_enabled_flag)?;
    if cu_qp_delta_enabled_flag {
        bit_writer.write_exp_golomb(bit_reader.read_exp_golomb()?)?; // diff_cu_qp_delta_depth
    }

    bit_writer.write_signed_exp_golomb(bit_reader.read_signed_exp_golomb()?)?; // pps_cb_qp_offset
    bit_writer.write_signed_exp_golomb(bit_reader.read_signed_exp_golomb()?)?; // pps_cr_qp_offset

    // pps_slice_chroma_qp_offsets_present_flag .. transquant_bypass_enabled_flag (4 bits)
    bit_writer.write_bits(bit_reader.read_bits(4)?, 4)?;

    let tiles_enabled_flag = bit_reader.read_bit()?;
    bit_writer.write_bit(false)?; // tiles_enabled_flag forced off
    bit_writer.write_bit(bit_reader.read_bit()?)?; // entropy_coding_sync_enabled_flag

    if tiles_enabled_flag {
        let num_tile_columns_minus1 = bit_reader.read_exp_golomb()?;
        let num_tile_rows_minus1 = bit_reader.read_exp_golomb()?;
        let uniform_spacing_flag = bit_reader.read_bit()?;

        if !uniform_spacing_flag {
            for _ in 0..num_tile_columns_minus1 {
                bit_reader.read_exp_golomb()?;
            }
            for _ in 0..num_tile_rows_minus1 {
                bit_reader.read_exp_golomb()?;
            }
        }

        bit_reader.read_bit()?; // loop_filter_across_tiles_enabled_flag, dropped with the grid
    }

    bit_writer.write_bit(bit_reader.read_bit()?)?; // pps_loop_filter_across_slices_enabled_flag

    // Copy everything else through verbatim. The reader may now sit at any
    // bit offset (a discarded tile grid shifts it without the writer
    // following), so the remaining bytes are pushed back through the
    // `BitWriter`'s `io::Write` impl rather than appended directly to the
    // underlying buffer: that impl re-splits each byte through `write_bits`
    // whenever the writer itself is not byte-aligned, mirroring GPAC's
    // `gf_bs_write_int(bs_out, gf_bs_read_u8(bs_in), 8)` copy loop.
    while bit_reader.bit_pos() != 0 {
        bit_writer.write_bit(bit_reader.read_bit()?)?;
    }

    let mut rest = Vec::new();
    bit_reader.read_to_end(&mut rest)?;
    bit_writer.write_all(&rest)?;
    bit_writer.align()?;

    let rewritten = bit_writer.finish()?;
    Ok(bytes_util::add_emulation_prevention(&rewritten))
}
