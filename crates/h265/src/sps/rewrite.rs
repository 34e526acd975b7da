//! Rewriting an SPS RBSP in place to a new picture size.

use std::io;

use bytes_util::{BitReader, BitWriter};
use expgolomb::{BitReaderExpGolombExt, BitWriterExpGolombExt};

/// Copies a `profile_tier_level(1, max_num_sub_layers_minus1)` structure
/// bit-for-bit from `bit_reader` to `bit_writer`.
///
/// This does not decode the profile/constraint semantics at all — unlike
/// [`crate::ProfileTierLevel::parse`], which branches on `general_profile_idc`
/// to figure out which constraint-flag group is present. That branching
/// happens to be a red herring for a raw copy: every branch of the additional
/// constraint flags block consumes exactly 43 bits regardless of which
/// profile it belongs to (9 flags + 34 reserved bits, or 7 + 1 + 35, or 43
/// reserved outright), so the general profile is always exactly
/// `2+1+5 + 32 + 1+1+1+1 + 43 + 1 = 88` bits, plus 8 bits of level when
/// present, and the same 88 bits per present sub-layer profile. Copying that
/// fixed width is simpler and cheaper than parsing it field by field, and
/// it's the scheme GPAC's own SPS rewrite uses.
fn copy_profile_tier_level<R: io::Read, W: io::Write>(
    bit_reader: &mut BitReader<R>,
    bit_writer: &mut BitWriter<W>,
    max_num_sub_layers_minus1: u8,
) -> io::Result<()> {
    // general_profile_space, general_tier_flag, general_profile_idc (8),
    // general_profile_compatibility_flag[32] (32),
    // general_progressive/interlaced/non_packed/frame_only_constraint_flag (4),
    // the 43-bit constraint-flags-or-reserved block, general_inbld_flag/reserved (1),
    // general_level_idc (8).
    for _ in 0..(8 + 32 + 4 + 43 + 1 + 8) {
        bit_writer.write_bit(bit_reader.read_bit()?)?;
    }

    let mut sub_layer_profile_present_flags = Vec::with_capacity(max_num_sub_layers_minus1 as usize);
    let mut sub_layer_level_present_flags = Vec::with_capacity(max_num_sub_layers_minus1 as usize);
    for _ in 0..max_num_sub_layers_minus1 {
        let profile_present = bit_reader.read_bit()?;
        let level_present = bit_reader.read_bit()?;
        bit_writer.write_bit(profile_present)?;
        bit_writer.write_bit(level_present)?;
        sub_layer_profile_present_flags.push(profile_present);
        sub_layer_level_present_flags.push(level_present);
    }

    if max_num_sub_layers_minus1 > 0 && max_num_sub_layers_minus1 < 8 {
        let reserved_bits = 2 * (8 - max_num_sub_layers_minus1);
        bit_writer.write_bits(bit_reader.read_bits(reserved_bits)?, reserved_bits)?;
    }

    for i in 0..max_num_sub_layers_minus1 as usize {
        if sub_layer_profile_present_flags[i] {
            for _ in 0..(8 + 32 + 4 + 43 + 1) {
                bit_writer.write_bit(bit_reader.read_bit()?)?;
            }
        }
        if sub_layer_level_present_flags[i] {
            bit_writer.write_bits(bit_reader.read_bits(8)?, 8)?;
        }
    }

    Ok(())
}

/// Rewrites an SPS NAL unit in place, replacing `pic_width_in_luma_samples`
/// and `pic_height_in_luma_samples` with `new_width`/`new_height` and clearing
/// the conformance window (the split controller always hands out whole-CTB
/// tile rectangles, so no cropping is ever needed on the rewritten stream).
///
/// `nuh_layer_id` comes from the NAL unit header that was just read off
/// `in_sps`. For the base layer (`nuh_layer_id == 0`, the only case this
/// filter supports end to end, see the crate's no-multi-layer precondition)
/// this rewrites width, height, and the conformance window as described
/// above. For any other layer id the picture-size syntax takes a different
/// form in the SPS multilayer extension (ISO/IEC 23008-2 Annex F) that this
/// routine does not attempt to rewrite; it copies the picture size fields
/// through unchanged instead of guessing at new values, which keeps the
/// output bitstream well-formed even though this filter's own no-multi-layer
/// precondition means that path is never exercised by the rest of the crate.
///
/// Grounded on GPAC's `hevc_rewrite_sps` (`hevcsplit.c`).
pub fn rewrite_sps(in_sps: &[u8], nuh_layer_id: u8, new_width: u64, new_height: u64) -> io::Result<Vec<u8>> {
    use std::io::{Read as _, Write as _};

    let raw = bytes_util::remove_emulation_prevention(in_sps)?;
    let mut bit_reader = BitReader::new(io::Cursor::new(&raw));
    let mut bit_writer = BitWriter::new(Vec::new());

    // NAL unit header, copied verbatim.
    bit_writer.write_bits(bit_reader.read_bits(16)?, 16)?;

    bit_writer.write_bits(bit_reader.read_bits(4)?, 4)?; // sps_video_parameter_set_id

    let sps_max_sub_layers_minus1 = bit_reader.read_bits(3)? as u8;
    bit_writer.write_bits(sps_max_sub_layers_minus1 as u64, 3)?;

    bit_writer.write_bit(bit_reader.read_bit()?)?; // sps_temporal_id_nesting_flag

    copy_profile_tier_level(&mut bit_reader, &mut bit_writer, sps_max_sub_layers_minus1)?;

    bit_writer.write_exp_golomb(bit_reader.read_exp_golomb()?)?; // sps_seq_parameter_set_id

    let chroma_format_idc = bit_reader.read_exp_golomb()?;
    bit_writer.write_exp_golomb(chroma_format_idc)?;

    if chroma_format_idc == 3 {
        bit_writer.write_bit(bit_reader.read_bit()?)?; // separate_colour_plane_flag
    }

    if nuh_layer_id == 0 {
        bit_reader.read_exp_golomb()?; // pic_width_in_luma_samples, discarded
        bit_reader.read_exp_golomb()?; // pic_height_in_luma_samples, discarded
        bit_writer.write_exp_golomb(new_width)?;
        bit_writer.write_exp_golomb(new_height)?;

        let conformance_window_flag = bit_reader.read_bit()?;
        bit_writer.write_bit(false)?; // conformance window always cleared in the output
        if conformance_window_flag {
            bit_reader.read_exp_golomb()?; // conf_win_left_offset
            bit_reader.read_exp_golomb()?; // conf_win_right_offset
            bit_reader.read_exp_golomb()?; // conf_win_top_offset
            bit_reader.read_exp_golomb()?; // conf_win_bottom_offset
        }
    } else {
        bit_writer.write_exp_golomb(bit_reader.read_exp_golomb()?)?; // pic_width_in_luma_samples
        bit_writer.write_exp_golomb(bit_reader.read_exp_golomb()?)?; // pic_height_in_luma_samples

        let conformance_window_flag = bit_reader.read_bit()?;
        bit_writer.write_bit(conformance_window_flag)?;
        if conformance_window_flag {
            for _ in 0..4 {
                bit_writer.write_exp_golomb(bit_reader.read_exp_golomb()?)?;
            }
        }
    }

    // Copy the remainder of the RBSP through verbatim: bit depth, POC, DPB
    // sizing, CTB/transform sizing, scaling lists, tile-irrelevant flags, ref
    // pic sets, VUI, and any extension payload. The exp-Golomb width of the
    // new width/height/conformance-window fields rarely matches the old
    // ones bit for bit, so the writer can land mid-byte here even though the
    // reader has been walked to a byte boundary below. The tail is pushed
    // through the `BitWriter`'s `io::Write` impl, which re-splits each byte
    // via `write_bits` when the writer isn't aligned, matching GPAC's
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

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use std::io;

    use super::*;
    use crate::SpsNALUnit;

    #[test]
    fn test_rewrite_sps_changes_picture_size() {
        let data = b"B\x01\x01\x01@\0\0\x03\0\x90\0\0\x03\0\0\x03\0\x99\xa0\x01@ \x05\xa1e\x95R\x90\x84d_\xf8\xc0Z\x80\x80\x80\x82\0\0\x03\0\x02\0\0\x03\x01 \xc0\x0b\xbc\xa2\0\x02bX\0\x011-\x08";

        let original = SpsNALUnit::parse(io::Cursor::new(data.as_slice())).unwrap();

        let rewritten = rewrite_sps(data, original.nal_unit_header.nuh_layer_id, 640, 360).unwrap();
        let rewritten_nalu = SpsNALUnit::parse(io::Cursor::new(rewritten)).unwrap();

        assert_eq!(rewritten_nalu.rbsp.pic_width_in_luma_samples.get(), 640);
        assert_eq!(rewritten_nalu.rbsp.pic_height_in_luma_samples.get(), 360);
        assert_eq!(rewritten_nalu.rbsp.conformance_window, Default::default());

        // Everything that does not depend on picture size should be untouched.
        assert_eq!(
            rewritten_nalu.rbsp.profile_tier_level,
            original.rbsp.profile_tier_level
        );
        assert_eq!(rewritten_nalu.rbsp.chroma_format_idc, original.rbsp.chroma_format_idc);
        assert_eq!(rewritten_nalu.rbsp.bit_depth_luma_minus8, original.rbsp.bit_depth_luma_minus8);
    }

    #[test]
    fn test_rewrite_sps_is_idempotent() {
        let data = b"\x42\x01\x01\x01\x40\x00\x00\x03\x00\x90\x00\x00\x03\x00\x00\x03\x00\x78\xa0\x03\xc0\x80\x11\x07\xcb\x96\xb4\xa4\x25\x92\xe3\x01\x6a\x02\x02\x02\x08\x00\x00\x03\x00\x08\x00\x00\x03\x00\xf3\x00\x2e\xf2\x88\x00\x02\x62\x5a\x00\x00\x13\x12\xd0\x20";

        let once = rewrite_sps(data, 0, 960, 540).unwrap();
        let twice = rewrite_sps(&once, 0, 960, 540).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_rewrite_sps_multiple_sublayers_preserves_profile() {
        // Exercises a real SPS that carries more than one sub-layer profile
        // entry, so `copy_profile_tier_level` walks the per-sublayer loop.
        let data = b"\x42\x01\x01\x01\x60\x00\x00\x03\x00\x00\x03\x00\x00\x03\x00\x00\x03\x00\x00\xA0\x0B\x08\x04\x85\x96\x5E\x49\x1B\x60\xD9\x78\x88\x88\x8F\xE7\x9F\xCF\xE7\xF3\xF9\xFC\xF2\xFF\xFF\xFF\xCF\xE7\xF3\xF9\xFC\xFE\x7F\x3F\x3F\x9F\xCF\xE7\xF3\xF9\xDB\x20";

        let original = SpsNALUnit::parse(io::Cursor::new(data.as_slice())).unwrap();
        assert!(original.rbsp.sps_max_sub_layers_minus1 > 0);

        let rewritten = rewrite_sps(data, 0, 352, 288).unwrap();
        let rewritten_nalu = SpsNALUnit::parse(io::Cursor::new(rewritten)).unwrap();

        assert_eq!(rewritten_nalu.rbsp.pic_width_in_luma_samples.get(), 352);
        assert_eq!(rewritten_nalu.rbsp.pic_height_in_luma_samples.get(), 288);
        assert_eq!(
            rewritten_nalu.rbsp.profile_tier_level,
            original.rbsp.profile_tier_level
        );
    }
}
