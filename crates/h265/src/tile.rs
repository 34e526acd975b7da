//! Tile grid geometry.
//!
//! Derives, from an SPS/PPS pair, the pixel geometry of each tile in the grid
//! and the tile that owns a given `slice_segment_address`.

use crate::{PpsRbsp, SpsRbsp, TileGrid};

/// The (row, column) a slice segment belongs to, plus its address within that tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLocation {
    /// Tile row index.
    pub row: u64,
    /// Tile column index.
    pub col: u64,
    /// The slice segment address relative to the start of its owning tile.
    pub local_address: u64,
}

/// The pixel geometry of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGeometry {
    /// Tile width in luma samples.
    pub width: u64,
    /// Tile height in luma samples.
    pub height: u64,
    /// Horizontal offset of the tile's top-left corner, in luma samples.
    pub x: u64,
    /// Vertical offset of the tile's top-left corner, in luma samples.
    pub y: u64,
}

/// `PicWidthInCtbsY` (7-12), computed by true ceiling division.
///
/// [`SpsRbsp::pic_width_in_ctbs_y`] computes `width / CtbSizeY + 1`, which only
/// matches the ceiling when `width` is not an exact multiple of `CtbSizeY` — an
/// off-by-one for any picture whose width happens to divide evenly. Tile
/// boundaries have to match GPAC's `(width + max_CU_width - 1) / max_CU_width`
/// exactly, so this recomputes it directly rather than reusing that method.
pub(crate) fn pic_width_in_ctbs_y(sps: &SpsRbsp) -> u64 {
    let ctb = sps.ctb_size_y().get();
    sps.pic_width_in_luma_samples.get().div_ceil(ctb)
}

/// `PicHeightInCtbsY`, computed by true ceiling division. See [`pic_width_in_ctbs_y`].
pub(crate) fn pic_height_in_ctbs_y(sps: &SpsRbsp) -> u64 {
    let ctb = sps.ctb_size_y().get();
    sps.pic_height_in_luma_samples.get().div_ceil(ctb)
}

/// `PicSizeInCtbsY` (7-18): the total CTB count of the picture, by true
/// ceiling division of both axes. See [`pic_width_in_ctbs_y`].
pub(crate) fn pic_size_in_ctbs_y(sps: &SpsRbsp) -> u64 {
    pic_width_in_ctbs_y(sps) * pic_height_in_ctbs_y(sps)
}

/// The height, in CTBs, of tile row `index` out of `num_rows` total rows.
fn tile_row_height_ctbs(grid: &TileGrid, index: u64, num_rows: u64, pic_height_in_ctbs_y: u64) -> u64 {
    match &grid.explicit_sizes {
        Some(sizes) => sizes.row_height_minus1[index as usize] + 1,
        None => (index + 1) * pic_height_in_ctbs_y / num_rows - index * pic_height_in_ctbs_y / num_rows,
    }
}

/// The width, in CTBs, of tile column `index` out of `num_cols` total columns.
fn tile_col_width_ctbs(grid: &TileGrid, index: u64, num_cols: u64, pic_width_in_ctbs_y: u64) -> u64 {
    match &grid.explicit_sizes {
        Some(sizes) => sizes.column_width_minus1[index as usize] + 1,
        None => (index + 1) * pic_width_in_ctbs_y / num_cols - index * pic_width_in_ctbs_y / num_cols,
    }
}

/// Locates the tile that owns `slice_segment_address`, returning its row, column,
/// and the address relative to that tile's own origin.
///
/// Grounded on GPAC's `get_new_slice_address_and_tiles_coordinates` (`hevcsplit.c`).
///
/// The variable names below intentionally mirror GPAC's, including its axis
/// convention: `sl_y` walks the picture's CTB *columns* (it is derived via
/// `% PicWidthInCtbsY` and compared against a split of `PicWidthInCtbsY`), while
/// `sl_x` walks the picture's CTB *rows*. This is not a typo in either codebase —
/// swapping them produces the wrong tile on any grid that is not square, so the
/// convention is kept exactly as GPAC implements it rather than "fixed" to read
/// more naturally.
pub fn locate(sps: &SpsRbsp, pps: &PpsRbsp, slice_segment_address: u64) -> TileLocation {
    let pic_width_in_ctbs_y = pic_width_in_ctbs_y(sps);
    let pic_height_in_ctbs_y = pic_height_in_ctbs_y(sps);

    let sl_y = slice_segment_address % pic_width_in_ctbs_y;
    let sl_x = slice_segment_address / pic_width_in_ctbs_y;

    let mut row = 0;
    let mut col = 0;
    let mut tb_x = 0;
    let mut tb_y = 0;
    let mut val_x = 0;
    let mut val_y = 0;

    if let Some(grid) = &pps.tile_grid {
        let num_rows = grid.num_tile_rows();
        let num_cols = grid.num_tile_columns();

        for i in 0..num_rows {
            val_x = if i < num_rows - 1 {
                tile_row_height_ctbs(grid, i, num_rows, pic_height_in_ctbs_y)
            } else {
                pic_height_in_ctbs_y - tb_x
            };

            if sl_x < tb_x + val_x {
                row = i;
                break;
            }
            tb_x += val_x;
        }

        for i in 0..num_cols {
            val_y = if i < num_cols - 1 {
                tile_col_width_ctbs(grid, i, num_cols, pic_width_in_ctbs_y)
            } else {
                pic_width_in_ctbs_y - tb_y
            };

            if sl_y < tb_y + val_y {
                col = i;
                break;
            }
            tb_y += val_y;
        }
    }

    TileLocation {
        row,
        col,
        local_address: (sl_x - tb_x) * val_x + sl_y - tb_y,
    }
}

/// Computes the pixel geometry (width, height, origin) of tile `(row, col)`.
///
/// Grounded on GPAC's `get_size_of_tile` (`hevcsplit.c`). Clipping only ever
/// happens at the far edge of the picture (`if tx + width > sps.width { width =
/// sps.width - tx }`), never at the near edge — a tile never straddles CTB
/// boundaries from the left/top, only the last row/column absorbs whatever
/// remainder doesn't divide evenly.
///
/// When tiling is not in use, the whole picture is returned as a single tile at
/// the origin. GPAC's own `get_size_of_tile` leaves `*width`/`*height`
/// unwritten in that case (the entire body is gated behind
/// `pps.tiles_enabled_flag`); this fills in the one sane reading of that gap.
pub fn tile_sizes(sps: &SpsRbsp, pps: &PpsRbsp, row: u64, col: u64) -> TileGeometry {
    let ctb_size = sps.ctb_size_y().get();
    let pic_width_in_ctbs_y = pic_width_in_ctbs_y(sps);
    let pic_height_in_ctbs_y = pic_height_in_ctbs_y(sps);

    let mut width_ctbs = pic_width_in_ctbs_y;
    let mut height_ctbs = pic_height_in_ctbs_y;
    let mut tb_x = 0; // row (vertical) accumulation, in CTBs
    let mut tb_y = 0; // column (horizontal) accumulation, in CTBs

    if let Some(grid) = &pps.tile_grid {
        let num_rows = grid.num_tile_rows();
        let num_cols = grid.num_tile_columns();

        if row < num_rows - 1 {
            for i in 0..row {
                tb_x += tile_row_height_ctbs(grid, i, num_rows, pic_height_in_ctbs_y);
            }
            height_ctbs = tile_row_height_ctbs(grid, row, num_rows, pic_height_in_ctbs_y);
        } else {
            for i in 0..num_rows - 1 {
                tb_x += tile_row_height_ctbs(grid, i, num_rows, pic_height_in_ctbs_y);
            }
            height_ctbs = pic_height_in_ctbs_y - tb_x;
        }

        if col < num_cols - 1 {
            for i in 0..col {
                tb_y += tile_col_width_ctbs(grid, i, num_cols, pic_width_in_ctbs_y);
            }
            width_ctbs = tile_col_width_ctbs(grid, col, num_cols, pic_width_in_ctbs_y);
        } else {
            for i in 0..num_cols - 1 {
                tb_y += tile_col_width_ctbs(grid, i, num_cols, pic_width_in_ctbs_y);
            }
            width_ctbs = pic_width_in_ctbs_y - tb_y;
        }
    }

    let x = tb_y * ctb_size;
    let y = tb_x * ctb_size;
    let mut width = width_ctbs * ctb_size;
    let mut height = height_ctbs * ctb_size;

    let pic_width = sps.pic_width_in_luma_samples.get();
    let pic_height = sps.pic_height_in_luma_samples.get();
    if x + width > pic_width {
        width = pic_width - x;
    }
    if y + height > pic_height {
        height = pic_height - y;
    }

    TileGeometry { width, height, x, y }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;
    use crate::pps::{ExplicitTileSizes, TileGrid};

    fn uniform_grid(cols: u64, rows: u64) -> TileGrid {
        TileGrid {
            num_tile_columns_minus1: cols - 1,
            num_tile_rows_minus1: rows - 1,
            uniform_spacing_flag: true,
            explicit_sizes: None,
            loop_filter_across_tiles_enabled_flag: true,
        }
    }

    #[test]
    fn test_tile_row_col_width_uniform_even_split() {
        // A 4x2 CTB grid split into 2 columns and 2 rows splits evenly.
        let grid = uniform_grid(2, 2);
        assert_eq!(tile_col_width_ctbs(&grid, 0, 2, 4), 2);
        assert_eq!(tile_col_width_ctbs(&grid, 1, 2, 4), 2);
        assert_eq!(tile_row_height_ctbs(&grid, 0, 2, 2), 1);
        assert_eq!(tile_row_height_ctbs(&grid, 1, 2, 2), 1);
    }

    #[test]
    fn test_tile_col_width_uniform_uneven_split() {
        // 5 CTB columns split 3 ways: 2, 2, 1 (GPAC's "(i+1)*n/k - i*n/k" division).
        let grid = uniform_grid(3, 1);
        assert_eq!(tile_col_width_ctbs(&grid, 0, 3, 5), 1);
        assert_eq!(tile_col_width_ctbs(&grid, 1, 3, 5), 2);
        assert_eq!(tile_col_width_ctbs(&grid, 2, 3, 5), 2);
    }

    #[test]
    fn test_explicit_tile_sizes_override_uniform_split() {
        let grid = TileGrid {
            num_tile_columns_minus1: 1,
            num_tile_rows_minus1: 0,
            uniform_spacing_flag: false,
            explicit_sizes: Some(ExplicitTileSizes {
                column_width_minus1: vec![2], // column 0 is 3 CTBs wide
                row_height_minus1: vec![],
            }),
            loop_filter_across_tiles_enabled_flag: true,
        };
        assert_eq!(tile_col_width_ctbs(&grid, 0, 2, 10), 3);
    }
}
