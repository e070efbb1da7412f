// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Work distribution.  The image is handed out to workers either as
//! one fixed block of rows per worker, decided before any thread
//! starts, or as fixed-size tiles pulled one at a time from a shared
//! cursor until the cursor runs dry.

use std::ops::Range;
use std::sync::{Mutex, PoisonError};

/// A lease on one rectangular tile, identified by its column and row
/// in the tile grid.  When `can_draw` is false the cursor is
/// exhausted and the coordinates are meaningless.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tile {
    /// Column of the tile in the tile grid.
    pub tile_x: usize,
    /// Row of the tile in the tile grid.
    pub tile_y: usize,
    /// False once every tile has been handed out.
    pub can_draw: bool,
}

impl Tile {
    fn exhausted() -> Self {
        Tile {
            tile_x: 0,
            tile_y: 0,
            can_draw: false,
        }
    }
}

#[derive(Debug)]
struct Position {
    next_x: usize,
    next_y: usize,
}

/// Hands out every tile of a `max_tiles_x` x `max_tiles_y` grid
/// exactly once, in raster order, to however many threads ask.
#[derive(Debug)]
pub struct TileCursor {
    position: Mutex<Position>,
    max_tiles_x: usize,
    max_tiles_y: usize,
}

impl TileCursor {
    /// A cursor positioned on the top-left tile.
    pub fn new(max_tiles_x: usize, max_tiles_y: usize) -> Self {
        TileCursor {
            position: Mutex::new(Position { next_x: 0, next_y: 0 }),
            max_tiles_x,
            max_tiles_y,
        }
    }

    /// Number of tiles across.
    pub fn max_tiles_x(&self) -> usize {
        self.max_tiles_x
    }

    /// Number of tiles down.
    pub fn max_tiles_y(&self) -> usize {
        self.max_tiles_y
    }

    /// Total number of tiles the cursor will ever hand out.
    pub fn len(&self) -> usize {
        self.max_tiles_x * self.max_tiles_y
    }

    /// True if the grid has no tiles at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes the next tile.  Once the grid is used up every call
    /// returns a tile with `can_draw == false`.
    pub fn next_tile(&self) -> Tile {
        // Nothing in here can panic, so a poisoned lock still holds a
        // consistent position.
        let mut pos = self
            .position
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.max_tiles_x == 0 || pos.next_y >= self.max_tiles_y {
            return Tile::exhausted();
        }
        let tile = Tile {
            tile_x: pos.next_x,
            tile_y: pos.next_y,
            can_draw: true,
        };
        pos.next_x += 1;
        if pos.next_x == self.max_tiles_x {
            pos.next_x = 0;
            pos.next_y += 1;
        }
        tile
    }

    /// Drains the cursor as an iterator, stopping at the first
    /// exhausted lease.
    pub fn leases(&self) -> Leases {
        Leases { cursor: self }
    }
}

/// Iterator over the remaining tiles of a `TileCursor`.
pub struct Leases<'a> {
    cursor: &'a TileCursor,
}

impl<'a> Iterator for Leases<'a> {
    type Item = Tile;

    fn next(&mut self) -> Option<Tile> {
        let tile = self.cursor.next_tile();
        if tile.can_draw {
            Some(tile)
        } else {
            None
        }
    }
}

/// Splits `height` rows into `blocks` contiguous runs.  Every run is
/// `height / blocks` rows long, except the last, which also takes the
/// rows left over by the division.
pub fn row_blocks(height: usize, blocks: usize) -> Vec<Range<usize>> {
    if blocks == 0 {
        return vec![];
    }
    let size = height / blocks;
    (0..blocks)
        .map(|i| {
            let start = i * size;
            let end = if i + 1 == blocks { height } else { start + size };
            start..end
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn cursor_walks_in_raster_order() {
        let cursor = TileCursor::new(3, 2);
        let tiles: Vec<(usize, usize)> = cursor.leases().map(|t| (t.tile_x, t.tile_y)).collect();
        assert_eq!(tiles, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn exhausted_cursor_stays_exhausted() {
        let cursor = TileCursor::new(2, 2);
        for _ in 0..4 {
            assert!(cursor.next_tile().can_draw);
        }
        for _ in 0..10 {
            assert!(!cursor.next_tile().can_draw);
        }
    }

    #[test]
    fn empty_grid_is_exhausted_immediately() {
        assert!(!TileCursor::new(0, 5).next_tile().can_draw);
        assert!(!TileCursor::new(5, 0).next_tile().can_draw);
        assert!(TileCursor::new(0, 5).is_empty());
    }

    #[test]
    fn concurrent_callers_share_tiles_without_duplicates() {
        let cursor = TileCursor::new(17, 13);
        let total = cursor.len();
        let threads = 8;
        let mut leases: Vec<Tile> = vec![];
        let cursor = &cursor;
        crossbeam::scope(|spawner| {
            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    spawner.spawn(move |_| {
                        let mut mine = vec![];
                        loop {
                            let tile = cursor.next_tile();
                            if !tile.can_draw {
                                // Asking again after exhaustion is harmless.
                                assert!(!cursor.next_tile().can_draw);
                                break;
                            }
                            mine.push(tile);
                        }
                        mine
                    })
                })
                .collect();
            for handle in handles {
                leases.extend(handle.join().unwrap());
            }
        })
        .unwrap();

        assert_eq!(leases.len(), total);
        let unique: HashSet<(usize, usize)> = leases.iter().map(|t| (t.tile_x, t.tile_y)).collect();
        assert_eq!(unique.len(), total);
        assert!(unique.iter().all(|&(x, y)| x < 17 && y < 13));
        assert!(!cursor.next_tile().can_draw);
    }

    #[test]
    fn hundred_rows_in_four_blocks() {
        let blocks = row_blocks(100, 4);
        assert_eq!(blocks, vec![0..25, 25..50, 50..75, 75..100]);
    }

    #[test]
    fn leftover_rows_go_to_last_block() {
        assert_eq!(row_blocks(10, 3), vec![0..3, 3..6, 6..10]);
        assert_eq!(row_blocks(4, 1), vec![0..4]);
    }

    #[test]
    fn row_blocks_cover_every_row_once() {
        for height in 1..40 {
            for blocks in 1..12 {
                let ranges = row_blocks(height, blocks);
                assert_eq!(ranges.len(), blocks);
                let mut next = 0;
                for r in ranges {
                    assert_eq!(r.start, next);
                    next = r.end;
                }
                assert_eq!(next, height);
            }
        }
    }
}
