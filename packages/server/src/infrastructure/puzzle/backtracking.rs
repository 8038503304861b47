//! ランダムなバックトラッキングによるパズル生成
//!
//! 空の盤面を左上から順に埋め、各セルでは 1〜9 をシャッフルした順に試す。
//! 行き詰まったら 1 つ前のセルに戻る。完成した盤面から、ランダムに選んだ
//! 異なるセルを指定数だけ空にしてパズルにする（一意解は保証しない）。

use std::ops::RangeInclusive;

use rand::{Rng, seq::SliceRandom};

use crate::domain::{
    GeneratedPuzzle, Grid, PuzzleGenerator,
    grid::{EMPTY, GRID_SIZE},
    is_valid_placement,
};

const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// デフォルトで空にするセル数
pub const DEFAULT_REMOVED_CELLS: RangeInclusive<usize> = 50..=60;

pub struct BacktrackingPuzzleGenerator {
    removed_cells: RangeInclusive<usize>,
}

impl BacktrackingPuzzleGenerator {
    /// `removed_cells` の範囲から空にするセル数を毎回ランダムに選ぶ。
    ///
    /// 範囲は 0..=81 に丸められる。
    pub fn new(removed_cells: RangeInclusive<usize>) -> Self {
        let start = (*removed_cells.start()).min(CELL_COUNT);
        let end = (*removed_cells.end()).clamp(start, CELL_COUNT);
        Self {
            removed_cells: start..=end,
        }
    }

    /// 完成した正しい盤面を生成する
    pub fn generate_solution<R: Rng + ?Sized>(rng: &mut R) -> Grid {
        let mut grid = Grid::empty();
        // 空の盤面からは必ず解が見つかる
        fill(&mut grid, 0, rng);
        grid
    }

    /// `solution` から `count` 個の異なるセルを空にする
    pub fn remove_cells<R: Rng + ?Sized>(solution: &Grid, count: usize, rng: &mut R) -> Grid {
        let mut positions: Vec<usize> = (0..CELL_COUNT).collect();
        positions.shuffle(rng);

        let mut puzzle = *solution;
        for &index in positions.iter().take(count) {
            puzzle.set(index / GRID_SIZE, index % GRID_SIZE, EMPTY);
        }
        puzzle
    }
}

impl Default for BacktrackingPuzzleGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_REMOVED_CELLS)
    }
}

impl PuzzleGenerator for BacktrackingPuzzleGenerator {
    fn generate(&self) -> GeneratedPuzzle {
        let mut rng = rand::thread_rng();
        let solution = Self::generate_solution(&mut rng);
        let count = rng.gen_range(self.removed_cells.clone());
        let puzzle = Self::remove_cells(&solution, count, &mut rng);
        tracing::debug!("Generated puzzle with {} empty cells", count);
        GeneratedPuzzle { puzzle, solution }
    }
}

fn fill<R: Rng + ?Sized>(grid: &mut Grid, index: usize, rng: &mut R) -> bool {
    if index == CELL_COUNT {
        return true;
    }
    let (row, col) = (index / GRID_SIZE, index % GRID_SIZE);

    let mut digits: [u8; GRID_SIZE] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
    digits.shuffle(rng);
    for digit in digits {
        if is_valid_placement(grid, row, col, digit) {
            grid.set(row, col, digit);
            if fill(grid, index + 1, rng) {
                return true;
            }
            grid.set(row, col, EMPTY);
        }
    }
    false
}
