//! 9x9 の盤面とルール判定
//!
//! セルは 1〜9 の数字、空セルは [`EMPTY`] で表す。

use super::error::DomainError;

pub const GRID_SIZE: usize = 9;
pub const BOX_SIZE: usize = 3;
pub const EMPTY: u8 = 0;

pub type Rows = [[u8; GRID_SIZE]; GRID_SIZE];

/// Sudoku の盤面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Grid(Rows);

impl Grid {
    /// 全セルが空の盤面
    pub fn empty() -> Self {
        Self([[EMPTY; GRID_SIZE]; GRID_SIZE])
    }

    /// 行データから盤面を作成する。0〜9 以外の値はエラー。
    pub fn from_rows(rows: Rows) -> Result<Self, DomainError> {
        if let Some(&bad) = rows.iter().flatten().find(|&&v| v > 9) {
            return Err(DomainError::InvalidDigit(bad));
        }
        Ok(Self(rows))
    }

    pub fn rows(&self) -> &Rows {
        &self.0
    }

    pub fn into_rows(self) -> Rows {
        self.0
    }

    /// セルの値。空セルは `Some(EMPTY)`、範囲外は `None`。
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.0.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn is_given(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Some(v) if v != EMPTY)
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: u8) {
        self.0[row][col] = value;
    }

    pub fn empty_cells(&self) -> usize {
        self.0.iter().flatten().filter(|&&v| v == EMPTY).count()
    }

    pub fn is_complete(&self) -> bool {
        self.empty_cells() == 0
    }

    /// 全ての行・列・ボックスが 1〜9 の順列になっているか
    pub fn is_solved(&self) -> bool {
        (0..GRID_SIZE).all(|i| {
            is_permutation(self.row_values(i))
                && is_permutation(self.col_values(i))
                && is_permutation(self.box_values(i))
        })
    }

    /// `solution` のセルを空にするだけでこの盤面が得られるか
    pub fn is_derived_from(&self, solution: &Grid) -> bool {
        self.0
            .iter()
            .flatten()
            .zip(solution.0.iter().flatten())
            .all(|(&cell, &answer)| cell == EMPTY || cell == answer)
    }

    fn row_values(&self, row: usize) -> impl Iterator<Item = u8> + '_ {
        self.0[row].iter().copied()
    }

    fn col_values(&self, col: usize) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().map(move |r| r[col])
    }

    fn box_values(&self, index: usize) -> impl Iterator<Item = u8> + '_ {
        let top = (index / BOX_SIZE) * BOX_SIZE;
        let left = (index % BOX_SIZE) * BOX_SIZE;
        (top..top + BOX_SIZE)
            .flat_map(move |r| (left..left + BOX_SIZE).map(move |c| self.0[r][c]))
    }
}

fn is_permutation(values: impl Iterator<Item = u8>) -> bool {
    let mut seen = [false; GRID_SIZE + 1];
    let mut count = 0;
    for v in values {
        if v == EMPTY || v as usize > GRID_SIZE || seen[v as usize] {
            return false;
        }
        seen[v as usize] = true;
        count += 1;
    }
    count == GRID_SIZE
}

/// `value` を `(row, col)` に置けるかを判定する。
///
/// 空セル（[`EMPTY`]）への書き換えは常に有効。数字は 1〜9 で、
/// 書き込むセル自身を除いた同じ行・列・3x3 ボックスに同じ数字があってはならない。
/// 範囲外の座標は `false`。
pub fn is_valid_placement(grid: &Grid, row: usize, col: usize, value: u8) -> bool {
    if row >= GRID_SIZE || col >= GRID_SIZE {
        return false;
    }
    if value == EMPTY {
        return true;
    }
    if value as usize > GRID_SIZE {
        return false;
    }

    let cells = grid.rows();
    for x in 0..GRID_SIZE {
        if x != col && cells[row][x] == value {
            return false;
        }
        if x != row && cells[x][col] == value {
            return false;
        }
    }

    let top = (row / BOX_SIZE) * BOX_SIZE;
    let left = (col / BOX_SIZE) * BOX_SIZE;
    for r in top..top + BOX_SIZE {
        for c in left..left + BOX_SIZE {
            if (r, c) != (row, col) && cells[r][c] == value {
                return false;
            }
        }
    }
    true
}
