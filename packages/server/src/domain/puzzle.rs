//! パズル生成の抽象化

use super::grid::Grid;

/// 生成されたパズルと、その解答
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedPuzzle {
    pub puzzle: Grid,
    pub solution: Grid,
}

/// パズル生成器
///
/// `solution` は完成した正しい盤面、`puzzle` はそのセルをいくつか空にしたもの。
/// 一意解は保証しなくてよい。
pub trait PuzzleGenerator: Send + Sync {
    fn generate(&self) -> GeneratedPuzzle;
}
