//! パズル生成器の実装

pub mod backtracking;

pub use backtracking::BacktrackingPuzzleGenerator;
