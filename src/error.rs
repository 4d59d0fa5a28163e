//! エラー型。

use thiserror::Error;

use crate::chess::Coord;

/// 盤面操作のエラー。
///
/// `InvalidCoordinateFormat`, `InvalidBranchSelection`, `EmptySquare` は呼び出し側の入力ミスであり、
/// 入力し直せば回復できる。`PositionNotFound`, `InvalidCaptureInvariant` は不変条件違反で、回復不能。
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("invalid coordinate format: {0:?} (expected [A-H][1-8])")]
    InvalidCoordinateFormat(String),

    #[error("invalid branch selection: {0}")]
    InvalidBranchSelection(String),

    #[error("no piece at {0}")]
    EmptySquare(Coord),

    #[error("position {0} not found in the distribution")]
    PositionNotFound(Coord),

    #[error("capture left {0} branches (expected exactly 1)")]
    InvalidCaptureInvariant(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
