//! 駒。
//!
//! 駒は陣営と駒種を固定で持ち、自身の重ね合わせ状態を所有する。
//! 盤面への逆参照は持たない(盤面操作は常に `Position` を経由する)。

use crate::chess::*;
use crate::error::Result;
use crate::superposition::Superposition;

/// 駒の識別子。`Position` が持つ駒配列のインデックス。
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct PieceId(u32);

impl PieceId {
    pub(crate) fn new(idx: usize) -> Self {
        debug_assert!(idx <= u32::MAX as usize);

        Self(idx as u32)
    }
}

impl From<PieceId> for usize {
    fn from(id: PieceId) -> Self {
        id.0 as Self
    }
}

impl std::fmt::Debug for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "PieceId({})", self.0)
    }
}

/// 駒の状態遷移。
///
/// `Unplaced` -> `Collapsed` (配置) -> `Superposed` / `Collapsed` (移動、収縮) -> `Captured` (終端)。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PieceStatus {
    /// まだ盤上に置かれていない。
    Unplaced,

    /// 2 マス以上に重ね合わされている。
    Superposed,

    /// ちょうど 1 マスに確定している。
    Collapsed,

    /// 取られた。
    Captured,
}

/// 駒。
#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    side: Side,
    kind: PieceKind,
    moved: bool,    // 一度でも動いたか(ポーンの 2 マス移動判定用)
    captured: bool, // 取られたか。立ったら二度と戻らない。
    state: Superposition,
}

impl Piece {
    pub(crate) fn new(side: Side, kind: PieceKind) -> Self {
        Self {
            side,
            kind,
            moved: false,
            captured: false,
            state: Superposition::default(),
        }
    }

    /// 陣営を返す。
    pub fn side(&self) -> Side {
        self.side
    }

    /// 駒種を返す。
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// 一度でも動いたかどうかを返す。
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// 重ね合わせ状態への参照を返す。
    pub fn state(&self) -> &Superposition {
        &self.state
    }

    /// 現在の状態を返す。
    pub fn status(&self) -> PieceStatus {
        if self.captured {
            PieceStatus::Captured
        } else {
            match self.state.len() {
                0 => PieceStatus::Unplaced,
                1 => PieceStatus::Collapsed,
                _ => PieceStatus::Superposed,
            }
        }
    }

    /// 取られたかどうかを返す。
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// 陣営を考慮した 1 文字表記を返す。
    pub fn letter(&self) -> char {
        self.kind.letter_for(self.side)
    }

    /// 初期配置として `sq` に確率 1 で置く。
    pub(crate) fn place(&mut self, sq: Coord) {
        debug_assert_eq!(self.status(), PieceStatus::Unplaced);

        self.state = Superposition::certain(sq);
    }

    pub(crate) fn state_mut(&mut self) -> &mut Superposition {
        &mut self.state
    }

    pub(crate) fn mark_moved(&mut self) {
        self.moved = true;
    }

    /// 相手の収縮成功による捕獲を確定させ、駒がいたマスを返す。
    pub(crate) fn finalize_capture(&mut self) -> Result<Coord> {
        let sq = self.state.finalize_capture()?;
        self.captured = true;

        Ok(sq)
    }

    /// 収縮失敗で最後の位置を失った駒を捕獲扱いにする(取った側の手柄にはならない)。
    pub(crate) fn mark_vanished(&mut self) {
        debug_assert!(self.state.is_empty());

        self.captured = true;
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.side, self.kind)
    }
}
