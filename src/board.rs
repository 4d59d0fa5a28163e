//! 占有盤面。マスから駒への参照を引く。

use crate::chess::Coord;
use crate::piece::PieceId;

/// 占有盤面。各マスには高々 1 つの駒への参照が入る。
///
/// 空でないマスの駒は、自身の分布にそのマスを含んでいなければならない。
/// この不変条件は `Position` が維持する。
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct Board([Option<PieceId>; 64]);

impl Board {
    /// 空の盤面を返す。
    pub const fn empty() -> Self {
        Self([None; 64])
    }

    /// 指定したマスの駒を返す。盤面外のマスを渡してはならない(panic する)。
    pub fn get(&self, sq: Coord) -> Option<PieceId> {
        self[sq]
    }

    /// 指定したマスの駒を設定する。盤面外のマスを渡してはならない(panic する)。
    pub fn set(&mut self, sq: Coord, id: Option<PieceId>) {
        self[sq] = id;
    }

    /// 駒がいるマスを (マス, 駒) の形でインデックス順に列挙する。
    pub fn occupied(&self) -> impl Iterator<Item = (Coord, PieceId)> + '_ {
        Coord::iter().filter_map(move |sq| self[sq].map(|id| (sq, id)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::ops::Index<Coord> for Board {
    type Output = Option<PieceId>;

    fn index(&self, sq: Coord) -> &Self::Output {
        assert!(sq.in_range(), "square out of range: {:?}", sq);

        &self.0[sq.index()]
    }
}

impl std::ops::IndexMut<Coord> for Board {
    fn index_mut(&mut self, sq: Coord) -> &mut Self::Output {
        assert!(sq.in_range(), "square out of range: {:?}", sq);

        &mut self.0[sq.index()]
    }
}
