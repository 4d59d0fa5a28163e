//! 駒の重ね合わせ状態。
//!
//! 駒がどのマスにどれだけの確率で存在するかを表す。各エントリは互いに排他的な「本当にありうる位置」であり、
//! 確率の合計は(手の処理途中を除き)常に 1 になる。
//!
//! ここでは確率分布そのものの操作のみを扱う。盤面の更新は `Position` 側で行う。

use std::collections::HashMap;

use crate::chess::Coord;
use crate::error::{Error, Result};
use crate::random::RandomSource;

/// 確率の比較に使う許容誤差。
pub const PROBABILITY_EPSILON: f64 = 1e-9;

/// 重ね合わせ状態。マスからそこに駒が存在する確率への写像。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Superposition {
    positions: HashMap<Coord, f64>,
}

/// 1 マスに対する収縮の結果。
#[derive(Clone, Debug, PartialEq)]
pub struct Collapse {
    square: Coord,
    probability: f64, // 収縮前にそのマスが持っていた確率
    draw: f64,        // 引いた乱数
    discarded: Vec<Coord>,
}

impl Collapse {
    /// 収縮させたマスを返す。
    pub fn square(&self) -> Coord {
        self.square
    }

    /// 収縮前にそのマスが持っていた確率を返す。
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// 収縮に使った乱数を返す。
    pub fn draw(&self) -> f64 {
        self.draw
    }

    /// 駒がそのマスに実在した(他の位置が全て消えた)かどうかを返す。
    pub fn materialized(&self) -> bool {
        self.draw < self.probability
    }

    /// 分布から取り除かれたマスたちを返す。
    ///
    /// 実在した場合はそれ以外の全てのマス、実在しなかった場合はそのマス自身。
    pub fn discarded(&self) -> &[Coord] {
        &self.discarded
    }
}

impl Superposition {
    /// 1 マスに確定した状態を返す。
    pub fn certain(sq: Coord) -> Self {
        Self {
            positions: HashMap::from([(sq, 1.0)]),
        }
    }

    /// エントリ数を返す。
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// エントリが 1 つもないかどうかを返す。
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// ちょうど 1 マスに確定しているかどうかを返す。
    pub fn is_certain(&self) -> bool {
        self.positions.len() == 1
    }

    /// 確定しているならそのマスを返す。
    pub fn sole_square(&self) -> Option<Coord> {
        if self.is_certain() {
            self.positions.keys().next().copied()
        } else {
            None
        }
    }

    /// 指定したマスを含むかどうかを返す。
    pub fn contains(&self, sq: Coord) -> bool {
        self.positions.contains_key(&sq)
    }

    /// 指定したマスの確率を返す。
    pub fn probability(&self, sq: Coord) -> Option<f64> {
        self.positions.get(&sq).copied()
    }

    /// 確率の合計を返す。
    pub fn total(&self) -> f64 {
        self.positions.values().sum()
    }

    /// (マス, 確率) を列挙する。順序は不定。
    pub fn iter(&self) -> impl Iterator<Item = (Coord, f64)> + '_ {
        self.positions.iter().map(|(&sq, &p)| (sq, p))
    }

    /// (マス, 確率) をマスのインデックス順に並べて返す。表示用。
    pub fn to_sorted_vec(&self) -> Vec<(Coord, f64)> {
        let mut v: Vec<_> = self.iter().collect();
        v.sort_unstable_by_key(|&(sq, _)| sq.index());
        v
    }

    /// 指定したマスを取り除き、その確率を返す。正規化はしない。
    pub(crate) fn take(&mut self, sq: Coord) -> Result<f64> {
        self.positions
            .remove(&sq)
            .ok_or(Error::PositionNotFound(sq))
    }

    /// 指定したマスに確率を加算する(エントリがなければ作る)。
    pub(crate) fn add(&mut self, sq: Coord, mass: f64) {
        *self.positions.entry(sq).or_insert(0.0) += mass;
    }

    /// 指定したマスについて波動関数を収縮させる。
    ///
    /// 乱数 `r` を 1 つ引き、そのマスの確率を `p` として:
    ///
    /// * `r >= p` なら駒はそこに実在しない。そのマスを取り除き、残りを `1 - p` で割って正規化する。
    ///   残りが空になることもある(呼び出し側で捕獲扱いとする)。
    /// * `r < p` なら駒はそこに実在する。分布を `{sq: 1.0}` に潰す。
    pub fn collapse<R>(&mut self, sq: Coord, rng: &mut R) -> Result<Collapse>
    where
        R: RandomSource + ?Sized,
    {
        let probability = self.probability(sq).ok_or(Error::PositionNotFound(sq))?;
        let draw = rng.next_unit();

        let discarded = if draw >= probability {
            self.positions.remove(&sq);
            let rest = 1.0 - probability;
            for p in self.positions.values_mut() {
                *p /= rest;
            }
            vec![sq]
        } else {
            let discarded: Vec<_> = self.positions.keys().copied().filter(|&c| c != sq).collect();
            self.positions = HashMap::from([(sq, 1.0)]);
            discarded
        };

        Ok(Collapse {
            square: sq,
            probability,
            draw,
            discarded,
        })
    }

    /// 捕獲を確定させ、駒がいたマスを返す。分布は空になる。
    ///
    /// エントリがちょうど 1 つでなければならない。
    pub fn finalize_capture(&mut self) -> Result<Coord> {
        let sq = self
            .sole_square()
            .ok_or(Error::InvalidCaptureInvariant(self.len()))?;
        self.positions.clear();

        Ok(sq)
    }
}
