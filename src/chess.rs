//! チェスの基本要素たち。
//!
//! 座標は盤面外の値も表せる 2 次元整数ベクトルとして扱い、方向(オフセット)にも同じ型を使う。
//! 盤面内かどうかは `Coord::in_range()` で判定する。
//!
//! 座標の内部値は以下のように割り当てている:
//!
//! * 筋(file)は a, b, ..., h の順に 0, 1, ..., 7。
//! * 段(rank)は 1, 2, ..., 8 の順に 0, 1, ..., 7。
//! * マスのインデックスは a1, b1, ..., h1, a2, ..., h8 の順。

use std::iter::FusedIterator;

use crate::error::{Error, Result};

/// 陣営。
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Side(u32);

pub const WHITE: Side = Side(0);
pub const BLACK: Side = Side(1);

impl Side {
    /// 有効値かどうかを返す。
    pub const fn is_valid(self) -> bool {
        self.0 == WHITE.0 || self.0 == BLACK.0
    }

    /// 敵陣営を返す。
    pub const fn inv(self) -> Side {
        Self(self.0 ^ 1)
    }

    /// ポーンの前進方向を返す。白は段が増える方向、黒は減る方向。
    pub const fn forward(self) -> Direction {
        if self.0 == WHITE.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// 陣営を昇順に列挙する。(`WHITE`、`BLACK` の順)
    pub fn iter(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        [WHITE, BLACK].into_iter()
    }
}

impl From<Side> for usize {
    fn from(side: Side) -> Self {
        debug_assert!(side.is_valid());

        side.0 as Self
    }
}

impl std::fmt::Debug for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            WHITE => write!(f, "WHITE"),
            BLACK => write!(f, "BLACK"),
            _ => write!(f, "Side({})", self.0),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            WHITE => write!(f, "white"),
            BLACK => write!(f, "black"),
            side => write!(f, "invalid side({})", side.0),
        }
    }
}

/// 盤面上の座標、または座標の差分。
///
/// 値として比較・ハッシュされる。加減算とスカラー倍が定義されている。
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Coord {
    file: i32,
    rank: i32,
}

pub const A1: Coord = Coord::new(0, 0);
pub const B1: Coord = Coord::new(1, 0);
pub const C1: Coord = Coord::new(2, 0);
pub const D1: Coord = Coord::new(3, 0);
pub const E1: Coord = Coord::new(4, 0);
pub const F1: Coord = Coord::new(5, 0);
pub const G1: Coord = Coord::new(6, 0);
pub const H1: Coord = Coord::new(7, 0);
pub const A2: Coord = Coord::new(0, 1);
pub const B2: Coord = Coord::new(1, 1);
pub const C2: Coord = Coord::new(2, 1);
pub const D2: Coord = Coord::new(3, 1);
pub const E2: Coord = Coord::new(4, 1);
pub const F2: Coord = Coord::new(5, 1);
pub const G2: Coord = Coord::new(6, 1);
pub const H2: Coord = Coord::new(7, 1);
pub const A3: Coord = Coord::new(0, 2);
pub const B3: Coord = Coord::new(1, 2);
pub const C3: Coord = Coord::new(2, 2);
pub const D3: Coord = Coord::new(3, 2);
pub const E3: Coord = Coord::new(4, 2);
pub const F3: Coord = Coord::new(5, 2);
pub const G3: Coord = Coord::new(6, 2);
pub const H3: Coord = Coord::new(7, 2);
pub const A4: Coord = Coord::new(0, 3);
pub const B4: Coord = Coord::new(1, 3);
pub const C4: Coord = Coord::new(2, 3);
pub const D4: Coord = Coord::new(3, 3);
pub const E4: Coord = Coord::new(4, 3);
pub const F4: Coord = Coord::new(5, 3);
pub const G4: Coord = Coord::new(6, 3);
pub const H4: Coord = Coord::new(7, 3);
pub const A5: Coord = Coord::new(0, 4);
pub const B5: Coord = Coord::new(1, 4);
pub const C5: Coord = Coord::new(2, 4);
pub const D5: Coord = Coord::new(3, 4);
pub const E5: Coord = Coord::new(4, 4);
pub const F5: Coord = Coord::new(5, 4);
pub const G5: Coord = Coord::new(6, 4);
pub const H5: Coord = Coord::new(7, 4);
pub const A6: Coord = Coord::new(0, 5);
pub const B6: Coord = Coord::new(1, 5);
pub const C6: Coord = Coord::new(2, 5);
pub const D6: Coord = Coord::new(3, 5);
pub const E6: Coord = Coord::new(4, 5);
pub const F6: Coord = Coord::new(5, 5);
pub const G6: Coord = Coord::new(6, 5);
pub const H6: Coord = Coord::new(7, 5);
pub const A7: Coord = Coord::new(0, 6);
pub const B7: Coord = Coord::new(1, 6);
pub const C7: Coord = Coord::new(2, 6);
pub const D7: Coord = Coord::new(3, 6);
pub const E7: Coord = Coord::new(4, 6);
pub const F7: Coord = Coord::new(5, 6);
pub const G7: Coord = Coord::new(6, 6);
pub const H7: Coord = Coord::new(7, 6);
pub const A8: Coord = Coord::new(0, 7);
pub const B8: Coord = Coord::new(1, 7);
pub const C8: Coord = Coord::new(2, 7);
pub const D8: Coord = Coord::new(3, 7);
pub const E8: Coord = Coord::new(4, 7);
pub const F8: Coord = Coord::new(5, 7);
pub const G8: Coord = Coord::new(6, 7);
pub const H8: Coord = Coord::new(7, 7);

impl Coord {
    /// 筋と段を指定して座標を作る。盤面外の値でもよい。
    pub const fn new(file: i32, rank: i32) -> Self {
        Self { file, rank }
    }

    /// 筋を返す。
    pub const fn file(self) -> i32 {
        self.file
    }

    /// 段を返す。
    pub const fn rank(self) -> i32 {
        self.rank
    }

    /// 盤面内かどうかを返す。
    pub const fn in_range(self) -> bool {
        0 <= self.file && self.file < 8 && 0 <= self.rank && self.rank < 8
    }

    /// マスのインデックス(0..64)を指定して座標を作る。
    pub const fn from_index(idx: usize) -> Self {
        debug_assert!(idx < 64);

        Self::new((idx % 8) as i32, (idx / 8) as i32)
    }

    /// マスのインデックスを返す。`self` は盤面内でなければならない。
    pub const fn index(self) -> usize {
        debug_assert!(self.in_range());

        (8 * self.rank + self.file) as usize
    }

    /// 全てのマスをインデックス順に列挙する。(`A1`, `B1`, ..., `H8` の順)
    pub fn iter(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        (0..64).map(Self::from_index)
    }

    /// 棋譜表記("E4" など)を返す。`self` は盤面内でなければならない。
    pub fn as_board_space(self) -> String {
        debug_assert!(self.in_range());

        let file = char::from(b'A' + self.file as u8);
        let rank = char::from(b'1' + self.rank as u8);

        format!("{}{}", file, rank)
    }

    /// 棋譜表記をパースする。
    ///
    /// 英字 1 文字(A-H, 大文字小文字は問わない)と数字 1 文字(1-8)の組のみ受け付ける。
    pub fn from_board_space(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidCoordinateFormat(s.to_owned());

        let mut chars = s.chars();
        let (file_c, rank_c) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file_c), Some(rank_c), None) => (file_c.to_ascii_uppercase(), rank_c),
            _ => return Err(invalid()),
        };

        if !('A'..='H').contains(&file_c) || !('1'..='8').contains(&rank_c) {
            return Err(invalid());
        }

        let file = i32::from(file_c as u8 - b'A');
        let rank = i32::from(rank_c as u8 - b'1');

        Ok(Self::new(file, rank))
    }
}

impl std::str::FromStr for Coord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_board_space(s)
    }
}

impl std::ops::Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.file + rhs.file, self.rank + rhs.rank)
    }
}

impl std::ops::AddAssign for Coord {
    fn add_assign(&mut self, rhs: Coord) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.file - rhs.file, self.rank - rhs.rank)
    }
}

impl std::ops::Mul<i32> for Coord {
    type Output = Coord;

    fn mul(self, rhs: i32) -> Coord {
        Coord::new(self.file * rhs, self.rank * rhs)
    }
}

impl From<Coord> for usize {
    fn from(c: Coord) -> Self {
        c.index()
    }
}

impl std::fmt::Debug for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.in_range() {
            f.write_str(&self.as_board_space())
        } else {
            write!(f, "Coord({}, {})", self.file, self.rank)
        }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// 8 方向。
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Direction {
    /// 縦横の 4 方向。
    pub const ORTHOGONAL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// 斜めの 4 方向。
    pub const DIAGONAL: [Self; 4] = [Self::UpRight, Self::DownRight, Self::DownLeft, Self::UpLeft];

    /// 方向に対応する 1 マス分の差分を返す。
    pub const fn offset(self) -> Coord {
        match self {
            Self::Up => Coord::new(0, 1),
            Self::UpRight => Coord::new(1, 1),
            Self::Right => Coord::new(1, 0),
            Self::DownRight => Coord::new(1, -1),
            Self::Down => Coord::new(0, -1),
            Self::DownLeft => Coord::new(-1, -1),
            Self::Left => Coord::new(-1, 0),
            Self::UpLeft => Coord::new(-1, 1),
        }
    }

    /// 全方向を時計回りに列挙する。(`Up` から)
    pub fn iter(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        [
            Self::Up,
            Self::UpRight,
            Self::Right,
            Self::DownRight,
            Self::Down,
            Self::DownLeft,
            Self::Left,
            Self::UpLeft,
        ]
        .into_iter()
    }
}

impl From<Direction> for usize {
    fn from(dir: Direction) -> Self {
        dir as Self
    }
}

/// 駒種(陣営の区別なし)。
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    /// 全駒種を列挙する。
    pub fn iter(
    ) -> impl Iterator<Item = Self> + DoubleEndedIterator + ExactSizeIterator + FusedIterator {
        [
            Self::Pawn,
            Self::Rook,
            Self::Knight,
            Self::Bishop,
            Self::Queen,
            Self::King,
        ]
        .into_iter()
    }

    /// 白の駒としての 1 文字表記を返す。黒の駒は小文字で表す。
    pub const fn letter(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// 陣営を考慮した 1 文字表記を返す。
    pub fn letter_for(self, side: Side) -> char {
        if side == WHITE {
            self.letter()
        } else {
            self.letter().to_ascii_lowercase()
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        };
        f.write_str(s)
    }
}
