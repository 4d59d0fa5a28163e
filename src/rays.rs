//! 各マスから見た移動先のテーブルたち。
//!
//! 盤上の駒の有無とは無関係な幾何情報のみを持つ。遮りの判定は `movegen` 側で行う。
//! テーブルは初回アクセス時に初期化される。

use arrayvec::ArrayVec;
use once_cell::sync::Lazy;

use crate::chess::*;

/// ある方向への半直線。起点は含まず、起点に近い順に並ぶ。盤端で打ち切られる。
pub type Ray = ArrayVec<Coord, 7>;

/// 1 マスで跳ぶ移動先の集合。
pub type Targets = ArrayVec<Coord, 8>;

type RayTable = [[Ray; 8]; 64];
type TargetsTable = [Targets; 64];

/// ナイトの移動差分。
const KNIGHT_OFFSETS: [Coord; 8] = [
    Coord::new(1, 2),
    Coord::new(2, 1),
    Coord::new(2, -1),
    Coord::new(1, -2),
    Coord::new(-1, -2),
    Coord::new(-2, -1),
    Coord::new(-2, 1),
    Coord::new(-1, 2),
];

static RAYS: Lazy<RayTable> = Lazy::new(init_rays);
static KNIGHT_TARGETS: Lazy<TargetsTable> = Lazy::new(|| init_targets(&KNIGHT_OFFSETS));
static KING_TARGETS: Lazy<TargetsTable> = Lazy::new(|| {
    let offsets: ArrayVec<Coord, 8> = Direction::iter().map(Direction::offset).collect();
    init_targets(&offsets)
});

/// `origin` から `dir` 方向への半直線を返す。`origin` は盤面内でなければならない。
pub fn ray(origin: Coord, dir: Direction) -> &'static [Coord] {
    &RAYS[origin.index()][usize::from(dir)]
}

/// `origin` にいるナイトの移動先(盤面内のもののみ)を返す。
pub fn knight_targets(origin: Coord) -> &'static [Coord] {
    &KNIGHT_TARGETS[origin.index()]
}

/// `origin` にいるキングの移動先(盤面内のもののみ)を返す。
pub fn king_targets(origin: Coord) -> &'static [Coord] {
    &KING_TARGETS[origin.index()]
}

fn init_rays() -> RayTable {
    let mut table: RayTable = std::array::from_fn(|_| std::array::from_fn(|_| Ray::new()));

    for origin in Coord::iter() {
        for dir in Direction::iter() {
            let ray = &mut table[origin.index()][usize::from(dir)];
            let mut sq = origin + dir.offset();
            while sq.in_range() {
                ray.push(sq);
                sq += dir.offset();
            }
        }
    }

    table
}

fn init_targets(offsets: &[Coord]) -> TargetsTable {
    let mut table: TargetsTable = std::array::from_fn(|_| Targets::new());

    for origin in Coord::iter() {
        table[origin.index()].extend(
            offsets
                .iter()
                .map(|&offset| origin + offset)
                .filter(|sq| sq.in_range()),
        );
    }

    table
}
