//! 駒種ごとの移動候補(分岐)の生成。
//!
//! 分岐とは、起点を含まず移動先までのマスを進行順に並べたもの。
//! 生成は盤面の状態と起点の駒の陣営のみに依存する純粋関数である。
//!
//! 遮りの規則(ポーン以外で共通):
//!
//! * 空きマスと「柔らかい」マス(占有駒が 2 マス以上に重ね合わされている)は空きマスと同様に通過する。
//! * 最初の「固い」マス(占有駒が 1 マスに確定している)で止まる。
//!   そこが敵駒なら取り先として分岐に含め、味方駒なら含めない。

use arrayvec::ArrayVec;

use crate::chess::*;
use crate::error::{Error, Result};
use crate::position::Position;
use crate::rays;

/// 1 つの分岐。
pub type Branch = ArrayVec<Coord, 7>;

/// ある起点からの分岐の配列。どの駒種でも 8 個を超えない。
pub type BranchList = ArrayVec<Branch, 8>;

/// マスの占有状態。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Occupancy {
    Empty,

    /// 占有駒が重ね合わされている。移動を遮らない。
    Soft(Side),

    /// 占有駒が確定している。移動を遮る。
    Solid(Side),
}

/// 指定したマスの占有状態を返す。
pub fn occupancy(pos: &Position, sq: Coord) -> Occupancy {
    match pos.board()[sq] {
        None => Occupancy::Empty,
        Some(id) => {
            let pc = pos.piece(id);
            if pc.state().is_certain() {
                Occupancy::Solid(pc.side())
            } else {
                Occupancy::Soft(pc.side())
            }
        }
    }
}

/// `origin` にいる駒の分岐を全て生成する。`origin` に駒がいなければエラーを返す。
pub fn generate_branches(pos: &Position, origin: Coord) -> Result<BranchList> {
    let id = pos.board()[origin].ok_or(Error::EmptySquare(origin))?;
    let pc = pos.piece(id);

    Ok(generate_branches_for(
        pos,
        origin,
        pc.side(),
        pc.kind(),
        pc.has_moved(),
    ))
}

/// 陣営、駒種、既に動いたかを指定して `origin` からの分岐を生成する。
pub fn generate_branches_for(
    pos: &Position,
    origin: Coord,
    side: Side,
    kind: PieceKind,
    moved: bool,
) -> BranchList {
    let mut branches = BranchList::new();

    match kind {
        PieceKind::Pawn => push_pawn(pos, origin, side, moved, &mut branches),
        PieceKind::Rook => push_sliders(pos, origin, side, Direction::ORTHOGONAL, &mut branches),
        PieceKind::Bishop => push_sliders(pos, origin, side, Direction::DIAGONAL, &mut branches),
        PieceKind::Queen => {
            push_sliders(pos, origin, side, Direction::ORTHOGONAL, &mut branches);
            push_sliders(pos, origin, side, Direction::DIAGONAL, &mut branches);
        }
        PieceKind::Knight => push_leapers(pos, side, rays::knight_targets(origin), &mut branches),
        PieceKind::King => push_leapers(pos, side, rays::king_targets(origin), &mut branches),
    }

    branches
}

/// ポーン: 前方に 1 マス(未移動なら 2 マスまで)。敵味方問わず固いマスで止まり、取りはない。
fn push_pawn(pos: &Position, origin: Coord, side: Side, moved: bool, branches: &mut BranchList) {
    let reach = if moved { 1 } else { 2 };

    let branch: Branch = rays::ray(origin, side.forward())
        .iter()
        .copied()
        .take(reach)
        .take_while(|&sq| !matches!(occupancy(pos, sq), Occupancy::Solid(_)))
        .collect();

    if !branch.is_empty() {
        branches.push(branch);
    }
}

/// 飛び駒: 各方向の半直線を共通の遮り規則で切り詰める。
fn push_sliders(
    pos: &Position,
    origin: Coord,
    side: Side,
    dirs: [Direction; 4],
    branches: &mut BranchList,
) {
    for dir in dirs {
        let mut branch = Branch::new();

        for &sq in rays::ray(origin, dir) {
            match occupancy(pos, sq) {
                Occupancy::Empty | Occupancy::Soft(_) => branch.push(sq),
                Occupancy::Solid(occ_side) => {
                    if occ_side != side {
                        branch.push(sq);
                    }
                    break;
                }
            }
        }

        if !branch.is_empty() {
            branches.push(branch);
        }
    }
}

/// 跳び駒: 移動先ごとに長さ 1 の分岐を作る。確定した味方駒のマスには行けない。
fn push_leapers(pos: &Position, side: Side, targets: &[Coord], branches: &mut BranchList) {
    for &sq in targets {
        if occupancy(pos, sq) != Occupancy::Solid(side) {
            branches.push(Branch::from_iter([sq]));
        }
    }
}

/// 選択された分岐たちが `origin` から指せるものかどうか検査する。
///
/// 選択は 1 つ以上なければならず、各選択は空でなく、生成された分岐のいずれかの先頭部分でなければならない。
pub fn validate_selection(pos: &Position, origin: Coord, selections: &[Branch]) -> Result<()> {
    if selections.is_empty() {
        return Err(Error::InvalidBranchSelection(
            "no branch selected".to_owned(),
        ));
    }

    let branches = generate_branches(pos, origin)?;

    for sel in selections {
        if sel.is_empty() {
            return Err(Error::InvalidBranchSelection("empty branch".to_owned()));
        }
        if !branches.iter().any(|b| b.starts_with(sel)) {
            return Err(Error::InvalidBranchSelection(format!(
                "{} -> {} is not a move of this piece",
                origin,
                format_branch(sel)
            )));
        }
    }

    Ok(())
}

/// `origin` から `dest` へ至る分岐(生成された分岐の `dest` までの先頭部分)を返す。
pub fn resolve_destination(pos: &Position, origin: Coord, dest: Coord) -> Result<Branch> {
    let branches = generate_branches(pos, origin)?;

    branches
        .iter()
        .find_map(|b| {
            b.iter()
                .position(|&sq| sq == dest)
                .map(|i| b[..=i].iter().copied().collect())
        })
        .ok_or_else(|| {
            Error::InvalidBranchSelection(format!("{} cannot reach {}", origin, dest))
        })
}

/// 分岐を "E3-E4" のような文字列にする。
pub fn format_branch(branch: &[Coord]) -> String {
    branch
        .iter()
        .map(|sq| sq.to_string())
        .collect::<Vec<_>>()
        .join("-")
}
