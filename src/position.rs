//! 局面。占有盤面と全ての駒を所有し、指し手(重ね合わせの分割)と収縮による駒取りを処理する。

use crate::board::Board;
use crate::chess::*;
use crate::error::{Error, Result};
use crate::movegen::{self, Branch, BranchList};
use crate::mylog::*;
use crate::piece::{Piece, PieceId};
use crate::random::RandomSource;
use crate::superposition::{Collapse, Superposition, PROBABILITY_EPSILON};

/// 初期配置。`layout[rank][file]` で、rank 0 が 1 段目。
pub type Layout = [[Option<(Side, PieceKind)>; 8]; 8];

/// 通常のチェスの初期配置を返す。
pub fn standard_layout() -> Layout {
    use PieceKind::*;

    const BACK_RANK: [PieceKind; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

    let mut layout: Layout = [[None; 8]; 8];
    for (file, kind) in BACK_RANK.into_iter().enumerate() {
        layout[0][file] = Some((WHITE, kind));
        layout[1][file] = Some((WHITE, Pawn));
        layout[6][file] = Some((BLACK, Pawn));
        layout[7][file] = Some((BLACK, kind));
    }

    layout
}

/// 収縮が分岐に与えた影響。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CollapseEffect {
    /// 駒が実在し、取られた。分岐はそこに着地する。
    Captured,

    /// 駒は実在しなかった。分岐はそのマスを素通りする。
    PassedThrough,

    /// 駒は実在せず、最後の位置を失って盤上から消えた。分岐はそのマスを素通りする。
    Eliminated,
}

/// 指し手処理中に起きた 1 回の収縮。
#[derive(Clone, Debug, PartialEq)]
pub struct CollapseEvent {
    branch: usize,
    occupant: PieceId,
    collapse: Collapse,
    effect: CollapseEffect,
}

impl CollapseEvent {
    /// 収縮を引き起こした分岐のインデックスを返す。
    pub fn branch(&self) -> usize {
        self.branch
    }

    /// 収縮させられた駒を返す。
    pub fn occupant(&self) -> PieceId {
        self.occupant
    }

    /// 収縮の詳細を返す。
    pub fn collapse(&self) -> &Collapse {
        &self.collapse
    }

    /// 分岐への影響を返す。
    pub fn effect(&self) -> CollapseEffect {
        self.effect
    }
}

/// 1 つの分岐の着地結果。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landing {
    square: Coord,
    mass: f64,
    captured: Option<PieceId>,
}

impl Landing {
    /// 着地したマスを返す。
    pub fn square(&self) -> Coord {
        self.square
    }

    /// 着地点に加算された確率を返す。
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// この分岐で取った駒を返す。
    pub fn captured(&self) -> Option<PieceId> {
        self.captured
    }
}

/// 確定した指し手の記録。
#[derive(Clone, Debug, PartialEq)]
pub struct MoveRecord {
    piece: PieceId,
    origin: Coord,
    probability: f64, // 起点が持っていた確率
    landings: Vec<Landing>,
    events: Vec<CollapseEvent>,
}

impl MoveRecord {
    /// 動いた駒を返す。
    pub fn piece(&self) -> PieceId {
        self.piece
    }

    /// 起点を返す。
    pub fn origin(&self) -> Coord {
        self.origin
    }

    /// 起点が持っていた確率(分岐たちに分配された総量)を返す。
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// 分岐ごとの着地結果を選択順に返す。
    pub fn landings(&self) -> &[Landing] {
        &self.landings
    }

    /// 起きた収縮を発生順に返す。
    pub fn events(&self) -> &[CollapseEvent] {
        &self.events
    }

    /// この指し手で取った駒を列挙する。
    pub fn captures(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.landings.iter().filter_map(|l| l.captured)
    }
}

/// 局面。
#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
    pieces: Vec<Piece>,
}

impl Position {
    /// 駒のない局面を返す。
    pub fn empty() -> Self {
        Self {
            board: Board::empty(),
            pieces: vec![],
        }
    }

    /// 通常のチェスの初期局面を返す。
    pub fn startpos() -> Self {
        Self::from_layout(&standard_layout())
    }

    /// 初期配置から局面を作る。全ての駒は配置マスに確率 1 で置かれる。
    pub fn from_layout(layout: &Layout) -> Self {
        let mut this = Self::empty();

        for sq in Coord::iter() {
            if let Some((side, kind)) = layout[sq.rank() as usize][sq.file() as usize] {
                this.place(side, kind, sq);
            }
        }

        this
    }

    /// 駒を 1 つ作り、`sq` に確率 1 で置く。`sq` は盤面内の空きマスでなければならない。
    pub fn place(&mut self, side: Side, kind: PieceKind, sq: Coord) -> PieceId {
        assert!(self.board[sq].is_none(), "square {} is occupied", sq);

        let id = PieceId::new(self.pieces.len());
        let mut pc = Piece::new(side, kind);
        pc.place(sq);

        self.pieces.push(pc);
        self.board[sq] = Some(id);

        id
    }

    /// 占有盤面への参照を返す。
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 駒への参照を返す。
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[usize::from(id)]
    }

    fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.pieces[usize::from(id)]
    }

    /// 全ての駒(取られた駒も含む)を列挙する。
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        self.pieces
            .iter()
            .enumerate()
            .map(|(i, pc)| (PieceId::new(i), pc))
    }

    /// 指定したマスにいる駒を返す。
    pub fn piece_at(&self, sq: Coord) -> Option<(PieceId, &Piece)> {
        self.board[sq].map(|id| (id, self.piece(id)))
    }

    /// 指定したマスにいる駒の確率分布を返す。
    pub fn distribution_at(&self, sq: Coord) -> Result<&Superposition> {
        self.piece_at(sq)
            .map(|(_, pc)| pc.state())
            .ok_or(Error::EmptySquare(sq))
    }

    /// 指定したマスにいる駒の分岐を全て返す。
    pub fn candidate_branches(&self, origin: Coord) -> Result<BranchList> {
        movegen::generate_branches(self, origin)
    }

    /// 駒 `id` の分布に含まれる各マスを起点とした分岐を、マスのインデックス順に返す。
    ///
    /// 取られた駒は空を返す。
    pub fn candidate_branches_all(&self, id: PieceId) -> Vec<(Coord, BranchList)> {
        let pc = self.piece(id);
        if pc.is_captured() {
            return vec![];
        }

        pc.state()
            .to_sorted_vec()
            .into_iter()
            .map(|(sq, _)| {
                let branches =
                    movegen::generate_branches_for(self, sq, pc.side(), pc.kind(), pc.has_moved());
                (sq, branches)
            })
            .collect()
    }

    /// 指定した陣営のキングが取られているかどうかを返す。
    pub fn king_captured(&self, side: Side) -> bool {
        self.pieces
            .iter()
            .any(|pc| pc.side() == side && pc.kind() == PieceKind::King && pc.is_captured())
    }

    /// 不変条件を満たしているかどうかを返す。
    ///
    /// * 盤上の各駒は、自身の分布にそのマスを含む。
    /// * 盤上にいる各駒の分布の各マスは、盤面上でその駒を指している。
    /// * 盤上にいる各駒の確率の合計は 1 である。
    pub fn is_consistent(&self) -> bool {
        let grid_ok = self.board.occupied().all(|(sq, id)| {
            let pc = self.piece(id);
            !pc.is_captured() && pc.state().contains(sq)
        });

        let pieces_ok = self
            .pieces()
            .filter(|(_, pc)| !pc.is_captured())
            .all(|(id, pc)| {
                (pc.state().total() - 1.0).abs() < PROBABILITY_EPSILON
                    && pc.state().iter().all(|(sq, _)| self.board[sq] == Some(id))
            });

        grid_ok && pieces_ok
    }

    /// `origin` にいる駒を、選択された分岐たちに沿って動かす。
    ///
    /// 起点の確率 `p` を分岐数 `N` で等分し、各分岐の着地点に `p / N` ずつ加算する。
    /// 各分岐は進行順にマスを辿り、
    ///
    /// * 空きマス(または動かしている駒自身のマス)なら着地点をそこまで進める。
    /// * 他の駒がいれば、その駒をそのマスについて収縮させる。
    ///   - 実在すれば陣営を問わず取って着地し、そこで止まる。
    ///   - 実在しなければそのマスを素通りして先へ進む(着地点は進めない)。
    ///
    /// 生成時には固いマスの先は分岐に含まれないが、実行時には実在しなかった駒の先へ進み続ける。
    /// 選択は `movegen::validate_selection()` で検査される。
    pub fn do_move<R>(
        &mut self,
        origin: Coord,
        selections: &[Branch],
        rng: &mut R,
    ) -> Result<MoveRecord>
    where
        R: RandomSource + ?Sized,
    {
        movegen::validate_selection(self, origin, selections)?;

        let id = self.board[origin].ok_or(Error::EmptySquare(origin))?;

        let probability = self.piece_mut(id).state_mut().take(origin)?;
        self.board[origin] = None;

        log_move_start(self.piece(id), origin, probability, selections);

        let mass = probability / selections.len() as f64;
        let mut landings = Vec::with_capacity(selections.len());
        let mut events = vec![];

        for (idx, sel) in selections.iter().enumerate() {
            let mut landing = origin;
            let mut captured = None;

            for &sq in sel {
                let occ = match self.board[sq] {
                    None => {
                        landing = sq;
                        continue;
                    }
                    Some(occ) if occ == id => {
                        landing = sq;
                        continue;
                    }
                    Some(occ) => occ,
                };

                let collapse = self.resolve_collapse(occ, sq, rng)?;
                log_collapse(self.piece(occ), &collapse);

                let effect = if collapse.materialized() {
                    self.piece_mut(occ).finalize_capture()?;
                    log_capture(self.piece(occ), sq);
                    CollapseEffect::Captured
                } else if self.piece(occ).is_captured() {
                    log_eliminated(self.piece(occ));
                    CollapseEffect::Eliminated
                } else {
                    CollapseEffect::PassedThrough
                };

                events.push(CollapseEvent {
                    branch: idx,
                    occupant: occ,
                    collapse,
                    effect,
                });

                match effect {
                    CollapseEffect::Captured => {
                        landing = sq;
                        captured = Some(occ);
                        break;
                    }
                    CollapseEffect::PassedThrough | CollapseEffect::Eliminated => {}
                }
            }

            self.piece_mut(id).state_mut().add(landing, mass);
            self.board[landing] = Some(id);
            log_landing(idx, landing, mass);

            landings.push(Landing {
                square: landing,
                mass,
                captured,
            });
        }

        self.piece_mut(id).mark_moved();

        log_move_end(self.piece(id));
        debug_assert!(self.is_consistent());

        Ok(MoveRecord {
            piece: id,
            origin,
            probability,
            landings,
            events,
        })
    }

    /// 駒 `occ` をマス `sq` について収縮させ、盤面を分布に合わせて更新する。
    ///
    /// 分布から取り除かれたマスは盤面からも取り除く。最後の位置を失った駒は捕獲扱いにする。
    /// 実在した場合の捕獲の確定は呼び出し側で行う。
    fn resolve_collapse<R>(&mut self, occ: PieceId, sq: Coord, rng: &mut R) -> Result<Collapse>
    where
        R: RandomSource + ?Sized,
    {
        let collapse = self.piece_mut(occ).state_mut().collapse(sq, rng)?;

        for &d in collapse.discarded() {
            if self.board[d] == Some(occ) {
                self.board[d] = None;
            }
        }

        if !collapse.materialized() && self.piece(occ).state().is_empty() {
            self.piece_mut(occ).mark_vanished();
        }

        Ok(collapse)
    }
}

impl std::fmt::Display for Position {
    /// 8 段目から順に盤面を表示する。白は大文字、黒は小文字、重ね合わされた駒には `?` を付ける。
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                match self.piece_at(Coord::new(file, rank)) {
                    None => f.write_str(" . ")?,
                    Some((_, pc)) => {
                        let marker = if pc.state().is_certain() { ' ' } else { '?' };
                        write!(f, " {}{}", pc.letter(), marker)?;
                    }
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "   A  B  C  D  E  F  G  H")?;

        Ok(())
    }
}
