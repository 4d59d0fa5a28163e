//! 指し手処理のログ出力。

use log::info;

use crate::chess::Coord;
use crate::movegen::{format_branch, Branch};
use crate::piece::Piece;
use crate::superposition::{Collapse, Superposition};

/// 指し手処理開始ログを出力する。
pub fn log_move_start(pc: &Piece, origin: Coord, probability: f64, selections: &[Branch]) {
    info!(
        "# ------------------------------ {} {} ({:.4}) 指し手開始 ------------------------------",
        pc, origin, probability
    );
    for (i, sel) in selections.iter().enumerate() {
        info!("  分岐 {}: {}", i, format_branch(sel));
    }
}

/// 波動関数の収縮ログを出力する。
pub fn log_collapse(occupant: &Piece, collapse: &Collapse) {
    info!(
        "収縮: {} @ {} (p = {:.4}, r = {:.4}) => {}",
        occupant,
        collapse.square(),
        collapse.probability(),
        collapse.draw(),
        if collapse.materialized() {
            "実在"
        } else {
            "不在"
        }
    );
}

/// 駒取りログを出力する。
pub fn log_capture(captured: &Piece, sq: Coord) {
    info!("駒取り: {} @ {}", captured, sq);
}

/// 収縮失敗で最後の位置を失った駒のログを出力する。
pub fn log_eliminated(pc: &Piece) {
    info!("消滅: {} (全ての位置を失った)", pc);
}

/// 分岐の着地点ログを出力する。
pub fn log_landing(idx: usize, landing: Coord, mass: f64) {
    info!("着地: 分岐 {} -> {} (+{:.4})", idx, landing, mass);
}

/// 指し手処理終了ログを出力する。
pub fn log_move_end(pc: &Piece) {
    info!("指し手終了: {}", pc);
    log_distribution(pc.state());
    info!("");
}

/// 確率分布をログ出力する。
pub fn log_distribution(state: &Superposition) {
    for (sq, p) in state.to_sorted_vec() {
        info!("  {}: {:.4}", sq, p);
    }
}
