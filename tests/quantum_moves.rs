#[allow(unused_imports)]
use pretty_assertions::{assert_eq, assert_ne};

use qchess::*;

const EPS: f64 = 1e-9;

fn branch(sqs: &[Coord]) -> Branch {
    sqs.iter().copied().collect()
}

fn assert_distribution(pos: &Position, id: PieceId, expected: &[(Coord, f64)]) {
    let actual = pos.piece(id).state().to_sorted_vec();
    let mut expected = expected.to_vec();
    expected.sort_unstable_by_key(|&(sq, _)| sq.index());

    assert_eq!(
        actual.iter().map(|&(sq, _)| sq).collect::<Vec<_>>(),
        expected.iter().map(|&(sq, _)| sq).collect::<Vec<_>>()
    );
    for (&(sq, p), &(_, q)) in actual.iter().zip(&expected) {
        assert!((p - q).abs() < EPS, "{}: {} != {}", sq, p, q);
    }
}

/// 黒ルーク A8 を {A5: 0.5, D8: 0.5} に分裂させた局面と、白ルーク A1 を返す。
fn split_black_rook() -> (Position, PieceId, PieceId) {
    let mut pos = Position::empty();
    let white = pos.place(WHITE, PieceKind::Rook, A1);
    let black = pos.place(BLACK, PieceKind::Rook, A8);

    pos.do_move(
        A8,
        &[branch(&[A7, A6, A5]), branch(&[B8, C8, D8])],
        &mut FixedRandom::new(0.0),
    )
    .unwrap();
    assert_distribution(&pos, black, &[(A5, 0.5), (D8, 0.5)]);

    (pos, white, black)
}

#[test]
fn test_pawn_double_step_no_split() {
    let mut pos = Position::empty();
    let pawn = pos.place(WHITE, PieceKind::Pawn, E2);

    let branches = pos.candidate_branches(E2).unwrap();
    assert_eq!(branches.as_slice(), &[branch(&[E3, E4])]);

    let record = pos
        .do_move(E2, &branches[..1], &mut FixedRandom::new(0.0))
        .unwrap();

    assert_eq!(pos.piece(pawn).state(), &Superposition::certain(E4));
    assert_eq!(pos.board()[E2], None);
    assert_eq!(pos.board()[E4], Some(pawn));
    assert_eq!(record.probability(), 1.0);
    assert!(record.events().is_empty());
    assert!(pos.is_consistent());
}

#[test]
fn test_queen_split() {
    let mut pos = Position::empty();
    let queen = pos.place(WHITE, PieceKind::Queen, D1);

    pos.do_move(
        D1,
        &[branch(&[D2, D3, D4]), branch(&[C2, B3, A4])],
        &mut FixedRandom::new(0.0),
    )
    .unwrap();

    assert_distribution(&pos, queen, &[(D4, 0.5), (A4, 0.5)]);
    assert_eq!(pos.board()[D4], Some(queen));
    assert_eq!(pos.board()[A4], Some(queen));
    assert_eq!(pos.board()[D1], None);
    assert_eq!(pos.piece(queen).status(), PieceStatus::Superposed);
    assert!(pos.is_consistent());
}

#[test]
fn test_superposed_piece_moves_one_branch() {
    let mut pos = Position::empty();
    let queen = pos.place(WHITE, PieceKind::Queen, D1);
    let mut rng = FixedRandom::new(0.0);

    pos.do_move(D1, &[branch(&[D2, D3, D4]), branch(&[C2, B3, A4])], &mut rng)
        .unwrap();
    pos.do_move(D4, &[branch(&[D5, D6]), branch(&[E4, F4])], &mut rng)
        .unwrap();

    assert_distribution(&pos, queen, &[(A4, 0.5), (D6, 0.25), (F4, 0.25)]);
    assert!(pos.is_consistent());
}

#[test]
fn test_superposed_piece_recombines_through_own_square() {
    let mut pos = Position::empty();
    let queen = pos.place(WHITE, PieceKind::Queen, D1);
    let mut rng = FixedRandom::new(0.0);

    pos.do_move(D1, &[branch(&[D2, D3, D4]), branch(&[C2, B3, A4])], &mut rng)
        .unwrap();

    // 自分自身が重ね合わされているマスは遮りにならず、収縮も起きない。
    let branches = pos.candidate_branches(A4).unwrap();
    assert!(branches.contains(&branch(&[B4, C4, D4, E4, F4, G4, H4])));

    let record = pos
        .do_move(A4, &[branch(&[B4, C4, D4])], &mut rng)
        .unwrap();

    assert!(record.events().is_empty());
    assert_eq!(pos.piece(queen).state(), &Superposition::certain(D4));
    assert_eq!(pos.piece(queen).status(), PieceStatus::Collapsed);
    assert!(pos.is_consistent());
}

#[test]
fn test_soft_occupant_does_not_block_generation() {
    let (pos, _, _) = split_black_rook();

    let branches = pos.candidate_branches(A1).unwrap();
    assert!(branches.contains(&branch(&[A2, A3, A4, A5, A6, A7, A8])));
}

#[test]
fn test_capture_of_soft_occupant() {
    let (mut pos, white, black) = split_black_rook();

    let record = pos
        .do_move(A1, &[branch(&[A2, A3, A4, A5])], &mut FixedRandom::new(0.25))
        .unwrap();

    assert_eq!(record.events().len(), 1);
    let event = &record.events()[0];
    assert_eq!(event.occupant(), black);
    assert_eq!(event.effect(), CollapseEffect::Captured);
    assert!(event.collapse().materialized());
    assert_eq!(event.collapse().probability(), 0.5);

    assert_eq!(record.captures().collect::<Vec<_>>(), vec![black]);
    assert_eq!(pos.piece(white).state(), &Superposition::certain(A5));
    assert_eq!(pos.piece(black).status(), PieceStatus::Captured);
    assert!(pos.piece(black).state().is_empty());

    // 捨てられた分岐のマスも盤面から消える。
    assert_eq!(pos.board()[D8], None);
    assert_eq!(pos.board()[A5], Some(white));
    assert!(pos.is_consistent());
}

#[test]
fn test_collapse_fixed_zero_materializes() {
    let (mut pos, _, black) = split_black_rook();

    let record = pos
        .do_move(A1, &[branch(&[A2, A3, A4, A5])], &mut FixedRandom::new(0.0))
        .unwrap();

    assert!(record.events()[0].collapse().materialized());
    assert!(pos.piece(black).is_captured());
}

#[test]
fn test_collapse_high_draw_does_not_materialize() {
    let (mut pos, _, black) = split_black_rook();

    let record = pos
        .do_move(
            A1,
            &[branch(&[A2, A3, A4, A5])],
            &mut FixedRandom::new(0.999999),
        )
        .unwrap();

    let event = &record.events()[0];
    assert!(!event.collapse().materialized());
    assert_eq!(event.effect(), CollapseEffect::PassedThrough);

    assert_eq!(pos.piece(black).state(), &Superposition::certain(D8));
    assert!((pos.piece(black).state().total() - 1.0).abs() < EPS);
    assert!(pos.is_consistent());
}

#[test]
fn test_walk_continues_past_vanished_occupant() {
    // 実在しなかった駒のマスで分岐は止まらず、その先まで進む。
    let (mut pos, white, black) = split_black_rook();

    let record = pos
        .do_move(
            A1,
            &[branch(&[A2, A3, A4, A5, A6, A7, A8])],
            &mut FixedRandom::new(0.75),
        )
        .unwrap();

    assert_eq!(record.landings()[0].square(), A8);
    assert_eq!(record.landings()[0].captured(), None);
    assert_eq!(pos.piece(white).state(), &Superposition::certain(A8));
    assert_eq!(pos.piece(black).state(), &Superposition::certain(D8));
    assert_eq!(pos.board()[A5], None);
    assert!(pos.is_consistent());
}

#[test]
fn test_vanished_square_is_not_a_landing() {
    // 分岐の最後のマスの駒が実在しなかった場合、着地点はその手前に留まる。
    let (mut pos, white, _) = split_black_rook();

    let record = pos
        .do_move(A1, &[branch(&[A2, A3, A4, A5])], &mut FixedRandom::new(0.75))
        .unwrap();

    assert_eq!(record.landings()[0].square(), A4);
    assert_eq!(pos.piece(white).state(), &Superposition::certain(A4));
    assert_eq!(pos.board()[A5], None);
    assert!(pos.is_consistent());
}

#[test]
fn test_materialized_friend_is_captured() {
    // 実在が確定した駒は陣営を問わず取られ、分岐はそのマスに着地する。
    let mut pos = Position::empty();
    let rook = pos.place(WHITE, PieceKind::Rook, A1);
    let queen = pos.place(WHITE, PieceKind::Queen, D1);
    let mut rng = SequenceRandom::new([0.25]);

    pos.do_move(D1, &[branch(&[C2, B3, A4]), branch(&[D2, D3, D4])], &mut rng)
        .unwrap();
    assert_eq!(rng.draws(), 0);

    let record = pos
        .do_move(A1, &[branch(&[A2, A3, A4, A5])], &mut rng)
        .unwrap();

    assert_eq!(record.events()[0].effect(), CollapseEffect::Captured);
    assert_eq!(record.landings()[0].square(), A4);
    assert_eq!(record.landings()[0].captured(), Some(queen));
    assert_eq!(pos.piece(rook).state(), &Superposition::certain(A4));
    assert!(pos.piece(queen).is_captured());
    assert!(pos.piece(queen).state().is_empty());
    assert_eq!(pos.board()[A4], Some(rook));
    assert_eq!(pos.board()[D4], None);
    assert!(pos.is_consistent());
}

#[test]
fn test_vanished_friend_lets_branch_through() {
    let mut pos = Position::empty();
    let rook = pos.place(WHITE, PieceKind::Rook, A1);
    let queen = pos.place(WHITE, PieceKind::Queen, D1);
    let mut rng = FixedRandom::new(0.75);

    pos.do_move(D1, &[branch(&[C2, B3, A4]), branch(&[D2, D3, D4])], &mut rng)
        .unwrap();
    pos.do_move(A1, &[branch(&[A2, A3, A4, A5, A6, A7, A8])], &mut rng)
        .unwrap();

    assert_eq!(pos.piece(rook).state(), &Superposition::certain(A8));
    assert_eq!(pos.piece(queen).state(), &Superposition::certain(D4));
    assert!(pos.is_consistent());
}

#[test]
fn test_split_capturing_two_solid_pieces() {
    let mut pos = Position::empty();
    let queen = pos.place(WHITE, PieceKind::Queen, D1);
    let p1 = pos.place(BLACK, PieceKind::Pawn, D7);
    let p2 = pos.place(BLACK, PieceKind::Pawn, A4);

    let branches = pos.candidate_branches(D1).unwrap();
    let up = branch(&[D2, D3, D4, D5, D6, D7]);
    let diag = branch(&[C2, B3, A4]);
    assert!(branches.contains(&up));
    assert!(branches.contains(&diag));

    // 確定した駒は乱数によらず必ず実在する。
    let record = pos
        .do_move(D1, &[up, diag], &mut FixedRandom::new(0.999999))
        .unwrap();

    assert_eq!(record.captures().collect::<Vec<_>>(), vec![p1, p2]);
    assert_distribution(&pos, queen, &[(D7, 0.5), (A4, 0.5)]);
    assert!(pos.piece(p1).is_captured());
    assert!(pos.piece(p2).is_captured());
    assert!(pos.is_consistent());
}

#[test]
fn test_move_sequence_from_startpos() {
    let mut pos = Position::startpos();
    let mut rng = SequenceRandom::new([0.1, 0.9]);

    // 白: ナイト G1 を F3 と H3 に分裂。
    let f3 = resolve_destination(&pos, G1, F3).unwrap();
    let h3 = resolve_destination(&pos, G1, H3).unwrap();
    let record = pos.do_move(G1, &[f3, h3], &mut rng).unwrap();
    let knight = record.piece();
    assert_distribution(&pos, knight, &[(F3, 0.5), (H3, 0.5)]);

    // 黒: E7 のポーンを 2 マス進める。
    let e5 = resolve_destination(&pos, E7, E5).unwrap();
    pos.do_move(E7, &[e5], &mut rng).unwrap();

    // 白: F3 の重ね合わせから E5 を取りに行く(確定したポーンなので必ず取れる)。
    let capture = resolve_destination(&pos, F3, E5).unwrap();
    let record = pos.do_move(F3, &[capture], &mut rng).unwrap();
    assert_eq!(record.captures().count(), 1);
    assert_distribution(&pos, knight, &[(E5, 0.5), (H3, 0.5)]);

    assert!(pos.is_consistent());
    assert_eq!(pos.pieces().filter(|(_, pc)| pc.is_captured()).count(), 1);
}

#[test]
fn test_conservation_over_random_playout() {
    use rand::rngs::StdRng;
    use rand::{Rng as _, SeedableRng as _};

    for seed in 0..20 {
        let mut pos = Position::startpos();
        let mut collapse_rng = StdRandom::from_seed(seed);
        let mut chooser = StdRng::seed_from_u64(seed);
        let mut side = WHITE;

        for _ in 0..60 {
            if pos.king_captured(WHITE) || pos.king_captured(BLACK) {
                break;
            }

            let movable: Vec<(Coord, BranchList)> = pos
                .board()
                .occupied()
                .filter(|&(_, id)| pos.piece(id).side() == side)
                .map(|(sq, _)| (sq, pos.candidate_branches(sq).unwrap()))
                .filter(|(_, branches)| !branches.is_empty())
                .collect();
            if movable.is_empty() {
                break;
            }

            let (origin, branches) = &movable[chooser.gen_range(0..movable.len())];
            let n = chooser.gen_range(1..=branches.len().min(3));
            let selections: Vec<Branch> = branches
                .iter()
                .take(n)
                .map(|b| {
                    let len = chooser.gen_range(1..=b.len());
                    b[..len].iter().copied().collect()
                })
                .collect();

            let before = pos.distribution_at(*origin).unwrap().probability(*origin);
            let record = pos.do_move(*origin, &selections, &mut collapse_rng).unwrap();

            let added: f64 = record.landings().iter().map(|l| l.mass()).sum();
            assert!((added - before.unwrap()).abs() < EPS);
            assert!(pos.is_consistent(), "seed {}:\n{}", seed, pos);

            side = side.inv();
        }
    }
}
