mod common;

use common::{board_from_diagram, destinations, game_from_diagram};
use rust_janggi_engine::engine::{COLS, col_of, row_of};
use rust_janggi_engine::movegen::{self, in_palace, palace_rows};
use rust_janggi_engine::{
    Board, Game, GameState, MoveError, Piece, PieceKind, RuleConfig, Side, StalemateRule, sq,
};

const INITIAL: &str = "
    r e h a . a e h r
    . . . . k . . . .
    . c . . . . . c .
    p . p . p . p . p
    . . . . . . . . .
    . . . . . . . . .
    P . P . P . P . P
    . C . . . . . C .
    . . . . K . . . .
    R E H A . A E H R
";

// BLUE general on d10; RED chariots on i9 and a5
const MATE_IN_ONE: &str = "
    . . . k . . . . .
    . . . . . . . . R
    . . . . . . . . .
    . . . . . . . . .
    . . . . . . . . .
    R . . . . . . . .
    . . . . . . . . .
    . . . . . . . . .
    . . . . K . . . .
    . . . . . . . . .
";

const STALEMATE_IN_ONE: &str = "
    . . . k . . . . .
    . . . . . . . . R
    . . . . . . . . .
    . . . . . . . . .
    . . . . . R . . .
    . . . . . . . . .
    . . . . . . . . .
    . . . . . . . . .
    . . . . K . . . .
    . . . . . . . . .
";

const PINNED_HORSE: &str = "
    . . . . . . . . .
    . . . . k . . . .
    . . . . . . . . .
    . . . . r . . . .
    . . . . . . . . .
    . . . . . . . . .
    . . . . . . . . .
    . . . . H . . . .
    . . . . K . . . .
    . . . . . . . . .
";

const CANNONS: &str = "
    h . . . . . . . .
    . . . . k . . . .
    c . . . . . . . .
    . . . . . . . . .
    C . P . c . . . .
    . . . . . . . . .
    . . . . . . . . .
    . . . . . . . . .
    . . . . K . . . .
    . . . . . . . . .
";

fn assert_legal_subset_of_pseudo(game: &mut Game, side: Side) {
    let pseudo = game.pseudo_moves(side);
    for mv in game.legal_moves(side) {
        assert!(pseudo.contains(&mv), "{} is not a pseudo move", mv);
        let mut after = game.board().clone();
        after.set_occupant(mv.from, None);
        after.set_occupant(mv.to, Some(mv.piece));
        assert!(
            !movegen::is_in_check(&after, side),
            "{} leaves {} in check",
            mv,
            side
        );
    }
}

#[test]
fn diagram_matches_initial_layout() {
    assert_eq!(board_from_diagram(INITIAL), Board::initial());
}

#[test]
fn soldier_steps_forward_from_the_opening() {
    let mut game = Game::new();
    assert!(game.make_move(sq(3, 0), sq(4, 0)));
    assert_eq!(game.occupant(sq(3, 0)), None);
    assert_eq!(
        game.occupant(sq(4, 0)),
        Some(Piece::new(Side::Red, PieceKind::Soldier))
    );
    assert_eq!(game.turn(), Side::Blue);
    assert_eq!(game.state(), GameState::Unfinished);
}

#[test]
fn horse_with_blocked_leg_is_absent_from_pseudo_moves() {
    let mut board = Board::empty();
    board.set_occupant(sq(1, 4), Piece::from_char('K'));
    board.set_occupant(sq(8, 4), Piece::from_char('k'));
    board.set_occupant(sq(4, 4), Piece::from_char('H'));
    board.set_occupant(sq(4, 5), Piece::from_char('P'));
    let game = Game::from_board(board, Side::Red, RuleConfig::default());

    let horse: Vec<_> = game
        .pseudo_moves(Side::Red)
        .into_iter()
        .filter(|m| m.from == sq(4, 4))
        .collect();
    let to = destinations(&horse);
    assert_eq!(to.len(), 6);
    assert!(!to.contains(&sq(3, 6)));
    assert!(!to.contains(&sq(5, 6)));
}

#[test]
fn opening_horses_only_have_the_open_leg() {
    let game = Game::new();
    let from_c1: Vec<_> = game
        .pseudo_moves(Side::Red)
        .into_iter()
        .filter(|m| m.from == sq(0, 2))
        .collect();
    assert_eq!(destinations(&from_c1), vec![sq(2, 3)]);
}

#[test]
fn cannons_need_a_non_cannon_screen_and_never_take_cannons() {
    let game = game_from_diagram(CANNONS, Side::Red);
    let from = |side: Side, at| {
        let moves: Vec<_> = game
            .pseudo_moves(side)
            .into_iter()
            .filter(|m| m.from == at)
            .collect();
        destinations(&moves)
    };

    // screen is a soldier; the BLUE cannon behind it is not capturable
    assert_eq!(from(Side::Red, sq(5, 0)), vec![sq(5, 3)]);
    // own generals serve as screens on the e-file
    assert_eq!(from(Side::Blue, sq(5, 4)), vec![sq(0, 4), sq(5, 1), sq(9, 4)]);
    // the only screens are cannons
    assert!(from(Side::Blue, sq(7, 0)).is_empty());

    for side in [Side::Red, Side::Blue] {
        for mv in game.pseudo_moves(side) {
            if mv.piece.kind == PieceKind::Cannon {
                assert_ne!(mv.captured.map(|p| p.kind), Some(PieceKind::Cannon));
            }
        }
    }
}

#[test]
fn generals_stay_inside_their_palace() {
    for side in [Side::Red, Side::Blue] {
        for row in palace_rows(side) {
            for col in 3..=5 {
                let mut board = Board::empty();
                let general = Piece::new(side, PieceKind::General);
                let other = Piece::new(side.opponent(), PieceKind::General);
                let other_at = match side {
                    Side::Red => sq(8, 4),
                    Side::Blue => sq(1, 4),
                };
                board.set_occupant(sq(row, col), Some(general));
                board.set_occupant(other_at, Some(other));
                let mut game = Game::from_board(board, side, RuleConfig::default());

                let moves = game.legal_moves_from(sq(row, col));
                assert!(!moves.is_empty());
                for mv in moves {
                    assert!(
                        in_palace(mv.to, side),
                        "{} general left the palace: {}",
                        side,
                        mv
                    );
                }
            }
        }
    }
}

#[test]
fn chariot_mate_ends_the_game() {
    let mut game = game_from_diagram(MATE_IN_ONE, Side::Red);
    assert_eq!(game.state(), GameState::Unfinished);

    assert!(game.make_move(sq(4, 0), sq(9, 0)));
    assert!(game.check_flag(Side::Blue));
    assert!(game.legal_moves(Side::Blue).is_empty());
    assert_eq!(game.state(), GameState::RedWon);
    assert_eq!(game.state().to_string(), "RED_WON");

    // nothing more can be played
    assert_eq!(
        game.try_make_move(sq(9, 3), sq(8, 3)),
        Err(MoveError::GameOver(GameState::RedWon))
    );
    assert!(!game.pass_turn());
    let mate = game.last_move();
    assert!(!game.apply_move(mate.unwrap_or_else(|| panic!("mating move recorded"))));

    // taking the mate back reopens the game
    game.undo();
    assert_eq!(game.state(), GameState::Unfinished);
    assert_eq!(game.turn(), Side::Red);
    assert!(!game.check_flag(Side::Blue));
}

#[test]
fn stalemate_continues_by_default() {
    let mut game = game_from_diagram(STALEMATE_IN_ONE, Side::Red);
    assert!(game.make_move(sq(5, 5), sq(5, 4)));
    assert!(!game.check_flag(Side::Blue));
    assert!(game.current_legal_moves().is_empty());
    assert_eq!(game.state(), GameState::Unfinished);

    // the stuck side passes
    assert!(game.pass_turn());
    assert_eq!(game.turn(), Side::Red);
}

#[test]
fn stalemate_can_be_scored_as_a_draw() {
    let config = RuleConfig::default().with_stalemate(StalemateRule::Draw);
    let mut game = Game::from_board(board_from_diagram(STALEMATE_IN_ONE), Side::Red, config);
    assert!(game.make_move(sq(5, 5), sq(5, 4)));
    assert_eq!(game.state(), GameState::Draw);
    assert_eq!(
        game.try_pass(),
        Err(MoveError::GameOver(GameState::Draw))
    );
}

#[test]
fn pinned_piece_has_no_legal_moves() {
    let mut game = game_from_diagram(PINNED_HORSE, Side::Red);
    let pseudo_from_horse = game
        .pseudo_moves(Side::Red)
        .iter()
        .filter(|m| m.from == sq(2, 4))
        .count();
    assert!(pseudo_from_horse > 0);
    assert!(game.legal_moves_from(sq(2, 4)).is_empty());
    assert!(matches!(
        game.try_make_move(sq(2, 4), sq(4, 3)),
        Err(MoveError::Illegal { .. })
    ));
    assert_legal_subset_of_pseudo(&mut game, Side::Red);
    assert_legal_subset_of_pseudo(&mut game, Side::Blue);
}

#[test]
fn legal_moves_are_safe_pseudo_moves_in_the_opening() {
    let mut game = Game::new();
    assert_legal_subset_of_pseudo(&mut game, Side::Red);
    assert_legal_subset_of_pseudo(&mut game, Side::Blue);
}

#[test]
fn opening_move_count_is_mirror_symmetric() {
    let mut game = Game::new();
    let mut mirrored = Game::from_board(Board::initial().mirrored(), Side::Red, RuleConfig::default());

    let flip = |s: usize| sq(row_of(s), COLS - 1 - col_of(s));
    let mut expected: Vec<(usize, usize)> = game
        .current_legal_moves()
        .iter()
        .map(|m| (flip(m.from), flip(m.to)))
        .collect();
    let mut actual: Vec<(usize, usize)> = mirrored
        .current_legal_moves()
        .iter()
        .map(|m| (m.from, m.to))
        .collect();
    expected.sort();
    actual.sort();
    assert!(!actual.is_empty());
    assert_eq!(actual, expected);
}

#[test]
fn square_under_attack_uses_the_opponent() {
    let mut game = game_from_diagram(PINNED_HORSE, Side::Red);
    // BLUE chariot covers the e-file down to the horse
    assert!(game.square_under_attack(sq(3, 4)));
    assert!(!game.square_under_attack(sq(1, 4)));
    assert!(game.is_attacked_by(sq(6, 0), Side::Blue));
    assert!(!game.is_in_check(Side::Red));
}

#[test]
fn reset_restores_the_opening() {
    let mut game = game_from_diagram(MATE_IN_ONE, Side::Red);
    game.make_move(sq(4, 0), sq(9, 0));
    game.reset();
    assert_eq!(game.board(), &Board::initial());
    assert_eq!(game.turn(), Side::Red);
    assert_eq!(game.state(), GameState::Unfinished);
    assert_eq!(game.history_len(), 0);
    assert_eq!(game.position_key(), Game::new().position_key());
}
