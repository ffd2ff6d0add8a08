// Terminal UI for the Janggi engine
// Features: coloured board, palace tint, move highlighting, algebraic squares

pub mod integration;
use crate::engine::{COLS, Game, GameState, Ply, ROWS, Side, Sq, col_of, row_of, sq};
use crate::error::CoordError;
pub use integration::{Command, GameController};

// ============================================================================
// COLOR CODES & STYLING
// ============================================================================

pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const BRIGHT_RED: &str = "\x1b[91m";
    pub const BRIGHT_GREEN: &str = "\x1b[92m";
    pub const BRIGHT_YELLOW: &str = "\x1b[93m";
    pub const BRIGHT_BLUE: &str = "\x1b[94m";
    pub const BRIGHT_MAGENTA: &str = "\x1b[95m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";

    pub const BG_BOARD: &str = "\x1b[48;5;180m"; // Plain point
    pub const BG_PALACE: &str = "\x1b[48;5;137m"; // Palace point
    pub const BG_HIGHLIGHT: &str = "\x1b[48;5;226m"; // Last move
    pub const BG_SELECTED: &str = "\x1b[48;5;117m"; // Destinations of the selected piece
    pub const BG_CHECK: &str = "\x1b[48;5;196m"; // General in check
}

// ============================================================================
// PIECE GLYPHS
// ============================================================================

pub mod symbols {
    use crate::engine::{Piece, PieceKind, Side};

    /// Traditional Hanja face of a piece. RED plays Han, BLUE plays Cho.
    pub fn hanja(piece: Piece) -> char {
        match (piece.side, piece.kind) {
            (Side::Red, PieceKind::General) => '漢',
            (Side::Blue, PieceKind::General) => '楚',
            (_, PieceKind::Guard) => '士',
            (_, PieceKind::Elephant) => '象',
            (_, PieceKind::Horse) => '馬',
            (_, PieceKind::Chariot) => '車',
            (_, PieceKind::Cannon) => '包',
            (Side::Red, PieceKind::Soldier) => '兵',
            (Side::Blue, PieceKind::Soldier) => '卒',
        }
    }

    /// Three terminal columns wide either way (Hanja glyphs are double width).
    pub fn cell_text(piece: Option<Piece>, use_hanja: bool) -> String {
        match piece {
            None => " · ".to_string(),
            Some(p) if use_hanja => format!(" {}", hanja(p)),
            Some(p) => format!(" {} ", p.to_char()),
        }
    }
}

// ============================================================================
// ALGEBRAIC SQUARES
// ============================================================================

/// Column letter `a`-`i` followed by row number `1`-`10`; `a1` is row 0, col 0.
pub fn square_name(s: Sq) -> String {
    let file = (b'a' + col_of(s) as u8) as char;
    format!("{}{}", file, row_of(s) + 1)
}

pub fn parse_square(text: &str) -> Result<Sq, CoordError> {
    let text = text.trim();
    let mut chars = text.chars();
    let file = chars.next().ok_or(CoordError::Empty)?.to_ascii_lowercase();
    if !('a'..='i').contains(&file) {
        return Err(CoordError::BadColumn(file));
    }
    let rank = chars.as_str();
    match rank.parse::<usize>() {
        Ok(n) if (1..=ROWS).contains(&n) => Ok(sq(n - 1, file as usize - 'a' as usize)),
        _ => Err(CoordError::BadRow(rank.to_string())),
    }
}

pub fn format_ply(ply: &Ply) -> String {
    match ply {
        Ply::Move(mv) => {
            let mut s = format!("{} {}-{}", mv.piece, square_name(mv.from), square_name(mv.to));
            if let Some(cap) = mv.captured {
                s.push_str(&format!(" x{}", cap));
            }
            s
        }
        Ply::Pass(side) => format!("{} passes", side),
    }
}

fn side_color(side: Side) -> &'static str {
    match side {
        Side::Red => colors::BRIGHT_RED,
        Side::Blue => colors::BRIGHT_BLUE,
    }
}

// ============================================================================
// BOARD DISPLAY
// ============================================================================

pub struct BoardDisplay {
    pub show_coords: bool,
    pub use_hanja: bool,
    pub use_color: bool,
    pub highlight_squares: Vec<Sq>,
    pub flip_board: bool,
}

impl Default for BoardDisplay {
    fn default() -> Self {
        Self {
            show_coords: true,
            use_hanja: true,
            use_color: true,
            highlight_squares: Vec::new(),
            flip_board: false,
        }
    }
}

impl BoardDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ascii() -> Self {
        Self {
            use_hanja: false,
            ..Self::default()
        }
    }

    pub fn render(&self, game: &Game) {
        if self.use_color {
            print!("\x1b[2J\x1b[H"); // Clear screen and move to top
        }
        print!("{}", self.draw(game));
        println!("{}", self.status_line(game));
    }

    /// The board as text, BLUE at the top unless flipped.
    pub fn draw(&self, game: &Game) -> String {
        use colors::*;

        let board = game.board();
        let last = game.last_move().map(|m| (m.from, m.to));
        let checked: Vec<Sq> = [Side::Red, Side::Blue]
            .into_iter()
            .filter(|&side| game.check_flag(side))
            .filter_map(|side| board.find_general(side))
            .collect();

        let rows: Vec<usize> = if self.flip_board {
            (0..ROWS).collect()
        } else {
            (0..ROWS).rev().collect()
        };

        let mut out = String::new();
        for row in rows {
            if self.show_coords {
                out.push_str(&format!("{:>3} ", row + 1));
            }
            for col in 0..COLS {
                let s = sq(row, col);
                let piece = board.occupant(s);
                let text = symbols::cell_text(piece, self.use_hanja);
                if self.use_color {
                    let bg = self.square_color(s, last, &checked);
                    let fg = piece.map_or(DIM, |p| side_color(p.side));
                    out.push_str(&format!("{}{}{}{}{}", bg, BOLD, fg, text, RESET));
                } else {
                    out.push_str(&text);
                }
            }
            out.push('\n');
        }
        if self.show_coords {
            out.push_str("    ");
            for col in 0..COLS {
                out.push_str(&format!(" {} ", (b'a' + col as u8) as char));
            }
            out.push('\n');
        }
        out
    }

    fn square_color(&self, s: Sq, last: Option<(Sq, Sq)>, checked: &[Sq]) -> &'static str {
        use colors::*;

        if checked.contains(&s) {
            return BG_CHECK;
        }
        if self.highlight_squares.contains(&s) {
            return BG_SELECTED;
        }
        if let Some((from, to)) = last {
            if s == from || s == to {
                return BG_HIGHLIGHT;
            }
        }
        if crate::movegen::palace_of(s).is_some() {
            BG_PALACE
        } else {
            BG_BOARD
        }
    }

    pub fn status_line(&self, game: &Game) -> String {
        let mut line = match game.state() {
            GameState::Unfinished => format!("{} to move", game.turn()),
            state => format!("game over: {}", state),
        };
        line.push_str(&format!(" | ply {}", game.history_len()));
        for side in [Side::Red, Side::Blue] {
            if game.check_flag(side) {
                line.push_str(&format!(" | {} in check", side));
            }
        }
        line
    }

    pub fn print_move_list(&self, plies: &[Ply]) {
        use colors::*;

        if plies.is_empty() {
            println!("{}no moves yet{}", DIM, RESET);
            return;
        }

        println!("{}{}═══ Move History ═══{}", BOLD, BRIGHT_MAGENTA, RESET);
        for (i, pair) in plies.chunks(2).enumerate() {
            print!("{}{}{:>3}. {}{}", BOLD, BRIGHT_YELLOW, i + 1, RESET, format_ply(&pair[0]));
            if let Some(second) = pair.get(1) {
                print!("   {}", format_ply(second));
            }
            println!();
        }
    }

    pub fn show_help(&self) {
        use colors::*;

        let commands = [
            ("<from> <to>", "Move a piece, e.g. b1 c3"),
            ("move <from> <to>", "Same as above"),
            ("moves [sq]", "List legal moves, or highlight one piece's moves"),
            ("pass", "Give up the turn (not while in check)"),
            ("undo", "Take back the last ply"),
            ("history", "Show the game record"),
            ("board", "Redraw the board"),
            ("stats", "Show attack cache statistics"),
            ("reset", "Start a new game"),
            ("help", "Show this list"),
            ("quit", "Leave"),
        ];
        println!("{}{}═══ Commands ═══{}", BOLD, BRIGHT_YELLOW, RESET);
        for (cmd, desc) in commands {
            println!("  {}{:<18}{} {}", BRIGHT_GREEN, cmd, RESET, desc);
        }
        println!("  {}squares: column a-i, row 1-10; RED starts on rows 1-4{}", DIM, RESET);
    }

    pub fn show_error(&self, message: &str) {
        use colors::*;
        println!("{}Error: {}{}", BRIGHT_RED, message, RESET);
    }

    pub fn show_info(&self, message: &str) {
        use colors::*;
        println!("{}{}{}", BRIGHT_CYAN, message, RESET);
    }

    pub fn show_result(&self, state: GameState) {
        use colors::*;
        let (msg, color) = match state {
            GameState::RedWon => ("RED WINS", BRIGHT_RED),
            GameState::BlueWon => ("BLUE WINS", BRIGHT_BLUE),
            GameState::Draw => ("DRAW", BRIGHT_YELLOW),
            GameState::Unfinished => return,
        };
        println!("{}{}*** {} ***{}", BOLD, color, msg, RESET);
        println!("{}'undo' to take back, 'reset' for a new game{}", BRIGHT_GREEN, RESET);
    }
}

// ============================================================================
// TESTS
// ============================================================================
