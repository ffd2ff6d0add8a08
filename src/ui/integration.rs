// Integration layer between the terminal UI and the Janggi engine

use crate::config::RuleConfig;
use crate::engine::{Game, Sq};
use crate::error::CommandError;
use crate::ui::{BoardDisplay, format_ply, parse_square, square_name};
use std::io::{self, BufRead, Write};

// ============================================================================
// COMMANDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move { from: Sq, to: Sq },
    Moves(Option<Sq>),
    Pass,
    Undo,
    History,
    Board,
    Stats,
    Reset,
    Help,
    Quit,
}

impl Command {
    pub fn parse(input: &str) -> Result<Command, CommandError> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some((&head, args)) = parts.split_first() else {
            return Err(CommandError::Usage("<from> <to>, or 'help'"));
        };
        let cmd = match (head.to_ascii_lowercase().as_str(), args) {
            ("move" | "m", [from, to]) => Command::Move {
                from: parse_square(from)?,
                to: parse_square(to)?,
            },
            ("move" | "m", _) => return Err(CommandError::Usage("move <from> <to>")),
            ("moves", []) => Command::Moves(None),
            ("moves", [at]) => Command::Moves(Some(parse_square(at)?)),
            ("moves", _) => return Err(CommandError::Usage("moves [square]")),
            ("pass" | "p", []) => Command::Pass,
            ("undo" | "u", []) => Command::Undo,
            ("history" | "h", []) => Command::History,
            ("board" | "b", []) => Command::Board,
            ("stats", []) => Command::Stats,
            ("reset" | "new", []) => Command::Reset,
            ("help" | "?", []) => Command::Help,
            ("quit" | "exit" | "q", []) => Command::Quit,
            // bare "<from> <to>"
            (_, [to]) => Command::Move {
                from: parse_square(head)?,
                to: parse_square(to)?,
            },
            _ => return Err(CommandError::Unknown(input.trim().to_string())),
        };
        Ok(cmd)
    }
}

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Redraw,
    Info(String),
    Error(String),
    History,
    Help,
    Quit,
}

// ============================================================================
// GAME CONTROLLER
// ============================================================================

pub struct GameController {
    game: Game,
    pub display: BoardDisplay,
}

impl GameController {
    pub fn new(config: RuleConfig, display: BoardDisplay) -> Self {
        Self {
            game: Game::with_config(config),
            display,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Read commands from stdin until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        self.display.render(&self.game);
        loop {
            print!("{} > ", self.game.turn());
            io::stdout().flush()?;

            let Some(line) = lines.next().transpose()? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let reply = match Command::parse(line) {
                Ok(cmd) => self.handle(cmd),
                Err(e) => Reply::Error(e.to_string()),
            };
            match reply {
                Reply::Quit => break,
                Reply::Redraw => {
                    self.display.render(&self.game);
                    self.display.show_result(self.game.state());
                }
                Reply::Info(msg) => self.display.show_info(&msg),
                Reply::Error(msg) => self.display.show_error(&msg),
                Reply::History => self.display.print_move_list(&self.game.history()),
                Reply::Help => self.display.show_help(),
            }
        }
        log::debug!("leaving after {} plies", self.game.history_len());
        Ok(())
    }

    pub fn handle(&mut self, cmd: Command) -> Reply {
        match cmd {
            Command::Move { from, to } => match self.game.try_make_move(from, to) {
                Ok(_) => {
                    self.display.highlight_squares.clear();
                    Reply::Redraw
                }
                Err(e) => Reply::Error(e.to_string()),
            },
            Command::Moves(Some(at)) => {
                let moves = self.game.legal_moves_from(at);
                if moves.is_empty() {
                    return Reply::Info(format!("no legal moves from {}", square_name(at)));
                }
                self.display.highlight_squares = moves.iter().map(|m| m.to).collect();
                Reply::Redraw
            }
            Command::Moves(None) => {
                let moves = self.game.current_legal_moves();
                let list: Vec<String> = moves
                    .iter()
                    .map(|m| format!("{}{}", square_name(m.from), square_name(m.to)))
                    .collect();
                Reply::Info(format!("{} legal moves: {}", list.len(), list.join(" ")))
            }
            Command::Pass => match self.game.try_pass() {
                Ok(()) => {
                    self.display.highlight_squares.clear();
                    Reply::Redraw
                }
                Err(e) => Reply::Error(e.to_string()),
            },
            Command::Undo => match self.game.history().last() {
                Some(ply) => {
                    let text = format_ply(ply);
                    self.game.undo();
                    self.display.highlight_squares.clear();
                    log::debug!("took back {}", text);
                    Reply::Redraw
                }
                None => Reply::Error("nothing to undo".to_string()),
            },
            Command::History => Reply::History,
            Command::Board => Reply::Redraw,
            Command::Stats => Reply::Info(
                self.game
                    .cache_stats()
                    .unwrap_or_else(|| "attack cache disabled".to_string()),
            ),
            Command::Reset => {
                self.game.reset();
                self.display.highlight_squares.clear();
                Reply::Redraw
            }
            Command::Help => Reply::Help,
            Command::Quit => Reply::Quit,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Side, sq};
    use crate::error::CoordError;

    fn controller() -> GameController {
        GameController::new(RuleConfig::default(), BoardDisplay::ascii())
    }

    #[test]
    fn test_parse_moves() {
        let expected = Command::Move {
            from: sq(3, 0),
            to: sq(4, 0),
        };
        assert_eq!(Command::parse("a4 a5"), Ok(expected.clone()));
        assert_eq!(Command::parse("move a4 a5"), Ok(expected.clone()));
        assert_eq!(Command::parse("  M A4   a5 "), Ok(expected));
        assert_eq!(Command::parse("moves e2"), Ok(Command::Moves(Some(sq(1, 4)))));
        assert_eq!(Command::parse("moves"), Ok(Command::Moves(None)));
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(Command::parse("pass"), Ok(Command::Pass));
        assert_eq!(Command::parse("undo"), Ok(Command::Undo));
        assert_eq!(Command::parse("reset"), Ok(Command::Reset));
        assert_eq!(Command::parse("quit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse("move a4"),
            Err(CommandError::Usage("move <from> <to>"))
        );
        assert_eq!(
            Command::parse("z1 a1"),
            Err(CommandError::Coord(CoordError::BadColumn('z')))
        );
        assert!(matches!(Command::parse("resign"), Err(CommandError::Unknown(_))));
        assert!(matches!(Command::parse("   "), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_handle_move_and_undo() {
        let mut c = controller();
        assert_eq!(c.handle(Command::parse("a4 a5").unwrap()), Reply::Redraw);
        assert_eq!(c.game().turn(), Side::Blue);
        assert!(matches!(
            c.handle(Command::parse("a5 a6").unwrap()),
            Reply::Error(_)
        ));
        assert_eq!(c.handle(Command::Undo), Reply::Redraw);
        assert_eq!(c.game().history_len(), 0);
        assert!(matches!(c.handle(Command::Undo), Reply::Error(_)));
    }

    #[test]
    fn test_handle_moves_highlights() {
        let mut c = controller();
        // RED horse on c1
        assert_eq!(c.handle(Command::Moves(Some(sq(0, 2)))), Reply::Redraw);
        assert_eq!(c.display.highlight_squares, vec![sq(2, 3)]);
        assert!(matches!(c.handle(Command::Moves(Some(sq(5, 5)))), Reply::Info(_)));
        c.handle(Command::Pass);
        assert_eq!(c.game().turn(), Side::Blue);
        assert!(c.display.highlight_squares.is_empty());
    }

    #[test]
    fn test_handle_stats() {
        let mut c = controller();
        c.handle(Command::Moves(None));
        match c.handle(Command::Stats) {
            Reply::Info(text) => assert!(text.starts_with("attack cache")),
            other => panic!("unexpected reply {:?}", other),
        }
        let mut plain = GameController::new(
            RuleConfig::default().without_attack_cache(),
            BoardDisplay::ascii(),
        );
        assert_eq!(
            plain.handle(Command::Stats),
            Reply::Info("attack cache disabled".to_string())
        );
    }
}
