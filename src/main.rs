use clap::{Parser, ValueEnum};
use rust_janggi_engine::config::{RuleConfig, StalemateRule};
use rust_janggi_engine::ui::{BoardDisplay, GameController};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Stalemate {
    /// Game stays unfinished; the stuck side passes
    Continue,
    /// Game ends in a draw
    Draw,
}

impl From<Stalemate> for StalemateRule {
    fn from(s: Stalemate) -> Self {
        match s {
            Stalemate::Continue => StalemateRule::Continue,
            Stalemate::Draw => StalemateRule::Draw,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Two-player Janggi (Korean chess) in the terminal", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Outcome when the side to move has no legal move and is not in check
    #[arg(long, value_enum, default_value = "continue")]
    stalemate: Stalemate,

    /// Forbid passing
    #[arg(long)]
    no_pass: bool,

    /// Attack cache size in buckets (0 disables the cache)
    #[arg(long, default_value_t = 4096)]
    cache_buckets: usize,

    /// Seed for the position keys
    #[arg(long, default_value_t = 2024)]
    seed: u64,

    /// Draw pieces with letters instead of Hanja
    #[arg(long)]
    ascii: bool,
}

impl Args {
    fn rule_config(&self) -> RuleConfig {
        RuleConfig::new()
            .with_stalemate(self.stalemate.into())
            .with_pass(!self.no_pass)
            .with_attack_cache(self.cache_buckets)
            .with_seed(self.seed)
    }
}

fn main() {
    let args = Args::parse();

    use std::io::Write;
    let log_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .target(env_logger::Target::Stderr)
    .init();

    let config = args.rule_config();
    log::debug!("starting with {:?}", config);

    let display = if args.ascii {
        BoardDisplay::ascii()
    } else {
        BoardDisplay::new()
    };
    let mut controller = GameController::new(config, display);
    if let Err(e) = controller.run() {
        log::error!("terminal error: {e}");
        std::process::exit(1);
    }
}
