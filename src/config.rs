// Rule options a host can choose when starting a game.

/// What happens when the side to move has no legal move and is not in check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalemateRule {
    /// The game stays UNFINISHED; the stuck side may still pass.
    #[default]
    Continue,
    /// The game ends in a DRAW.
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    pub stalemate: StalemateRule,
    pub allow_pass: bool,
    /// 0 disables the attack cache.
    pub attack_cache_buckets: usize,
    pub zobrist_seed: u64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            stalemate: StalemateRule::Continue,
            allow_pass: true,
            attack_cache_buckets: 4096,
            zobrist_seed: 2024,
        }
    }
}

impl RuleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stalemate(mut self, rule: StalemateRule) -> Self {
        self.stalemate = rule;
        self
    }

    pub fn with_pass(mut self, allow: bool) -> Self {
        self.allow_pass = allow;
        self
    }

    pub fn with_attack_cache(mut self, buckets: usize) -> Self {
        self.attack_cache_buckets = buckets;
        self
    }

    pub fn without_attack_cache(self) -> Self {
        self.with_attack_cache(0)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.zobrist_seed = seed;
        self
    }
}
