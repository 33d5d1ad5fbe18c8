use super::{ContextStats, ContextTable, Distribution, Model, ModelConfig, SYMBOLS};
use crate::history::RollingHistory;

/// PPM-style blended context model.
///
/// Prediction starts at the longest context and escapes to shorter ones when
/// the symbol is unseen there. Each seen context reserves `1 / (C + 1)` of the
/// remaining mass for the escape, where `C` is its total count minus the counts
/// of symbols already resolved at longer orders (exclusion). Symbols unseen at
/// every order share the leftover mass uniformly (order -1).
#[derive(Clone, Debug)]
pub struct BlendedModel {
    table: ContextTable,
    history: RollingHistory,
}

impl BlendedModel {
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            table: ContextTable::new(config.max_order()),
            history: RollingHistory::new(config.window()),
        }
    }

    /// Current rolling context, oldest symbol first
    pub fn context(&self) -> &[u8] {
        self.history.context()
    }

    pub fn table(&self) -> &ContextTable {
        &self.table
    }

    pub fn context_stats(&self, context: &[u8]) -> Option<&ContextStats> {
        self.table.get(context)
    }

    /// Probability of `symbol` alone, walking the orders for just this symbol.
    ///
    /// Agrees bit for bit with `predict().p(symbol)`.
    pub fn probability(&self, symbol: u8) -> f64 {
        let mut p = 1.0;
        let mut excluded = Exclusion::new();
        let mut ctx = self.context();

        loop {
            if let Some(stats) = self.table.get(ctx) {
                let c = excluded.remaining(stats);
                let e = 1.0 / (c as f64 + 1.0);
                match stats.count(symbol) {
                    0 => {
                        p *= e;
                        excluded.add(stats);
                    }
                    count => return p * (count as f64 / c as f64 * (1.0 - e)),
                }
            }

            match ctx.split_first() {
                Some((_, shorter)) => ctx = shorter,
                None => break,
            }
        }

        p * (1.0 / excluded.uniform_share())
    }
}

impl Default for BlendedModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Model for BlendedModel {
    /// The escape path is shared by every symbol until it resolves, so one
    /// walk down the orders assigns all 256 probabilities.
    fn predict(&self) -> Distribution {
        let mut p = [0.0; SYMBOLS];
        let mut escape = 1.0;
        let mut excluded = Exclusion::new();
        let mut ctx = self.context();

        loop {
            if let Some(stats) = self.table.get(ctx) {
                let c = excluded.remaining(stats);
                let e = 1.0 / (c as f64 + 1.0);
                for (symbol, count) in stats.iter().filter(|&(s, _)| !excluded.contains(s)) {
                    p[usize::from(symbol)] = escape * (count as f64 / c as f64 * (1.0 - e));
                }
                escape *= e;
                excluded.add(stats);
            }

            match ctx.split_first() {
                Some((_, shorter)) => ctx = shorter,
                None => break,
            }
        }

        let uniform = 1.0 / excluded.uniform_share();
        for (symbol, p) in p.iter_mut().enumerate() {
            if !excluded.set[symbol] {
                *p = escape * uniform;
            }
        }

        Distribution::from_probabilities(p)
    }

    fn update(&mut self, symbol: u8) {
        self.table.record(self.history.context(), symbol);
        self.history.update(symbol);
    }
}

/// Symbols resolved at a longer order during one estimation
struct Exclusion {
    set: [bool; SYMBOLS],
    len: usize,
}

impl Exclusion {
    fn new() -> Self {
        Self { set: [false; SYMBOLS], len: 0 }
    }

    fn contains(&self, symbol: u8) -> bool {
        self.set[usize::from(symbol)]
    }

    fn add(&mut self, stats: &ContextStats) {
        for (symbol, _) in stats.iter() {
            let slot = &mut self.set[usize::from(symbol)];
            self.len += usize::from(!*slot);
            *slot = true;
        }
    }

    /// Context total minus the counts of excluded symbols
    fn remaining(&self, stats: &ContextStats) -> u32 {
        let excluded: u32 = stats
            .iter()
            .filter(|&(symbol, _)| self.contains(symbol))
            .map(|(_, count)| count)
            .sum();
        stats.total() - excluded
    }

    /// Number of symbols left for the order -1 fallback
    fn uniform_share(&self) -> f64 {
        (SYMBOLS - self.len) as f64
    }
}
