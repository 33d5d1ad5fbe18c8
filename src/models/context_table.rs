use std::collections::{BTreeMap, HashMap};

/// Symbol counts seen after one exact context
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextStats {
    counts: BTreeMap<u8, u32>,
    total: u32,
}

impl ContextStats {
    fn first(symbol: u8) -> Self {
        Self { counts: BTreeMap::from([(symbol, 1)]), total: 1 }
    }

    /// Counts `symbol`, returns whether it had been seen here before
    fn record(&mut self, symbol: u8) -> bool {
        let count = self.counts.entry(symbol).or_insert(0);
        *count += 1;
        self.total += 1;
        *count > 1
    }

    fn ensure(&mut self, symbol: u8) {
        if !self.counts.contains_key(&symbol) {
            self.record(symbol);
        }
    }

    pub fn count(&self, symbol: u8) -> u32 {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    /// Sum of all symbol counts
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Number of distinct symbols seen
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// (symbol, count) pairs in symbol order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }
}

/// Per-order maps from context (the last `order` symbols) to their stats
#[derive(Clone, Debug)]
pub struct ContextTable {
    orders: Vec<HashMap<Vec<u8>, ContextStats>>,
}

impl ContextTable {
    /// Empty table with maps for orders `0..=max_order`
    pub fn new(max_order: usize) -> Self {
        Self { orders: vec![HashMap::new(); max_order + 1] }
    }

    pub fn max_order(&self) -> usize {
        self.orders.len() - 1
    }

    /// Stats of `context` at order `context.len()`, `None` if never seen
    pub fn get(&self, context: &[u8]) -> Option<&ContextStats> {
        self.orders.get(context.len())?.get(context)
    }

    /// Number of distinct contexts seen at `order`
    pub fn context_count(&self, order: usize) -> usize {
        self.orders.get(order).map_or(0, HashMap::len)
    }

    pub fn contexts(&self, order: usize) -> impl Iterator<Item = (&[u8], &ContextStats)> + '_ {
        self.orders
            .get(order)
            .into_iter()
            .flat_map(|table| table.iter().map(|(ctx, stats)| (ctx.as_slice(), stats)))
    }

    /// Records `symbol` after `context`, walking from the full context down to
    /// order 0 and stopping at the first order that already knew the symbol.
    pub fn record(&mut self, context: &[u8], symbol: u8) {
        debug_assert!(context.len() <= self.max_order());
        let mut ctx = context;

        loop {
            let table = &mut self.orders[ctx.len()];
            if let Some(stats) = table.get_mut(ctx) {
                if stats.record(symbol) {
                    return;
                }
            } else {
                table.insert(ctx.to_vec(), ContextStats::first(symbol));
            }

            match ctx.split_first() {
                Some((_, shorter)) => ctx = shorter,
                None => break,
            }
        }

        // order -1: the symbol is known at order 0 from now on
        self.orders[0]
            .entry(Vec::new())
            .or_insert_with(|| ContextStats::first(symbol))
            .ensure(symbol);
    }
}

#[cfg(test)]
mod tests {
    use super::ContextTable;

    fn assert_totals(table: &ContextTable) {
        for order in 0..=table.max_order() {
            for (ctx, stats) in table.contexts(order) {
                let sum: u32 = stats.iter().map(|(_, count)| count).sum();
                assert_eq!(stats.total(), sum, "context {ctx:?}");
            }
        }
    }

    #[test]
    fn first_symbol_creates_every_order() {
        let mut table = ContextTable::new(3);
        table.record(b"ab", b'c');
        assert_eq!(table.get(b"ab").unwrap().count(b'c'), 1);
        assert_eq!(table.get(b"b").unwrap().count(b'c'), 1);
        assert_eq!(table.get(b"").unwrap().count(b'c'), 1);
        assert_eq!(table.get(b"").unwrap().total(), 1);
        assert_eq!(table.context_count(3), 0);
        assert_totals(&table);
    }

    #[test]
    fn stops_at_first_order_that_knew_the_symbol() {
        let mut table = ContextTable::new(2);
        table.record(b"", b'x');
        table.record(b"x", b'y');
        // unseen at orders 2 and 1, already counted at order 0
        table.record(b"xy", b'x');
        assert_eq!(table.get(b"").unwrap().count(b'x'), 2);

        // "y" now knows 'x', so order 0 is left alone
        table.record(b"y", b'x');
        assert_eq!(table.get(b"y").unwrap().count(b'x'), 2);
        assert_eq!(table.get(b"").unwrap().count(b'x'), 2);
        assert_eq!(table.get(b"").unwrap().total(), 3);
        assert_totals(&table);
    }

    #[test]
    fn new_symbol_in_seen_context_falls_through() {
        let mut table = ContextTable::new(1);
        table.record(b"", b'a');
        table.record(b"a", b'a');
        table.record(b"a", b'b');
        let stats = table.get(b"a").unwrap();
        assert_eq!((stats.count(b'a'), stats.count(b'b'), stats.total()), (1, 1, 2));
        let stats = table.get(b"").unwrap();
        assert_eq!((stats.count(b'a'), stats.count(b'b'), stats.total()), (2, 1, 3));
        assert_totals(&table);
    }

    #[test]
    fn counts_never_decrease() {
        let mut table = ContextTable::new(2);
        let input = b"abracadabra";
        let mut prev = table.clone();
        for (i, &symbol) in input.iter().enumerate() {
            let ctx = &input[i.saturating_sub(2)..i];
            table.record(ctx, symbol);
            for order in 0..=2 {
                for (ctx, stats) in prev.contexts(order) {
                    let now = table.get(ctx).unwrap();
                    stats.iter().for_each(|(s, c)| assert!(now.count(s) >= c));
                }
            }
            assert_totals(&table);
            prev = table.clone();
        }
    }
}
