/// The most recent symbols, oldest first, at most `window` of them.
///
/// Shorter contexts are suffixes of [`RollingHistory::context`], so falling
/// back an order is a re-slice and never allocates.
#[derive(Clone, Debug)]
pub struct RollingHistory {
    buf: Vec<u8>,
    window: usize,
}

impl RollingHistory {
    pub fn new(window: usize) -> Self {
        Self { buf: Vec::with_capacity(window), window }
    }

    pub fn update(&mut self, symbol: u8) {
        if self.window == 0 {
            return;
        }

        if self.buf.len() < self.window {
            self.buf.push(symbol);
        } else {
            self.buf.copy_within(1.., 0);
            self.buf[self.window - 1] = symbol;
        }
    }

    pub fn context(&self) -> &[u8] {
        &self.buf
    }

    pub fn window(&self) -> usize {
        self.window
    }
}
