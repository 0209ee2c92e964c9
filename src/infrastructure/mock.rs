use crate::domain::ports::TickSource;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time;
use tracing::info;

struct TickState {
    volume: i64,
    price: Decimal,
}

/// In-memory tick source for tests and demo runs.
///
/// Clones share one underlying feed state. Readings are settable from
/// outside, and an optional random-walk task can drive them the way a live
/// level-1 feed would: cumulative volume grows on most steps, and
/// occasionally stalls so that pollers see an unchanged reading.
#[derive(Clone)]
pub struct MockTickSource {
    state: Arc<Mutex<TickState>>,
}

impl MockTickSource {
    pub fn new(volume: i64, price: Decimal) -> Self {
        Self {
            state: Arc::new(Mutex::new(TickState { volume, price })),
        }
    }

    /// Replaces both readings at once, as one observed trade would.
    pub fn set(&self, volume: i64, price: Decimal) {
        let mut state = self.state.lock().expect("MockTickSource state poisoned");
        state.volume = volume;
        state.price = price;
    }

    /// Spawns a price random walk updating the readings every `step`.
    ///
    /// Deterministic pseudo-random (no `rand` dependency): a simple LCG
    /// drives -0.5% to +0.5% price steps. Every eighth step leaves the
    /// volume untouched so the chart's volume gating gets exercised.
    pub fn start_random_walk(&self, step: Duration) -> tokio::task::JoinHandle<()> {
        let source = self.clone();

        tokio::spawn(async move {
            let mut interval = time::interval(step);
            let mut iteration = 0u64;

            info!("MockTickSource: starting price random walk");

            loop {
                interval.tick().await;
                iteration += 1;

                #[allow(clippy::manual_is_multiple_of)]
                if iteration % 8 == 0 {
                    // Stalled feed: no trade this step
                    continue;
                }

                let (volume, price) = {
                    let state = source.state.lock().expect("MockTickSource state poisoned");
                    (state.volume, state.price)
                };

                let seed = iteration.wrapping_mul(1103515245).wrapping_add(12345);
                let random_val = (((seed / 65536) % 1000) as f64 / 1000.0) - 0.5;
                let change_pct = Decimal::from_f64(random_val * 0.01).unwrap_or(Decimal::ZERO);
                let new_price = price * (Decimal::ONE + change_pct);

                let traded = 1 + (seed % 50) as i64;
                source.set(volume + traded, new_price.round_dp(4));
            }
        })
    }
}

impl TickSource for MockTickSource {
    fn current_volume(&self) -> i64 {
        self.state
            .lock()
            .expect("MockTickSource state poisoned")
            .volume
    }

    fn last_price(&self) -> Decimal {
        self.state
            .lock()
            .expect("MockTickSource state poisoned")
            .price
    }
}
