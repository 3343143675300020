use std::time::Instant;

use sysinfo::Networks;

use super::types::round2;

/// Interface-wide cumulative counters, summed across interfaces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NetTotals {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
}

impl NetTotals {
    pub fn from_networks(networks: &Networks) -> Self {
        let mut totals = NetTotals::default();
        for (_, data) in networks.iter() {
            totals.bytes_sent += data.total_transmitted();
            totals.bytes_recv += data.total_received();
            totals.packets_sent += data.total_packets_transmitted();
            totals.packets_recv += data.total_packets_received();
        }
        totals
    }
}

/// Per-second throughput between two snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NetRates {
    pub bytes_sent: f64,
    pub bytes_recv: f64,
    pub packets_sent: f64,
    pub packets_recv: f64,
}

/// Turns cumulative counters into per-second rates against the previous
/// tick. The first tick has no baseline and reports zeros.
pub struct NetRateTracker {
    prev: Option<(NetTotals, Instant)>,
}

impl NetRateTracker {
    pub fn new() -> Self {
        NetRateTracker { prev: None }
    }

    pub fn rates(&mut self, totals: NetTotals, now: Instant) -> NetRates {
        let rates = match self.prev {
            Some((prev, at)) => {
                let dt = now.saturating_duration_since(at).as_secs_f64();
                compute_rates(prev, totals, dt)
            }
            None => NetRates::default(),
        };
        self.prev = Some((totals, now));
        rates
    }
}

impl Default for NetRateTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn compute_rates(prev: NetTotals, cur: NetTotals, dt: f64) -> NetRates {
    // Counters reset on interface bounce; a shrinking counter reads as zero.
    let dt = if dt > 0.0 { dt } else { 1.0 };
    let per_sec = |now: u64, before: u64| round2(now.saturating_sub(before) as f64 / dt);
    NetRates {
        bytes_sent: per_sec(cur.bytes_sent, prev.bytes_sent),
        bytes_recv: per_sec(cur.bytes_recv, prev.bytes_recv),
        packets_sent: per_sec(cur.packets_sent, prev.packets_sent),
        packets_recv: per_sec(cur.packets_recv, prev.packets_recv),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(bs: u64, br: u64, ps: u64, pr: u64) -> NetTotals {
        NetTotals {
            bytes_sent: bs,
            bytes_recv: br,
            packets_sent: ps,
            packets_recv: pr,
        }
    }

    #[test]
    fn first_tick_reports_zeros() {
        let mut tracker = NetRateTracker::new();
        let rates = tracker.rates(totals(5000, 9000, 40, 80), Instant::now());
        assert_eq!(rates, NetRates::default());
    }

    #[test]
    fn per_second_rates_from_deltas() {
        let rates = compute_rates(totals(1000, 2000, 10, 20), totals(3000, 6000, 30, 60), 2.0);
        assert_eq!(rates.bytes_sent, 1000.0);
        assert_eq!(rates.bytes_recv, 2000.0);
        assert_eq!(rates.packets_sent, 10.0);
        assert_eq!(rates.packets_recv, 20.0);
    }

    #[test]
    fn counter_reset_clamps_to_zero() {
        let rates = compute_rates(totals(9000, 9000, 90, 90), totals(100, 100, 1, 1), 1.0);
        assert_eq!(rates, NetRates::default());
    }

    #[test]
    fn zero_interval_does_not_divide_by_zero() {
        let rates = compute_rates(totals(0, 0, 0, 0), totals(500, 0, 0, 0), 0.0);
        assert_eq!(rates.bytes_sent, 500.0);
    }

    #[test]
    fn second_tick_uses_stored_baseline() {
        let mut tracker = NetRateTracker::new();
        let start = Instant::now();
        tracker.rates(totals(1000, 0, 0, 0), start);
        let rates = tracker.rates(totals(2000, 0, 0, 0), start + std::time::Duration::from_secs(1));
        assert_eq!(rates.bytes_sent, 1000.0);
    }
}
