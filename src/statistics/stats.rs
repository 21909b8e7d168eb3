use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StressStats {
    inserts: usize,
    removes: usize,
    lookups: usize,
    hits: usize,
}

impl StressStats {
    pub fn new() -> Self {
        StressStats {
            inserts: 0,
            removes: 0,
            lookups: 0,
            hits: 0,
        }
    }

    /// Record an insert call, whether or not the element was new
    pub fn bump_inserts(&mut self) {
        self.inserts += 1
    }

    /// Record a remove call, whether or not the element was present
    pub fn bump_removes(&mut self) {
        self.removes += 1
    }

    /// Record a membership lookup and whether it found the element
    pub fn bump_lookups(&mut self, hit: bool) {
        self.lookups += 1;
        if hit {
            self.hits += 1;
        }
    }

    pub fn get_inserts(&self) -> usize {
        self.inserts
    }

    pub fn get_removes(&self) -> usize {
        self.removes
    }

    pub fn get_lookups(&self) -> usize {
        self.lookups
    }

    pub fn get_hits(&self) -> usize {
        self.hits
    }

    pub fn total_ops(&self) -> usize {
        self.inserts + self.removes + self.lookups
    }

    /// Fraction of lookups that found their element, 0 when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }

    /// Operations per second over `elapsed`, 0 when no time was measured.
    pub fn throughput(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total_ops() as f64 / secs
        } else {
            0.0
        }
    }

    pub fn merge(&self, other: &Self) -> Self {
        StressStats {
            inserts: self.inserts + other.inserts,
            removes: self.removes + other.removes,
            lookups: self.lookups + other.lookups,
            hits: self.hits + other.hits,
        }
    }
}

impl Default for StressStats {
    fn default() -> Self {
        StressStats::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_initialized_to_zero() {
        let stats = StressStats::new();
        assert_eq!(stats.get_inserts(), 0);
        assert_eq!(stats.get_removes(), 0);
        assert_eq!(stats.get_lookups(), 0);
        assert_eq!(stats.get_hits(), 0);
        assert_eq!(stats, StressStats::default());
    }

    #[test]
    fn test_bumps_increment_by_one() {
        let mut stats = StressStats::new();
        stats.bump_inserts();
        stats.bump_inserts();
        stats.bump_removes();
        assert_eq!(stats.get_inserts(), 2);
        assert_eq!(stats.get_removes(), 1);
        assert_eq!(stats.total_ops(), 3);
    }

    #[test]
    fn test_lookups_track_hits() {
        let mut stats = StressStats::new();
        stats.bump_lookups(true);
        stats.bump_lookups(false);
        stats.bump_lookups(false);
        stats.bump_lookups(true);
        assert_eq!(stats.get_lookups(), 4);
        assert_eq!(stats.get_hits(), 2);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_hit_rate_without_lookups() {
        let stats = StressStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_throughput_guards_zero_elapsed() {
        let mut stats = StressStats::new();
        assert_eq!(stats.throughput(Duration::ZERO), 0.0);

        stats.bump_inserts();
        stats.bump_removes();
        assert_eq!(stats.throughput(Duration::ZERO), 0.0);
        assert_eq!(stats.throughput(Duration::from_millis(500)), 4.0);

        let json = serde_json::to_string(&StressStats::new().throughput(Duration::ZERO)).unwrap();
        assert_eq!(json, "0.0");
    }

    #[test]
    fn test_merge_adds_fieldwise() {
        let mut a = StressStats::new();
        a.bump_inserts();
        a.bump_lookups(true);

        let mut b = StressStats::new();
        b.bump_removes();
        b.bump_lookups(false);

        let merged = a.merge(&b);
        assert_eq!(merged.get_inserts(), 1);
        assert_eq!(merged.get_removes(), 1);
        assert_eq!(merged.get_lookups(), 2);
        assert_eq!(merged.get_hits(), 1);
        assert_eq!(merged.total_ops(), 4);
    }

    #[test]
    fn test_serializes_all_counters() {
        let mut stats = StressStats::new();
        stats.bump_inserts();
        stats.bump_lookups(true);
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"inserts":1,"removes":0,"lookups":1,"hits":1}"#);
    }
}
