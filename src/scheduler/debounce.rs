//! Adaptive debounce policy.
//!
//! Longer inputs wait longer before a conversion is issued, since each call
//! costs roughly in proportion to the text length.  Lengths are counted in
//! Unicode scalar values.

use std::time::Duration;

use crate::config::SchedulerConfig;

/// Computes debounce and busy-grace durations from [`SchedulerConfig`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebouncePolicy {
    config: SchedulerConfig,
}

impl DebouncePolicy {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Delay before converting an input of `chars` characters.
    ///
    /// ```
    /// use std::time::Duration;
    /// use hanconv_live::scheduler::DebouncePolicy;
    ///
    /// let policy = DebouncePolicy::default();
    /// assert_eq!(policy.delay_for_len(1), Duration::from_millis(10));
    /// assert_eq!(policy.delay_for_len(5_001), Duration::from_millis(50));
    /// assert_eq!(policy.delay_for_len(50_001), Duration::from_millis(200));
    /// ```
    pub fn delay_for_len(&self, chars: usize) -> Duration {
        let ms = if chars > self.config.large_input_chars {
            self.config.large_delay_ms
        } else if chars > self.config.medium_input_chars {
            self.config.medium_delay_ms
        } else {
            self.config.base_delay_ms
        };
        Duration::from_millis(ms)
    }

    /// Delay before converting `text`.
    pub fn delay_for(&self, text: &str) -> Duration {
        self.delay_for_len(text.chars().count())
    }

    /// How long a call may stay unresolved before the busy flag is raised.
    pub fn busy_grace(&self) -> Duration {
        Duration::from_millis(self.config.busy_grace_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn tiers_switch_strictly_above_thresholds() {
        let p = DebouncePolicy::default();

        assert_eq!(p.delay_for_len(0), ms(10));
        assert_eq!(p.delay_for_len(5_000), ms(10));
        assert_eq!(p.delay_for_len(5_001), ms(50));
        assert_eq!(p.delay_for_len(50_000), ms(50));
        assert_eq!(p.delay_for_len(50_001), ms(200));
        assert_eq!(p.delay_for_len(1_000_000), ms(200));
    }

    #[test]
    fn counts_characters_not_bytes() {
        let p = DebouncePolicy::default();
        // 2 000 CJK characters are 6 000 UTF-8 bytes.
        let text = "汉".repeat(2_000);
        assert_eq!(p.delay_for(&text), ms(10));

        let text = "汉".repeat(5_001);
        assert_eq!(p.delay_for(&text), ms(50));
    }

    #[test]
    fn custom_config_is_honoured() {
        let p = DebouncePolicy::new(SchedulerConfig {
            large_input_chars: 100,
            large_delay_ms: 500,
            medium_input_chars: 10,
            medium_delay_ms: 30,
            base_delay_ms: 0,
            busy_grace_ms: 75,
        });

        assert_eq!(p.delay_for_len(10), ms(0));
        assert_eq!(p.delay_for_len(11), ms(30));
        assert_eq!(p.delay_for_len(101), ms(500));
        assert_eq!(p.busy_grace(), ms(75));
    }

    #[test]
    fn default_grace_is_150ms() {
        assert_eq!(DebouncePolicy::default().busy_grace(), ms(150));
    }
}
