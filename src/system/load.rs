use std::fmt;

use serde::Serialize;

use super::error::StatError;

/// Number of counters a load line must carry.
pub const LOAD_FIELDS: usize = 7;

/// Cumulative ticks one CPU (or the whole package) spent in each state since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadRecord {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
}

impl LoadRecord {
    /// Parses the counters following a `cpu`/`cpuN` prefix.
    ///
    /// The first seven whitespace-separated tokens must be non-negative
    /// integers. Anything after the seventh (steal, guest, guest_nice on
    /// current kernels) is ignored.
    pub fn parse(fields: &str) -> Result<Self, StatError> {
        let mut tokens = fields.split_ascii_whitespace();
        let mut values = [0u64; LOAD_FIELDS];

        for (idx, slot) in values.iter_mut().enumerate() {
            let token = tokens.next().ok_or_else(|| StatError::MalformedLoadLine {
                line: fields.trim().to_string(),
                detail: format!("expected {LOAD_FIELDS} counters, found {idx}"),
            })?;
            *slot = token.parse().map_err(|_| StatError::MalformedLoadLine {
                line: fields.trim().to_string(),
                detail: format!("counter {} is not an integer: `{token}`", idx + 1),
            })?;
        }

        let [user, nice, system, idle, iowait, irq, softirq] = values;
        Ok(LoadRecord {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
        })
    }

    pub fn total(&self) -> u64 {
        self.user
            .saturating_add(self.nice)
            .saturating_add(self.system)
            .saturating_add(self.idle)
            .saturating_add(self.iowait)
            .saturating_add(self.irq)
            .saturating_add(self.softirq)
    }

    /// Ticks not spent idle or waiting on I/O.
    pub fn busy(&self) -> u64 {
        self.total()
            .saturating_sub(self.idle)
            .saturating_sub(self.iowait)
    }

    /// Utilization in percent over the interval since `earlier`.
    ///
    /// Returns 0.0 when no ticks elapsed or the counters went backwards
    /// (e.g. a core was hot-replugged between samples).
    pub fn usage_since(&self, earlier: &LoadRecord) -> f64 {
        let total = self.total().saturating_sub(earlier.total());
        let busy = self.busy().saturating_sub(earlier.busy());
        if total == 0 {
            return 0.0;
        }
        (100.0 * busy as f64 / total as f64).clamp(0.0, 100.0)
    }
}

impl fmt::Display for LoadRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{} {} {} {} {} {} {}}}",
            self.user, self.nice, self.system, self.idle, self.iowait, self.irq, self.softirq
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(values: [u64; 7]) -> LoadRecord {
        let [user, nice, system, idle, iowait, irq, softirq] = values;
        LoadRecord {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
        }
    }

    #[test]
    fn parses_fields_in_order() {
        let load = LoadRecord::parse(" 100 200 300 400 500 600 700").unwrap();
        assert_eq!(load, record([100, 200, 300, 400, 500, 600, 700]));
    }

    #[test]
    fn ignores_trailing_counters() {
        let load = LoadRecord::parse(" 1 2 3 4 5 6 7 8 9 10").unwrap();
        assert_eq!(load, record([1, 2, 3, 4, 5, 6, 7]));
    }

    #[test]
    fn accepts_values_beyond_u32() {
        let big = u64::from(u32::MAX) + 17;
        let load = LoadRecord::parse(&format!("{big} 0 0 {big} 0 0 0")).unwrap();
        assert_eq!(load.user, big);
        assert_eq!(load.idle, big);
    }

    #[test]
    fn too_few_counters_is_malformed() {
        let err = LoadRecord::parse(" 1 2 3 4 5 6").unwrap_err();
        assert!(matches!(err, StatError::MalformedLoadLine { .. }));
        assert!(err.to_string().contains("found 6"));
    }

    #[test]
    fn non_integer_counter_is_malformed() {
        for input in [" 1 2 x 4 5 6 7", " 1 2 3 4 5 6 -7", ""] {
            let err = LoadRecord::parse(input).unwrap_err();
            assert!(
                matches!(err, StatError::MalformedLoadLine { .. }),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn busy_excludes_idle_and_iowait() {
        let load = record([10, 5, 20, 100, 7, 3, 2]);
        assert_eq!(load.total(), 147);
        assert_eq!(load.busy(), 40);
    }

    #[test]
    fn usage_since_earlier_sample() {
        let before = record([100, 0, 100, 800, 0, 0, 0]);
        let after = record([150, 0, 150, 900, 0, 0, 0]);
        assert!((after.usage_since(&before) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn usage_is_zero_without_elapsed_ticks() {
        let load = record([1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(load.usage_since(&load), 0.0);
        assert_eq!(LoadRecord::default().usage_since(&load), 0.0);
    }

    #[test]
    fn display_lists_counters() {
        assert_eq!(record([1, 2, 3, 4, 5, 6, 7]).to_string(), "{1 2 3 4 5 6 7}");
    }
}
