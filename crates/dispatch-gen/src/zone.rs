//! Per-zone crime profiles.

use dispatch_core::{CategoryTable, PeriodTable, TimePeriod, ZoneId};

/// How much, and what kind of, crime a zone produces.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneProfile {
    pub zone:             ZoneId,
    pub name:             String,
    /// Expected calls per hour in each period.
    pub calls_per_hour:   PeriodTable<f64>,
    /// Relative weight of each call category.
    pub category_weights: CategoryTable<f64>,
}

impl ZoneProfile {
    pub fn new(zone: ZoneId, name: impl Into<String>, calls_per_hour: PeriodTable<f64>) -> Self {
        Self {
            zone,
            name: name.into(),
            calls_per_hour,
            category_weights: CategoryTable([1.0; 6]),
        }
    }

    pub fn with_category_weights(mut self, weights: CategoryTable<f64>) -> Self {
        self.category_weights = weights;
        self
    }

    /// Expected calls over the whole of `period`.
    #[inline]
    pub fn expected_calls(&self, period: TimePeriod) -> f64 {
        self.calls_per_hour[period].max(0.0) * TimePeriod::HOURS as f64
    }
}
