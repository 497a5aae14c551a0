/// Event generator tuning.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratorConfig {
    /// Zone, template and location draws tried per arrival before it is skipped.
    pub max_location_attempts:    u32,
    /// A period transition with less than this many simulated minutes left
    /// does not draw new arrivals.
    pub min_period_window_mins:   u64,
    /// Consecutive skipped arrivals that disable generation for the run.
    pub max_consecutive_failures: u32,
    /// Skip locations that already host an open incident.
    pub exclude_in_use:           bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_location_attempts:    10,
            min_period_window_mins:   5,
            max_consecutive_failures: 3,
            exclude_in_use:           true,
        }
    }
}
