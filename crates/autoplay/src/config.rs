use pacerace_core::RaceConfig;

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub seed: u64,
    /// Randomized checkpoint tables to try.
    pub tables: u32,
    /// Races run against each table.
    pub batch: u32,
    pub candidate_limits: Vec<u32>,
    pub locations: Vec<u32>,
    /// Everything except the checkpoint table, which each run replaces.
    pub race: RaceConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            seed: 0xC0FFEE,
            tables: 1000,
            batch: 10,
            candidate_limits: vec![5, 6, 7, 8],
            locations: vec![25, 50, 75, 85],
            race: RaceConfig::default(),
        }
    }
}

impl HarnessConfig {
    pub fn races(&self) -> u64 {
        u64::from(self.tables) * u64::from(self.batch)
    }
}
