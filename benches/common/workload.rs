//! Key stream generators for top-K benchmarks.
//!
//! Streams are generated up front from a seeded `SmallRng` so the timed loop
//! only measures the table.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, Exp, Normal, Uniform, Zipf};

#[derive(Debug, Clone, Copy)]
pub enum Workload {
    /// Uniform keys in `[0, universe)`.
    Uniform,
    /// Normal around the middle of the universe; `spread` is the std-dev as a
    /// fraction of the universe.
    Normal { spread: f64 },
    /// Exponential decay from key 0; larger `lambda` is more skewed.
    Exponential { lambda: f64 },
    /// Zipfian rank distribution.
    Zipfian { exponent: f64 },
}

#[derive(Debug, Clone, Copy)]
pub struct WorkloadSpec {
    pub universe: u64,
    pub workload: Workload,
    pub seed: u64,
}

impl WorkloadSpec {
    /// Draws `len` key indices in `[0, universe)`.
    pub fn indices(self, len: usize) -> Vec<u64> {
        let universe = self.universe.max(1);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let top = (universe - 1) as f64;
        let clamp = |x: f64| x.round().clamp(0.0, top) as u64;
        match self.workload {
            Workload::Uniform => {
                let dist = Uniform::new(0, universe).expect("non-empty universe");
                (0..len).map(|_| dist.sample(&mut rng)).collect()
            },
            Workload::Normal { spread } => {
                let dist = Normal::new(top / 2.0, (universe as f64 * spread).max(1.0))
                    .expect("finite std-dev");
                (0..len).map(|_| clamp(dist.sample(&mut rng))).collect()
            },
            Workload::Exponential { lambda } => {
                let dist = Exp::new(lambda).expect("positive lambda");
                (0..len).map(|_| clamp(dist.sample(&mut rng))).collect()
            },
            Workload::Zipfian { exponent } => {
                let dist = Zipf::new(universe as f64, exponent).expect("valid zipf");
                (0..len).map(|_| clamp(dist.sample(&mut rng) - 1.0)).collect()
            },
        }
    }

    /// Draws `len` keys as strings.
    pub fn keys(self, len: usize) -> Vec<String> {
        self.indices(len)
            .into_iter()
            .map(|i| format!("key-{i:08}"))
            .collect()
    }
}

/// Standard suite used by every bench.
pub fn standard_workloads() -> Vec<(&'static str, Workload)> {
    vec![
        ("uniform", Workload::Uniform),
        ("normal_10pct", Workload::Normal { spread: 0.1 }),
        ("exponential", Workload::Exponential { lambda: 0.05 }),
        ("zipfian_1.0", Workload::Zipfian { exponent: 1.0 }),
    ]
}
