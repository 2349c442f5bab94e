use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of real-valued random draws, injected wherever weights or
/// probabilities are sampled so that every construction is reproducible
/// from explicit seeds.
pub trait RealVariate {
    fn sample(&mut self) -> f64;
}

pub struct UniformVariate {
    low: f64,
    high: f64,
    rng: StdRng,
}

impl UniformVariate {
    pub fn new(low: f64, high: f64, seed: u64) -> Self {
        Self {
            low,
            high,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RealVariate for UniformVariate {
    fn sample(&mut self) -> f64 {
        self.rng.gen_range(self.low..self.high)
    }
}
