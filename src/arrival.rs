//! Customer arrivals.

use rand::SeedableRng;
use rand_distr::{Bernoulli, Distribution, Uniform};

use crate::error::{StoreError, StoreResult};

/// Decides, once per arrival interval, whether a customer walks in and how many items they carry.
///
/// Each interval is an independent trial, so arrivals follow a binomial process. Item counts are
/// uniform between 1 and the configured maximum.
#[derive(Debug, Clone)]
pub struct ArrivalProcess {
    chance: Bernoulli,
    items: Uniform<u32>,
    /// RNG for reproducibility
    rng: rand::rngs::StdRng,
}

impl ArrivalProcess {
    /// Create a new arrival process
    ///
    /// # Arguments
    /// * `chance` - Probability of a customer arriving in each interval
    /// * `max_items` - Largest basket a customer can carry
    /// * `seed` - Optional seed for reproducibility
    pub fn new(chance: f64, max_items: u32, seed: Option<u64>) -> StoreResult<Self> {
        let chance = Bernoulli::new(chance)
            .map_err(|e| StoreError::InvalidConfig(format!("arrival chance: {e}")))?;
        let items = Uniform::new_inclusive(1, max_items)
            .map_err(|e| StoreError::InvalidConfig(format!("items per customer: {e}")))?;
        let rng = match seed {
            Some(s) => rand::rngs::StdRng::seed_from_u64(s),
            None => rand::rngs::StdRng::from_os_rng(),
        };

        Ok(Self { chance, items, rng })
    }

    /// Run one trial. Returns the customer's item count if someone arrived.
    pub fn next_arrival(&mut self) -> Option<u32> {
        self.chance
            .sample(&mut self.rng)
            .then(|| self.items.sample(&mut self.rng))
    }
}
