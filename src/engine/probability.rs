//! Success-probability and propagation-delay formulas

use crate::config::PropagationModel;
use rand::Rng;

impl PropagationModel {
    /// Probability that one lateral-movement attempt succeeds.
    ///
    /// `target_risk * weight_factor * time_decay * network_effect`, capped at
    /// `probability_cap`.
    pub fn attack_probability(
        &self,
        target_risk: f64,
        edge_weight: f64,
        current_time: f64,
        compromised_predecessors: usize,
    ) -> f64 {
        let weight_factor = (edge_weight / self.weight_saturation).min(1.0);
        let time_decay = (1.0 - current_time / self.time_decay_horizon).max(self.min_time_decay);
        let network_effect =
            1.0 + self.network_effect_per_predecessor * compromised_predecessors as f64;

        (target_risk * weight_factor * time_decay * network_effect).min(self.probability_cap)
    }

    /// Time taken to compromise a target once an attempt succeeds.
    ///
    /// Draws exactly one jitter value from `rng`.
    pub fn propagation_delay<R: Rng + ?Sized>(
        &self,
        edge_weight: f64,
        target_security_level: f64,
        rng: &mut R,
    ) -> f64 {
        let base_delay = self.base_delay / edge_weight.max(self.min_delay_weight);
        let variation = rng.gen_range(-self.delay_variation..=self.delay_variation);
        let delay = base_delay * (1.0 + variation) * (1.0 + target_security_level);

        delay.max(self.min_delay)
    }
}
