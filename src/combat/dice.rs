//! Randomness for hit checks and AI choices
//!
//! In deterministic mode every roll has a fixed outcome: checks always hit
//! and picks always take the first option.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of all battle randomness
#[derive(Debug, Clone)]
pub struct Dice {
    rng: Option<StdRng>,
    /// Hit checks made so far
    checks: u64,
}

impl Dice {
    /// Fixed outcomes, used for reproducible runs and tests
    pub fn deterministic() -> Self {
        Self { rng: None, checks: 0 }
    }

    /// Seeded random outcomes
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Some(StdRng::seed_from_u64(seed)),
            checks: 0,
        }
    }

    /// Random outcomes seeded from the OS
    pub fn from_entropy() -> Self {
        Self {
            rng: Some(StdRng::from_entropy()),
            checks: 0,
        }
    }

    pub fn is_deterministic(&self) -> bool {
        self.rng.is_none()
    }

    /// Roll a hit check. `ceiling` is an extra cap the roll must also
    /// stay under.
    pub fn check_hit(&mut self, hit_chance: f64, ceiling: Option<f64>) -> bool {
        self.checks += 1;
        let Some(rng) = self.rng.as_mut() else {
            return true;
        };
        let roll: f64 = rng.gen();
        roll < hit_chance && ceiling.map_or(true, |c| roll < c)
    }

    /// Pick an index in `0..len`. Returns `None` when `len` is 0.
    pub fn pick(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        match self.rng.as_mut() {
            Some(rng) => Some(rng.gen_range(0..len)),
            None => Some(0),
        }
    }

    /// Number of hit checks rolled
    pub fn checks(&self) -> u64 {
        self.checks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_always_hits() {
        let mut dice = Dice::deterministic();
        assert!(dice.check_hit(0.0, Some(0.0)));
        assert!(dice.check_hit(0.5, None));
        assert_eq!(dice.checks(), 2);
        assert_eq!(dice.pick(5), Some(0));
        assert_eq!(dice.pick(0), None);
    }

    #[test]
    fn test_zero_chance_never_hits() {
        let mut dice = Dice::seeded(7);
        for _ in 0..200 {
            assert!(!dice.check_hit(0.0, None));
        }
    }

    #[test]
    fn test_ceiling_caps_certain_hits() {
        let mut dice = Dice::seeded(11);
        let hits = (0..2000).filter(|_| dice.check_hit(1.0, Some(0.95))).count();
        assert!(hits < 2000, "a 0.95 ceiling should let some rolls miss");
        assert!(hits > 1700);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = Dice::seeded(42);
        let mut b = Dice::seeded(42);
        for _ in 0..50 {
            assert_eq!(a.check_hit(0.5, None), b.check_hit(0.5, None));
            assert_eq!(a.pick(4), b.pick(4));
        }
    }

    #[test]
    fn test_pick_in_range() {
        let mut dice = Dice::seeded(3);
        for _ in 0..100 {
            let i = dice.pick(3).unwrap();
            assert!(i < 3);
        }
    }
}
