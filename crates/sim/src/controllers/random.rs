use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use skyduel_shared::UnitState;

use crate::controller::{ControllerResult, UnitController};

/// Reference strategy: random movement scaled by the speed attribute, random
/// altitude drift. Owns a seeded RNG so whole battles replay exactly.
pub struct RandomController {
    name: String,
    rng: ChaCha8Rng,
}

impl RandomController {
    pub fn new(name: impl Into<String>) -> Self {
        Self::seeded(name, 0)
    }

    pub fn seeded(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl UnitController for RandomController {
    fn name(&self) -> &str {
        &self.name
    }

    /// Delta in [-speed/2, speed].
    fn maneuver(&mut self, unit: &UnitState) -> ControllerResult<i32> {
        let speed = unit.profile.speed as i32;
        Ok(self.rng.gen_range(0..=speed) - speed / 2)
    }

    fn change_altitude(&mut self, unit: &mut UnitState) -> ControllerResult<i32> {
        let delta = self.rng.gen_range(0..3i32) - 1;
        unit.altitude = (unit.altitude + delta).clamp(0, unit.max_altitude);
        Ok(delta)
    }
}
