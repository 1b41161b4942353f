use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use skyduel_shared::{Projectile, UnitState};

use crate::controller::{ControllerResult, UnitController};

/// Strategy that uses the radar hook: when a projectile is inbound on its
/// altitude lane and within radar range, it steps off that lane instead of
/// drifting randomly.
pub struct EvaderController {
    name: String,
    rng: ChaCha8Rng,
    threat_lane: Option<i32>,
}

/// Cells of warning distance granted per radar point.
const RADAR_RANGE_PER_POINT: i32 = 10;

impl EvaderController {
    pub fn new(name: impl Into<String>) -> Self {
        Self::seeded(name, 0)
    }

    pub fn seeded(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            threat_lane: None,
        }
    }
}

impl UnitController for EvaderController {
    fn name(&self) -> &str {
        &self.name
    }

    fn radar_scan(
        &mut self,
        unit: &mut UnitState,
        projectiles: &[Projectile],
        _enemy_x: i32,
        _enemy_altitude: i32,
    ) -> ControllerResult<()> {
        self.threat_lane = None;
        if unit.profile.radar == 0 {
            return Ok(());
        }
        let range = unit.profile.radar as i32 * RADAR_RANGE_PER_POINT;
        for p in projectiles {
            let inbound = p.dir * (unit.x - p.x) > 0;
            if p.altitude == unit.altitude && inbound && (unit.x - p.x).abs() <= range {
                self.threat_lane = Some(p.altitude);
                break;
            }
        }
        Ok(())
    }

    fn maneuver(&mut self, unit: &UnitState) -> ControllerResult<i32> {
        let speed = unit.profile.speed as i32;
        Ok(self.rng.gen_range(0..=speed) - speed / 2)
    }

    fn change_altitude(&mut self, unit: &mut UnitState) -> ControllerResult<i32> {
        let delta = match self.threat_lane.take() {
            Some(lane) if lane == unit.altitude => {
                if unit.altitude < unit.max_altitude {
                    1
                } else {
                    -1
                }
            }
            _ => self.rng.gen_range(0..3i32) - 1,
        };
        unit.altitude = (unit.altitude + delta).clamp(0, unit.max_altitude);
        Ok(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyduel_shared::{AttributeProfile, TeamId, WeaponClass};

    fn unit() -> UnitState {
        UnitState::new(
            TeamId::Team2,
            AttributeProfile::balanced("T2"),
            100,
            50,
            1,
            2,
        )
        .unwrap()
    }

    fn inbound_shot(x: i32, altitude: i32) -> Projectile {
        Projectile {
            x,
            altitude,
            dir: 1,
            speed: 1,
            class: WeaponClass::Normal,
            damage: 15,
            owner: TeamId::Team1,
        }
    }

    #[test]
    fn test_steps_off_threatened_lane() {
        let mut ctl = EvaderController::seeded("evader", 1);
        let mut u = unit();

        ctl.radar_scan(&mut u, &[inbound_shot(40, 1)], 10, 1).unwrap();
        assert_eq!(ctl.threat_lane, Some(1));

        let delta = ctl.change_altitude(&mut u).unwrap();
        assert_eq!(delta, 1);
        assert_eq!(u.altitude, 2);
    }

    #[test]
    fn test_ignores_shots_on_other_lanes_and_outbound() {
        let mut ctl = EvaderController::seeded("evader", 1);
        let mut u = unit();

        // different altitude
        ctl.radar_scan(&mut u, &[inbound_shot(40, 0)], 10, 1).unwrap();
        assert_eq!(ctl.threat_lane, None);

        // moving away from the unit
        let outbound = Projectile {
            dir: -1,
            ..inbound_shot(40, 1)
        };
        ctl.radar_scan(&mut u, &[outbound], 10, 1).unwrap();
        assert_eq!(ctl.threat_lane, None);

        // beyond radar range (radar 2 -> 20 cells)
        ctl.radar_scan(&mut u, &[inbound_shot(10, 1)], 10, 1).unwrap();
        assert_eq!(ctl.threat_lane, None);
    }
}
