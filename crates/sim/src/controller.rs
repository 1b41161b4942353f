use skyduel_shared::*;

/// Result type for controller operations. A returned error surfaces as
/// [`BattleError::ControllerFault`] and halts the battle.
pub type ControllerResult<T> = std::result::Result<T, ControllerError>;

/// Polymorphic behavior provider for one unit's decisions each turn.
///
/// The engine invokes the operations in a fixed order every turn: the radar
/// hook, then `maneuver`, then `change_altitude`, then at most one of the
/// five firing operations. The mutable `UnitState` handle is lent for the
/// duration of a single call and never retained across turns.
///
/// The firing operations have default implementations that build projectiles
/// from the unit's attribute profile; strategies usually only implement
/// `maneuver` and `change_altitude`.
pub trait UnitController: Send {
    fn name(&self) -> &str;

    /// Radar hook: sees every in-flight projectile and the opponent's
    /// position before the turn begins. The reference behavior does nothing.
    fn radar_scan(
        &mut self,
        _unit: &mut UnitState,
        _projectiles: &[Projectile],
        _enemy_x: i32,
        _enemy_altitude: i32,
    ) -> ControllerResult<()> {
        Ok(())
    }

    /// Horizontal movement delta for this turn. The engine applies it and
    /// clamps the result into the arena.
    fn maneuver(&mut self, unit: &UnitState) -> ControllerResult<i32>;

    /// Mutates the unit's own altitude and returns the signed delta, which
    /// is used purely for reporting.
    fn change_altitude(&mut self, unit: &mut UnitState) -> ControllerResult<i32>;

    fn shoot(&mut self, unit: &mut UnitState, x: i32, dir: i32) -> ControllerResult<Option<Projectile>> {
        Ok(Some(Projectile {
            x,
            altitude: unit.altitude,
            dir,
            speed: NORMAL_SHOT_SPEED,
            class: WeaponClass::Normal,
            damage: unit.profile.shot_power as i32,
            owner: unit.team,
        }))
    }

    fn shoot_supersonic(
        &mut self,
        unit: &mut UnitState,
        x: i32,
        dir: i32,
    ) -> ControllerResult<Option<Projectile>> {
        Ok(Some(Projectile {
            x,
            altitude: unit.altitude,
            dir,
            speed: SUPERSONIC_SHOT_SPEED,
            class: WeaponClass::Supersonic,
            damage: unit.profile.supersonic_power as i32,
            owner: unit.team,
        }))
    }

    /// High-power shot gated by the shared missile cooldown. After a
    /// successful shot the next two calls refuse; the third fires again.
    fn special_missile(
        &mut self,
        unit: &mut UnitState,
        x: i32,
        dir: i32,
    ) -> ControllerResult<Option<Projectile>> {
        unit.missile_cooldown = unit.missile_cooldown.saturating_sub(1);
        if unit.missile_cooldown > 0 {
            return Ok(None);
        }
        unit.missile_cooldown = MISSILE_COOLDOWN_TURNS;
        Ok(Some(Projectile {
            x,
            altitude: unit.altitude,
            dir,
            speed: MISSILE_SHOT_SPEED,
            class: WeaponClass::Missile,
            damage: unit.profile.missile_power as i32,
            owner: unit.team,
        }))
    }

    /// Fires the primary projectile and stores the alternate altitude for
    /// the engine-built secondary one.
    fn double_shot(
        &mut self,
        unit: &mut UnitState,
        x: i32,
        dir: i32,
    ) -> ControllerResult<Option<Projectile>> {
        unit.pending_second_altitude = Some((unit.altitude + 1) % (unit.max_altitude + 1));
        Ok(Some(Projectile {
            x,
            altitude: unit.altitude,
            dir,
            speed: DOUBLE_SHOT_SPEED,
            class: WeaponClass::DoubleShot,
            damage: unit.profile.double_shot_power as i32,
            owner: unit.team,
        }))
    }

    /// Massive-damage shot on the shared cooldown, held longer than the
    /// special missile.
    fn nuclear_missile(
        &mut self,
        unit: &mut UnitState,
        x: i32,
        dir: i32,
    ) -> ControllerResult<Option<Projectile>> {
        unit.missile_cooldown = unit.missile_cooldown.saturating_sub(1);
        if unit.missile_cooldown > 0 {
            return Ok(None);
        }
        unit.missile_cooldown = NUCLEAR_COOLDOWN_TURNS;
        Ok(Some(Projectile {
            x,
            altitude: unit.altitude,
            dir,
            speed: NUCLEAR_SHOT_SPEED,
            class: WeaponClass::Nuclear,
            damage: unit.profile.nuclear_power as i32 * NUCLEAR_DAMAGE_MULTIPLIER,
            owner: unit.team,
        }))
    }
}

/// Controller that never moves and never changes altitude - useful for
/// testing the engine in isolation.
pub struct DoNothingController;

impl UnitController for DoNothingController {
    fn name(&self) -> &str {
        "do_nothing"
    }

    fn maneuver(&mut self, _unit: &UnitState) -> ControllerResult<i32> {
        Ok(0)
    }

    fn change_altitude(&mut self, _unit: &mut UnitState) -> ControllerResult<i32> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(altitude: i32, max_altitude: i32) -> UnitState {
        UnitState::new(
            TeamId::Team1,
            AttributeProfile::balanced("T1"),
            100,
            10,
            altitude,
            max_altitude,
        )
        .unwrap()
    }

    #[test]
    fn test_default_shot_carries_profile_damage() {
        let mut ctl = DoNothingController;
        let mut u = unit(1, 2);

        let p = ctl.shoot(&mut u, 10, 1).unwrap().unwrap();
        assert_eq!(p.damage, u.profile.shot_power as i32);
        assert_eq!(p.speed, NORMAL_SHOT_SPEED);
        assert_eq!(p.altitude, 1);

        let p = ctl.shoot_supersonic(&mut u, 10, -1).unwrap().unwrap();
        assert_eq!(p.damage, u.profile.supersonic_power as i32);
        assert_eq!(p.speed, SUPERSONIC_SHOT_SPEED);
        assert_eq!(p.dir, -1);
    }

    #[test]
    fn test_missile_refuses_next_two_calls() {
        let mut ctl = DoNothingController;
        let mut u = unit(1, 2);

        assert!(ctl.special_missile(&mut u, 10, 1).unwrap().is_some());
        assert_eq!(u.missile_cooldown, MISSILE_COOLDOWN_TURNS);
        assert!(ctl.special_missile(&mut u, 10, 1).unwrap().is_none());
        assert!(ctl.special_missile(&mut u, 10, 1).unwrap().is_none());
        assert!(ctl.special_missile(&mut u, 10, 1).unwrap().is_some());
    }

    #[test]
    fn test_nuclear_holds_longer_cooldown() {
        let mut ctl = DoNothingController;
        let mut u = unit(1, 2);

        let p = ctl.nuclear_missile(&mut u, 10, 1).unwrap().unwrap();
        assert_eq!(
            p.damage,
            u.profile.nuclear_power as i32 * NUCLEAR_DAMAGE_MULTIPLIER
        );
        for _ in 0..4 {
            assert!(ctl.nuclear_missile(&mut u, 10, 1).unwrap().is_none());
        }
        assert!(ctl.nuclear_missile(&mut u, 10, 1).unwrap().is_some());
    }

    #[test]
    fn test_cooldown_shared_between_missile_weapons() {
        let mut ctl = DoNothingController;
        let mut u = unit(1, 2);

        assert!(ctl.nuclear_missile(&mut u, 10, 1).unwrap().is_some());
        // the special missile is blocked by the same counter
        assert!(ctl.special_missile(&mut u, 10, 1).unwrap().is_none());
    }

    #[test]
    fn test_double_shot_sets_alternate_altitude() {
        let mut ctl = DoNothingController;
        let mut u = unit(1, 2);

        let p = ctl.double_shot(&mut u, 10, 1).unwrap().unwrap();
        assert_eq!(p.damage, u.profile.double_shot_power as i32);
        assert_eq!(u.pending_second_altitude, Some(2));

        // wraps around at the top of the field
        let mut top = unit(2, 2);
        ctl.double_shot(&mut top, 10, 1).unwrap();
        assert_eq!(top.pending_second_altitude, Some(0));
    }
}
