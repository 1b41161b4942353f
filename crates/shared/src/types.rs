use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{BattleError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamId {
    Team1,
    Team2,
}

impl TeamId {
    pub fn opponent(self) -> TeamId {
        match self {
            TeamId::Team1 => TeamId::Team2,
            TeamId::Team2 => TeamId::Team1,
        }
    }

    /// Horizontal firing direction: team 1 shoots right, team 2 shoots left.
    pub fn direction(self) -> i32 {
        match self {
            TeamId::Team1 => 1,
            TeamId::Team2 => -1,
        }
    }

    pub fn index(self) -> usize {
        match self {
            TeamId::Team1 => 0,
            TeamId::Team2 => 1,
        }
    }

    pub fn from_index(index: usize) -> TeamId {
        match index {
            0 => TeamId::Team1,
            _ => TeamId::Team2,
        }
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamId::Team1 => write!(f, "team 1"),
            TeamId::Team2 => write!(f, "team 2"),
        }
    }
}

/// Fixed 11-attribute loadout for one unit, bounded by a 100-point budget.
///
/// The profile is set once at unit creation and never mutated; all weapon
/// damage, defense mitigation, and evasion odds are derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeProfile {
    pub speed: u32,
    pub fire_rate: u32,
    pub maneuverability: u32,
    pub shot_power: u32,
    pub supersonic_power: u32,
    pub missile_power: u32,
    pub defense: u32,
    pub stealth_chance: u32,
    pub radar: u32,
    pub double_shot_power: u32,
    pub nuclear_power: u32,
    /// Display tag rendered into the battlefield grid.
    pub tag: String,
}

impl AttributeProfile {
    /// The original template loadout: 5+5+5+15+20+25+15+5+2+2+1 = 100.
    pub fn balanced(tag: impl Into<String>) -> Self {
        Self {
            speed: 5,
            fire_rate: 5,
            maneuverability: 5,
            shot_power: 15,
            supersonic_power: 20,
            missile_power: 25,
            defense: 15,
            stealth_chance: 5,
            radar: 2,
            double_shot_power: 2,
            nuclear_power: 1,
            tag: tag.into(),
        }
    }

    pub fn point_total(&self) -> u32 {
        self.speed
            + self.fire_rate
            + self.maneuverability
            + self.shot_power
            + self.supersonic_power
            + self.missile_power
            + self.defense
            + self.stealth_chance
            + self.radar
            + self.double_shot_power
            + self.nuclear_power
    }

    /// Fail-fast budget check; a profile that exceeds the budget must never
    /// produce a usable unit.
    pub fn validate(&self) -> Result<()> {
        let total = self.point_total();
        if total > POINT_BUDGET {
            return Err(BattleError::AttributeBudgetExceeded {
                tag: self.tag.clone(),
                total,
                budget: POINT_BUDGET,
            });
        }
        Ok(())
    }
}

/// Weapon class carried by a projectile. Reporting only: damage is fixed on
/// the projectile at creation and is never derived from the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponClass {
    Normal,
    Supersonic,
    Missile,
    DoubleShot,
    Nuclear,
}

impl WeaponClass {
    /// Grid symbol for a projectile of this class travelling in `dir`.
    pub fn symbol(self, dir: i32) -> &'static str {
        match (self, dir >= 0) {
            (WeaponClass::Normal, true) => "->",
            (WeaponClass::Normal, false) => "<-",
            (WeaponClass::Supersonic, true) => ">>",
            (WeaponClass::Supersonic, false) => "<<",
            (WeaponClass::Missile, true) => "=>",
            (WeaponClass::Missile, false) => "<=",
            (WeaponClass::DoubleShot, true) => "=>",
            (WeaponClass::DoubleShot, false) => "<=",
            (WeaponClass::Nuclear, true) => "-N->",
            (WeaponClass::Nuclear, false) => "<-N-",
        }
    }
}

impl std::fmt::Display for WeaponClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WeaponClass::Normal => "normal shot",
            WeaponClass::Supersonic => "supersonic shot",
            WeaponClass::Missile => "special missile",
            WeaponClass::DoubleShot => "double shot",
            WeaponClass::Nuclear => "nuclear missile",
        };
        write!(f, "{name}")
    }
}

/// One in-flight shot. Damage is fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projectile {
    pub x: i32,
    pub altitude: i32,
    /// Horizontal direction, +1 or -1.
    pub dir: i32,
    /// Cells travelled per turn.
    pub speed: i32,
    pub class: WeaponClass,
    pub damage: i32,
    /// Which side fired it; used for stats and reporting.
    pub owner: TeamId,
}

impl Projectile {
    pub fn advance(&mut self) {
        self.x += self.dir * self.speed;
    }

    pub fn is_out_of_bounds(&self, screen_width: i32) -> bool {
        self.x < 0 || self.x >= screen_width
    }
}

/// One combatant's mutable battle state. Owned exclusively by the battle
/// engine; controllers receive a mutable handle for the duration of a single
/// call and never retain it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitState {
    pub team: TeamId,
    pub profile: AttributeProfile,
    pub health: i32,
    pub x: i32,
    /// Vertical lane index in [0, max_altitude].
    pub altitude: i32,
    pub max_altitude: i32,
    /// Shared cooldown counter gating the missile and nuclear weapons.
    pub missile_cooldown: u32,
    /// Altitude for the second projectile of a double shot; consumed exactly
    /// once by the engine after a successful double-shot call.
    pub pending_second_altitude: Option<i32>,
}

impl UnitState {
    pub fn new(
        team: TeamId,
        profile: AttributeProfile,
        health: i32,
        x: i32,
        altitude: i32,
        max_altitude: i32,
    ) -> Result<Self> {
        profile.validate()?;
        Ok(Self {
            team,
            profile,
            health,
            x,
            altitude,
            max_altitude,
            missile_cooldown: 0,
            pending_second_altitude: None,
        })
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Apply raw damage through defense mitigation. Mitigation can reduce the
    /// hit to zero but never heals.
    pub fn take_damage(&mut self, raw: i32) {
        let mitigated = (raw - self.profile.defense as i32 / DEFENSE_DIVISOR).max(0);
        self.health -= mitigated;
    }

    /// One-shot read of the pending secondary-shot altitude.
    pub fn take_pending_second_altitude(&mut self) -> Option<i32> {
        self.pending_second_altitude.take()
    }
}

/// Immutable configuration for one battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleConfig {
    pub seed: u64,
    pub screen_width: i32,
    pub battlefield_height: i32,
    pub team1_start_x: i32,
    pub team2_start_x: i32,
    pub team1_health: i32,
    pub team2_health: i32,
    /// Safety limit for unbounded battles; exhaustion reports `Cancelled`.
    pub max_turns: Option<u32>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            screen_width: DEFAULT_SCREEN_WIDTH,
            battlefield_height: DEFAULT_BATTLEFIELD_HEIGHT,
            team1_start_x: DEFAULT_START_MARGIN,
            team2_start_x: DEFAULT_SCREEN_WIDTH - DEFAULT_START_MARGIN,
            team1_health: DEFAULT_HEALTH,
            team2_health: DEFAULT_HEALTH,
            max_turns: None,
        }
    }
}

impl BattleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.screen_width < 1 {
            return Err(BattleError::Configuration(format!(
                "screen width must be >= 1, got {}",
                self.screen_width
            )));
        }
        if self.battlefield_height < 1 {
            return Err(BattleError::Configuration(format!(
                "battlefield height must be >= 1, got {}",
                self.battlefield_height
            )));
        }
        for (team, x) in [
            (TeamId::Team1, self.team1_start_x),
            (TeamId::Team2, self.team2_start_x),
        ] {
            if x < 0 || x >= self.screen_width {
                return Err(BattleError::Configuration(format!(
                    "{team} start position {x} outside [0, {})",
                    self.screen_width
                )));
            }
        }
        for (team, health) in [
            (TeamId::Team1, self.team1_health),
            (TeamId::Team2, self.team2_health),
        ] {
            if health <= 0 {
                return Err(BattleError::Configuration(format!(
                    "{team} initial health must be > 0, got {health}"
                )));
            }
        }
        Ok(())
    }

    pub fn start_x(&self, team: TeamId) -> i32 {
        match team {
            TeamId::Team1 => self.team1_start_x,
            TeamId::Team2 => self.team2_start_x,
        }
    }

    pub fn initial_health(&self, team: TeamId) -> i32 {
        match team {
            TeamId::Team1 => self.team1_health,
            TeamId::Team2 => self.team2_health,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(tag: &str) -> AttributeProfile {
        AttributeProfile::balanced(tag)
    }

    #[test]
    fn test_balanced_profile_fills_budget() {
        let p = profile("T1");
        assert_eq!(p.point_total(), POINT_BUDGET);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_budget_exceeded_fails_construction() {
        let mut p = profile("T1");
        p.speed += 1; // 101 points
        assert_eq!(p.point_total(), 101);
        let err = UnitState::new(TeamId::Team1, p, 100, 0, 0, 2).unwrap_err();
        assert!(matches!(
            err,
            BattleError::AttributeBudgetExceeded { total: 101, .. }
        ));
    }

    #[test]
    fn test_take_damage_mitigation() {
        let mut unit = UnitState::new(TeamId::Team1, profile("T1"), 100, 0, 0, 2).unwrap();
        // defense 15 -> mitigates 1 point
        unit.take_damage(10);
        assert_eq!(unit.health, 91);
    }

    #[test]
    fn test_take_damage_floor_clamped_never_heals() {
        let mut unit = UnitState::new(TeamId::Team1, profile("T1"), 100, 0, 0, 2).unwrap();
        unit.take_damage(1); // raw <= defense/10
        assert_eq!(unit.health, 100);
        unit.take_damage(0);
        assert_eq!(unit.health, 100);
        unit.take_damage(-50);
        assert_eq!(unit.health, 100);
    }

    #[test]
    fn test_pending_second_altitude_is_one_shot() {
        let mut unit = UnitState::new(TeamId::Team1, profile("T1"), 100, 0, 0, 2).unwrap();
        unit.pending_second_altitude = Some(1);
        assert_eq!(unit.take_pending_second_altitude(), Some(1));
        assert_eq!(unit.take_pending_second_altitude(), None);
    }

    #[test]
    fn test_projectile_bounds() {
        let mut p = Projectile {
            x: 98,
            altitude: 0,
            dir: 1,
            speed: 2,
            class: WeaponClass::Supersonic,
            damage: 20,
            owner: TeamId::Team1,
        };
        assert!(!p.is_out_of_bounds(100));
        p.advance();
        assert_eq!(p.x, 100);
        assert!(p.is_out_of_bounds(100));
    }

    #[test]
    fn test_config_validation() {
        assert!(BattleConfig::default().validate().is_ok());

        let bad_width = BattleConfig {
            screen_width: 0,
            ..Default::default()
        };
        assert!(matches!(
            bad_width.validate(),
            Err(BattleError::Configuration(_))
        ));

        let bad_height = BattleConfig {
            battlefield_height: 0,
            ..Default::default()
        };
        assert!(bad_height.validate().is_err());

        let bad_start = BattleConfig {
            team2_start_x: 100,
            ..Default::default()
        };
        assert!(bad_start.validate().is_err());

        let bad_health = BattleConfig {
            team1_health: 0,
            ..Default::default()
        };
        assert!(bad_health.validate().is_err());
    }
}
