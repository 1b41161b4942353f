use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use skyduel_shared::*;

use crate::controller::UnitController;
use crate::reporter::TurnReporter;

/// Cooperative stop signal, checked at the top of every turn. Cancellation
/// ends the battle with [`BattleOutcome::Cancelled`] after the last emitted
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Weapon bracket for one selection draw in `[0, WEAPON_ROLL_RANGE)`,
/// evaluated top-down. A gated bracket whose weapon is unavailable falls
/// through to the next matching one; normal fire is the final fallback.
pub fn select_weapon(shot_type: u32, profile: &AttributeProfile) -> WeaponClass {
    if shot_type < NUCLEAR_THRESHOLD && profile.nuclear_power > 0 {
        WeaponClass::Nuclear
    } else if shot_type < DOUBLE_SHOT_THRESHOLD && profile.double_shot_power > 0 {
        WeaponClass::DoubleShot
    } else if shot_type < MISSILE_THRESHOLD {
        WeaponClass::Missile
    } else if shot_type < SUPERSONIC_THRESHOLD {
        WeaponClass::Supersonic
    } else {
        WeaponClass::Normal
    }
}

/// Full state of one battle: two units, the in-flight projectile collection,
/// and the single pseudo-random source driving fire, weapon, and stealth
/// rolls. Owned by exactly one thread for the lifetime of the battle.
#[derive(Debug, Clone)]
pub struct BattleState {
    pub config: BattleConfig,
    pub units: [UnitState; 2],
    pub projectiles: Vec<Projectile>,
    pub turn: u32,
    pub stats: BattleStats,
    rng: ChaCha8Rng,
}

impl BattleState {
    /// Validate the arena parameters and both attribute profiles, then build
    /// the initial state. Units spawn at mid-field altitude.
    pub fn new(config: &BattleConfig, profiles: [AttributeProfile; 2]) -> Result<Self> {
        config.validate()?;
        let max_altitude = config.battlefield_height - 1;
        let start_altitude = config.battlefield_height / 2;
        let [profile1, profile2] = profiles;
        let units = [
            UnitState::new(
                TeamId::Team1,
                profile1,
                config.team1_health,
                config.team1_start_x,
                start_altitude,
                max_altitude,
            )?,
            UnitState::new(
                TeamId::Team2,
                profile2,
                config.team2_health,
                config.team2_start_x,
                start_altitude,
                max_altitude,
            )?,
        ];
        let stats = BattleStats {
            team1_health: config.team1_health,
            team2_health: config.team2_health,
            ..Default::default()
        };
        Ok(Self {
            units,
            projectiles: Vec::new(),
            turn: 0,
            stats,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config: config.clone(),
        })
    }

    /// The loop invariant is "both units are alive". Team 1's death is
    /// checked first, so team 2 takes the win when both die in one pass.
    pub fn outcome_if_terminal(&self) -> Option<BattleOutcome> {
        if !self.units[0].is_alive() {
            Some(BattleOutcome::Team2Won)
        } else if !self.units[1].is_alive() {
            Some(BattleOutcome::Team1Won)
        } else {
            None
        }
    }

    /// Advance one full turn: radar hooks, movement, altitude change, firing
    /// decisions, projectile advance and collision, damage application.
    pub fn step(
        &mut self,
        team1: &mut dyn UnitController,
        team2: &mut dyn UnitController,
    ) -> Result<Vec<BattleEvent>> {
        self.turn += 1;
        let mut events = Vec::new();
        let width = self.config.screen_width;
        let height = self.config.battlefield_height;
        let mut controllers: [&mut dyn UnitController; 2] = [team1, team2];

        let fault = |index: usize, source: ControllerError| BattleError::ControllerFault {
            team: TeamId::from_index(index),
            source,
        };

        // Radar phase: each controller sees the projectile list and the
        // opponent's position
        for i in 0..2 {
            let enemy = (self.units[1 - i].x, self.units[1 - i].altitude);
            let units = &mut self.units;
            let projectiles = &self.projectiles;
            controllers[i]
                .radar_scan(&mut units[i], projectiles, enemy.0, enemy.1)
                .map_err(|e| fault(i, e))?;
        }

        // Movement
        for i in 0..2 {
            let delta = controllers[i]
                .maneuver(&self.units[i])
                .map_err(|e| fault(i, e))?;
            let unit = &mut self.units[i];
            unit.x = (unit.x + delta).clamp(0, width - 1);
        }

        // Altitude change: the controller owns its unit's altitude; re-clamp
        // in case the field shrank since the unit was created
        for i in 0..2 {
            controllers[i]
                .change_altitude(&mut self.units[i])
                .map_err(|e| fault(i, e))?;
            let unit = &mut self.units[i];
            unit.altitude = unit.altitude.clamp(0, height - 1);
        }

        // Firing decision, per unit independently
        for i in 0..2 {
            let team = TeamId::from_index(i);
            if self.rng.gen_range(0..FIRE_ROLL_RANGE) >= self.units[i].profile.fire_rate {
                continue;
            }
            let shot_type = self.rng.gen_range(0..WEAPON_ROLL_RANGE);
            let dir = team.direction();
            let x = self.units[i].x;
            let choice = select_weapon(shot_type, &self.units[i].profile);

            let mut spawned: Vec<Projectile> = Vec::new();
            {
                let unit = &mut self.units[i];
                let ctl = &mut controllers[i];
                let shot = match choice {
                    WeaponClass::Nuclear => {
                        let shot = ctl.nuclear_missile(unit, x, dir).map_err(|e| fault(i, e))?;
                        if shot.is_some() {
                            events.push(BattleEvent::NuclearLaunched { team });
                        }
                        shot
                    }
                    WeaponClass::DoubleShot => {
                        let shot = ctl.double_shot(unit, x, dir).map_err(|e| fault(i, e))?;
                        if shot.is_some() {
                            events.push(BattleEvent::DoubleShotFired { team });
                            // The engine builds the secondary projectile from
                            // the pending altitude, consumed exactly once
                            if let Some(alt) = unit.take_pending_second_altitude() {
                                if (0..height).contains(&alt) {
                                    spawned.push(Projectile {
                                        x,
                                        altitude: alt,
                                        dir,
                                        speed: DOUBLE_SHOT_SPEED,
                                        class: WeaponClass::DoubleShot,
                                        damage: unit.profile.double_shot_power as i32,
                                        owner: team,
                                    });
                                }
                            }
                        }
                        shot
                    }
                    WeaponClass::Missile => {
                        ctl.special_missile(unit, x, dir).map_err(|e| fault(i, e))?
                    }
                    WeaponClass::Supersonic => {
                        ctl.shoot_supersonic(unit, x, dir).map_err(|e| fault(i, e))?
                    }
                    WeaponClass::Normal => ctl.shoot(unit, x, dir).map_err(|e| fault(i, e))?,
                };
                if let Some(mut projectile) = shot {
                    projectile.altitude = projectile.altitude.clamp(0, height - 1);
                    spawned.push(projectile);
                }
            }
            for projectile in spawned {
                self.stats.record_shot(team);
                self.projectiles.push(projectile);
            }
        }

        self.resolve_projectiles(&mut events);

        self.stats.team1_health = self.units[0].health;
        self.stats.team2_health = self.units[1].health;

        Ok(events)
    }

    /// Advance every in-flight projectile and resolve collisions by exact
    /// position + altitude equality. Team 1 is tested first and a projectile
    /// is removed on its first match, so it can never hit both units in one
    /// turn. Out-of-bounds projectiles vanish without effect.
    fn resolve_projectiles(&mut self, events: &mut Vec<BattleEvent>) {
        let width = self.config.screen_width;
        let mut i = 0;
        while i < self.projectiles.len() {
            self.projectiles[i].advance();
            let projectile = self.projectiles[i];

            let mut collided = false;
            for t in 0..2 {
                if projectile.x != self.units[t].x || projectile.altitude != self.units[t].altitude
                {
                    continue;
                }
                let team = TeamId::from_index(t);
                let stealth = self.units[t].profile.stealth_chance;
                if self.rng.gen_range(0..STEALTH_ROLL_RANGE) >= stealth {
                    self.units[t].take_damage(projectile.damage);
                    self.stats.record_hit(projectile.owner);
                    events.push(BattleEvent::Hit {
                        team,
                        weapon: projectile.class,
                        damage: projectile.damage,
                    });
                } else {
                    events.push(BattleEvent::Dodged { team });
                    if self.units[t].profile.radar > 0 {
                        events.push(BattleEvent::Detected { team });
                    }
                }
                collided = true;
                break;
            }

            if collided || projectile.is_out_of_bounds(width) {
                self.projectiles.remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Render the battlefield grid plus numeric summaries for this turn.
    /// Units are drawn over projectiles occupying the same cell.
    pub fn snapshot(&self, events: Vec<BattleEvent>) -> TurnSnapshot {
        let width = self.config.screen_width as usize;
        let height = self.config.battlefield_height as usize;
        let mut grid = vec![vec![" ".to_string(); width]; height];
        for p in &self.projectiles {
            if (0..height as i32).contains(&p.altitude) && (0..width as i32).contains(&p.x) {
                grid[p.altitude as usize][p.x as usize] = p.class.symbol(p.dir).to_string();
            }
        }
        for unit in &self.units {
            grid[unit.altitude as usize][unit.x as usize] = unit.profile.tag.clone();
        }
        TurnSnapshot {
            turn: self.turn,
            grid,
            units: [
                UnitSnapshot::from(&self.units[0]),
                UnitSnapshot::from(&self.units[1]),
            ],
            projectiles: self.projectiles.iter().map(ProjectileSnapshot::from).collect(),
            events,
        }
    }

    /// Run the turn loop to completion. Checked at the top of every turn, in
    /// order: the termination rule, the cancel token, and the optional
    /// `max_turns` safety limit. A snapshot is streamed to the reporter and
    /// recorded every turn, win or not.
    pub fn run(
        mut self,
        team1: &mut dyn UnitController,
        team2: &mut dyn UnitController,
        reporter: &mut dyn TurnReporter,
        cancel: &CancelToken,
    ) -> Result<BattleReport> {
        debug!(seed = self.config.seed, "battle started");
        let mut snapshots = Vec::new();

        let outcome = loop {
            if let Some(outcome) = self.outcome_if_terminal() {
                break outcome;
            }
            if cancel.is_cancelled() {
                break BattleOutcome::Cancelled;
            }
            if self.config.max_turns.is_some_and(|limit| self.turn >= limit) {
                break BattleOutcome::Cancelled;
            }

            let events = self.step(team1, team2)?;
            let snapshot = self.snapshot(events);
            reporter.report_turn(&snapshot);
            snapshots.push(snapshot);
        };

        info!(?outcome, final_turn = self.turn, "battle finished");
        Ok(BattleReport {
            config: self.config,
            snapshots,
            outcome,
            final_turn: self.turn,
            stats: self.stats,
        })
    }
}

/// Run one deterministic battle between two controllers.
pub fn run_battle(
    config: &BattleConfig,
    profiles: [AttributeProfile; 2],
    team1: &mut dyn UnitController,
    team2: &mut dyn UnitController,
    reporter: &mut dyn TurnReporter,
    cancel: &CancelToken,
) -> Result<BattleReport> {
    BattleState::new(config, profiles)?.run(team1, team2, reporter, cancel)
}
