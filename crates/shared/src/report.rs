use serde::{Deserialize, Serialize};

use crate::types::{BattleConfig, Projectile, TeamId, UnitState, WeaponClass};

/// Terminal result of one battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Team1Won,
    Team2Won,
    Cancelled,
}

impl BattleOutcome {
    pub fn winner(self) -> Option<TeamId> {
        match self {
            BattleOutcome::Team1Won => Some(TeamId::Team1),
            BattleOutcome::Team2Won => Some(TeamId::Team2),
            BattleOutcome::Cancelled => None,
        }
    }
}

/// Textual event notice produced during one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// `team` launched a nuclear missile.
    NuclearLaunched { team: TeamId },
    /// `team` fired both projectiles of a double shot.
    DoubleShotFired { team: TeamId },
    /// `team` was struck; `damage` is the raw payload before mitigation.
    Hit {
        team: TeamId,
        weapon: WeaponClass,
        damage: i32,
    },
    /// `team` evaded an incoming projectile via its stealth roll.
    Dodged { team: TeamId },
    /// Informational: the dodging `team` has radar and detected the shot.
    Detected { team: TeamId },
}

impl std::fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BattleEvent::NuclearLaunched { team } => {
                write!(f, "!!! {team} launched a NUCLEAR MISSILE!")
            }
            BattleEvent::DoubleShotFired { team } => {
                write!(f, ">>> {team} fired a DOUBLE SHOT!")
            }
            BattleEvent::Hit { team, weapon, damage } => {
                write!(f, "*** {team} was hit by a {weapon}! -{damage} points")
            }
            BattleEvent::Dodged { team } => write!(f, "--- {team} dodged!"),
            BattleEvent::Detected { team } => {
                write!(f, "... {team} radar detected the projectile!")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub team: TeamId,
    pub tag: String,
    pub health: i32,
    pub x: i32,
    pub altitude: i32,
}

impl From<&UnitState> for UnitSnapshot {
    fn from(u: &UnitState) -> Self {
        Self {
            team: u.team,
            tag: u.profile.tag.clone(),
            health: u.health,
            x: u.x,
            altitude: u.altitude,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub x: i32,
    pub altitude: i32,
    pub dir: i32,
    pub class: WeaponClass,
    pub owner: TeamId,
}

impl From<&Projectile> for ProjectileSnapshot {
    fn from(p: &Projectile) -> Self {
        Self {
            x: p.x,
            altitude: p.altitude,
            dir: p.dir,
            class: p.class,
            owner: p.owner,
        }
    }
}

/// Rendering of one finished turn: the battlefield grid plus numeric
/// summaries and the turn's event notices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnSnapshot {
    pub turn: u32,
    /// `battlefield_height` rows of `screen_width` cell tags; blank cells
    /// hold a single space. Units are drawn over projectiles.
    pub grid: Vec<Vec<String>>,
    pub units: [UnitSnapshot; 2],
    pub projectiles: Vec<ProjectileSnapshot>,
    pub events: Vec<BattleEvent>,
}

/// Aggregate shot/hit counters, updated every turn.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BattleStats {
    pub team1_shots: u32,
    pub team2_shots: u32,
    pub team1_hits: u32,
    pub team2_hits: u32,
    pub team1_health: i32,
    pub team2_health: i32,
}

impl BattleStats {
    pub fn record_shot(&mut self, team: TeamId) {
        match team {
            TeamId::Team1 => self.team1_shots += 1,
            TeamId::Team2 => self.team2_shots += 1,
        }
    }

    /// Record a landed hit for the side that fired.
    pub fn record_hit(&mut self, owner: TeamId) {
        match owner {
            TeamId::Team1 => self.team1_hits += 1,
            TeamId::Team2 => self.team2_hits += 1,
        }
    }
}

/// Full record of one battle: every turn snapshot plus the outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleReport {
    pub config: BattleConfig,
    pub snapshots: Vec<TurnSnapshot>,
    pub outcome: BattleOutcome,
    pub final_turn: u32,
    pub stats: BattleStats,
}
