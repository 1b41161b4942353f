// Attribute budget
pub const POINT_BUDGET: u32 = 100;

// Firing decision: a unit fires when rand(0..FIRE_ROLL_RANGE) < fire_rate
pub const FIRE_ROLL_RANGE: u32 = 10;

// Weapon selection: one draw in [0, WEAPON_ROLL_RANGE), brackets evaluated
// top-down with closed gates falling through to the next matching bracket
pub const WEAPON_ROLL_RANGE: u32 = 100;
pub const NUCLEAR_THRESHOLD: u32 = 5;
pub const DOUBLE_SHOT_THRESHOLD: u32 = 15;
pub const MISSILE_THRESHOLD: u32 = 30;
pub const SUPERSONIC_THRESHOLD: u32 = 60;

// Stealth evasion: a hit lands when rand(0..STEALTH_ROLL_RANGE) >= stealth_chance
pub const STEALTH_ROLL_RANGE: u32 = 100;

// Projectile speeds in cells per turn
pub const NORMAL_SHOT_SPEED: i32 = 1;
pub const SUPERSONIC_SHOT_SPEED: i32 = 2;
pub const MISSILE_SHOT_SPEED: i32 = 1;
pub const DOUBLE_SHOT_SPEED: i32 = 1;
pub const NUCLEAR_SHOT_SPEED: i32 = 1;

// Cooldowns (turns the shared missile counter blocks reuse)
pub const MISSILE_COOLDOWN_TURNS: u32 = 3;
pub const NUCLEAR_COOLDOWN_TURNS: u32 = 5;

// Nuclear payload multiplier over the nuclear_power attribute
pub const NUCLEAR_DAMAGE_MULTIPLIER: i32 = 2;

// Defense mitigation divisor: effective damage = raw - defense / DEFENSE_DIVISOR
pub const DEFENSE_DIVISOR: i32 = 10;

// Default arena
pub const DEFAULT_SCREEN_WIDTH: i32 = 100;
pub const DEFAULT_BATTLEFIELD_HEIGHT: i32 = 3;
pub const DEFAULT_START_MARGIN: i32 = 2;
pub const DEFAULT_HEALTH: i32 = 100;
