//! Leveled card stats.

use serde::Deserialize;

/// Lowest level a stat can have.
pub const MIN_LEVEL: u8 = 1;
/// Highest level a stat can have.
pub const MAX_LEVEL: u8 = 5;

/// A leveled numeric value with linear scaling.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Stat {
    pub level: u8,
    pub base_value: f32,
    pub value_per_level: f32,
}

impl Stat {
    /// Create a stat, clamping `level` into `[MIN_LEVEL, MAX_LEVEL]`.
    pub fn new(level: u8, base_value: f32, value_per_level: f32) -> Self {
        Self {
            level: level.clamp(MIN_LEVEL, MAX_LEVEL),
            base_value,
            value_per_level,
        }
    }

    /// A level-1 stat that never scales.
    pub fn flat(value: f32) -> Self {
        Self::new(MIN_LEVEL, value, 0.0)
    }

    pub fn value(&self) -> f32 {
        self.base_value + (self.level.saturating_sub(1)) as f32 * self.value_per_level
    }

    /// Raise the level by one. Returns false when already at `MAX_LEVEL`.
    pub fn level_up(&mut self) -> bool {
        if self.level >= MAX_LEVEL {
            return false;
        }
        self.level += 1;
        true
    }

    /// Whether the level is inside the allowed range.
    pub fn is_level_valid(&self) -> bool {
        (MIN_LEVEL..=MAX_LEVEL).contains(&self.level)
    }

    /// Clamp an out-of-range level loaded from data.
    pub fn clamp_level(&mut self) {
        self.level = self.level.clamp(MIN_LEVEL, MAX_LEVEL);
    }
}

/// The stats of one card archetype.
///
/// This is a plain value: every card gets its own copy, so upgrades applied to the
/// thrower afterwards never reach cards already in flight.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StatBlock {
    /// Travel speed in units per second
    pub speed: Stat,
    /// Damage before the damage modifier and critical roll
    pub damage: Stat,
    /// Splash radius around the impact point
    pub explosion_radius: Stat,
    /// Probability (0.0 to 1.0) that a hit is critical
    pub critical_chance: Stat,
    /// Steering rate toward the nearest enemy; 0 disables homing
    pub homing_strength: Stat,
}

impl StatBlock {
    /// Clamp every stat level into range. Returns true if anything changed.
    pub fn sanitize(&mut self) -> bool {
        let mut changed = false;
        for stat in self.stats_mut() {
            if !stat.is_level_valid() {
                stat.clamp_level();
                changed = true;
            }
        }
        changed
    }

    fn stats_mut(&mut self) -> [&mut Stat; 5] {
        [
            &mut self.speed,
            &mut self.damage,
            &mut self.explosion_radius,
            &mut self.critical_chance,
            &mut self.homing_strength,
        ]
    }
}

impl Default for StatBlock {
    fn default() -> Self {
        Self {
            speed: Stat::new(1, 14.0, 1.0),
            damage: Stat::new(1, 10.0, 2.0),
            explosion_radius: Stat::new(1, 1.2, 0.2),
            critical_chance: Stat::new(1, 0.1, 0.05),
            homing_strength: Stat::flat(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_scales_linearly_with_level() {
        for level in MIN_LEVEL..=MAX_LEVEL {
            let stat = Stat::new(level, 3.0, 0.5);
            let expected = 3.0 + (level - 1) as f32 * 0.5;
            assert_eq!(stat.value(), expected, "level {level}");
        }
    }

    #[test]
    fn new_clamps_level_into_range() {
        assert_eq!(Stat::new(0, 1.0, 1.0).level, MIN_LEVEL);
        assert_eq!(Stat::new(9, 1.0, 1.0).level, MAX_LEVEL);
    }

    #[test]
    fn level_up_stops_at_max() {
        let mut stat = Stat::new(4, 1.0, 1.0);
        assert!(stat.level_up());
        assert_eq!(stat.value(), 5.0);
        assert!(!stat.level_up());
        assert_eq!(stat.level, MAX_LEVEL);
    }

    #[test]
    fn copied_block_does_not_follow_source() {
        let mut source = StatBlock::default();
        let copy = source.clone();
        assert_eq!(copy, source);

        source.damage.level_up();
        source.speed.base_value = 99.0;

        assert_eq!(copy.damage.value(), StatBlock::default().damage.value());
        assert_eq!(copy.speed.base_value, 14.0);
        assert_ne!(copy, source);
    }

    #[test]
    fn sanitize_reports_clamped_levels() {
        let mut block = StatBlock::default();
        assert!(!block.sanitize());
        block.damage.level = 7;
        assert!(block.sanitize());
        assert_eq!(block.damage.level, MAX_LEVEL);
    }
}
