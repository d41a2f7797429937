//! Impact effects: splash damage, poison, stun, chain lightning and vampire healing.
//!
//! The functions here only talk to the game through [`ImpactWorld`], which the ECS
//! layer implements over queries and tests implement over plain vectors.

use bevy::prelude::*;

use super::config::{CardConfig, ChainSettings};
use super::variant::{CardUpgrades, CardVariant};

/// Seconds between two poison ticks.
pub const POISON_TICK_INTERVAL: f32 = 0.5;

/// Capabilities an impact needs from the world.
pub trait ImpactWorld {
    type Target: Copy + PartialEq;

    /// Every entity that could be hit, with its position.
    fn candidates(&self) -> Vec<(Self::Target, Vec3)>;

    /// Apply damage. Returns the damage actually taken, or `None` if the target
    /// cannot be damaged.
    fn apply_damage(&mut self, target: Self::Target, amount: f32) -> Option<f32>;

    /// Attach or replace a poison effect. Returns false if the target cannot be poisoned.
    fn apply_poison(&mut self, target: Self::Target, poison: PoisonEffect) -> bool;

    /// Stun the target for `duration`, restarting any running stun. Returns false if the
    /// target cannot be stunned.
    fn apply_stun(&mut self, target: Self::Target, duration: f32) -> bool;

    /// Heal the target. Returns the amount actually healed, or `None` if it cannot heal.
    fn heal(&mut self, target: Self::Target, amount: f32) -> Option<f32>;

    /// Entities whose distance to `point` is at most `radius`.
    fn entities_within_radius(&self, point: Vec3, radius: f32) -> Vec<Self::Target> {
        self.candidates()
            .into_iter()
            .filter(|(_, position)| within_radius(point, *position, radius))
            .map(|(target, _)| target)
            .collect()
    }
}

/// Inclusive circular test on the ground plane.
pub fn within_radius(center: Vec3, point: Vec3, radius: f32) -> bool {
    (point - center).with_y(0.0).length_squared() <= radius * radius
}

/// The closest candidate within `radius` of `point` that passes `filter`.
pub fn nearest_within<T: Copy>(
    point: Vec3,
    radius: f32,
    candidates: impl IntoIterator<Item = (T, Vec3)>,
    mut filter: impl FnMut(T) -> bool,
) -> Option<(T, Vec3)> {
    candidates
        .into_iter()
        .filter(|(target, position)| within_radius(point, *position, radius) && filter(*target))
        .min_by(|(_, a), (_, b)| {
            let da = (*a - point).with_y(0.0).length_squared();
            let db = (*b - point).with_y(0.0).length_squared();
            da.total_cmp(&db)
        })
}

/// A running damage-over-time effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoisonEffect {
    pub dps: f32,
    pub duration: f32,
    elapsed_in_tick: f32,
    ticks_done: u32,
}

impl PoisonEffect {
    pub fn new(dps: f32, duration: f32) -> Self {
        Self {
            dps,
            duration: duration.max(0.0),
            elapsed_in_tick: 0.0,
            ticks_done: 0,
        }
    }

    /// Ticks that land within `duration`; none fires after the poison ends.
    pub fn total_ticks(&self) -> u32 {
        (self.duration / POISON_TICK_INTERVAL + 1e-4).floor() as u32
    }

    pub fn damage_per_tick(&self) -> f32 {
        self.dps * POISON_TICK_INTERVAL
    }

    /// Advance by `dt` and return the damage due this step.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let mut damage = 0.0;
        self.elapsed_in_tick += dt;
        while self.elapsed_in_tick >= POISON_TICK_INTERVAL && !self.is_finished() {
            self.elapsed_in_tick -= POISON_TICK_INTERVAL;
            self.ticks_done += 1;
            damage += self.damage_per_tick();
        }
        damage
    }

    pub fn is_finished(&self) -> bool {
        self.ticks_done >= self.total_ticks()
    }
}

/// One card hitting something.
#[derive(Debug, Clone, Copy)]
pub struct Impact<T> {
    pub variant: CardVariant,
    pub position: Vec3,
    /// Entity the card collided with; always takes the hit
    pub struck: Option<T>,
    /// Thrower, healed by vampire upgrades
    pub shooter: Option<T>,
    /// Result of the single damage roll for this impact
    pub damage: u32,
    pub radius: f32,
    pub upgrades: CardUpgrades,
}

/// What an impact did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImpactReport {
    pub splash_damage: f32,
    pub chain_damage: f32,
    pub targets_hit: usize,
    pub poisoned: usize,
    pub stunned: usize,
    pub healed: f32,
}

impl ImpactReport {
    pub fn total_damage(&self) -> f32 {
        self.splash_damage + self.chain_damage
    }
}

/// Explosion radius of a card, widened by the variant's Area of Effect upgrade.
pub fn impact_radius(base_radius: f32, upgrades: &CardUpgrades, config: &CardConfig) -> f32 {
    if upgrades.area_of_effect {
        base_radius * config.aoe_radius_multiplier
    } else {
        base_radius
    }
}

/// Damage every damageable entity within `radius`, plus the struck entity.
///
/// Returns the targets that took damage and the summed damage actually applied.
pub fn apply_splash_damage<W: ImpactWorld>(
    world: &mut W,
    position: Vec3,
    radius: f32,
    damage: f32,
    struck: Option<W::Target>,
) -> (Vec<W::Target>, f32) {
    let mut targets = world.entities_within_radius(position, radius);
    if let Some(struck) = struck {
        if !targets.contains(&struck) {
            targets.insert(0, struck);
        }
    }

    let mut hit = Vec::with_capacity(targets.len());
    let mut total = 0.0;
    for target in targets {
        if let Some(dealt) = world.apply_damage(target, damage) {
            total += dealt;
            hit.push(target);
        }
    }
    (hit, total)
}

pub fn apply_poison<W: ImpactWorld>(world: &mut W, target: W::Target, dps: f32, duration: f32) -> bool {
    world.apply_poison(target, PoisonEffect::new(dps, duration))
}

pub fn apply_stun<W: ImpactWorld>(world: &mut W, target: W::Target, duration: f32) -> bool {
    world.apply_stun(target, duration)
}

/// Heal amount for a vampire hit: at least 1 whenever any damage was dealt.
pub fn vampire_heal_amount(total_damage: f32, heal_percent: f32) -> f32 {
    if total_damage <= 0.0 {
        return 0.0;
    }
    (total_damage * heal_percent).round().max(1.0)
}

/// Heal the shooter by a share of the damage dealt. Returns the amount healed.
pub fn apply_vampire<W: ImpactWorld>(
    world: &mut W,
    shooter: W::Target,
    total_damage: f32,
    heal_percent: f32,
) -> f32 {
    let amount = vampire_heal_amount(total_damage, heal_percent);
    if amount <= 0.0 {
        return 0.0;
    }
    match world.heal(shooter, amount) {
        Some(healed) => healed,
        None => {
            warn!("Vampire heal skipped: shooter cannot be healed");
            0.0
        }
    }
}

/// Arc from `from` to the nearest enemies not hit yet.
///
/// Returns the targets struck by arcs and the damage dealt.
pub fn apply_chain_lightning<W: ImpactWorld>(
    world: &mut W,
    from: Vec3,
    already_hit: &[W::Target],
    damage: f32,
    settings: &ChainSettings,
) -> (Vec<W::Target>, f32) {
    let arc_damage = (damage * settings.damage_fraction).round().max(1.0);
    let mut excluded: Vec<W::Target> = already_hit.to_vec();
    let mut chained = Vec::new();
    let mut point = from;
    let mut total = 0.0;

    for _ in 0..settings.jumps {
        let candidates = world.candidates();
        let Some((target, position)) =
            nearest_within(point, settings.range, candidates, |t| !excluded.contains(&t))
        else {
            break;
        };
        excluded.push(target);
        if let Some(dealt) = world.apply_damage(target, arc_damage) {
            total += dealt;
            chained.push(target);
            point = position;
        }
    }

    (chained, total)
}

/// Resolve an impact in a fixed order: damage, secondary effects, vampire heal.
pub fn resolve_impact<W: ImpactWorld>(world: &mut W, impact: &Impact<W::Target>, config: &CardConfig) -> ImpactReport {
    let mut report = ImpactReport::default();
    let damage = impact.damage as f32;

    let (hit, splash_total) =
        apply_splash_damage(world, impact.position, impact.radius, damage, impact.struck);
    report.splash_damage = splash_total;
    report.targets_hit = hit.len();

    if impact.upgrades.poison {
        for target in &hit {
            if apply_poison(world, *target, config.poison.dps, config.poison.duration) {
                report.poisoned += 1;
            }
        }
    }

    if impact.upgrades.stun {
        for target in &hit {
            if apply_stun(world, *target, config.stun_duration) {
                report.stunned += 1;
            }
        }
    }

    if impact.upgrades.chain_lightning {
        let (chained, chain_total) =
            apply_chain_lightning(world, impact.position, &hit, damage, &config.chain);
        report.chain_damage = chain_total;
        report.targets_hit += chained.len();
    }

    if impact.upgrades.vampire {
        match impact.shooter {
            Some(shooter) => {
                report.healed =
                    apply_vampire(world, shooter, report.total_damage(), config.vampire_heal_percent);
            }
            None => warn!("{} card has vampire but no shooter to heal", impact.variant.name()),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Dummy {
        position: Vec3,
        health: Option<f32>,
        poison: Option<PoisonEffect>,
        stun: Option<f32>,
    }

    /// In-memory world: indices into `entities` are targets.
    #[derive(Default)]
    struct TestWorld {
        entities: Vec<Dummy>,
        damage_calls: Vec<usize>,
        log: Vec<&'static str>,
    }

    impl TestWorld {
        fn spawn(&mut self, position: Vec3, health: Option<f32>) -> usize {
            self.entities.push(Dummy {
                position,
                health,
                poison: None,
                stun: None,
            });
            self.entities.len() - 1
        }
    }

    impl ImpactWorld for TestWorld {
        type Target = usize;

        fn candidates(&self) -> Vec<(usize, Vec3)> {
            self.entities
                .iter()
                .enumerate()
                .map(|(i, e)| (i, e.position))
                .collect()
        }

        fn apply_damage(&mut self, target: usize, amount: f32) -> Option<f32> {
            let health = self.entities[target].health.as_mut()?;
            self.damage_calls.push(target);
            self.log.push("damage");
            let dealt = amount.min(*health);
            *health -= dealt;
            Some(dealt)
        }

        fn apply_poison(&mut self, target: usize, poison: PoisonEffect) -> bool {
            self.log.push("poison");
            self.entities[target].poison = Some(poison);
            true
        }

        fn apply_stun(&mut self, target: usize, duration: f32) -> bool {
            self.log.push("stun");
            self.entities[target].stun = Some(duration);
            true
        }

        fn heal(&mut self, target: usize, amount: f32) -> Option<f32> {
            self.log.push("heal");
            let health = self.entities[target].health.as_mut()?;
            *health += amount;
            Some(amount)
        }
    }

    fn impact(struck: Option<usize>, shooter: Option<usize>, upgrades: CardUpgrades) -> Impact<usize> {
        Impact {
            variant: CardVariant::Red,
            position: Vec3::ZERO,
            struck,
            shooter,
            damage: 10,
            radius: 2.0,
            upgrades,
        }
    }

    #[test]
    fn splash_hits_everything_in_radius_including_boundary() {
        let mut world = TestWorld::default();
        for x in [0.5, -1.0, 2.0] {
            world.spawn(Vec3::new(x, 0.0, 0.0), Some(100.0));
        }
        world.spawn(Vec3::new(0.0, 0.0, 1.5), Some(100.0));
        let outside = world.spawn(Vec3::new(2.01, 0.0, 0.0), Some(100.0));

        let (hit, total) = apply_splash_damage(&mut world, Vec3::ZERO, 2.0, 7.0, None);
        assert_eq!(hit.len(), 4);
        assert_eq!(total, 28.0);
        assert!(!world.damage_calls.contains(&outside));
        assert_eq!(world.entities[outside].health, Some(100.0));
    }

    #[test]
    fn splash_ignores_entities_without_health() {
        let mut world = TestWorld::default();
        world.spawn(Vec3::ZERO, None);
        world.spawn(Vec3::X, Some(50.0));
        let (hit, total) = apply_splash_damage(&mut world, Vec3::ZERO, 2.0, 5.0, None);
        assert_eq!(hit, vec![1]);
        assert_eq!(total, 5.0);
    }

    #[test]
    fn struck_entity_is_hit_even_outside_radius() {
        let mut world = TestWorld::default();
        let struck = world.spawn(Vec3::new(3.0, 0.0, 0.0), Some(20.0));
        let (hit, total) = apply_splash_damage(&mut world, Vec3::ZERO, 1.0, 5.0, Some(struck));
        assert_eq!(hit, vec![struck]);
        assert_eq!(total, 5.0);
    }

    #[test]
    fn splash_sums_damage_actually_taken() {
        let mut world = TestWorld::default();
        world.spawn(Vec3::ZERO, Some(3.0));
        world.spawn(Vec3::X, Some(100.0));
        let (_, total) = apply_splash_damage(&mut world, Vec3::ZERO, 2.0, 10.0, None);
        assert_eq!(total, 13.0);
    }

    #[test]
    fn vampire_heal_is_rounded_with_minimum_of_one() {
        assert_eq!(vampire_heal_amount(10.0, 0.2), 2.0);
        assert_eq!(vampire_heal_amount(7.0, 0.2), 1.0);
        assert_eq!(vampire_heal_amount(1.0, 0.2), 1.0);
        assert_eq!(vampire_heal_amount(0.0, 0.2), 0.0);
    }

    #[test]
    fn apply_vampire_heals_shooter() {
        let mut world = TestWorld::default();
        let shooter = world.spawn(Vec3::ZERO, Some(50.0));
        assert_eq!(apply_vampire(&mut world, shooter, 10.0, 0.2), 2.0);
        assert_eq!(world.entities[shooter].health, Some(52.0));
    }

    #[test]
    fn poison_ticks_every_half_second_for_its_duration() {
        let mut poison = PoisonEffect::new(4.0, 3.0);
        let mut total = 0.0;
        let mut ticks_with_damage = 0;
        for _ in 0..100 {
            let dealt = poison.tick(0.05);
            if dealt > 0.0 {
                assert_eq!(dealt, 2.0);
                ticks_with_damage += 1;
            }
            total += dealt;
        }
        assert_eq!(ticks_with_damage, 6);
        assert_eq!(total, 12.0);
        assert!(poison.is_finished());
    }

    #[test]
    fn poison_never_ticks_past_an_uneven_duration() {
        let mut poison = PoisonEffect::new(4.0, 1.3);
        assert_eq!(poison.total_ticks(), 2);

        let mut total = 0.0;
        for _ in 0..40 {
            total += poison.tick(0.05);
        }
        assert_eq!(total, 4.0);
        assert!(poison.is_finished());
    }

    #[test]
    fn impact_resolves_in_fixed_order() {
        let mut world = TestWorld::default();
        let shooter = world.spawn(Vec3::new(50.0, 0.0, 0.0), Some(10.0));
        let enemy = world.spawn(Vec3::X, Some(100.0));
        let upgrades = CardUpgrades {
            poison: true,
            stun: true,
            vampire: true,
            ..default()
        };

        let report = resolve_impact(
            &mut world,
            &impact(Some(enemy), Some(shooter), upgrades),
            &CardConfig::default(),
        );

        assert_eq!(world.log, vec!["damage", "poison", "stun", "heal"]);
        assert_eq!(report.splash_damage, 10.0);
        assert_eq!(report.poisoned, 1);
        assert_eq!(report.stunned, 1);
        assert_eq!(report.healed, 2.0);
        assert_eq!(world.entities[shooter].health, Some(12.0));
        assert!(world.entities[enemy].poison.is_some());
    }

    #[test]
    fn impact_without_upgrades_only_deals_damage() {
        let mut world = TestWorld::default();
        let shooter = world.spawn(Vec3::new(50.0, 0.0, 0.0), Some(10.0));
        let enemy = world.spawn(Vec3::X, Some(100.0));

        let report = resolve_impact(
            &mut world,
            &impact(Some(enemy), Some(shooter), CardUpgrades::default()),
            &CardConfig::default(),
        );

        assert_eq!(world.log, vec!["damage"]);
        assert_eq!(report.healed, 0.0);
        assert!(world.entities[enemy].stun.is_none());
    }

    #[test]
    fn chain_lightning_jumps_to_new_targets_in_range() {
        let mut world = TestWorld::default();
        let first = world.spawn(Vec3::ZERO, Some(100.0));
        let near = world.spawn(Vec3::new(3.0, 0.0, 0.0), Some(100.0));
        let next = world.spawn(Vec3::new(6.0, 0.0, 0.0), Some(100.0));
        let far = world.spawn(Vec3::new(20.0, 0.0, 0.0), Some(100.0));
        let settings = ChainSettings {
            jumps: 3,
            range: 4.0,
            damage_fraction: 0.5,
        };

        let (chained, total) = apply_chain_lightning(&mut world, Vec3::ZERO, &[first], 10.0, &settings);

        assert_eq!(chained, vec![near, next]);
        assert_eq!(total, 10.0);
        assert_eq!(world.entities[first].health, Some(100.0));
        assert_eq!(world.entities[far].health, Some(100.0));
    }

    #[test]
    fn area_of_effect_upgrade_widens_radius() {
        let config = CardConfig::default();
        let plain = CardUpgrades::default();
        let wide = CardUpgrades {
            area_of_effect: true,
            ..default()
        };
        assert_eq!(impact_radius(2.0, &plain, &config), 2.0);
        assert_eq!(impact_radius(2.0, &wide, &config), 2.0 * config.aoe_radius_multiplier);
    }

    #[test]
    fn nearest_within_respects_filter() {
        let candidates = vec![(1, Vec3::X), (2, Vec3::new(2.0, 0.0, 0.0)), (3, Vec3::new(9.0, 0.0, 0.0))];
        let nearest = nearest_within(Vec3::ZERO, 5.0, candidates.clone(), |t| t != 1);
        assert_eq!(nearest.map(|(t, _)| t), Some(2));
        assert!(nearest_within(Vec3::ZERO, 0.5, candidates, |_| true).is_none());
    }
}
