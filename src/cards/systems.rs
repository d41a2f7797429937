//! ECS glue for cards: throwing, flight, collisions and status effects.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::card::{Card, FlightStep, DEFAULT_DIRECTION};
use super::components::*;
use super::config::CardConfig;
use super::effects::{impact_radius, nearest_within, resolve_impact, Impact, ImpactWorld, PoisonEffect};
use super::thrower::{CardLaunch, CardThrower};
use super::upgrades::UpgradeCatalog;
use super::variant::CardVariant;
use crate::combat::{CombatSet, Damageable, Dead, Healable, Health};
use crate::core::{DamageEvent, DeathEvent, GameState, PlayState};
use crate::enemies::Enemy;
use crate::player::{AimPoint, Player};

/// Seconds an impact flash stays on screen.
const IMPACT_FLASH_DURATION: f32 = 0.25;

/// Configure card systems.
pub fn setup_card_systems(app: &mut App) {
    app
        .add_systems(Startup, setup_card_assets)
        .add_systems(
            Update,
            (
                tick_throwers,
                throw_cards,
                advance_cards,
                resolve_card_hits,
                tick_poison,
            )
                .chain()
                .in_set(CombatSet::Damage),
        )
        .add_systems(
            Update,
            count_kills_for_upgrades
                .after(CombatSet::Resolve)
                .run_if(in_state(PlayState::Fighting)),
        )
        .add_systems(
            Update,
            (apply_chosen_upgrades, (spawn_impact_flashes, update_impact_flashes).chain())
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(OnEnter(GameState::InGame), reset_upgrade_progress)
        .add_systems(OnExit(GameState::InGame), cleanup_cards);
}

/// Build the shared card and flash meshes and one material per variant.
fn setup_card_assets(
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut card_assets: ResMut<CardAssets>,
) {
    card_assets.card_mesh = meshes.add(Cuboid::new(0.35, 0.04, 0.5));
    card_assets.flash_mesh = meshes.add(Sphere::new(1.0));

    for variant in CardVariant::ALL {
        let color = variant.color();
        card_assets.card_materials[variant.index()] = materials.add(StandardMaterial {
            base_color: color,
            emissive: LinearRgba::from(color) * 0.6,
            ..default()
        });
        card_assets.flash_materials[variant.index()] = materials.add(StandardMaterial {
            base_color: color.with_alpha(0.35),
            emissive: LinearRgba::from(color),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
    }
}

/// Spawn a card entity with a sensor collider.
pub fn spawn_card(
    commands: &mut Commands,
    card_assets: &CardAssets,
    launch: CardLaunch,
    owner: Option<Entity>,
    config: &CardConfig,
) -> Entity {
    let variant = launch.card.variant;
    let transform = Transform::from_translation(launch.position)
        .with_rotation(Quat::from_rotation_arc(DEFAULT_DIRECTION, launch.card.direction))
        .with_scale(Vec3::splat(launch.card.scale));

    let mut entity = commands.spawn((
        Name::new(format!("{} Card", variant.name())),
        launch.card,
        Mesh3d(card_assets.card_mesh.clone()),
        MeshMaterial3d(card_assets.card_materials[variant.index()].clone()),
        transform,
        RigidBody::KinematicPositionBased,
        Collider::ball(config.collider_radius),
        Sensor,
        ActiveEvents::COLLISION_EVENTS,
        ActiveCollisionTypes::all(),
    ));
    if let Some(owner) = owner {
        entity.insert(CardOwner(owner));
    }
    entity.id()
}

/// Count down every thrower's cooldown.
pub fn tick_throwers(time: Res<Time>, mut throwers: Query<&mut CardThrower>) {
    for mut thrower in throwers.iter_mut() {
        thrower.tick(time.delta_secs());
    }
}

/// Throw a card toward the aim point while the left mouse button is held.
pub fn throw_cards(
    mut commands: Commands,
    mouse: Res<ButtonInput<MouseButton>>,
    aim: Res<AimPoint>,
    config: Res<CardConfig>,
    card_assets: Res<CardAssets>,
    mut throwers: Query<(Entity, &Transform, &mut CardThrower), With<Player>>,
    mut thrown: EventWriter<CardThrownEvent>,
) {
    if !mouse.pressed(MouseButton::Left) {
        return;
    }

    let mut rng = rand::thread_rng();
    for (entity, transform, mut thrower) in throwers.iter_mut() {
        let origin = transform.translation;
        let target = aim.0.unwrap_or(origin + DEFAULT_DIRECTION);

        let Some(launch) = thrower.try_fire(origin, target, &config, &mut rng) else {
            continue;
        };

        let variant = launch.card.variant;
        let position = launch.position;
        spawn_card(&mut commands, &card_assets, launch, Some(entity), &config);
        thrown.send(CardThrownEvent {
            thrower: entity,
            variant,
            position,
        });
    }
}

/// Move cards, split fan shots and remove expired cards.
pub fn advance_cards(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<CardConfig>,
    card_assets: Res<CardAssets>,
    mut cards: Query<(Entity, &mut Card, &mut Transform, Option<&CardOwner>)>,
    enemies: Query<(Entity, &Transform), (With<Enemy>, Without<Dead>, Without<Card>)>,
) {
    let dt = time.delta_secs();

    for (entity, mut card, mut transform, owner) in cards.iter_mut() {
        let mut position = transform.translation;
        let homing_target = if card.is_flying() && card.homing_strength() > 0.0 {
            nearest_within(
                position,
                config.homing_radius,
                enemies.iter().map(|(enemy, t)| (enemy, t.translation)),
                |_| true,
            )
            .map(|(_, target)| target)
        } else {
            None
        };

        match card.advance(dt, &mut position, homing_target) {
            FlightStep::Continue => {
                transform.translation = position;
                transform.rotation = Quat::from_rotation_arc(DEFAULT_DIRECTION, card.direction);
            }
            FlightStep::Split(children) => {
                transform.translation = position;
                for child in children {
                    let launch = CardLaunch {
                        card: child,
                        position,
                    };
                    spawn_card(&mut commands, &card_assets, launch, owner.map(|o| o.0), &config);
                }
                commands
                    .entity(entity)
                    .remove::<Collider>()
                    .insert(Visibility::Hidden);
            }
            FlightStep::Destroyed(_) => {
                commands.entity(entity).despawn_recursive();
            }
        }
    }
}

/// Enemies and shooters as seen by the impact resolver.
#[derive(SystemParam)]
pub struct ImpactTargets<'w, 's> {
    commands: Commands<'w, 's>,
    enemies: Query<
        'w,
        's,
        (
            Entity,
            &'static Transform,
            &'static mut Health,
            Option<&'static mut Poisoned>,
            Option<&'static mut Stunned>,
        ),
        (With<Enemy>, Without<Dead>),
    >,
    shooters: Query<'w, 's, &'static mut Health, (Without<Enemy>, Without<Card>)>,
}

impl ImpactWorld for ImpactTargets<'_, '_> {
    type Target = Entity;

    fn candidates(&self) -> Vec<(Entity, Vec3)> {
        self.enemies
            .iter()
            .filter(|(_, _, health, _, _)| !health.is_dead())
            .map(|(entity, transform, ..)| (entity, transform.translation))
            .collect()
    }

    fn apply_damage(&mut self, target: Entity, amount: f32) -> Option<f32> {
        let (_, _, mut health, _, _) = self.enemies.get_mut(target).ok()?;
        if health.is_dead() {
            return None;
        }
        Some(health.take_damage(amount))
    }

    fn apply_poison(&mut self, target: Entity, poison: PoisonEffect) -> bool {
        let Ok((_, _, health, existing, _)) = self.enemies.get_mut(target) else {
            return false;
        };
        if health.is_dead() {
            return false;
        }
        match existing {
            Some(mut poisoned) => poisoned.0 = poison,
            None => {
                self.commands.entity(target).insert(Poisoned(poison));
            }
        }
        true
    }

    fn apply_stun(&mut self, target: Entity, duration: f32) -> bool {
        let Ok((_, _, health, _, existing)) = self.enemies.get_mut(target) else {
            return false;
        };
        if health.is_dead() {
            return false;
        }
        match existing {
            Some(mut stunned) => stunned.restart(duration),
            None => {
                self.commands.entity(target).insert(Stunned::new(duration));
            }
        }
        true
    }

    fn heal(&mut self, target: Entity, amount: f32) -> Option<f32> {
        let mut health = self.shooters.get_mut(target).ok()?;
        Some(health.heal(amount))
    }
}

/// Turn card collisions into impacts.
///
/// Collisions with other cards or with the card's own thrower are ignored. Anything
/// else consumes the card; only enemies count as the struck target.
pub fn resolve_card_hits(
    mut collisions: EventReader<CollisionEvent>,
    mut cards: Query<(&mut Card, &Transform, Option<&CardOwner>)>,
    mut targets: ImpactTargets,
    config: Res<CardConfig>,
    mut impacts: EventWriter<CardImpactEvent>,
) {
    let mut rng = rand::thread_rng();

    for event in collisions.read() {
        let CollisionEvent::Started(a, b, _) = *event else {
            continue;
        };
        let (card_entity, other) = if cards.contains(a) {
            (a, b)
        } else if cards.contains(b) {
            (b, a)
        } else {
            continue;
        };
        if cards.contains(other) {
            continue;
        }

        let Ok((mut card, transform, owner)) = cards.get_mut(card_entity) else {
            continue;
        };
        let shooter = owner.map(|o| o.0);
        if shooter == Some(other) {
            continue;
        }
        if !card.begin_impact() {
            continue;
        }

        let damage = card.roll_damage(&mut rng);
        let impact = Impact {
            variant: card.variant,
            position: transform.translation,
            struck: targets.enemies.contains(other).then_some(other),
            shooter,
            damage,
            radius: impact_radius(card.stats.explosion_radius.value(), &card.upgrades, &config),
            upgrades: card.upgrades,
        };

        let report = resolve_impact(&mut targets, &impact, &config);
        debug!(
            "{} card hit {} target(s) for {} total damage",
            impact.variant.name(),
            report.targets_hit,
            report.total_damage()
        );

        targets.commands.entity(card_entity).despawn_recursive();
        impacts.send(CardImpactEvent {
            variant: impact.variant,
            position: impact.position,
            radius: impact.radius,
            damage,
        });
    }
}

/// Deal poison damage every tick and drop finished poisons.
pub fn tick_poison(
    mut commands: Commands,
    time: Res<Time>,
    mut poisoned: Query<(Entity, &mut Poisoned), Without<Dead>>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    for (entity, mut poison) in poisoned.iter_mut() {
        let amount = poison.0.tick(time.delta_secs());
        if amount > 0.0 {
            damage_events.send(DamageEvent {
                target: entity,
                source: None,
                amount,
            });
        }
        if poison.0.is_finished() {
            commands.entity(entity).remove::<Poisoned>();
        }
    }
}

/// Count enemy kills and open the upgrade screen when enough have piled up.
pub fn count_kills_for_upgrades(
    mut death_events: EventReader<DeathEvent>,
    enemies: Query<(), With<Enemy>>,
    config: Res<CardConfig>,
    catalog: Res<UpgradeCatalog>,
    mut progress: ResMut<UpgradeProgress>,
    mut next_state: ResMut<NextState<PlayState>>,
) {
    for event in death_events.read() {
        if enemies.contains(event.entity) {
            progress.kills_since_offer += 1;
        }
    }

    if progress.kills_since_offer < config.kills_per_upgrade.max(1) {
        return;
    }

    progress.kills_since_offer -= config.kills_per_upgrade.max(1);
    progress.offer = catalog.pick_random_upgrades(config.upgrade_offer_size, &mut rand::thread_rng());
    if progress.offer.is_empty() {
        return;
    }
    info!("Offering {} upgrades", progress.offer.len());
    next_state.set(PlayState::ChoosingUpgrade);
}

/// Apply picked upgrades to the player's thrower.
pub fn apply_chosen_upgrades(
    mut chosen: EventReader<UpgradeChosenEvent>,
    catalog: Res<UpgradeCatalog>,
    mut progress: ResMut<UpgradeProgress>,
    mut throwers: Query<&mut CardThrower, With<Player>>,
) {
    for UpgradeChosenEvent(upgrade) in chosen.read() {
        progress.offer.clear();

        let Ok(mut thrower) = throwers.get_single_mut() else {
            warn!("Upgrade {:?} chosen but the player has no card thrower", upgrade);
            continue;
        };
        thrower.apply_upgrade(*upgrade);

        let title = catalog
            .get(*upgrade)
            .map(|entry| entry.title.as_str())
            .unwrap_or("Unknown");
        info!("Applied upgrade: {}", title);
    }
}

/// Spawn a flash sized to the blast radius at every impact.
fn spawn_impact_flashes(
    mut commands: Commands,
    mut impacts: EventReader<CardImpactEvent>,
    card_assets: Res<CardAssets>,
) {
    for impact in impacts.read() {
        commands.spawn((
            Name::new("Impact Flash"),
            ImpactFlash {
                timer: Timer::from_seconds(IMPACT_FLASH_DURATION, TimerMode::Once),
                radius: impact.radius,
            },
            Mesh3d(card_assets.flash_mesh.clone()),
            MeshMaterial3d(card_assets.flash_materials[impact.variant.index()].clone()),
            Transform::from_translation(impact.position).with_scale(Vec3::splat(impact.radius * 0.4)),
        ));
    }
}

fn update_impact_flashes(
    mut commands: Commands,
    time: Res<Time>,
    mut flashes: Query<(Entity, &mut ImpactFlash, &mut Transform)>,
) {
    for (entity, mut flash, mut transform) in flashes.iter_mut() {
        flash.timer.tick(time.delta());
        if flash.timer.finished() {
            commands.entity(entity).despawn_recursive();
            continue;
        }
        let grow = 0.4 + 0.6 * flash.timer.fraction();
        transform.scale = Vec3::splat(flash.radius * grow);
    }
}

fn reset_upgrade_progress(mut progress: ResMut<UpgradeProgress>) {
    *progress = UpgradeProgress::default();
}

/// Remove cards and flashes when leaving the run.
fn cleanup_cards(
    mut commands: Commands,
    cards: Query<Entity, With<Card>>,
    flashes: Query<Entity, With<ImpactFlash>>,
) {
    for entity in cards.iter().chain(flashes.iter()) {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::config::SplitSettings;
    use crate::cards::stats::{Stat, StatBlock};
    use crate::cards::upgrades::UpgradeType;
    use crate::cards::variant::{CardUpgrades, EffectKind};
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;
    use bevy_rapier3d::rapier::geometry::CollisionEventFlags;
    use std::time::Duration;

    fn fixed_stats(damage: f32) -> StatBlock {
        StatBlock {
            speed: Stat::flat(10.0),
            damage: Stat::flat(damage),
            explosion_radius: Stat::flat(1.0),
            critical_chance: Stat::flat(0.0),
            homing_strength: Stat::flat(0.0),
        }
    }

    fn test_card(damage: f32, upgrades: CardUpgrades) -> Card {
        Card::new(
            CardVariant::Red,
            fixed_stats(damage),
            Vec3::NEG_Z,
            5.0,
            CardConfig::default().split,
        )
        .with_upgrades(upgrades, 0.0)
    }

    fn impact_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_event::<CollisionEvent>();
        app.add_event::<CardImpactEvent>();
        app.insert_resource(CardConfig::default());
        app.add_systems(Update, resolve_card_hits);
        app
    }

    fn spawn_enemy(app: &mut App, position: Vec3, health: f32) -> Entity {
        app.world_mut()
            .spawn((Enemy, Health::new(health), Transform::from_translation(position)))
            .id()
    }

    fn spawn_test_card(app: &mut App, card: Card, position: Vec3, owner: Entity) -> Entity {
        app.world_mut()
            .spawn((card, Transform::from_translation(position), CardOwner(owner)))
            .id()
    }

    fn collide(app: &mut App, a: Entity, b: Entity) {
        app.world_mut()
            .send_event(CollisionEvent::Started(a, b, CollisionEventFlags::SENSOR));
    }

    fn health_of(app: &App, entity: Entity) -> f32 {
        app.world()
            .get::<Health>(entity)
            .map(|h| h.current)
            .expect("entity has health")
    }

    fn impact_count(app: &App) -> usize {
        let events = app.world().resource::<Events<CardImpactEvent>>();
        events.get_cursor().read(events).count()
    }

    #[test]
    fn hit_damages_struck_enemy_and_splash_neighbours() {
        let mut app = impact_app();
        let player = app.world_mut().spawn(Health::new(100.0)).id();
        let struck = spawn_enemy(&mut app, Vec3::ZERO, 50.0);
        let near = spawn_enemy(&mut app, Vec3::new(0.8, 0.0, 0.0), 50.0);
        let far = spawn_enemy(&mut app, Vec3::new(5.0, 0.0, 0.0), 50.0);
        let card = spawn_test_card(&mut app, test_card(10.0, CardUpgrades::default()), Vec3::ZERO, player);

        collide(&mut app, card, struck);
        app.update();

        assert_eq!(health_of(&app, struck), 40.0);
        assert_eq!(health_of(&app, near), 40.0);
        assert_eq!(health_of(&app, far), 50.0);
        assert!(app.world().get_entity(card).is_err());
        assert_eq!(impact_count(&app), 1);
    }

    #[test]
    fn collisions_with_owner_or_other_cards_are_ignored() {
        let mut app = impact_app();
        let player = app.world_mut().spawn(Health::new(100.0)).id();
        let card = spawn_test_card(&mut app, test_card(10.0, CardUpgrades::default()), Vec3::ZERO, player);
        let other_card =
            spawn_test_card(&mut app, test_card(10.0, CardUpgrades::default()), Vec3::ZERO, player);

        collide(&mut app, player, card);
        collide(&mut app, card, other_card);
        app.update();

        assert!(app.world().get_entity(card).is_ok());
        assert!(app.world().get_entity(other_card).is_ok());
        assert_eq!(impact_count(&app), 0);
    }

    #[test]
    fn card_impacts_only_once() {
        let mut app = impact_app();
        let player = app.world_mut().spawn(Health::new(100.0)).id();
        let first = spawn_enemy(&mut app, Vec3::ZERO, 50.0);
        let second = spawn_enemy(&mut app, Vec3::new(20.0, 0.0, 0.0), 50.0);
        let card = spawn_test_card(&mut app, test_card(10.0, CardUpgrades::default()), Vec3::ZERO, player);

        collide(&mut app, card, first);
        collide(&mut app, second, card);
        app.update();

        assert_eq!(health_of(&app, first), 40.0);
        assert_eq!(health_of(&app, second), 50.0);
        assert_eq!(impact_count(&app), 1);
    }

    #[test]
    fn wall_hit_still_explodes() {
        let mut app = impact_app();
        let player = app.world_mut().spawn(Health::new(100.0)).id();
        let wall = app.world_mut().spawn(Transform::default()).id();
        let enemy = spawn_enemy(&mut app, Vec3::new(0.5, 0.0, 0.0), 50.0);
        let card = spawn_test_card(&mut app, test_card(7.0, CardUpgrades::default()), Vec3::ZERO, player);

        collide(&mut app, card, wall);
        app.update();

        assert_eq!(health_of(&app, enemy), 43.0);
        assert!(app.world().get_entity(card).is_err());
    }

    #[test]
    fn upgraded_hit_poisons_stuns_and_heals_shooter() {
        let mut app = impact_app();
        let player = app.world_mut().spawn(Health::new(100.0)).id();
        app.world_mut()
            .get_mut::<Health>(player)
            .expect("player exists")
            .take_damage(50.0);
        let enemy = spawn_enemy(&mut app, Vec3::ZERO, 100.0);
        let upgrades = CardUpgrades {
            poison: true,
            stun: true,
            vampire: true,
            ..default()
        };
        let card = spawn_test_card(&mut app, test_card(10.0, upgrades), Vec3::ZERO, player);

        collide(&mut app, card, enemy);
        app.update();

        let config = CardConfig::default();
        assert_eq!(health_of(&app, enemy), 90.0);
        assert_eq!(health_of(&app, player), 52.0);
        let poisoned = app.world().get::<Poisoned>(enemy).expect("enemy is poisoned");
        assert_eq!(poisoned.0.dps, config.poison.dps);
        let stunned = app.world().get::<Stunned>(enemy).expect("enemy is stunned");
        assert_eq!(stunned.remaining_secs(), config.stun_duration);
    }

    #[test]
    fn restun_restarts_running_stun() {
        let mut app = impact_app();
        let player = app.world_mut().spawn(Health::new(100.0)).id();
        let mut stun = Stunned::new(1.5);
        stun.timer.tick(Duration::from_secs_f32(1.0));
        let enemy = app
            .world_mut()
            .spawn((Enemy, Health::new(100.0), Transform::default(), stun))
            .id();
        let upgrades = CardUpgrades {
            stun: true,
            ..default()
        };
        let card = spawn_test_card(&mut app, test_card(1.0, upgrades), Vec3::ZERO, player);

        collide(&mut app, card, enemy);
        app.update();

        let stunned = app.world().get::<Stunned>(enemy).expect("still stunned");
        assert_eq!(stunned.remaining_secs(), CardConfig::default().stun_duration);
    }

    #[test]
    fn fan_shot_card_splits_into_three_children() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(CardConfig::default());
        app.init_resource::<CardAssets>();
        app.add_systems(Update, advance_cards);

        let player = app.world_mut().spawn(Health::new(100.0)).id();
        let split = SplitSettings {
            time: 0.0,
            ..CardConfig::default().split
        };
        let card = Card::new(CardVariant::Blue, fixed_stats(10.0), Vec3::NEG_Z, 5.0, split).with_upgrades(
            CardUpgrades {
                fan_shot: true,
                ..default()
            },
            0.0,
        );
        let parent = spawn_test_card(&mut app, card, Vec3::ZERO, player);
        app.world_mut().entity_mut(parent).insert(Collider::ball(0.25));

        app.update();

        let mut query = app.world_mut().query::<(Entity, &Card, &CardOwner)>();
        let children: Vec<_> = query
            .iter(app.world())
            .filter(|(entity, _, _)| *entity != parent)
            .map(|(_, card, owner)| (card.clone(), owner.0))
            .collect();
        assert_eq!(children.len(), 3);
        for (child, owner) in &children {
            assert!(!child.should_split);
            assert_eq!(*owner, player);
            assert!((child.damage_modifier - split.damage_multiplier).abs() < 1e-6);
        }

        let parent_card = app.world().get::<Card>(parent).expect("parent waits out the grace");
        assert!(parent_card.has_split);
        assert!(!parent_card.is_flying());
        assert!(app.world().get::<Collider>(parent).is_none());
    }

    #[test]
    fn poison_ticks_through_damage_events_then_wears_off() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.add_event::<DamageEvent>();
        app.add_event::<DeathEvent>();
        app.add_systems(
            Update,
            (tick_poison, crate::combat::apply_damage).chain(),
        );

        let enemy = app
            .world_mut()
            .spawn((Enemy, Health::new(100.0), Poisoned(PoisonEffect::new(4.0, 1.0))))
            .id();

        for _ in 0..20 {
            app.update();
        }

        assert!((health_of(&app, enemy) - 96.0).abs() < 1e-4);
        assert!(app.world().get::<Poisoned>(enemy).is_none());
    }

    #[test]
    fn chosen_upgrade_is_applied_to_player_thrower() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_event::<UpgradeChosenEvent>();
        app.init_resource::<UpgradeCatalog>();
        app.init_resource::<UpgradeProgress>();
        app.add_systems(Update, apply_chosen_upgrades);

        let thrower = CardThrower::from_config(&CardConfig::default());
        let player = app.world_mut().spawn((Player, thrower)).id();

        app.world_mut().send_event(UpgradeChosenEvent(UpgradeType::GreenStun));
        app.update();

        let thrower = app.world().get::<CardThrower>(player).expect("player has thrower");
        assert!(thrower.has_upgrade(CardVariant::Green, EffectKind::Stun));
        assert!(!thrower.has_upgrade(CardVariant::Red, EffectKind::Stun));
    }

    #[test]
    fn upgrade_without_thrower_is_skipped() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_event::<UpgradeChosenEvent>();
        app.init_resource::<UpgradeCatalog>();
        app.init_resource::<UpgradeProgress>();
        app.add_systems(Update, apply_chosen_upgrades);

        app.world_mut().send_event(UpgradeChosenEvent(UpgradeType::FanShot));
        app.update();
    }

    fn kill_counting_app(kills_per_upgrade: u32) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_state::<GameState>();
        app.add_sub_state::<PlayState>();
        app.add_event::<DeathEvent>();
        app.insert_resource(CardConfig {
            kills_per_upgrade,
            ..default()
        });
        app.init_resource::<UpgradeCatalog>();
        app.init_resource::<UpgradeProgress>();
        app.add_systems(
            Update,
            count_kills_for_upgrades.run_if(in_state(PlayState::Fighting)),
        );

        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::InGame);
        app.update();
        app.update();
        app
    }

    #[test]
    fn kills_beyond_the_threshold_carry_over() {
        let mut app = kill_counting_app(5);

        for _ in 0..8 {
            let enemy = spawn_enemy(&mut app, Vec3::ZERO, 10.0);
            app.world_mut().send_event(DeathEvent {
                entity: enemy,
                killed_by: None,
            });
        }
        app.update();

        let progress = app.world().resource::<UpgradeProgress>();
        assert_eq!(progress.kills_since_offer, 3);
        assert!(!progress.offer.is_empty());
    }

    #[test]
    fn enough_kills_open_the_upgrade_screen() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_state::<GameState>();
        app.add_sub_state::<PlayState>();
        app.add_event::<DeathEvent>();
        app.insert_resource(CardConfig {
            kills_per_upgrade: 2,
            ..default()
        });
        app.init_resource::<UpgradeCatalog>();
        app.init_resource::<UpgradeProgress>();
        app.add_systems(
            Update,
            count_kills_for_upgrades.run_if(in_state(PlayState::Fighting)),
        );

        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::InGame);
        app.update();
        app.update();

        let first = spawn_enemy(&mut app, Vec3::ZERO, 10.0);
        let bystander = app.world_mut().spawn(Health::new(10.0)).id();
        app.world_mut().send_event(DeathEvent {
            entity: first,
            killed_by: None,
        });
        app.world_mut().send_event(DeathEvent {
            entity: bystander,
            killed_by: None,
        });
        app.update();
        assert_eq!(app.world().resource::<UpgradeProgress>().kills_since_offer, 1);

        let second = spawn_enemy(&mut app, Vec3::ZERO, 10.0);
        app.world_mut().send_event(DeathEvent {
            entity: second,
            killed_by: None,
        });
        app.update();
        app.update();

        let progress = app.world().resource::<UpgradeProgress>();
        assert_eq!(progress.kills_since_offer, 0);
        assert_eq!(progress.offer.len(), CardConfig::default().upgrade_offer_size);
        assert_eq!(
            *app.world().resource::<State<PlayState>>().get(),
            PlayState::ChoosingUpgrade
        );
    }
}
