//! Upgrade catalog and random upgrade offers.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use super::variant::{CardVariant, EffectKind};

/// Every upgrade the player can be offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpgradeType {
    RedAreaOfEffect,
    RedStun,
    RedPoison,
    RedVampire,
    BlueAreaOfEffect,
    BlueStun,
    BluePoison,
    BlueVampire,
    GreenAreaOfEffect,
    GreenStun,
    GreenPoison,
    GreenVampire,
    FanShot,
    HomingPrecision,
    ChainLightning,
}

impl UpgradeType {
    pub const ALL: [UpgradeType; 15] = [
        UpgradeType::RedAreaOfEffect,
        UpgradeType::RedStun,
        UpgradeType::RedPoison,
        UpgradeType::RedVampire,
        UpgradeType::BlueAreaOfEffect,
        UpgradeType::BlueStun,
        UpgradeType::BluePoison,
        UpgradeType::BlueVampire,
        UpgradeType::GreenAreaOfEffect,
        UpgradeType::GreenStun,
        UpgradeType::GreenPoison,
        UpgradeType::GreenVampire,
        UpgradeType::FanShot,
        UpgradeType::HomingPrecision,
        UpgradeType::ChainLightning,
    ];

    /// The variant this upgrade is limited to; `None` means every variant.
    pub fn variant(self) -> Option<CardVariant> {
        use UpgradeType::*;
        match self {
            RedAreaOfEffect | RedStun | RedPoison | RedVampire => Some(CardVariant::Red),
            BlueAreaOfEffect | BlueStun | BluePoison | BlueVampire => Some(CardVariant::Blue),
            GreenAreaOfEffect | GreenStun | GreenPoison | GreenVampire => Some(CardVariant::Green),
            FanShot | HomingPrecision | ChainLightning => None,
        }
    }

    pub fn effect(self) -> EffectKind {
        use UpgradeType::*;
        match self {
            RedAreaOfEffect | BlueAreaOfEffect | GreenAreaOfEffect => EffectKind::AreaOfEffect,
            RedStun | BlueStun | GreenStun => EffectKind::Stun,
            RedPoison | BluePoison | GreenPoison => EffectKind::Poison,
            RedVampire | BlueVampire | GreenVampire => EffectKind::Vampire,
            FanShot => EffectKind::FanShot,
            HomingPrecision => EffectKind::HomingPrecision,
            ChainLightning => EffectKind::ChainLightning,
        }
    }
}

/// Display data of one upgrade.
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeEntry {
    pub kind: UpgradeType,
    pub title: String,
    pub description: String,
}

impl UpgradeEntry {
    fn describe(kind: UpgradeType) -> Self {
        let color = kind.variant().map(CardVariant::name);
        let title = match color {
            Some(color) => format!("{} {}", color, kind.effect().name()),
            None => kind.effect().name().to_string(),
        };
        let cards = match color {
            Some(color) => format!("{} cards", color),
            None => "All cards".to_string(),
        };
        let description = match kind.effect() {
            EffectKind::AreaOfEffect => format!("{} explode in a wider radius.", cards),
            EffectKind::Stun => format!("{} stun every enemy caught in the blast.", cards),
            EffectKind::Poison => format!("{} poison every enemy caught in the blast.", cards),
            EffectKind::Vampire => format!("{} heal you for part of the damage they deal.", cards),
            EffectKind::FanShot => format!("{} split into three mid-flight.", cards),
            EffectKind::HomingPrecision => format!("{} curve toward the nearest enemy.", cards),
            EffectKind::ChainLightning => format!("{} arc lightning to nearby enemies.", cards),
        };
        Self {
            kind,
            title,
            description,
        }
    }
}

/// The fixed list of upgrades.
#[derive(Resource, Debug, Clone)]
pub struct UpgradeCatalog {
    pub entries: Vec<UpgradeEntry>,
}

impl Default for UpgradeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl UpgradeCatalog {
    pub fn standard() -> Self {
        Self {
            entries: UpgradeType::ALL.into_iter().map(UpgradeEntry::describe).collect(),
        }
    }

    pub fn get(&self, kind: UpgradeType) -> Option<&UpgradeEntry> {
        self.entries.iter().find(|entry| entry.kind == kind)
    }

    /// Up to `count` distinct entries in uniformly random order.
    pub fn pick_random_upgrades<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<UpgradeEntry> {
        let mut shuffled = self.entries.clone();
        shuffled.shuffle(rng);
        shuffled.truncate(count);
        shuffled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn standard_catalog_has_fifteen_unique_entries() {
        let catalog = UpgradeCatalog::standard();
        assert_eq!(catalog.entries.len(), 15);
        let kinds: HashSet<_> = catalog.entries.iter().map(|e| e.kind).collect();
        assert_eq!(kinds.len(), 15);
        assert_eq!(catalog.get(UpgradeType::RedPoison).map(|e| e.title.as_str()), Some("Red Poison"));
        assert_eq!(catalog.get(UpgradeType::FanShot).map(|e| e.title.as_str()), Some("Fan Shot"));
    }

    #[test]
    fn picks_without_replacement() {
        let catalog = UpgradeCatalog::standard();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let picks = catalog.pick_random_upgrades(3, &mut rng);
            assert_eq!(picks.len(), 3);
            let unique: HashSet<_> = picks.iter().map(|e| e.kind).collect();
            assert_eq!(unique.len(), 3);
        }
    }

    #[test]
    fn asking_for_more_than_catalog_returns_whole_catalog() {
        let catalog = UpgradeCatalog::standard();
        let mut rng = StdRng::seed_from_u64(9);
        let picks = catalog.pick_random_upgrades(40, &mut rng);
        assert_eq!(picks.len(), 15);
    }

    #[test]
    fn every_entry_is_eventually_offered() {
        let catalog = UpgradeCatalog::standard();
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            for entry in catalog.pick_random_upgrades(3, &mut rng) {
                seen.insert(entry.kind);
            }
        }
        assert_eq!(seen.len(), 15);
    }
}
