//! Resource collection and structure deployment

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cooldown::Cooldown;
use super::entities::{DefensiveStructure, StructureKind};
use crate::config::GameConfig;
use crate::platform::Viewport;

/// Resource counters plus every structure deployed this session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLedger {
    /// Uncollected toward the next deployment
    pub collected: u32,
    /// Lifetime total for this session (drives levels)
    pub total_collected: u32,
    pub next_deploy_at: u32,
    pub structures: Vec<DefensiveStructure>,
    threshold: u32,
}

impl ResourceLedger {
    pub fn new(threshold: u32) -> Self {
        Self {
            collected: 0,
            total_collected: 0,
            next_deploy_at: threshold,
            structures: Vec::new(),
            threshold,
        }
    }

    pub fn collect(&mut self) {
        self.collected += 1;
        self.total_collected += 1;
    }

    pub fn deploy_ready(&self) -> bool {
        self.collected >= self.next_deploy_at
    }

    /// Kind of the next deployment: satellite first, station second, then
    /// alternating by the parity of structures deployed so far
    pub fn next_kind(&self) -> StructureKind {
        if self.structures.len() % 2 == 0 {
            StructureKind::Satellite
        } else {
            StructureKind::Station
        }
    }

    /// Place a new structure in the upper band of the viewport, register it,
    /// and reset the counter. `on_deploy` sees the structure before it is
    /// stored.
    pub fn deploy<R: Rng>(
        &mut self,
        id: u32,
        viewport: Viewport,
        config: &GameConfig,
        rng: &mut R,
        on_deploy: impl FnOnce(&DefensiveStructure),
    ) -> DefensiveStructure {
        let kind = self.next_kind();
        let placement = &config.structure;
        let usable_width = (viewport.width - placement.margin_x * 2.0).max(0.0);
        let x = placement.margin_x + rng.random::<f32>() * usable_width;
        let y = placement.top_offset + rng.random::<f32>() * (viewport.height * placement.vertical_band);

        let quotes = kind.quotes();
        let quote = quotes[rng.random_range(0..quotes.len())].to_string();

        let structure = build_structure(id, kind, Vec2::new(x, y), quote, config);
        on_deploy(&structure);

        self.structures.push(structure.clone());
        self.collected = 0;
        self.next_deploy_at = self.threshold;
        structure
    }

    /// Re-register a structure from a saved session
    pub fn restore_structure(&mut self, id: u32, kind: StructureKind, pos: Vec2, config: &GameConfig) {
        self.structures
            .push(build_structure(id, kind, pos, String::new(), config));
    }

    pub fn count(&self, kind: StructureKind) -> usize {
        self.structures.iter().filter(|s| s.kind == kind).count()
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.threshold);
    }
}

fn build_structure(
    id: u32,
    kind: StructureKind,
    pos: Vec2,
    quote: String,
    config: &GameConfig,
) -> DefensiveStructure {
    let weapon = config.weapon(kind);
    DefensiveStructure {
        id,
        kind,
        pos,
        range: weapon.range,
        bullet_speed: weapon.bullet_speed,
        cooldown: Cooldown::ready_now(weapon.fire_cooldown_ms),
        quote,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn deploy_once(ledger: &mut ResourceLedger, rng: &mut Pcg32) -> DefensiveStructure {
        let id = ledger.structures.len() as u32 + 1;
        ledger.deploy(
            id,
            Viewport::new(1200.0, 900.0),
            &GameConfig::default(),
            rng,
            |_| {},
        )
    }

    #[test]
    fn test_collect_increments_both_counters() {
        let mut ledger = ResourceLedger::new(20);
        ledger.collect();
        ledger.collect();
        assert_eq!(ledger.collected, 2);
        assert_eq!(ledger.total_collected, 2);
        assert!(!ledger.deploy_ready());
    }

    #[test]
    fn test_deploy_resets_counter_after_overshoot() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ledger = ResourceLedger::new(20);
        for _ in 0..37 {
            ledger.collect();
        }
        assert!(ledger.deploy_ready());
        deploy_once(&mut ledger, &mut rng);
        assert_eq!(ledger.collected, 0);
        assert_eq!(ledger.next_deploy_at, 20);
        assert_eq!(ledger.total_collected, 37);
    }

    #[test]
    fn test_placement_stays_in_upper_band() {
        let mut rng = Pcg32::seed_from_u64(99);
        let mut ledger = ResourceLedger::new(20);
        for _ in 0..50 {
            let s = deploy_once(&mut ledger, &mut rng);
            assert!(s.pos.x >= 100.0 && s.pos.x <= 1100.0);
            assert!(s.pos.y >= 100.0 && s.pos.y <= 100.0 + 900.0 * 0.4);
            assert!(!s.quote.is_empty());
        }
    }

    #[test]
    fn test_callback_sees_new_structure() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ledger = ResourceLedger::new(20);
        let mut seen = None;
        ledger.deploy(
            42,
            Viewport::new(800.0, 600.0),
            &GameConfig::default(),
            &mut rng,
            |s| seen = Some((s.id, s.kind)),
        );
        assert_eq!(seen, Some((42, StructureKind::Satellite)));
        assert_eq!(ledger.structures.len(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ledger = ResourceLedger::new(20);
        ledger.collect();
        deploy_once(&mut ledger, &mut rng);
        ledger.reset();
        assert_eq!(ledger.collected, 0);
        assert_eq!(ledger.total_collected, 0);
        assert!(ledger.structures.is_empty());
        assert_eq!(ledger.next_deploy_at, 20);
    }

    proptest! {
        #[test]
        fn prop_deployments_alternate(n in 1usize..40, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut ledger = ResourceLedger::new(20);
            for i in 0..n {
                let s = deploy_once(&mut ledger, &mut rng);
                let expected = if i % 2 == 0 { StructureKind::Satellite } else { StructureKind::Station };
                prop_assert_eq!(s.kind, expected);
            }
        }
    }
}
