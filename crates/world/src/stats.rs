use duskforge_common::IntRange;
use serde::{Deserialize, Serialize};

/// Attributes an actor is born with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseStats {
    pub strength: i32,
    pub magic: i32,
    pub dexterity: i32,
    pub vitality: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorStats {
    pub base: BaseStats,
    pub level: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToHit {
    pub base: i32,
    pub bonus: i32,
}

impl ToHit {
    pub fn total(&self) -> i32 {
        self.base + self.bonus
    }
}

/// Derived stats used in combat, recomputed from base stats and context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveActorStats {
    pub max_life: i32,
    pub armor_class: i32,
    pub to_hit_melee: ToHit,
    /// Bounds applied to the final melee hit chance, in percent.
    pub to_hit_melee_cap: IntRange,
    pub melee_damage_bonus: IntRange,
    /// Damage at or above which a hit interrupts the actor.
    pub hit_recovery_damage_threshold: i32,
}

impl Default for LiveActorStats {
    fn default() -> Self {
        Self {
            max_life: 0,
            armor_class: 0,
            to_hit_melee: ToHit::default(),
            to_hit_melee_cap: IntRange::new(5, 95),
            melee_damage_bonus: IntRange::default(),
            hit_recovery_damage_threshold: 0,
        }
    }
}

impl LiveActorStats {
    /// Melee hit chance against `armor_class`, clamped to the cap.
    pub fn melee_hit_chance(&self, armor_class: i32) -> i32 {
        self.to_hit_melee_cap
            .clamp(self.to_hit_melee.total() - armor_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_chance_is_clamped() {
        let stats = LiveActorStats {
            to_hit_melee: ToHit { base: 40, bonus: 30 },
            to_hit_melee_cap: IntRange::new(15, 95),
            ..LiveActorStats::default()
        };
        assert_eq!(stats.melee_hit_chance(10), 60);
        assert_eq!(stats.melee_hit_chance(100), 15);
        assert_eq!(stats.melee_hit_chance(-100), 95);
    }
}
