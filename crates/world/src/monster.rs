use crate::actor::{Actor, AnimState, Faction};
use crate::data::{ANIMATION_PLACEHOLDER, MonsterData, MonsterDataProvider};
use crate::error::WorldError;
use crate::item::{ItemDrop, ItemFactory, ItemFilter};
use crate::stats::{BaseStats, LiveActorStats, ToHit};
use crate::world::World;
use duskforge_assets::{ImageDecoder, SpriteCache};
use duskforge_common::{EntityId, IntRange, Transform};
use duskforge_render::RenderInstance;
use std::collections::BTreeMap;

/// Inputs of the live stat calculation. Stats are only recomputed when this
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StatsCacheKey {
    base: BaseStats,
    dungeon_level: i32,
}

/// A hostile actor whose stats come from the monster table.
#[derive(Debug, Clone)]
pub struct Monster {
    actor: Actor,
    sound_path: String,
    dungeon_level: i32,
    stats_key: Option<StatsCacheKey>,
    live: LiveActorStats,
    recalculations: u32,
}

impl Monster {
    /// Spawn a monster of type `data` into `world`, loading its animations
    /// through `sprites` with `instance`.
    pub fn new<R: RenderInstance, D: ImageDecoder>(
        world: &mut World,
        data: &MonsterData,
        sprites: &mut SpriteCache<R, D>,
        instance: &R,
        transform: Transform,
        dungeon_level: i32,
    ) -> Result<Self, WorldError> {
        let mut animations = BTreeMap::new();
        for anim in AnimState::ALL {
            let sprite = sprites.load_image(instance, sprite_path(&data.sprite_path, anim))?;
            animations.insert(anim, sprite);
        }

        let id = world.spawn(&data.name, transform);
        let mut actor = Actor::new(id, &data.name, Faction::Hell);
        actor.animations = animations;
        actor.stats.level = data.level;
        tracing::debug!(id = %id.short(), name = %data.name, level = data.level, dungeon_level, "monster spawned");

        Ok(Self {
            actor,
            sound_path: data.sound_path.clone(),
            dungeon_level,
            stats_key: None,
            live: LiveActorStats::default(),
            recalculations: 0,
        })
    }

    pub fn id(&self) -> EntityId {
        self.actor.id
    }

    pub fn name(&self) -> &str {
        &self.actor.name
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    pub fn sound_path(&self) -> &str {
        &self.sound_path
    }

    pub fn level(&self) -> i32 {
        self.actor.stats.level
    }

    pub fn dungeon_level(&self) -> i32 {
        self.dungeon_level
    }

    /// Move the monster to another dungeon level.
    pub fn set_dungeon_level(&mut self, dungeon_level: i32) {
        self.dungeon_level = dungeon_level;
    }

    /// How often the live stats have been recomputed.
    pub fn recalculations(&self) -> u32 {
        self.recalculations
    }

    /// Combat stats for the current base stats and dungeon level.
    pub fn live_stats(
        &mut self,
        provider: &impl MonsterDataProvider,
    ) -> Result<&LiveActorStats, WorldError> {
        let key = StatsCacheKey {
            base: self.actor.stats.base,
            dungeon_level: self.dungeon_level,
        };
        if self.stats_key == Some(key) {
            return Ok(&self.live);
        }

        let data = self.table_entry(provider)?;
        self.live = LiveActorStats {
            max_life: data.max_hp,
            armor_class: data.armour_class,
            to_hit_melee: ToHit {
                base: data.to_hit + 2 * data.level,
                bonus: 30,
            },
            to_hit_melee_cap: IntRange {
                min: min_to_hit(self.dungeon_level),
                ..LiveActorStats::default().to_hit_melee_cap
            },
            melee_damage_bonus: IntRange::new(data.min_damage, data.max_damage),
            hit_recovery_damage_threshold: self.actor.stats.level + 3,
        };
        self.stats_key = Some(key);
        self.recalculations += 1;
        tracing::trace!(id = %self.id().short(), recalculations = self.recalculations, "live stats recomputed");
        Ok(&self.live)
    }

    /// Kill the monster and roll its drop. The drop is logged in `world` and
    /// returned for the caller to place.
    pub fn die(
        &mut self,
        world: &mut World,
        factory: &impl ItemFactory,
    ) -> Result<Option<ItemDrop>, WorldError> {
        let id = self.id();
        if self.actor.is_dead() {
            return Err(WorldError::AlreadyDead(id));
        }
        if !world.kill(id) {
            return Err(WorldError::UnknownEntity(id));
        }
        self.actor.mark_dead();

        let drop = self.roll_drop(world, factory);
        if let Some(drop) = &drop {
            world.record_drop(id, drop.clone());
        }
        tracing::debug!(id = %id.short(), name = %self.actor.name, ?drop, "monster died");
        Ok(drop)
    }

    pub fn experience_on_kill(&self, provider: &impl MonsterDataProvider) -> Result<u32, WorldError> {
        Ok(self.table_entry(provider)?.experience)
    }

    fn roll_drop(&self, world: &mut World, factory: &impl ItemFactory) -> Option<ItemDrop> {
        if world.random_in_range(0, 99) > 40 {
            return None;
        }
        if world.random_in_range(0, 99) > 25 {
            return Some(ItemDrop::Gold);
        }
        let item = factory.random_item_id(world, ItemFilter::max_quality_level(self.level()))?;
        factory.generate_base_item(item).map(ItemDrop::Item)
    }

    fn table_entry<'p>(&self, provider: &'p impl MonsterDataProvider) -> Result<&'p MonsterData, WorldError> {
        provider
            .monster(&self.actor.name)
            .ok_or_else(|| WorldError::UnknownMonster(self.actor.name.clone()))
    }
}

/// Sprite path of `anim` for a `%c` path pattern.
pub fn sprite_path(pattern: &str, anim: AnimState) -> String {
    pattern.replacen(ANIMATION_PLACEHOLDER, &anim.letter().to_string(), 1)
}

/// Lower bound of the melee hit chance; deeper levels make monsters surer.
fn min_to_hit(dungeon_level: i32) -> i32 {
    match dungeon_level {
        16.. => 30,
        15 => 25,
        14 => 20,
        _ => 15,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MonsterTable;
    use crate::data::tests::zombie;
    use crate::item::{BaseItemTable, Item, ItemId};
    use crate::world::WorldEvent;
    use duskforge_assets::{DecodedImage, MemoryDecoder};
    use duskforge_render::RenderConfig;
    use duskforge_render_soft::SoftRenderInstance;

    struct Fixture {
        instance: SoftRenderInstance,
        sprites: SpriteCache<SoftRenderInstance, MemoryDecoder>,
        table: MonsterTable,
    }

    impl Fixture {
        fn new() -> Self {
            let mut decoder = MemoryDecoder::new();
            for (i, anim) in AnimState::ALL.into_iter().enumerate() {
                decoder.insert(
                    sprite_path(&zombie().sprite_path, anim),
                    DecodedImage {
                        width: 1,
                        height: 1,
                        frames: vec![vec![i as u8; 4]; 2],
                    },
                );
            }
            let mut table = MonsterTable::new();
            table.insert(zombie()).unwrap();
            Self {
                instance: SoftRenderInstance::new(4, 4, &RenderConfig::default()),
                sprites: SpriteCache::new(decoder),
                table,
            }
        }

        fn spawn(&mut self, world: &mut World, dungeon_level: i32) -> Monster {
            Monster::new(
                world,
                &zombie(),
                &mut self.sprites,
                &self.instance,
                Transform::default(),
                dungeon_level,
            )
            .unwrap()
        }
    }

    fn items() -> BaseItemTable {
        BaseItemTable::new(vec![
            Item {
                id: ItemId(1),
                name: "Short Sword".into(),
                quality_level: 1,
            },
            Item {
                id: ItemId(2),
                name: "Great Sword".into(),
                quality_level: 17,
            },
        ])
    }

    #[test]
    fn sprite_path_substitutes_the_animation_letter() {
        assert_eq!(
            sprite_path("monsters/zombie/zombie%c.cl2", AnimState::Attack),
            "monsters/zombie/zombiea.cl2"
        );
    }

    #[test]
    fn new_monster_loads_every_animation() {
        let mut fx = Fixture::new();
        let mut world = World::new();
        let monster = fx.spawn(&mut world, 1);

        assert_eq!(monster.actor().animations.len(), 5);
        assert_eq!(fx.sprites.len(), 5);
        assert_eq!(monster.actor().faction, Faction::Hell);
        assert_eq!(monster.name(), "Zombie");
        assert_eq!(monster.sound_path(), "monsters/zombie/zombie%c%i.wav");
        assert_eq!(monster.level(), 1);
        assert_eq!(world.get(monster.id()).unwrap().name, "Zombie");
    }

    #[test]
    fn missing_sprite_fails_before_spawning() {
        let mut fx = Fixture::new();
        let mut world = World::new();
        let mut data = zombie();
        data.sprite_path = "monsters/ghost/ghost%c.cl2".into();
        let result = Monster::new(
            &mut world,
            &data,
            &mut fx.sprites,
            &fx.instance,
            Transform::default(),
            1,
        );
        assert!(matches!(result, Err(WorldError::Asset(_))));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn live_stats_follow_the_table() {
        let mut fx = Fixture::new();
        let mut world = World::new();
        let mut monster = fx.spawn(&mut world, 3);
        let stats = *monster.live_stats(&fx.table).unwrap();

        assert_eq!(stats.max_life, 7);
        assert_eq!(stats.armor_class, 5);
        assert_eq!(stats.to_hit_melee, ToHit { base: 12, bonus: 30 });
        assert_eq!(stats.to_hit_melee_cap.min, 15);
        assert_eq!(stats.melee_damage_bonus, IntRange::new(2, 5));
        assert_eq!(stats.hit_recovery_damage_threshold, 4);
    }

    #[test]
    fn minimum_to_hit_rises_with_depth() {
        let mut fx = Fixture::new();
        let mut world = World::new();
        let mut monster = fx.spawn(&mut world, 1);
        for (level, cap) in [(1, 15), (13, 15), (14, 20), (15, 25), (16, 30), (24, 30)] {
            monster.set_dungeon_level(level);
            assert_eq!(monster.live_stats(&fx.table).unwrap().to_hit_melee_cap.min, cap, "level {level}");
        }
    }

    #[test]
    fn live_stats_are_cached_until_inputs_change() {
        let mut fx = Fixture::new();
        let mut world = World::new();
        let mut monster = fx.spawn(&mut world, 2);

        monster.live_stats(&fx.table).unwrap();
        monster.live_stats(&fx.table).unwrap();
        assert_eq!(monster.recalculations(), 1);

        monster.set_dungeon_level(2);
        monster.live_stats(&fx.table).unwrap();
        assert_eq!(monster.recalculations(), 1);

        monster.set_dungeon_level(15);
        monster.live_stats(&fx.table).unwrap();
        assert_eq!(monster.recalculations(), 2);

        monster.actor_mut().stats.base.strength += 1;
        monster.live_stats(&fx.table).unwrap();
        assert_eq!(monster.recalculations(), 3);
    }

    #[test]
    fn unknown_monster_type() {
        let mut fx = Fixture::new();
        let mut world = World::new();
        let mut monster = fx.spawn(&mut world, 1);
        let empty = MonsterTable::new();
        assert!(matches!(monster.live_stats(&empty), Err(WorldError::UnknownMonster(name)) if name == "Zombie"));
        assert!(monster.experience_on_kill(&empty).is_err());
        assert_eq!(monster.experience_on_kill(&fx.table).unwrap(), 54);
    }

    #[test]
    fn drops_follow_the_rolls() {
        let mut fx = Fixture::new();
        let items = items();
        let (mut none, mut gold, mut item) = (0, 0, 0);

        for seed in 0..300 {
            let mut world = World::with_seed(seed);
            let mut monster = fx.spawn(&mut world, 1);

            let mut oracle = world.clone();
            let expected = if oracle.random_in_range(0, 99) > 40 {
                None
            } else if oracle.random_in_range(0, 99) > 25 {
                Some(ItemDrop::Gold)
            } else {
                let id = items
                    .random_item_id(&mut oracle, ItemFilter::max_quality_level(1))
                    .unwrap();
                Some(ItemDrop::Item(items.generate_base_item(id).unwrap()))
            };

            let drop = monster.die(&mut world, &items).unwrap();
            assert_eq!(drop, expected, "seed {seed}");
            match &drop {
                None => none += 1,
                Some(ItemDrop::Gold) => gold += 1,
                Some(ItemDrop::Item(i)) => {
                    assert_eq!(i.id, ItemId(1), "quality level capped at monster level");
                    item += 1;
                }
            }
        }
        assert!(none > 0 && gold > 0 && item > 0);
        assert!(none > gold, "no drop is the most likely outcome");
    }

    #[test]
    fn death_is_logged_once() {
        let mut fx = Fixture::new();
        let mut world = World::with_seed(11);
        let mut monster = fx.spawn(&mut world, 1);

        let drop = monster.die(&mut world, &items()).unwrap();
        assert!(monster.actor().is_dead());
        assert_eq!(monster.actor().current_animation, AnimState::Dead);
        assert!(!world.get(monster.id()).unwrap().alive);
        assert!(matches!(
            monster.die(&mut world, &items()),
            Err(WorldError::AlreadyDead(_))
        ));

        let dropped: Vec<_> = world
            .events()
            .iter()
            .filter_map(|e| match e {
                WorldEvent::ItemDropped { by, drop } => Some((*by, drop.clone())),
                _ => None,
            })
            .collect();
        match drop {
            Some(d) => assert_eq!(dropped, vec![(monster.id(), d)]),
            None => assert!(dropped.is_empty()),
        }
    }

    #[test]
    fn despawned_monster_cannot_die() {
        let mut fx = Fixture::new();
        let mut world = World::new();
        let mut monster = fx.spawn(&mut world, 1);
        world.despawn(monster.id());
        assert!(matches!(
            monster.die(&mut world, &items()),
            Err(WorldError::UnknownEntity(_))
        ));
        assert!(!monster.actor().is_dead());
    }
}
