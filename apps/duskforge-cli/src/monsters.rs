//! Headless monster simulation: spawn, fight stats, deaths and drops.

use anyhow::Context;
use duskforge_assets::{DecodedImage, ImageDecoder, MemoryDecoder, SpriteCache};
use duskforge_common::Transform;
use duskforge_render::RenderConfig;
use duskforge_render_soft::SoftRenderInstance;
use duskforge_world::monster::sprite_path;
use duskforge_world::{
    AnimState, BaseItemTable, Item, ItemDrop, Monster, MonsterDataProvider, MonsterTable, World,
};
use glam::Vec3;

const DEFAULT_MONSTERS: &str = include_str!("../data/monsters.json");
const DEFAULT_ITEMS: &str = include_str!("../data/items.json");

/// Edge length and frame count of generated placeholder sprites.
const PLACEHOLDER_SIZE: u32 = 4;
const PLACEHOLDER_FRAMES: usize = 2;

pub fn default_table() -> anyhow::Result<MonsterTable> {
    MonsterTable::from_json(DEFAULT_MONSTERS).context("built-in monster table is invalid")
}

pub fn load_items(json: &str) -> anyhow::Result<BaseItemTable> {
    let items: Vec<Item> = serde_json::from_str(json).context("invalid item table")?;
    Ok(BaseItemTable::new(items))
}

pub fn default_items() -> anyhow::Result<BaseItemTable> {
    load_items(DEFAULT_ITEMS)
}

/// Flat-colored sprites for every animation of every monster in `table`.
pub fn generated_sprites(table: &MonsterTable) -> MemoryDecoder {
    let mut decoder = MemoryDecoder::new();
    for data in table.names().filter_map(|name| table.monster(name)) {
        for anim in AnimState::ALL {
            let seed = data
                .name
                .bytes()
                .chain([anim.letter() as u8])
                .fold(0u8, |acc, b| acc.wrapping_mul(31).wrapping_add(b));
            let texel = [seed, seed.rotate_left(3), seed.rotate_left(5), 255];
            let frame = texel.repeat((PLACEHOLDER_SIZE * PLACEHOLDER_SIZE) as usize);
            decoder.insert(
                sprite_path(&data.sprite_path, anim),
                DecodedImage {
                    width: PLACEHOLDER_SIZE,
                    height: PLACEHOLDER_SIZE,
                    frames: vec![frame; PLACEHOLDER_FRAMES],
                },
            );
        }
    }
    decoder
}

#[derive(Debug, Clone, Copy)]
pub struct SimulationArgs {
    pub count: usize,
    pub seed: u64,
    pub dungeon_level: i32,
}

/// Outcome of one simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub spawned: usize,
    pub killed: usize,
    pub gold_drops: usize,
    pub items: Vec<String>,
    pub experience: u64,
    pub sprite_textures: usize,
    pub final_tick: u64,
    pub state_hash: u64,
    pub replay_matches: bool,
}

/// Spawn `args.count` random monsters, compute their combat stats, kill them
/// all and roll their drops. Animations are uploaded to a software render
/// instance through `decoder`.
pub fn simulate<D: ImageDecoder>(
    decoder: D,
    table: &MonsterTable,
    items: &BaseItemTable,
    args: SimulationArgs,
) -> anyhow::Result<Summary> {
    let names: Vec<&str> = table.names().collect();
    anyhow::ensure!(!names.is_empty(), "monster table is empty");

    let instance = SoftRenderInstance::new(1, 1, &RenderConfig::default());
    let mut sprites = SpriteCache::new(decoder);
    let mut world = World::with_seed(args.seed);
    world.step();

    let mut monsters = Vec::with_capacity(args.count);
    for i in 0..args.count {
        let pick = world.random_in_range(0, names.len() as i32 - 1) as usize;
        let data = table
            .monster(names[pick])
            .with_context(|| format!("monster '{}' vanished from the table", names[pick]))?;
        let transform = Transform::at(Vec3::new(i as f32 * 2.0, 0.0, 0.0));
        let monster = Monster::new(
            &mut world,
            data,
            &mut sprites,
            &instance,
            transform,
            args.dungeon_level,
        )
        .with_context(|| format!("failed to spawn {}", data.name))?;
        monsters.push(monster);
    }
    world.step();

    let mut summary = Summary {
        spawned: monsters.len(),
        sprite_textures: sprites.len(),
        ..Summary::default()
    };
    for monster in &mut monsters {
        let stats = *monster.live_stats(table)?;
        tracing::info!(
            name = monster.name(),
            max_life = stats.max_life,
            armor_class = stats.armor_class,
            hit_chance_vs_ac20 = stats.melee_hit_chance(20),
            "monster ready"
        );

        match monster.die(&mut world, items)? {
            Some(ItemDrop::Gold) => summary.gold_drops += 1,
            Some(ItemDrop::Item(item)) => summary.items.push(item.name),
            None => {}
        }
        summary.killed += 1;
        summary.experience += u64::from(monster.experience_on_kill(table)?);
    }
    world.step();

    summary.final_tick = world.tick();
    summary.state_hash = world.state_hash();
    summary.replay_matches = World::replay(world.events()).state_hash() == summary.state_hash;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(count: usize, seed: u64) -> SimulationArgs {
        SimulationArgs {
            count,
            seed,
            dungeon_level: 3,
        }
    }

    #[test]
    fn built_in_tables_load() {
        let table = default_table().unwrap();
        assert!(table.monster("Zombie").is_some());
        assert!(!default_items().unwrap().is_empty());
    }

    #[test]
    fn generated_sprites_cover_every_animation() {
        let table = default_table().unwrap();
        let decoder = generated_sprites(&table);
        let zombie = table.monster("Zombie").unwrap();
        for anim in AnimState::ALL {
            let path = sprite_path(&zombie.sprite_path, anim);
            let image = decoder.decode(std::path::Path::new(&path)).unwrap();
            assert_eq!(image.frames.len(), PLACEHOLDER_FRAMES);
            assert_eq!(image.frames[0].len(), image.frame_size_in_bytes());
        }
    }

    #[test]
    fn simulation_kills_everything_and_replays() {
        let table = default_table().unwrap();
        let items = default_items().unwrap();
        let summary = simulate(generated_sprites(&table), &table, &items, args(12, 42)).unwrap();

        assert_eq!(summary.spawned, 12);
        assert_eq!(summary.killed, 12);
        assert!(summary.gold_drops + summary.items.len() <= 12);
        assert!(summary.experience > 0);
        assert!(summary.sprite_textures > 0);
        assert_eq!(summary.final_tick, 3);
        assert!(summary.replay_matches);
    }

    #[test]
    fn same_seed_same_outcome() {
        let table = default_table().unwrap();
        let items = default_items().unwrap();
        let run = || simulate(generated_sprites(&table), &table, &items, args(8, 7)).unwrap();
        let (a, b) = (run(), run());
        assert_eq!(a.gold_drops, b.gold_drops);
        assert_eq!(a.items, b.items);
        assert_eq!(a.experience, b.experience);
    }

    #[test]
    fn missing_sprites_fail_the_spawn() {
        let table = default_table().unwrap();
        let items = default_items().unwrap();
        let err = simulate(MemoryDecoder::new(), &table, &items, args(1, 1)).unwrap_err();
        assert!(format!("{err:#}").contains("not found"));
    }

    #[test]
    fn empty_table_is_rejected() {
        let items = default_items().unwrap();
        let result = simulate(MemoryDecoder::new(), &MonsterTable::new(), &items, args(1, 1));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_item_table_is_an_error() {
        assert!(load_items("[{\"id\": \"x\"}]").is_err());
    }
}
