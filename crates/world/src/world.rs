use crate::item::ItemDrop;
use duskforge_common::{EntityId, Transform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An event record produced by every mutation to the world.
///
/// The event log is the foundation for replay: each event carries enough to
/// reconstruct the mutation in a fresh world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    Spawned {
        id: EntityId,
        name: String,
        transform: Transform,
    },
    /// Carries the last transform so the removal can be inspected later.
    Despawned { id: EntityId, transform: Transform },
    TransformUpdated {
        id: EntityId,
        old: Transform,
        new: Transform,
    },
    /// Simulation advanced one tick with the given seed.
    Stepped { tick: u64, seed: u64 },
    Killed { id: EntityId, tick: u64 },
    /// A drop rolled for `by`. Placement is up to whoever received it.
    ItemDropped { by: EntityId, drop: ItemDrop },
}

/// The authoritative world state.
///
/// All mutations go through explicit operations and are logged. Entities live
/// in a BTreeMap for deterministic iteration order on every platform.
///
/// Randomness comes from a splitmix64 stream reseeded from the world seed at
/// every step, so the same seed and the same sequence of operations produce
/// the same rolls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    entities: BTreeMap<EntityId, EntityData>,
    tick: u64,
    seed: u64,
    rng: u64,
    /// Append-only event log of all mutations.
    #[serde(skip)]
    event_log: Vec<WorldEvent>,
}

/// Per-entity data stored in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    pub name: String,
    pub transform: Transform,
    pub alive: bool,
}

impl World {
    /// Create an empty world at tick 0 with seed 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a world with a specific seed for deterministic replay.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: seed,
            ..Default::default()
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    /// Spawn a new named entity. Returns its id.
    pub fn spawn(&mut self, name: impl Into<String>, transform: Transform) -> EntityId {
        let id = EntityId::new();
        self.spawn_with_id(id, name, transform);
        id
    }

    /// Spawn an entity with a specific id (used for replay).
    pub fn spawn_with_id(&mut self, id: EntityId, name: impl Into<String>, transform: Transform) {
        let name = name.into();
        tracing::debug!(id = %id.short(), %name, "spawn");
        self.entities.insert(
            id,
            EntityData {
                name: name.clone(),
                transform,
                alive: true,
            },
        );
        self.event_log.push(WorldEvent::Spawned { id, name, transform });
    }

    /// Remove an entity. Returns the data if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityData> {
        let data = self.entities.remove(&id);
        if let Some(ref d) = data {
            self.event_log.push(WorldEvent::Despawned {
                id,
                transform: d.transform,
            });
        }
        data
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityData> {
        self.entities.get(&id)
    }

    /// Update an entity's transform and log the change.
    pub fn set_transform(&mut self, id: EntityId, new: Transform) -> bool {
        if let Some(data) = self.entities.get_mut(&id) {
            let old = data.transform;
            data.transform = new;
            self.event_log.push(WorldEvent::TransformUpdated { id, old, new });
            true
        } else {
            false
        }
    }

    /// Mark a living entity dead. Returns `false` when it does not exist or
    /// is already dead.
    pub fn kill(&mut self, id: EntityId) -> bool {
        match self.entities.get_mut(&id) {
            Some(data) if data.alive => {
                data.alive = false;
                self.event_log.push(WorldEvent::Killed { id, tick: self.tick });
                true
            }
            _ => false,
        }
    }

    pub(crate) fn record_drop(&mut self, by: EntityId, drop: ItemDrop) {
        self.event_log.push(WorldEvent::ItemDropped { by, drop });
    }

    /// Uniform roll in `lo..=hi`.
    pub fn random_in_range(&mut self, lo: i32, hi: i32) -> i32 {
        debug_assert!(lo <= hi, "empty range {lo}..={hi}");
        self.rng = splitmix64(self.rng);
        let span = (hi as i64 - lo as i64 + 1) as u64;
        (lo as i64 + (self.rng % span) as i64) as i32
    }

    /// Advance the simulation by one tick.
    pub fn step(&mut self) {
        self.tick += 1;
        self.seed = splitmix64(self.seed);
        self.rng = self.seed;
        tracing::trace!(tick = self.tick, seed = self.seed, "step");
        self.event_log.push(WorldEvent::Stepped {
            tick: self.tick,
            seed: self.seed,
        });
    }

    /// Reconstruct world state from a sequence of events.
    ///
    /// The RNG stream resumes from the start of the last replayed tick.
    pub fn replay(events: &[WorldEvent]) -> Self {
        let mut world = Self::new();
        for event in events {
            match event {
                WorldEvent::Spawned { id, name, transform } => {
                    world.entities.insert(
                        *id,
                        EntityData {
                            name: name.clone(),
                            transform: *transform,
                            alive: true,
                        },
                    );
                }
                WorldEvent::Despawned { id, .. } => {
                    world.entities.remove(id);
                }
                WorldEvent::TransformUpdated { id, new, .. } => {
                    if let Some(data) = world.entities.get_mut(id) {
                        data.transform = *new;
                    }
                }
                WorldEvent::Stepped { tick, seed } => {
                    world.tick = *tick;
                    world.seed = *seed;
                    world.rng = *seed;
                }
                WorldEvent::Killed { id, .. } => {
                    if let Some(data) = world.entities.get_mut(id) {
                        data.alive = false;
                    }
                }
                WorldEvent::ItemDropped { .. } => {}
            }
        }
        world
    }

    /// Deterministic hash of the world state, in canonical (BTreeMap) order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &self.seed.to_le_bytes());
        for (id, data) in &self.entities {
            mix(&mut h, id.0.as_bytes());
            mix(&mut h, data.name.as_bytes());
            mix(&mut h, &[data.alive as u8]);
            let t = &data.transform;
            let components = t
                .position
                .to_array()
                .into_iter()
                .chain(t.rotation.to_array())
                .chain(t.scale.to_array());
            for v in components {
                mix(&mut h, &v.to_le_bytes());
            }
        }
        h
    }
}

/// Splitmix64 step. Advances both the world seed and the roll stream.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
