use crate::world::World;
use serde::{Deserialize, Serialize};

/// Identifier of a base item type, as handed out by an [`ItemFactory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// A generated base item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub quality_level: i32,
}

/// Restricts which item types a random pick may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemFilter {
    pub max_quality_level: i32,
}

impl ItemFilter {
    pub fn max_quality_level(level: i32) -> Self {
        Self {
            max_quality_level: level,
        }
    }

    pub fn accepts(&self, item: &Item) -> bool {
        item.quality_level <= self.max_quality_level
    }
}

/// What a dying monster leaves behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemDrop {
    Gold,
    Item(Item),
}

/// Source of item types and base items.
pub trait ItemFactory {
    /// Pick a random item type passing `filter`, rolling on the world RNG.
    /// `None` when nothing qualifies.
    fn random_item_id(&self, world: &mut World, filter: ItemFilter) -> Option<ItemId>;

    fn generate_base_item(&self, id: ItemId) -> Option<Item>;
}

/// Item factory over a fixed list of base items.
#[derive(Debug, Clone, Default)]
pub struct BaseItemTable {
    items: Vec<Item>,
}

impl BaseItemTable {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemFactory for BaseItemTable {
    fn random_item_id(&self, world: &mut World, filter: ItemFilter) -> Option<ItemId> {
        let candidates: Vec<&Item> = self.items.iter().filter(|i| filter.accepts(i)).collect();
        if candidates.is_empty() {
            return None;
        }
        let pick = world.random_in_range(0, candidates.len() as i32 - 1);
        Some(candidates[pick as usize].id)
    }

    fn generate_base_item(&self, id: ItemId) -> Option<Item> {
        self.items.iter().find(|i| i.id == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> BaseItemTable {
        BaseItemTable::new(vec![
            Item {
                id: ItemId(1),
                name: "Short Sword".into(),
                quality_level: 1,
            },
            Item {
                id: ItemId(2),
                name: "Buckler".into(),
                quality_level: 1,
            },
            Item {
                id: ItemId(3),
                name: "Great Sword".into(),
                quality_level: 17,
            },
        ])
    }

    #[test]
    fn random_pick_respects_quality_level() {
        let table = table();
        let mut world = World::with_seed(5);
        for _ in 0..200 {
            let id = table
                .random_item_id(&mut world, ItemFilter::max_quality_level(3))
                .unwrap();
            assert_ne!(id, ItemId(3));
        }
    }

    #[test]
    fn nothing_qualifies() {
        let mut world = World::new();
        assert_eq!(
            table().random_item_id(&mut world, ItemFilter::max_quality_level(0)),
            None
        );
        assert_eq!(
            BaseItemTable::default().random_item_id(&mut world, ItemFilter::max_quality_level(99)),
            None
        );
    }

    #[test]
    fn base_item_lookup() {
        let table = table();
        assert_eq!(table.generate_base_item(ItemId(2)).unwrap().name, "Buckler");
        assert!(table.generate_base_item(ItemId(9)).is_none());
        assert_eq!(table.len(), 3);
    }
}
