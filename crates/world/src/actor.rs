use crate::stats::ActorStats;
use duskforge_assets::SpriteId;
use duskforge_common::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Side an actor fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Heaven,
    Hell,
}

impl Faction {
    pub fn is_hostile_to(self, other: Faction) -> bool {
        self != other
    }
}

/// Animation slots every actor can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnimState {
    Walk,
    Idle,
    Dead,
    Attack,
    Hit,
}

impl AnimState {
    pub const ALL: [AnimState; 5] = [Self::Walk, Self::Idle, Self::Dead, Self::Attack, Self::Hit];

    /// Letter naming this animation in sprite file names.
    pub fn letter(self) -> char {
        match self {
            Self::Walk => 'w',
            Self::Idle => 'n',
            Self::Dead => 'd',
            Self::Attack => 'a',
            Self::Hit => 'h',
        }
    }
}

/// State shared by every living thing in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: EntityId,
    pub name: String,
    pub faction: Faction,
    pub stats: ActorStats,
    pub animations: BTreeMap<AnimState, SpriteId>,
    pub current_animation: AnimState,
    dead: bool,
}

impl Actor {
    pub fn new(id: EntityId, name: impl Into<String>, faction: Faction) -> Self {
        Self {
            id,
            name: name.into(),
            faction,
            stats: ActorStats::default(),
            animations: BTreeMap::new(),
            current_animation: AnimState::Idle,
            dead: false,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Sprite of the animation currently playing, if loaded.
    pub fn current_sprite(&self) -> Option<SpriteId> {
        self.animations.get(&self.current_animation).copied()
    }

    pub(crate) fn mark_dead(&mut self) {
        self.dead = true;
        self.current_animation = AnimState::Dead;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_letters() {
        let letters: String = AnimState::ALL.iter().map(|a| a.letter()).collect();
        assert_eq!(letters, "wndah");
    }

    #[test]
    fn factions_are_hostile_to_each_other() {
        assert!(Faction::Hell.is_hostile_to(Faction::Heaven));
        assert!(!Faction::Hell.is_hostile_to(Faction::Hell));
    }

    #[test]
    fn dying_switches_to_the_dead_animation() {
        let mut actor = Actor::new(EntityId::new(), "Zombie", Faction::Hell);
        actor.animations.insert(AnimState::Dead, SpriteId(7));
        assert_eq!(actor.current_sprite(), None);
        actor.mark_dead();
        assert!(actor.is_dead());
        assert_eq!(actor.current_sprite(), Some(SpriteId(7)));
    }
}
