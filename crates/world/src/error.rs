use duskforge_assets::AssetError;
use duskforge_common::EntityId;

/// Errors from world and monster operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("entity {} not found", .0.short())]
    UnknownEntity(EntityId),
    #[error("entity {} is already dead", .0.short())]
    AlreadyDead(EntityId),
    #[error("monster type '{0}' is not in the monster table")]
    UnknownMonster(String),
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
}
