//! Sprite cache: decoded animation frames uploaded as array textures.
//!
//! Sprites are identified by content-addressed hashes of their decoded
//! pixels. The cache never holds a renderer of its own; every upload goes
//! through the [`RenderInstance`] passed to [`SpriteCache::load_image`].
//!
//! # Invariants
//! - A path is decoded at most once per cache.
//! - Identical pixels share one texture, whatever path they came from.
//! - The cache (and its textures) must be dropped before the instance that
//!   created them.

use duskforge_render::{CommandQueue, Filter, Format, RenderInstance, TextureInfo};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

/// Content-addressed sprite ID computed from the decoded frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpriteId(pub u64);

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Frames of one image, each tightly packed RGBA8 of `width * height` texels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<Vec<u8>>,
}

impl DecodedImage {
    pub fn frame_size_in_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    fn content_id(&self) -> SpriteId {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update((self.frames.len() as u64).to_le_bytes());
        for frame in &self.frames {
            hasher.update(frame);
        }
        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        SpriteId(u64::from_le_bytes(bytes))
    }
}

/// Turns an image path into decoded frames. Implemented by whatever owns the
/// game's content formats.
pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, AssetError>;
}

/// Decoder over images registered in memory. Used for generated content and
/// tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryDecoder {
    images: HashMap<PathBuf, DecodedImage>,
}

impl MemoryDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, image: DecodedImage) {
        self.images.insert(path.into(), image);
    }
}

impl ImageDecoder for MemoryDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, AssetError> {
        self.images
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_path_buf()))
    }
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("{} has no frames", .0.display())]
    Empty(PathBuf),
    #[error("frame {frame} of {} is {found} bytes, expected {expected}", path.display())]
    FrameSize {
        path: PathBuf,
        frame: usize,
        expected: usize,
        found: usize,
    },
}

/// The texture holding every frame of one sprite, one array layer per frame.
pub struct SpriteGroup<R: RenderInstance> {
    texture: R::Texture,
    width: u32,
    height: u32,
    frame_count: u32,
}

impl<R: RenderInstance> SpriteGroup<R> {
    pub fn texture(&self) -> &R::Texture {
        &self.texture
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }
}

/// Loads sprites once and hands out content-addressed IDs.
pub struct SpriteCache<R: RenderInstance, D: ImageDecoder> {
    decoder: D,
    by_path: HashMap<PathBuf, SpriteId>,
    groups: BTreeMap<SpriteId, SpriteGroup<R>>,
}

impl<R: RenderInstance, D: ImageDecoder> SpriteCache<R, D> {
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            by_path: HashMap::new(),
            groups: BTreeMap::new(),
        }
    }

    /// Decode `path` and upload its frames through `instance`, or return the
    /// ID of an earlier load.
    pub fn load_image(&mut self, instance: &R, path: impl AsRef<Path>) -> Result<SpriteId, AssetError> {
        let path = path.as_ref();
        if let Some(id) = self.by_path.get(path) {
            tracing::trace!(path = %path.display(), %id, "sprite cache hit");
            return Ok(*id);
        }

        let image = self.decoder.decode(path)?;
        check_frames(path, &image)?;
        let id = image.content_id();

        if !self.groups.contains_key(&id) {
            let group = upload(instance, &image);
            tracing::debug!(
                path = %path.display(),
                %id,
                width = image.width,
                height = image.height,
                frames = group.frame_count,
                "sprite uploaded"
            );
            self.groups.insert(id, group);
        }
        self.by_path.insert(path.to_path_buf(), id);
        Ok(id)
    }

    pub fn get(&self, id: SpriteId) -> Option<&SpriteGroup<R>> {
        self.groups.get(&id)
    }

    /// ID of an already loaded path.
    pub fn id_for(&self, path: impl AsRef<Path>) -> Option<SpriteId> {
        self.by_path.get(path.as_ref()).copied()
    }

    /// Number of distinct sprites (textures) held.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Drop every texture. Call before tearing down the render instance.
    pub fn clear(&mut self) {
        self.by_path.clear();
        self.groups.clear();
    }
}

fn check_frames(path: &Path, image: &DecodedImage) -> Result<(), AssetError> {
    if image.frames.is_empty() || image.width == 0 || image.height == 0 {
        return Err(AssetError::Empty(path.to_path_buf()));
    }
    let expected = image.frame_size_in_bytes();
    for (frame, data) in image.frames.iter().enumerate() {
        if data.len() != expected {
            return Err(AssetError::FrameSize {
                path: path.to_path_buf(),
                frame,
                expected,
                found: data.len(),
            });
        }
    }
    Ok(())
}

fn upload<R: RenderInstance>(instance: &R, image: &DecodedImage) -> SpriteGroup<R> {
    let frame_count = image.frames.len() as u32;
    let info = TextureInfo::new(image.width, image.height, Format::Rgba8Unorm)
        .with_layers(frame_count)
        .with_filter(Filter::Nearest);
    let texture = instance.create_texture(&info);

    let mut queue = instance.create_command_queue();
    for (layer, frame) in image.frames.iter().enumerate() {
        queue.update_texture(&texture, layer as u32, frame);
    }

    SpriteGroup {
        texture,
        width: image.width,
        height: image.height,
        frame_count,
    }
}
