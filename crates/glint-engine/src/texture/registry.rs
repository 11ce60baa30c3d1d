use std::collections::HashMap;

/// Opaque texture handle shared with the engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureId(pub u32);

/// Engine-side texture metadata lookup.
///
/// The pipeline never owns this data; it only asks for sizes when an upload is
/// driven by id (`Renderer::update_texture`).
pub trait TextureRegistry {
    fn width(&self, id: TextureId) -> Option<u32>;
    fn height(&self, id: TextureId) -> Option<u32>;
}

/// A plain in-memory registry.
#[derive(Debug, Clone, Default)]
pub struct TextureTable {
    sizes: HashMap<TextureId, (u32, u32)>,
}

impl TextureTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: TextureId, width: u32, height: u32) {
        self.sizes.insert(id, (width, height));
    }
}

impl TextureRegistry for TextureTable {
    fn width(&self, id: TextureId) -> Option<u32> {
        self.sizes.get(&id).map(|&(w, _)| w)
    }

    fn height(&self, id: TextureId) -> Option<u32> {
        self.sizes.get(&id).map(|&(_, h)| h)
    }
}
