//! Entity pools: fixed-density pools are reseeded, event-driven pools are
//! appended to and compacted in the same pass that steps them.

use nightsky_platform::{Surface, ViewportSize};
use rand::Rng;

/// Per-frame behaviour shared by every sky entity. One `update` is one
/// frame-equivalent of simulated time; it is not scaled by wall-clock delta.
/// Randomness comes from the owner's generator so a seeded engine replays
/// exactly.
pub trait Entity {
    type Config;

    fn update(&mut self, config: &Self::Config, bounds: ViewportSize, rng: &mut impl Rng);

    /// Exhausted entities must draw nothing.
    fn draw(&self, config: &Self::Config, surface: &mut dyn Surface);

    fn is_active(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct Pool<T> {
    items: Vec<T>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> Pool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every entity with `count` freshly spawned ones.
    pub fn reseed(&mut self, count: usize, mut spawn: impl FnMut() -> T) {
        self.items.clear();
        self.items.reserve(count);
        self.items.extend((0..count).map(|_| spawn()));
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.extend(items);
    }

    /// Updates and draws every entity in order, dropping the ones that went
    /// inactive. Survivors keep their relative order.
    pub fn step(
        &mut self,
        config: &T::Config,
        bounds: ViewportSize,
        rng: &mut impl Rng,
        surface: &mut dyn Surface,
    ) {
        self.items.retain_mut(|item| {
            item.update(config, bounds, rng);
            item.draw(config, surface);
            item.is_active()
        });
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
