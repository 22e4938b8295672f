// scene/lighting.rs - Generation keyed cache of per-entity lighting

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec3;

use crate::color::Color;
use crate::geometry::Triangle;
use crate::scene::{Body, Light};

/// Counters for cache behavior, mostly useful in logs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightingStats {
    pub hits: u64,
    pub misses: u64,
    /// Individual light evaluations performed, i.e. polygons times lights
    /// summed over every cache miss.
    pub evaluations: u64,
}

struct CacheEntry {
    colors: Arc<[Color]>,
    body_generation: u64,
    light_state: Vec<(hecs::Entity, u64)>,
}

/// Caches combined lighting results per entity.
///
/// An entry is valid while the body's generation and every light's
/// `(id, generation)` pair are unchanged, so validity is a handful of integer
/// comparisons. A valid entry is returned without evaluating any light.
#[derive(Default)]
pub struct LightingSystem {
    cache: HashMap<hecs::Entity, CacheEntry>,
    stats: LightingStats,
}

impl LightingSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of light identities and generations used as a cache key.
    pub fn light_state(lights: &[(hecs::Entity, Light)]) -> Vec<(hecs::Entity, u64)> {
        lights
            .iter()
            .map(|(entity, light)| (*entity, light.generation()))
            .collect()
    }

    /// Returns the cached colors if the entry is still valid.
    pub fn lookup(
        &mut self,
        entity: hecs::Entity,
        body_generation: u64,
        light_state: &[(hecs::Entity, u64)],
    ) -> Option<Arc<[Color]>> {
        match self.cache.get(&entity) {
            Some(entry)
                if entry.body_generation == body_generation
                    && entry.light_state.as_slice() == light_state =>
            {
                self.stats.hits += 1;
                Some(Arc::clone(&entry.colors))
            }
            _ => None,
        }
    }

    /// Stores freshly evaluated colors and returns them shared.
    pub fn insert(
        &mut self,
        entity: hecs::Entity,
        body_generation: u64,
        light_state: Vec<(hecs::Entity, u64)>,
        colors: Vec<Color>,
    ) -> Arc<[Color]> {
        self.stats.misses += 1;
        self.stats.evaluations += (colors.len() * light_state.len()) as u64;

        let colors: Arc<[Color]> = colors.into();
        self.cache.insert(
            entity,
            CacheEntry {
                colors: Arc::clone(&colors),
                body_generation,
                light_state,
            },
        );
        colors
    }

    /// Evaluates every light against every polygon and averages the
    /// contributions. With no lights the base colors pass through unchanged.
    pub fn evaluate(polygons: &[(Triangle, Color)], lights: &[Light]) -> Vec<Color> {
        polygons
            .iter()
            .map(|(triangle, base)| {
                if lights.is_empty() {
                    return *base;
                }
                let mut sum = Vec3::ZERO;
                for light in lights {
                    sum += light.illuminate(triangle, *base).0;
                }
                Color(sum / lights.len() as f32).clamped()
            })
            .collect()
    }

    /// Cached lookup with evaluation on miss, for driving a single entity
    /// outside the frame pipeline.
    pub fn compute(
        &mut self,
        entity: hecs::Entity,
        body: &mut Body,
        lights: &[(hecs::Entity, Light)],
    ) -> Arc<[Color]> {
        let light_state = Self::light_state(lights);
        if let Some(colors) = self.lookup(entity, body.generation(), &light_state) {
            return colors;
        }

        let generation = body.generation();
        let polygons: Vec<(Triangle, Color)> = body.shading_inputs().collect();
        let light_copies: Vec<Light> = lights.iter().map(|(_, light)| *light).collect();
        let colors = Self::evaluate(&polygons, &light_copies);
        self.insert(entity, generation, light_state, colors)
    }

    /// Drops the cache entry for one entity, e.g. when it despawns.
    pub fn invalidate(&mut self, entity: hecs::Entity) {
        self.cache.remove(&entity);
    }

    pub fn invalidate_all(&mut self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> LightingStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = LightingStats::default();
    }
}
