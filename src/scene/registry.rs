//! Scene registry
//!
//! Ordered, append-only, bounded collection of game objects. Insertion
//! order is draw order and release order.

use super::object::GameObject;
use crate::render::RenderBackend;

/// Default maximum number of objects in a scene.
pub const MAX_OBJECTS: usize = 100;

/// Error type for scene operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The scene already holds `capacity` objects
    Full { capacity: usize },
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::Full { capacity } => {
                write!(f, "Scene is full ({} objects)", capacity)
            }
        }
    }
}

impl std::error::Error for SceneError {}

/// All game objects in the world.
pub struct Scene<M> {
    objects: Vec<GameObject<M>>,
    capacity: usize,
}

impl<M> Scene<M> {
    /// Create an empty scene bounded by `MAX_OBJECTS`.
    pub fn new() -> Self {
        Self::with_capacity(MAX_OBJECTS)
    }

    /// Create an empty scene bounded by `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            objects: Vec::with_capacity(capacity.min(MAX_OBJECTS)),
            capacity,
        }
    }

    /// Append an object. Fails once the scene is at capacity; the rejected
    /// object is dropped.
    pub fn add(&mut self, object: GameObject<M>) -> Result<(), SceneError> {
        if self.objects.len() >= self.capacity {
            return Err(SceneError::Full { capacity: self.capacity });
        }
        self.objects.push(object);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &GameObject<M>> {
        self.objects.iter()
    }

    /// Draw every object in insertion order.
    pub fn draw_all<B>(&mut self, delta: f32, backend: &mut B)
    where
        B: RenderBackend<Model = M>,
    {
        for object in &mut self.objects {
            object.update_and_draw(delta, backend);
        }
    }

    /// Release every object's resources in insertion order.
    ///
    /// Consumes the scene.
    pub fn unload_all<B>(self, backend: &mut B)
    where
        B: RenderBackend<Model = M>,
    {
        for object in self.objects {
            object.unload(backend);
        }
    }
}

impl<M> Default for Scene<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::object::tests::{Call, RecordingBackend};
    use crate::scene::Tags;
    use macroquad::math::Vec3;

    fn model_object(name: &'static str) -> GameObject<&'static str> {
        GameObject::new(Vec3::ZERO, Tags::MODEL).with_model(name)
    }

    #[test]
    fn test_draw_order_is_insertion_order() {
        let mut scene = Scene::new();
        scene.add(model_object("A")).unwrap();
        scene.add(model_object("B")).unwrap();
        scene.add(model_object("C")).unwrap();

        let mut backend = RecordingBackend::default();
        scene.draw_all(0.016, &mut backend);

        assert_eq!(
            backend.calls,
            vec![Call::Draw("A"), Call::Draw("B"), Call::Draw("C")]
        );
    }

    #[test]
    fn test_release_order_matches_draw_order() {
        let names = ["tree", "rock", "house", "lamp", "well"];
        let mut scene = Scene::new();
        for name in names {
            scene.add(model_object(name)).unwrap();
        }

        let mut backend = RecordingBackend::default();
        scene.draw_all(0.016, &mut backend);
        scene.unload_all(&mut backend);

        let drawn: Vec<_> = backend.calls.iter()
            .filter_map(|c| match c { Call::Draw(n) => Some(*n), _ => None })
            .collect();
        let released: Vec<_> = backend.calls.iter()
            .filter_map(|c| match c { Call::Release(n) => Some(*n), _ => None })
            .collect();
        assert_eq!(drawn, names);
        assert_eq!(released, names);
    }

    #[test]
    fn test_mixed_tags_only_model_objects_touch_backend() {
        let mut scene = Scene::new();
        scene.add(model_object("A")).unwrap();
        scene.add(GameObject::new(Vec3::ZERO, Tags::LIGHT)).unwrap();
        scene.add(model_object("C")).unwrap();
        assert_eq!(scene.len(), 3);

        let mut backend = RecordingBackend::default();
        scene.draw_all(0.016, &mut backend);
        scene.unload_all(&mut backend);
        assert_eq!(backend.draws(), 2);
        assert_eq!(backend.releases(), 2);
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut scene = Scene::with_capacity(2);
        scene.add(model_object("A")).unwrap();
        scene.add(model_object("B")).unwrap();

        let err = scene.add(model_object("C")).unwrap_err();
        assert_eq!(err, SceneError::Full { capacity: 2 });
        assert_eq!(scene.len(), 2);

        let mut backend = RecordingBackend::default();
        scene.draw_all(0.016, &mut backend);
        assert_eq!(backend.calls, vec![Call::Draw("A"), Call::Draw("B")]);
    }

    #[test]
    fn test_default_capacity() {
        let mut scene: Scene<&'static str> = Scene::default();
        assert_eq!(scene.capacity(), MAX_OBJECTS);
        for _ in 0..MAX_OBJECTS {
            scene.add(GameObject::new(Vec3::ZERO, Tags::SOLID)).unwrap();
        }
        assert!(scene.add(GameObject::new(Vec3::ZERO, Tags::SOLID)).is_err());
    }

    #[test]
    fn test_empty_scene() {
        let scene: Scene<&'static str> = Scene::new();
        assert!(scene.is_empty());
        assert_eq!(scene.iter().count(), 0);

        let mut backend = RecordingBackend::default();
        scene.unload_all(&mut backend);
        assert!(backend.calls.is_empty());
    }
}
