//! Game objects
//!
//! A game object is a tagged record with an optional owned model. It has no
//! id of its own; the scene identifies it by position.

use macroquad::color::{Color, WHITE};
use macroquad::math::Vec3;

use super::tag::Tags;
use super::transform::Transform;
use crate::render::RenderBackend;

/// A positioned, tagged object in the scene.
///
/// `M` is the backend's model handle. The model is only used while the
/// `MODEL` tag is set.
pub struct GameObject<M> {
    tags: Tags,
    model: Option<M>,
    pub transform: Transform,
    pub tint: Color,
}

impl<M> GameObject<M> {
    /// Create an object at `position` with the given tags and no model.
    pub fn new(position: Vec3, tags: Tags) -> Self {
        Self {
            tags,
            model: None,
            transform: Transform::from_position(position),
            tint: WHITE,
        }
    }

    /// Attach an owned model.
    pub fn with_model(mut self, model: M) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    pub fn tags(&self) -> Tags {
        self.tags
    }

    /// True if every bit of `tag` is set on this object.
    pub fn has_tag(&self, tag: Tags) -> bool {
        self.tags.has(tag)
    }

    /// The model, if this object is model-tagged and has one.
    pub fn model(&self) -> Option<&M> {
        if self.has_tag(Tags::MODEL) {
            self.model.as_ref()
        } else {
            None
        }
    }

    /// Draw this object for the current frame.
    ///
    /// `_delta` is the frame time. Nothing animates yet.
    pub fn update_and_draw<B>(&mut self, _delta: f32, backend: &mut B)
    where
        B: RenderBackend<Model = M>,
    {
        if !self.has_tag(Tags::MODEL) {
            return;
        }
        if let Some(model) = self.model.as_mut() {
            backend.draw_model(model, &self.transform, self.tint);
        }
    }

    /// Release the owned model through the backend.
    ///
    /// Consumes the object, so a model can only ever be released once.
    /// A model on an object without the `MODEL` tag is dropped without
    /// going through the backend.
    pub fn unload<B>(self, backend: &mut B)
    where
        B: RenderBackend<Model = M>,
    {
        if !self.tags.has(Tags::MODEL) {
            return;
        }
        if let Some(model) = self.model {
            backend.release_model(model);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// What a backend was asked to do, in order.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Draw(&'static str),
        Release(&'static str),
    }

    /// Backend that records calls instead of touching the GPU.
    #[derive(Default)]
    pub struct RecordingBackend {
        pub calls: Vec<Call>,
    }

    impl RecordingBackend {
        pub fn draws(&self) -> usize {
            self.calls.iter().filter(|c| matches!(c, Call::Draw(_))).count()
        }

        pub fn releases(&self) -> usize {
            self.calls.iter().filter(|c| matches!(c, Call::Release(_))).count()
        }

        pub fn draw_order(&self) -> Vec<&'static str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Draw(name) => Some(*name),
                    Call::Release(_) => None,
                })
                .collect()
        }
    }

    impl RenderBackend for RecordingBackend {
        type Model = &'static str;

        fn draw_model(&mut self, model: &mut Self::Model, _transform: &Transform, _tint: Color) {
            self.calls.push(Call::Draw(*model));
        }

        fn release_model(&mut self, model: Self::Model) {
            self.calls.push(Call::Release(model));
        }
    }

    #[test]
    fn test_model_object_draws_and_releases_once() {
        let mut backend = RecordingBackend::default();
        let mut obj = GameObject::new(Vec3::ZERO, Tags::MODEL).with_model("scene");

        obj.update_and_draw(0.016, &mut backend);
        assert_eq!(backend.calls, vec![Call::Draw("scene")]);

        obj.unload(&mut backend);
        assert_eq!(backend.draws(), 1);
        assert_eq!(backend.releases(), 1);
    }

    #[test]
    fn test_untagged_object_does_nothing() {
        let mut backend = RecordingBackend::default();
        let mut obj: GameObject<&'static str> = GameObject::new(Vec3::ZERO, Tags::empty());

        obj.update_and_draw(0.016, &mut backend);
        obj.unload(&mut backend);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_model_without_tag_is_ignored() {
        let mut backend = RecordingBackend::default();
        let mut obj = GameObject::new(Vec3::ZERO, Tags::SOLID).with_model("hidden");

        assert!(obj.model().is_none());
        obj.update_and_draw(0.016, &mut backend);
        obj.unload(&mut backend);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_tag_without_model_does_nothing() {
        let mut backend = RecordingBackend::default();
        let mut obj: GameObject<&'static str> = GameObject::new(Vec3::ZERO, Tags::MODEL);

        obj.update_and_draw(0.016, &mut backend);
        obj.unload(&mut backend);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_composite_tags_still_draw() {
        let mut backend = RecordingBackend::default();
        let mut obj = GameObject::new(Vec3::ZERO, Tags::MODEL | Tags::LIGHT).with_model("lamp");

        assert!(obj.has_tag(Tags::MODEL | Tags::LIGHT));
        assert!(!obj.has_tag(Tags::MODEL | Tags::SOLID));
        obj.update_and_draw(0.016, &mut backend);
        obj.update_and_draw(0.016, &mut backend);
        assert_eq!(backend.draws(), 2);
    }

    #[test]
    fn test_new_uses_default_placement() {
        let obj: GameObject<()> = GameObject::new(Vec3::new(1.0, 2.0, 3.0), Tags::PLAYER);
        assert_eq!(obj.transform.position, [1.0, 2.0, 3.0]);
        assert_eq!(obj.transform.scale, [1.0, 1.0, 1.0]);
        assert_eq!(obj.transform.rotation_angle, 0.0);
        assert_eq!(obj.tint, WHITE);
        assert_eq!(obj.tags(), Tags::PLAYER);
    }
}
