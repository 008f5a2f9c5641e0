//! Text labels a tool owns: persistent height readouts and error banners
//! that expire on their own.

use std::time::{Duration, Instant};

use foundation::math::Ecef;
use scene::SceneEngine;
use scene::components::{LabelStyle, Primitive, TextLabel};
use scene::entity::EntityId;

/// How long an error banner stays on screen.
pub const TRANSIENT_TTL: Duration = Duration::from_secs(5);

pub fn height_text(height_m: f64) -> String {
    format!("{height_m:.2} m")
}

pub fn readout_label(position: Ecef, text: impl Into<String>) -> Primitive {
    Primitive::Label(TextLabel {
        position,
        text: text.into(),
        style: LabelStyle::readout(),
    })
}

pub fn error_label(position: Ecef, message: &str) -> Primitive {
    Primitive::Label(TextLabel {
        position,
        text: format!("ERROR: {message}"),
        style: LabelStyle::error_banner(),
    })
}

#[derive(Debug, Default)]
pub struct Annotations {
    persistent: Vec<EntityId>,
    /// Deadline is stamped by the first `tick` that sees the banner.
    transient: Vec<(EntityId, Option<Instant>)>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_readout(&mut self, scene: &mut dyn SceneEngine, position: Ecef, text: String) {
        let id = scene.add_entity(readout_label(position, text));
        self.persistent.push(id);
    }

    /// Shows `ERROR: {message}` at `position` for [`TRANSIENT_TTL`], counted
    /// from the next [`Annotations::tick`].
    pub fn add_error(&mut self, scene: &mut dyn SceneEngine, position: Ecef, message: &str) {
        let id = scene.add_entity(error_label(position, message));
        self.transient.push((id, None));
    }

    /// Starts the clock on new banners and removes expired ones; returns how
    /// many were removed.
    pub fn tick(&mut self, scene: &mut dyn SceneEngine, now: Instant) -> usize {
        let before = self.transient.len();
        self.transient.retain_mut(|(id, expires)| {
            let deadline = *expires.get_or_insert(now + TRANSIENT_TTL);
            if now >= deadline {
                scene.remove_entity(*id);
                false
            } else {
                true
            }
        });
        before - self.transient.len()
    }

    pub fn persistent_len(&self) -> usize {
        self.persistent.len()
    }

    pub fn transient_len(&self) -> usize {
        self.transient.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Annotations, TRANSIENT_TTL, height_text};
    use foundation::math::Ecef;
    use scene::HeadlessScene;
    use scene::components::PrimitiveKind;
    use std::time::{Duration, Instant};

    #[test]
    fn height_text_has_two_decimals() {
        assert_eq!(height_text(40.0), "40.00 m");
        assert_eq!(height_text(12.345), "12.35 m");
    }

    #[test]
    fn error_banner_expires_after_ttl() {
        let mut scene = HeadlessScene::new(0.0);
        let mut notes = Annotations::new();
        let start = Instant::now();
        notes.add_error(&mut scene, Ecef::new(1.0, 2.0, 3.0), "boom");
        assert_eq!(scene.world().count_by_kind(PrimitiveKind::Label), 1);

        assert_eq!(notes.tick(&mut scene, start), 0);
        assert_eq!(notes.tick(&mut scene, start + Duration::from_secs(4)), 0);
        assert_eq!(notes.transient_len(), 1);

        assert_eq!(notes.tick(&mut scene, start + TRANSIENT_TTL), 1);
        assert!(scene.world().is_empty());
    }

    #[test]
    fn banner_lifetime_follows_the_tick_clock() {
        let mut scene = HeadlessScene::new(0.0);
        let mut notes = Annotations::new();
        // A tick clock running ahead of the wall clock still gives the full lifetime.
        let start = Instant::now();
        notes.tick(&mut scene, start);

        let first_seen = start + Duration::from_secs(60);
        notes.add_error(&mut scene, Ecef::new(1.0, 2.0, 3.0), "late");
        assert_eq!(notes.tick(&mut scene, first_seen), 0);
        assert_eq!(
            notes.tick(&mut scene, first_seen + TRANSIENT_TTL - Duration::from_millis(1)),
            0
        );
        assert_eq!(notes.tick(&mut scene, first_seen + TRANSIENT_TTL), 1);
        assert_eq!(notes.transient_len(), 0);
    }
}
