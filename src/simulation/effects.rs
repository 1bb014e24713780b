//! Short-lived visual flags counted down in frames
//!
//! The presentation layer reads [`EffectQueue::is_active`] instead of
//! scheduling its own timers to clear highlight styles.

use super::types::frames_for_millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Gear display highlight after a shift
    GearShiftFlash,
    /// Horn button highlight after a press
    HornButtonFlash,
}

impl Effect {
    /// How long the effect stays visible, in frames
    pub fn lifetime_frames(self) -> u32 {
        match self {
            Effect::GearShiftFlash => frames_for_millis(300),
            Effect::HornButtonFlash => frames_for_millis(200),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EffectQueue {
    entries: Vec<(Effect, u32)>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an effect, restarting its countdown if it is already running
    pub fn trigger(&mut self, effect: Effect) {
        let frames = effect.lifetime_frames();
        match self.entries.iter_mut().find(|(e, _)| *e == effect) {
            Some((_, remaining)) => *remaining = frames,
            None => self.entries.push((effect, frames)),
        }
    }

    pub fn is_active(&self, effect: Effect) -> bool {
        self.entries.iter().any(|(e, _)| *e == effect)
    }

    pub fn remaining(&self, effect: Effect) -> u32 {
        self.entries
            .iter()
            .find(|(e, _)| *e == effect)
            .map_or(0, |(_, remaining)| *remaining)
    }

    /// Count every effect down by one frame and drop expired ones
    pub fn tick(&mut self) {
        for (_, remaining) in &mut self.entries {
            *remaining = remaining.saturating_sub(1);
        }
        self.entries.retain(|(_, remaining)| *remaining > 0);
    }

    pub fn active(&self) -> impl Iterator<Item = Effect> + '_ {
        self.entries.iter().map(|(effect, _)| *effect)
    }
}
