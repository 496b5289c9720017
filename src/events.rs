//! Outbound notifications emitted by the core.
//!
//! The core never talks to UI, audio or lives management directly. Everything it wants the
//! outside world to know is pushed into an [`EventSink`] as a [`GameEvent`].

use std::collections::VecDeque;

use glam::Vec2;

use crate::entity::ghost::{GhostMode, GhostType};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Points were just awarded.
    ScoreUpdated(u32),
    PowerPelletCollected,
    GhostEaten { ghost: GhostType, points: u32 },
    PlayerDied { ghost: GhostType },
    /// The global schedule switched to a new phase.
    ModeChanged(GhostMode),
    GhostReleased(GhostType),
    /// An eaten ghost made it back home and resumed normal play.
    GhostRevived(GhostType),
    FrightenedWarning,
    FrightenedEnded,
    PlayerTeleported { from: Vec2, to: Vec2 },
}

/// Sounds the audio layer is expected to play in response to events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    PowerPellet,
    GhostEaten,
}

impl GameEvent {
    /// Returns the sound cue associated with this event, if any.
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            GameEvent::PowerPelletCollected => Some(SoundCue::PowerPellet),
            GameEvent::GhostEaten { .. } => Some(SoundCue::GhostEaten),
            _ => None,
        }
    }
}

/// A fire-and-forget destination for [`GameEvent`]s.
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// FIFO queue of events awaiting consumption by the host.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Removes and returns every queued event, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }
}

impl EventSink for EventQueue {
    fn emit(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }
}
