//! Session lifecycle states and command gating

use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Mode {
    /// Collecting vertices, fewer than the configured count so far
    #[default]
    Building,
    /// All vertices placed, waiting for play
    Ready,
    /// Compute loop and refresh ticker running
    Jumping,
    /// Loops stopped, terrain kept
    Paused,
}

/// Menu-style commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Play,
    Pause,
    Reset,
    Build,
}

impl Command {
    pub const ALL: [Command; 4] = [Command::Play, Command::Pause, Command::Reset, Command::Build];

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Play => "play",
            Command::Pause => "pause",
            Command::Reset => "reset",
            Command::Build => "build",
        }
    }
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Building => "Building",
            Mode::Ready => "Ready",
            Mode::Jumping => "Jumping",
            Mode::Paused => "Paused",
        }
    }

    /// Whether `command` does anything in this mode
    pub fn accepts(&self, command: Command) -> bool {
        match command {
            Command::Play => matches!(self, Mode::Ready | Mode::Paused),
            Command::Pause => *self == Mode::Jumping,
            Command::Reset => *self == Mode::Paused,
            Command::Build => true,
        }
    }

    /// Vertices can only be placed while building or ready
    pub fn accepts_vertices(&self) -> bool {
        matches!(self, Mode::Building | Mode::Ready)
    }

    /// Commands to offer in a menu for this mode
    pub fn available_commands(&self) -> Vec<Command> {
        Command::ALL
            .into_iter()
            .filter(|c| self.accepts(*c))
            .collect()
    }

    fn to_u8(self) -> u8 {
        match self {
            Mode::Building => 0,
            Mode::Ready => 1,
            Mode::Jumping => 2,
            Mode::Paused => 3,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Mode::Ready,
            2 => Mode::Jumping,
            3 => Mode::Paused,
            _ => Mode::Building,
        }
    }
}

/// Mode shared between the command thread and the loops
///
/// Written only by the session controller; the compute loop polls it once
/// per batch.
#[derive(Debug, Default)]
pub struct ModeCell(AtomicU8);

impl ModeCell {
    pub fn new(mode: Mode) -> Self {
        Self(AtomicU8::new(mode.to_u8()))
    }

    #[inline]
    pub fn get(&self) -> Mode {
        Mode::from_u8(self.0.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, mode: Mode) {
        self.0.store(mode.to_u8(), Ordering::Release);
    }

    #[inline]
    pub fn is_jumping(&self) -> bool {
        self.get() == Mode::Jumping
    }
}
