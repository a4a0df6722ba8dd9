//! Typed user-input events.
//!
//! Modifier and button state travel as the masks the platform delivered;
//! the bitflags types expose named queries instead of expanding the mask
//! into individual fields, so nothing is materialized until asked for.

use std::time::Duration;

use bitflags::bitflags;
use winit::event::MouseButton;
use winit::keyboard::{ModifiersState, PhysicalKey};

/// Numeric identity of a window, stable for the window's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowTag(pub u64);

impl From<winit::window::WindowId> for WindowTag {
    fn from(id: winit::window::WindowId) -> Self {
        Self(u64::from(id))
    }
}

impl std::fmt::Display for WindowTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Keyboard modifier mask carried by key events.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct KeyMods: u32 {
        const SHIFT = 1;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const GUI = 1 << 3;
    }
}

impl KeyMods {
    pub fn from_winit(state: ModifiersState) -> Self {
        let mut mods = Self::empty();
        if state.shift_key() {
            mods |= Self::SHIFT;
        }
        if state.control_key() {
            mods |= Self::CTRL;
        }
        if state.alt_key() {
            mods |= Self::ALT;
        }
        if state.super_key() {
            mods |= Self::GUI;
        }
        mods
    }

    pub fn shift(self) -> bool {
        self.contains(Self::SHIFT)
    }

    pub fn ctrl(self) -> bool {
        self.contains(Self::CTRL)
    }

    pub fn alt(self) -> bool {
        self.contains(Self::ALT)
    }

    pub fn gui(self) -> bool {
        self.contains(Self::GUI)
    }
}

bitflags! {
    /// Mouse buttons held at the time of an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MouseButtons: u32 {
        const LEFT = 1;
        const MIDDLE = 1 << 1;
        const RIGHT = 1 << 2;
        const X1 = 1 << 3;
        const X2 = 1 << 4;
    }
}

impl MouseButtons {
    pub(crate) fn flag_for(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::LEFT,
            MouseButton::Middle => Self::MIDDLE,
            MouseButton::Right => Self::RIGHT,
            MouseButton::Back => Self::X1,
            MouseButton::Forward => Self::X2,
            MouseButton::Other(_) => Self::empty(),
        }
    }

    pub fn left(self) -> bool {
        self.contains(Self::LEFT)
    }

    pub fn middle(self) -> bool {
        self.contains(Self::MIDDLE)
    }

    pub fn right(self) -> bool {
        self.contains(Self::RIGHT)
    }

    pub fn x1(self) -> bool {
        self.contains(Self::X1)
    }

    pub fn x2(self) -> bool {
        self.contains(Self::X2)
    }
}

/// Events affecting the window itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowChange {
    FocusGained,
    FocusLost,
    Minimized,
    Restored,
    Maximized,
    CloseRequested,
}

/// A key press or release.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyInput {
    pub pressed: bool,
    /// Layout-independent key identity (the scan-code abstraction).
    pub key: PhysicalKey,
    /// Code point produced by the press, when the platform reports one.
    pub code_point: Option<char>,
    pub mods: KeyMods,
    pub repeat: bool,
}

/// Cursor motion inside a window.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseMotion {
    /// Absolute position in window pixels.
    pub position: (f64, f64),
    /// Motion relative to the previous report.
    pub delta: (f64, f64),
    /// Buttons held while moving.
    pub buttons: MouseButtons,
}

/// A mouse button press or release.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseClick {
    pub pressed: bool,
    pub button: MouseButton,
    /// Buttons held after this transition.
    pub buttons: MouseButtons,
    /// Absolute position in window pixels.
    pub position: (f64, f64),
    /// Consecutive-click count (1 = single, 2 = double, ...).
    pub clicks: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Window(WindowChange),
    Key(KeyInput),
    MouseMotion(MouseMotion),
    MouseButton(MouseClick),
}

/// One decoded event: source window, process-relative timestamp, payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub window: WindowTag,
    pub at: Duration,
    pub kind: EventKind,
}
