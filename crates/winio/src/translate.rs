//! Decodes native window events into the typed model.
//!
//! The pump keeps the little bit of state winit does not carry per event:
//! the live modifier mask, the held-button mask, the last cursor position
//! per window (for relative motion), and a click chronometer that
//! synthesizes consecutive-click counts.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::trace;
use winit::event::{MouseButton, WindowEvent};

use crate::events::{
    Event, EventKind, KeyInput, KeyMods, MouseButtons, MouseClick, MouseMotion, WindowChange,
    WindowTag,
};

/// Presses of the same button within this window and radius chain into a
/// multi-click.
const MULTI_CLICK_WINDOW: Duration = Duration::from_millis(500);
const MULTI_CLICK_SLOP: f64 = 4.0;

struct ClickMemory {
    button: MouseButton,
    at: Duration,
    position: (f64, f64),
    count: u32,
}

#[derive(Default)]
pub(crate) struct PumpState {
    mods: KeyMods,
    buttons: MouseButtons,
    cursors: BTreeMap<WindowTag, (f64, f64)>,
    click: Option<ClickMemory>,
}

impl PumpState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Decodes one native event, or returns `None` for events that only
    /// update pump state or have no decoder at all.
    pub(crate) fn translate(
        &mut self,
        window: WindowTag,
        event: &WindowEvent,
        at: Duration,
    ) -> Option<Event> {
        let kind = match event {
            WindowEvent::CloseRequested => EventKind::Window(WindowChange::CloseRequested),
            WindowEvent::Focused(true) => EventKind::Window(WindowChange::FocusGained),
            WindowEvent::Focused(false) => EventKind::Window(WindowChange::FocusLost),
            WindowEvent::Occluded(true) => EventKind::Window(WindowChange::Minimized),
            WindowEvent::Occluded(false) => EventKind::Window(WindowChange::Restored),
            WindowEvent::ModifiersChanged(mods) => {
                self.mods = KeyMods::from_winit(mods.state());
                return None;
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = (position.x, position.y);
                let previous = self.cursors.insert(window, position);
                let delta = previous
                    .map(|(px, py)| (position.0 - px, position.1 - py))
                    .unwrap_or((0.0, 0.0));
                EventKind::MouseMotion(MouseMotion {
                    position,
                    delta,
                    buttons: self.buttons,
                })
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state.is_pressed();
                let flag = MouseButtons::flag_for(*button);
                if pressed {
                    self.buttons |= flag;
                } else {
                    self.buttons &= !flag;
                }
                let position = self.cursors.get(&window).copied().unwrap_or((0.0, 0.0));
                let clicks = if pressed {
                    self.count_click(*button, position, at)
                } else {
                    self.release_click_count(*button)
                };
                EventKind::MouseButton(MouseClick {
                    pressed,
                    button: *button,
                    buttons: self.buttons,
                    position,
                    clicks,
                })
            }
            WindowEvent::KeyboardInput { event, .. } => EventKind::Key(KeyInput {
                pressed: event.state.is_pressed(),
                key: event.physical_key,
                code_point: event.text.as_ref().and_then(|text| text.chars().next()),
                mods: self.mods,
                repeat: event.repeat,
            }),
            other => {
                trace!(window = %window, event = ?other, "native event has no decoder");
                return None;
            }
        };

        Some(Event { window, at, kind })
    }

    fn count_click(&mut self, button: MouseButton, position: (f64, f64), at: Duration) -> u32 {
        let count = match &self.click {
            Some(memory)
                if memory.button == button
                    && at.saturating_sub(memory.at) <= MULTI_CLICK_WINDOW
                    && (position.0 - memory.position.0).abs() <= MULTI_CLICK_SLOP
                    && (position.1 - memory.position.1).abs() <= MULTI_CLICK_SLOP =>
            {
                memory.count + 1
            }
            _ => 1,
        };
        self.click = Some(ClickMemory {
            button,
            at,
            position,
            count,
        });
        count
    }

    fn release_click_count(&self, button: MouseButton) -> u32 {
        match &self.click {
            Some(memory) if memory.button == button => memory.count,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;
    use winit::event::{DeviceId, ElementState};

    const W: WindowTag = WindowTag(7);

    fn device() -> DeviceId {
        // Test-only stand-in; winit never compares it.
        unsafe { DeviceId::dummy() }
    }

    fn cursor_moved(x: f64, y: f64) -> WindowEvent {
        WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(x, y),
        }
    }

    fn mouse_input(state: ElementState, button: MouseButton) -> WindowEvent {
        WindowEvent::MouseInput {
            device_id: device(),
            state,
            button,
        }
    }

    fn at(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn close_and_focus_decode_to_window_changes() {
        let mut pump = PumpState::new();
        let decoded = pump
            .translate(W, &WindowEvent::CloseRequested, at(1))
            .expect("decoded");
        assert_eq!(decoded.window, W);
        assert_eq!(decoded.kind, EventKind::Window(WindowChange::CloseRequested));

        let decoded = pump
            .translate(W, &WindowEvent::Focused(false), at(2))
            .expect("decoded");
        assert_eq!(decoded.kind, EventKind::Window(WindowChange::FocusLost));
    }

    #[test]
    fn motion_reports_relative_deltas_per_window() {
        let mut pump = PumpState::new();
        let first = pump.translate(W, &cursor_moved(10.0, 20.0), at(1)).unwrap();
        match first.kind {
            EventKind::MouseMotion(motion) => {
                assert_eq!(motion.position, (10.0, 20.0));
                assert_eq!(motion.delta, (0.0, 0.0));
            }
            other => panic!("unexpected kind: {other:?}"),
        }

        let second = pump.translate(W, &cursor_moved(14.0, 17.0), at(2)).unwrap();
        match second.kind {
            EventKind::MouseMotion(motion) => {
                assert_eq!(motion.delta, (4.0, -3.0));
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn button_mask_accumulates_and_clears() {
        let mut pump = PumpState::new();
        let _ = pump.translate(W, &cursor_moved(5.0, 5.0), at(1));

        let press = pump
            .translate(W, &mouse_input(ElementState::Pressed, MouseButton::Left), at(2))
            .unwrap();
        match press.kind {
            EventKind::MouseButton(click) => {
                assert!(click.pressed);
                assert!(click.buttons.left());
                assert_eq!(click.position, (5.0, 5.0));
            }
            other => panic!("unexpected kind: {other:?}"),
        }

        let release = pump
            .translate(W, &mouse_input(ElementState::Released, MouseButton::Left), at(3))
            .unwrap();
        match release.kind {
            EventKind::MouseButton(click) => {
                assert!(!click.pressed);
                assert!(!click.buttons.left());
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn rapid_presses_chain_into_multi_clicks() {
        let mut pump = PumpState::new();
        let _ = pump.translate(W, &cursor_moved(5.0, 5.0), at(0));

        let press = |pump: &mut PumpState, ms| {
            let event = pump
                .translate(W, &mouse_input(ElementState::Pressed, MouseButton::Left), at(ms))
                .unwrap();
            match event.kind {
                EventKind::MouseButton(click) => click.clicks,
                other => panic!("unexpected kind: {other:?}"),
            }
        };

        assert_eq!(press(&mut pump, 10), 1);
        assert_eq!(press(&mut pump, 200), 2);
        assert_eq!(press(&mut pump, 390), 3);
        // Too slow: the chain restarts.
        assert_eq!(press(&mut pump, 1500), 1);
    }

    #[test]
    fn far_apart_presses_do_not_chain() {
        let mut pump = PumpState::new();
        let _ = pump.translate(W, &cursor_moved(5.0, 5.0), at(0));
        let _ = pump.translate(W, &mouse_input(ElementState::Pressed, MouseButton::Left), at(1));

        let _ = pump.translate(W, &cursor_moved(50.0, 5.0), at(2));
        let event = pump
            .translate(W, &mouse_input(ElementState::Pressed, MouseButton::Left), at(3))
            .unwrap();
        match event.kind {
            EventKind::MouseButton(click) => assert_eq!(click.clicks, 1),
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn undecoded_events_are_dropped() {
        let mut pump = PumpState::new();
        assert!(pump
            .translate(W, &WindowEvent::RedrawRequested, at(1))
            .is_none());
        assert!(pump
            .translate(W, &WindowEvent::HoveredFileCancelled, at(2))
            .is_none());
    }
}
