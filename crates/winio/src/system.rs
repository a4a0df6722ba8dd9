//! Window and GL-context lifecycle.
//!
//! The subsystem ledger is the only place the process-wide window count
//! lives. [`WindowSystem`] creates it and every [`Window`] holds an `Rc` to
//! it: the GL display is installed when the first window comes up and torn
//! down exactly once when the count returns to zero. A failure anywhere in
//! the window/surface/context/vsync sequence unwinds through drops without
//! ever touching the count.

use std::cell::{Cell, RefCell};
use std::ffi::{c_void, CString};
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Duration;

use glutin::config::{ColorBufferType, ConfigTemplateBuilder};
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version};
use glutin::display::{Display, DisplayApiPreference};
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, info};
use winit::dpi::PhysicalSize;
use winit::event::Event as WinitEvent;
use winit::event_loop::EventLoop;
use winit::platform::pump_events::EventLoopExtPumpEvents;
use winit::window::{Fullscreen, WindowBuilder};

use crate::events::{Event, WindowTag};
use crate::hub::EventHub;
use crate::translate::PumpState;
use crate::WinIoError;

/// The fixed context attribute table applied to every window's GL config
/// and context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextSpec {
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
    pub depth_bits: u8,
    pub double_buffer: bool,
    /// Requested OpenGL version as (major, minor).
    pub version: (u8, u8),
    pub core_profile: bool,
}

impl Default for ContextSpec {
    fn default() -> Self {
        Self {
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            depth_bits: 24,
            double_buffer: true,
            version: (4, 5),
            core_profile: true,
        }
    }
}

/// Per-window creation parameters.
#[derive(Debug, Clone)]
pub struct WindowSpec {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub visible: bool,
    pub fullscreen: bool,
    pub vsync: bool,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            width: 320,
            height: 200,
            title: "reticle window".to_owned(),
            visible: true,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Shared subsystem state: the open-window count and, while any window is
/// alive, the installed subsystem payload. Register/unregister are the
/// only count mutators.
pub(crate) struct Ledger<S> {
    subsystem: RefCell<Option<S>>,
    open: Cell<usize>,
    shutdowns: Cell<u32>,
}

impl<S> Ledger<S> {
    pub(crate) fn new() -> Self {
        Self {
            subsystem: RefCell::new(None),
            open: Cell::new(0),
            shutdowns: Cell::new(0),
        }
    }

    pub(crate) fn install(&self, subsystem: S) {
        *self.subsystem.borrow_mut() = Some(subsystem);
    }

    pub(crate) fn has_subsystem(&self) -> bool {
        self.subsystem.borrow().is_some()
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&S) -> R) -> Option<R> {
        self.subsystem.borrow().as_ref().map(f)
    }

    /// Counts a fully constructed window. Returns the new count.
    pub(crate) fn register(&self) -> usize {
        let open = self.open.get() + 1;
        self.open.set(open);
        open
    }

    /// Counts a destroyed window. When the count returns to zero the
    /// subsystem payload is taken out (exactly once per active period) and
    /// handed to the caller for teardown.
    pub(crate) fn unregister(&self) -> Option<S> {
        let open = self.open.get().saturating_sub(1);
        self.open.set(open);
        if open == 0 {
            let taken = self.subsystem.borrow_mut().take();
            if taken.is_some() {
                self.shutdowns.set(self.shutdowns.get() + 1);
            }
            taken
        } else {
            None
        }
    }

    /// Tears the subsystem down before any window was counted (first-window
    /// setup failure).
    pub(crate) fn discard(&self) -> Option<S> {
        let taken = self.subsystem.borrow_mut().take();
        if taken.is_some() {
            self.shutdowns.set(self.shutdowns.get() + 1);
        }
        taken
    }

    pub(crate) fn open(&self) -> usize {
        self.open.get()
    }

    #[cfg(test)]
    pub(crate) fn shutdowns(&self) -> u32 {
        self.shutdowns.get()
    }
}

/// Subsystem payload: the GL display connection.
pub(crate) struct GlSubsystem {
    display: Display,
}

/// Owns the platform event loop, the subsystem ledger, and the event hub.
pub struct WindowSystem {
    event_loop: EventLoop<()>,
    ledger: Rc<Ledger<GlSubsystem>>,
    context_spec: ContextSpec,
    hub: EventHub,
    pump_state: PumpState,
}

impl WindowSystem {
    pub fn new() -> Result<Self, WinIoError> {
        let event_loop =
            EventLoop::new().map_err(|err| WinIoError::EventLoop(err.to_string()))?;
        Ok(Self {
            event_loop,
            ledger: Rc::new(Ledger::new()),
            context_spec: ContextSpec::default(),
            hub: EventHub::new(),
            pump_state: PumpState::new(),
        })
    }

    pub fn context_spec(&self) -> ContextSpec {
        self.context_spec
    }

    /// Creates a window with a current GL context.
    ///
    /// The first window also brings up the GL display; if its GL setup then
    /// fails, the display is discarded again so the subsystem never
    /// outlives a failed bootstrap.
    pub fn create_window(&mut self, spec: &WindowSpec) -> Result<Window, WinIoError> {
        let mut builder = WindowBuilder::new()
            .with_title(&spec.title)
            .with_inner_size(PhysicalSize::new(spec.width, spec.height))
            .with_visible(spec.visible);
        if spec.fullscreen {
            builder = builder.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        let window = builder
            .build(&self.event_loop)
            .map_err(|err| WinIoError::Window(err.to_string()))?;

        if !self.ledger.has_subsystem() {
            debug!("first window; bringing up the GL display subsystem");
            self.ledger.install(GlSubsystem {
                display: create_display(&window)?,
            });
        }

        let built = self
            .ledger
            .with(|subsystem| build_gl_state(&subsystem.display, &window, &self.context_spec, spec))
            .unwrap_or_else(|| Err(WinIoError::Subsystem("GL display unavailable".into())));
        let (surface, context) = match built {
            Ok(state) => state,
            Err(err) => {
                if self.ledger.open() == 0 && self.ledger.discard().is_some() {
                    debug!("GL setup failed before any window opened; display discarded");
                }
                return Err(err);
            }
        };

        let tag = WindowTag::from(window.id());
        let open = self.ledger.register();
        debug!(window = %tag, open, "window count increased");

        Ok(Window {
            surface,
            context,
            window,
            tag,
            _guard: LedgerGuard {
                ledger: Rc::clone(&self.ledger),
                tag,
            },
        })
    }

    /// Drains the entire pending native event queue once, decoding into the
    /// hub. Never blocks.
    pub fn pump(&mut self) {
        let Self {
            event_loop,
            hub,
            pump_state,
            ..
        } = self;
        let at = hub.now();
        let _status = event_loop.pump_events(Some(Duration::ZERO), |event, _target| {
            if let WinitEvent::WindowEvent { window_id, event } = event {
                let tag = WindowTag::from(window_id);
                if let Some(decoded) = pump_state.translate(tag, &event, at) {
                    hub.push(decoded);
                }
            }
        });
    }

    /// Drains the native queue, then returns up to `limit` (0 = unlimited)
    /// queued events for `window` in FIFO order. Unless `retain` is set the
    /// returned events are removed.
    pub fn pop_events(&mut self, window: WindowTag, limit: usize, retain: bool) -> Vec<Event> {
        self.pump();
        self.hub.pop_events(window, limit, retain)
    }

    /// Non-destructive view of a window's pending events.
    pub fn peek_events(&self, window: WindowTag) -> Vec<Event> {
        self.hub.events_for(window)
    }

    /// Drops queued events for a window that is going away.
    pub fn forget_window(&mut self, window: WindowTag) {
        self.hub.forget_window(window);
    }

    pub fn open_windows(&self) -> usize {
        self.ledger.open()
    }

    /// Resolves a GL symbol through the display. Null when no subsystem is
    /// up or the symbol is unknown.
    pub fn gl_proc_address(&self, symbol: &str) -> *const c_void {
        let Ok(symbol) = CString::new(symbol) else {
            return std::ptr::null();
        };
        self.ledger
            .with(|subsystem| subsystem.display.get_proc_address(&symbol))
            .unwrap_or(std::ptr::null())
    }
}

/// One native window plus its GL surface and current context.
///
/// Dropping the window destroys context, surface, and native window, then
/// unregisters from the ledger; callers should also `forget_window` its
/// queued events.
pub struct Window {
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: winit::window::Window,
    tag: WindowTag,
    // Declared last: the GL objects above must be gone before the ledger
    // decides whether to tear the display down.
    _guard: LedgerGuard,
}

struct LedgerGuard {
    ledger: Rc<Ledger<GlSubsystem>>,
    tag: WindowTag,
}

impl Drop for LedgerGuard {
    fn drop(&mut self) {
        if let Some(subsystem) = self.ledger.unregister() {
            info!(window = %self.tag, "last window closed; shutting down the GL display subsystem");
            drop(subsystem);
        } else {
            debug!(window = %self.tag, open = self.ledger.open(), "window count decreased");
        }
    }
}

impl Window {
    pub fn tag(&self) -> WindowTag {
        self.tag
    }

    /// Inner size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        self.window.inner_size().into()
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    /// Swaps the framebuffer.
    pub fn swap(&self) -> Result<(), WinIoError> {
        self.surface
            .swap_buffers(&self.context)
            .map_err(|err| WinIoError::Surface(err.to_string()))
    }
}

fn create_display(window: &winit::window::Window) -> Result<Display, WinIoError> {
    let raw_display = window
        .display_handle()
        .map_err(|err| WinIoError::Subsystem(err.to_string()))?
        .as_raw();

    #[cfg(target_os = "windows")]
    let preference = DisplayApiPreference::Wgl(None);
    #[cfg(target_os = "macos")]
    let preference = DisplayApiPreference::Cgl;
    #[cfg(all(unix, not(target_os = "macos")))]
    let preference = DisplayApiPreference::Egl;

    unsafe { Display::new(raw_display, preference) }
        .map_err(|err| WinIoError::Subsystem(err.to_string()))
}

fn build_gl_state(
    display: &Display,
    window: &winit::window::Window,
    context_spec: &ContextSpec,
    window_spec: &WindowSpec,
) -> Result<(Surface<WindowSurface>, PossiblyCurrentContext), WinIoError> {
    let template = ConfigTemplateBuilder::new()
        .with_buffer_type(ColorBufferType::Rgb {
            r_size: context_spec.red_bits,
            g_size: context_spec.green_bits,
            b_size: context_spec.blue_bits,
        })
        .with_depth_size(context_spec.depth_bits)
        .with_single_buffering(!context_spec.double_buffer)
        .build();
    let config = unsafe { display.find_configs(template) }
        .map_err(|err| WinIoError::Subsystem(err.to_string()))?
        .next()
        .ok_or_else(|| {
            WinIoError::Subsystem("no GL config matches the context attributes".into())
        })?;

    let raw_window = window
        .window_handle()
        .map_err(|err| WinIoError::Window(err.to_string()))?
        .as_raw();
    let (width, height): (u32, u32) = window.inner_size().into();
    let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        raw_window,
        NonZeroU32::new(width.max(1)).unwrap_or(NonZeroU32::MIN),
        NonZeroU32::new(height.max(1)).unwrap_or(NonZeroU32::MIN),
    );
    let surface = unsafe { display.create_window_surface(&config, &surface_attributes) }
        .map_err(|err| WinIoError::Surface(err.to_string()))?;

    let (major, minor) = context_spec.version;
    let mut attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))));
    if context_spec.core_profile {
        attributes = attributes.with_profile(GlProfile::Core);
    }
    let attributes = attributes.build(Some(raw_window));

    let context = unsafe { display.create_context(&config, &attributes) }
        .map_err(|err| WinIoError::Context(err.to_string()))?
        .make_current(&surface)
        .map_err(|err| WinIoError::MakeCurrent(err.to_string()))?;

    let interval = if window_spec.vsync {
        SwapInterval::Wait(NonZeroU32::MIN)
    } else {
        SwapInterval::DontWait
    };
    surface
        .set_swap_interval(&context, interval)
        .map_err(|err| WinIoError::Vsync(err.to_string()))?;

    Ok((surface, context))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_windows_shut_the_subsystem_down_exactly_once() {
        let ledger: Ledger<&'static str> = Ledger::new();
        ledger.install("display");

        for expected in 1..=3 {
            assert_eq!(ledger.register(), expected);
        }

        assert!(ledger.unregister().is_none());
        assert!(ledger.unregister().is_none());
        let taken = ledger.unregister();
        assert_eq!(taken, Some("display"));
        assert_eq!(ledger.open(), 0);
        assert_eq!(ledger.shutdowns(), 1);

        // Nothing left to shut down on a stray unregister.
        assert!(ledger.unregister().is_none());
        assert_eq!(ledger.shutdowns(), 1);
    }

    #[test]
    fn reinstall_starts_a_second_active_period() {
        let ledger: Ledger<u32> = Ledger::new();
        ledger.install(1);
        ledger.register();
        assert_eq!(ledger.unregister(), Some(1));

        assert!(!ledger.has_subsystem());
        ledger.install(2);
        ledger.register();
        assert_eq!(ledger.unregister(), Some(2));
        assert_eq!(ledger.shutdowns(), 2);
    }

    #[test]
    fn discard_tears_down_without_any_windows() {
        let ledger: Ledger<u32> = Ledger::new();
        ledger.install(9);
        assert_eq!(ledger.discard(), Some(9));
        assert!(!ledger.has_subsystem());
        assert_eq!(ledger.open(), 0);
        assert_eq!(ledger.shutdowns(), 1);
        assert!(ledger.discard().is_none());
    }

    #[test]
    fn context_spec_defaults_match_the_attribute_table() {
        let spec = ContextSpec::default();
        assert_eq!(
            (spec.red_bits, spec.green_bits, spec.blue_bits),
            (8, 8, 8)
        );
        assert_eq!(spec.depth_bits, 24);
        assert!(spec.double_buffer);
        assert_eq!(spec.version, (4, 5));
        assert!(spec.core_profile);
    }
}
