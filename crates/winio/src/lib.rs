//! Windowing and user-input layer for reticle.
//!
//! One [`WindowSystem`] owns the platform event loop and a shared subsystem
//! ledger; every [`Window`] holds a handle to that ledger, so the GL display
//! comes up with the first window and goes down when the last one closes:
//!
//! ```text
//!   WindowSystem ──▶ winit event loop ──▶ pump() ──▶ EventHub
//!        │                                              │
//!        ├─▶ Window #1 ─┐                               └─▶ pop_events(tag)
//!        └─▶ Window #2 ─┴─▶ subsystem ledger (refcount + GL display)
//! ```
//!
//! The pump drains the entire pending native queue once per call, decodes
//! each event into the typed [`Event`] model, and fans results out to
//! per-window FIFO queues inside the [`EventHub`]. Everything here is
//! single-threaded by construction: the ledger is an `Rc`, so neither the
//! system nor its windows can leave the thread that owns the GL context.

mod events;
mod hub;
mod system;
mod translate;

pub use events::{
    Event, EventKind, KeyInput, KeyMods, MouseButtons, MouseClick, MouseMotion, WindowChange,
    WindowTag,
};
pub use hub::EventHub;
pub use system::{ContextSpec, Window, WindowSpec, WindowSystem};

// Key and button identities travel as the platform types.
pub use winit::event::MouseButton;
pub use winit::keyboard::{KeyCode, PhysicalKey};

/// Errors raised by the windowing layer. Propagated to the immediate
/// caller; construction failures leave no partial native state behind.
#[derive(Debug, thiserror::Error)]
pub enum WinIoError {
    #[error("event loop initialization failed: {0}")]
    EventLoop(String),
    #[error("windowing subsystem failure: {0}")]
    Subsystem(String),
    #[error("window creation failed: {0}")]
    Window(String),
    #[error("surface creation failed: {0}")]
    Surface(String),
    #[error("GL context creation failed: {0}")]
    Context(String),
    #[error("could not make the GL context current: {0}")]
    MakeCurrent(String),
    #[error("could not set the swap interval: {0}")]
    Vsync(String),
}
