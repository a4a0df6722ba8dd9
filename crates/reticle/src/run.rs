//! Wires settings, window, GL bootstrap, and the render loop together.
//!
//! The loop is synchronous and single-threaded: drain the event queue,
//! react, upload uniforms, draw, swap, sleep. Startup failures propagate
//! out of [`run`] and abort with a printed diagnostic and a non-zero exit.

use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use appconfig::{Settings, SettingsStore};
use glcore::{GlApi, RawGl};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use winio::{EventKind, KeyCode, PhysicalKey, WindowChange, WindowSpec, WindowSystem};

use crate::cli::{parse_surface_size, RunArgs};
use crate::diagnostics;
use crate::scene::{self, Scene};

pub fn initialise_tracing() {
    let default_filter = "warn,reticle=info,glcore=info,winio=info,appconfig=info";
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(args: RunArgs) -> Result<()> {
    let store = match &args.config_dir {
        Some(dir) => SettingsStore::with_dir(dir),
        None => SettingsStore::discover(),
    }
    .context("failed to prepare the configuration directory")?;
    let mut settings = store.load();
    apply_overrides(&mut settings, &args)?;

    let mut system = WindowSystem::new().context("failed to initialize the windowing system")?;
    let window = system
        .create_window(&WindowSpec {
            width: settings.video.resolution_x,
            height: settings.video.resolution_y,
            title: format!(
                "{} {}",
                settings.system.application_name, settings.system.version_string
            ),
            visible: true,
            fullscreen: settings.video.full_screen,
            vsync: settings.video.vsync,
        })
        .context("failed to create the main window")?;

    let gl: Rc<dyn GlApi> = Rc::new(RawGl::load(|symbol| system.gl_proc_address(symbol)));
    diagnostics::dump_startup_diagnostics(&args, &store, &settings, &gl.device_info());

    let scene = Scene::build(Rc::clone(&gl)).context("failed to build the scene")?;

    let frame_delay = Duration::from_millis(args.frame_delay_ms);
    let mut crosshair = (0.0f32, 0.0f32);

    'frames: loop {
        for event in system.pop_events(window.tag(), 0, false) {
            match event.kind {
                EventKind::Window(WindowChange::CloseRequested) => {
                    info!("close requested");
                    break 'frames;
                }
                EventKind::Window(change) => debug!(?change, "window change"),
                EventKind::Key(key) => {
                    if key.pressed && key.key == PhysicalKey::Code(KeyCode::Escape) {
                        info!("escape pressed, leaving");
                        break 'frames;
                    }
                }
                EventKind::MouseMotion(motion) => {
                    let (width, height) = window.size();
                    crosshair =
                        scene::normalize_cursor(motion.position.0, motion.position.1, width, height);
                }
                EventKind::MouseButton(click) => {
                    if click.pressed {
                        debug!(button = ?click.button, clicks = click.clicks, "mouse button");
                    }
                }
            }
        }

        let (width, height) = window.size();
        gl.viewport(0, 0, width as i32, height as i32);
        let [r, g, b, a] = scene::CLEAR_COLOR;
        gl.set_clear_color(r, g, b, a);
        gl.clear();
        scene.draw(crosshair).context("frame draw failed")?;
        window.swap().context("framebuffer swap failed")?;

        thread::sleep(frame_delay);
    }

    // GL objects must go before the window that owns their context.
    let tag = window.tag();
    drop(scene);
    drop(gl);
    drop(window);
    system.forget_window(tag);

    store.save(&settings)
        .context("failed to save the configuration")?;
    info!("terminating");
    Ok(())
}

fn apply_overrides(settings: &mut Settings, args: &RunArgs) -> Result<()> {
    if let Some(raw) = &args.size {
        let (width, height) = parse_surface_size(raw).map_err(|err| anyhow!(err))?;
        settings.video.resolution_x = width;
        settings.video.resolution_y = height;
    }
    if args.fullscreen {
        settings.video.full_screen = true;
    }
    if args.no_vsync {
        settings.video.vsync = false;
    }
    Ok(())
}
