//! Thin binary entry point wiring the library against a concrete
//! [`XPort`] implementation.
//!
//! A real display-server backend (`x11rb` or similar) is explicitly out of
//! scope for this crate (`SPEC_FULL.md` §1) and left to a downstream binary
//! crate; [`NullTransport`] here only logs each call, so this binary serves
//! as a runnable demonstration of the startup sequence in `SPEC_FULL.md` §6
//! rather than a usable window manager.
use tracing_subscriber::EnvFilter;
use tricol::adapter::Spawner;
use tricol::config::Config;
use tricol::error::Result;
use tricol::geometry::{MonitorsInfo, Screen};
use tricol::pipeline::WorkspaceManager;
use tricol::transport::{Transport, XPort};
use tricol::{DEFAULT_WORKSPACE, MAX_WORKSPACES};

#[derive(Debug, Default)]
struct NullTransport;

impl XPort for NullTransport {
    fn map(&self, id: u32) -> Result<()> {
        tracing::debug!(id, "map");
        Ok(())
    }

    fn unmap(&self, id: u32) -> Result<()> {
        tracing::debug!(id, "unmap");
        Ok(())
    }

    fn destroy(&self, id: u32) -> Result<()> {
        tracing::debug!(id, "destroy");
        Ok(())
    }

    fn configure(&self, id: u32, x: i32, y: i32, w: i32, h: i32) -> Result<()> {
        tracing::trace!(id, x, y, w, h, "configure");
        Ok(())
    }

    fn send_delete(&self, id: u32) -> Result<()> {
        tracing::debug!(id, "send_delete");
        Ok(())
    }

    fn send_take_focus(&self, id: u32) -> Result<()> {
        tracing::debug!(id, "send_take_focus");
        Ok(())
    }

    fn set_input_focus(&self, id: u32) -> Result<()> {
        tracing::debug!(id, "set_input_focus");
        Ok(())
    }

    fn set_border(&self, id: u32, focused: bool) -> Result<()> {
        tracing::trace!(id, focused, "set_border");
        Ok(())
    }

    fn is_dock(&self, _id: u32) -> bool {
        false
    }

    fn is_manageable(&self, _id: u32) -> bool {
        true
    }

    fn supports_wm_delete(&self, _id: u32) -> bool {
        false
    }

    fn supports_take_focus(&self, _id: u32) -> bool {
        false
    }

    fn wm_name(&self, _id: u32) -> Option<String> {
        None
    }

    fn desktop_names(&self, n: usize) -> Vec<String> {
        (1..=n).map(|i| i.to_string()).collect()
    }

    fn set_desktop_names(&self, names: &[String]) -> Result<()> {
        tracing::debug!(?names, "set_desktop_names");
        Ok(())
    }

    fn set_current_desktop(&self, id: u32) -> Result<()> {
        tracing::debug!(id, "set_current_desktop");
        Ok(())
    }

    fn set_number_of_desktops(&self, n: u32) -> Result<()> {
        tracing::debug!(n, "set_number_of_desktops");
        Ok(())
    }

    fn set_supported(&self) -> Result<()> {
        tracing::debug!("set_supported");
        Ok(())
    }
}

fn main() {
    let config = Config::load().unwrap_or_else(|err| {
        eprintln!("tricol: invalid configuration, falling back to defaults: {err}");
        Config::default()
    });

    if config.debug {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Real monitor geometry discovery is a transport-level concern
    // (SPEC_FULL.md §1 Non-goals); a single 1080p primary stands in here.
    let primary = Screen::new(1920, 1080, 0).with_padding(config.padding_top, config.padding_bottom);
    let monitors = MonitorsInfo::single(primary);

    let transport = Transport::new(NullTransport);
    let _ = transport.set_supported();
    let _ = transport.set_number_of_desktops(MAX_WORKSPACES);
    let _ = transport.set_current_desktop(DEFAULT_WORKSPACE);

    let manager = WorkspaceManager::new(monitors, config.name_limit);

    for cmd in &config.exec {
        if let Err(err) = Spawner::spawn(cmd) {
            tracing::warn!(%err, cmd, "startup command failed to spawn");
        }
    }

    tracing::info!("tricol ready (no live event source wired in this binary)");
    loop {
        std::thread::park();
    }
}
