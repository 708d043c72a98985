//! The trait boundary standing in for the live display-server connection.
//!
//! Opening the connection, framing requests, and byte-packing ICCCM/EWMH
//! properties are explicitly out of scope (`SPEC_FULL.md` §1/§6) — this
//! module only defines the contract the workspace pipeline relies on, plus
//! test doubles used by the rest of the crate's test suite.
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

/// Operations the workspace pipeline needs from the display server.
///
/// A single implementation is shared (behind an `Arc`) by every [`Message`]
/// in flight, matching `SPEC_FULL.md` §5: "the display-server transport
/// handle is embedded in each message; it is safe to submit requests
/// concurrently."
///
/// [`Message`]: crate::proto::Message
pub trait XPort: Send + Sync {
    fn map(&self, id: u32) -> Result<()>;
    fn unmap(&self, id: u32) -> Result<()>;
    fn destroy(&self, id: u32) -> Result<()>;
    fn configure(&self, id: u32, x: i32, y: i32, w: i32, h: i32) -> Result<()>;

    /// Send the client a `WM_DELETE_WINDOW` client message.
    fn send_delete(&self, id: u32) -> Result<()>;
    /// Send the client a `WM_TAKE_FOCUS` client message.
    fn send_take_focus(&self, id: u32) -> Result<()>;
    fn set_input_focus(&self, id: u32) -> Result<()>;
    fn set_border(&self, id: u32, focused: bool) -> Result<()>;

    fn is_dock(&self, id: u32) -> bool;
    /// Is this window still alive and configurable? Used by `CleanUp` to
    /// sweep windows the display server has already torn down without
    /// telling us.
    fn is_manageable(&self, id: u32) -> bool;
    fn supports_wm_delete(&self, id: u32) -> bool;
    fn supports_take_focus(&self, id: u32) -> bool;
    fn wm_name(&self, id: u32) -> Option<String>;

    /// `_NET_DESKTOP_NAMES`, parsed into one entry per workspace id.
    fn desktop_names(&self, n: usize) -> Vec<String>;
    fn set_desktop_names(&self, names: &[String]) -> Result<()>;
    fn set_current_desktop(&self, id: u32) -> Result<()>;
    fn set_number_of_desktops(&self, n: u32) -> Result<()>;
    fn set_supported(&self) -> Result<()>;
}

/// A cheap, cloneable handle to a [`XPort`] implementation.
#[derive(Clone)]
pub struct Transport(pub Arc<dyn XPort>);

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport").finish_non_exhaustive()
    }
}

impl Transport {
    pub fn new(port: impl XPort + 'static) -> Self {
        Self(Arc::new(port))
    }
}

impl std::ops::Deref for Transport {
    type Target = dyn XPort;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
