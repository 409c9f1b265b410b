//! List active displays and switch individual displays on or off.
//!
//! The platform calls live in the macOS platform module; this crate root only
//! defines the public types and the operations built on top of them.

pub mod cli;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "macos")]
pub use macos::{list_display_ids, list_displays, set_display_enabled};

/// A unique identifier for an active display.
///
/// This is the value of [`CGDirectDisplayID`][CGDirectDisplayID] on macOS.
/// It is only valid while the display is attached and is not guaranteed to be
/// stable across reconnects or reboots.
///
/// [CGDirectDisplayID]: https://developer.apple.com/documentation/coregraphics/cgdirectdisplayid?language=objc
pub type DisplayId = u32;

/// The error type for this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A display-configuration call returned a non-success code.
    #[error("`{api}` failed with error code {code}")]
    Platform {
        /// The platform API that rejected the operation.
        api: &'static str,
        /// The platform-defined error code.
        code: i32,
    },
    /// The current platform has no display-configuration support.
    #[error("display configuration is not supported on this platform")]
    Unsupported,
}

/// A snapshot of one active display.
///
/// Rebuilt from the platform on every query, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayInfo {
    /// The unique identifier of the display.
    pub id: DisplayId,
    /// The vendor number reported by the display.
    pub vendor: u32,
    /// The model number reported by the display.
    pub model: u32,
    /// The localized device name, if the platform knows one.
    pub name: Option<String>,
}

/// Flip the enabled state of a display.
///
/// A display that shows up in the active list is currently enabled, so the
/// toggle requests the opposite state. Returns the state that was requested.
///
/// # Errors
/// Returns [`Error`] if enumeration or the configuration transaction fails.
pub fn toggle_display(id: DisplayId) -> Result<bool, Error> {
    let active = list_display_ids()?;
    let enable = toggle_target(&active, id);
    set_display_enabled(id, enable)?;
    Ok(enable)
}

fn toggle_target(active: &[DisplayId], id: DisplayId) -> bool {
    !active.contains(&id)
}

// Stub backend so the CLI still builds where no display stack exists.
#[cfg(not(target_os = "macos"))]
pub fn list_display_ids() -> Result<Vec<DisplayId>, Error> {
    Err(Error::Unsupported)
}

#[cfg(not(target_os = "macos"))]
pub fn list_displays() -> Result<Vec<DisplayInfo>, Error> {
    Err(Error::Unsupported)
}

#[cfg(not(target_os = "macos"))]
pub fn set_display_enabled(_id: DisplayId, _enabled: bool) -> Result<(), Error> {
    Err(Error::Unsupported)
}
