use std::collections::HashMap;

use objc2::MainThreadMarker;
use objc2_app_kit::NSScreen;
use objc2_core_graphics::{
    CGBeginDisplayConfiguration, CGCancelDisplayConfiguration, CGCompleteDisplayConfiguration,
    CGConfigureOption, CGDirectDisplayID, CGDisplayConfigRef, CGDisplayModelNumber,
    CGDisplayVendorNumber, CGError, CGGetActiveDisplayList,
};
use objc2_foundation::{NSNumber, NSString};
use tracing::debug;

use crate::{DisplayId, DisplayInfo, Error};

// CGSConfigureDisplayEnabled has no public header. The signature is a
// stable-but-unofficial assumption, kept to this single call site.
#[link(name = "CoreGraphics", kind = "framework")]
unsafe extern "C-unwind" {
    fn CGSConfigureDisplayEnabled(
        config: CGDisplayConfigRef,
        display: CGDirectDisplayID,
        enabled: bool,
    ) -> CGError;
}

trait CGErrorToResult {
    fn into_result(self, api: &'static str) -> Result<(), Error>;
}

impl CGErrorToResult for CGError {
    fn into_result(self, api: &'static str) -> Result<(), Error> {
        if self == CGError::Success {
            Ok(())
        } else {
            Err(Error::Platform { api, code: self.0 })
        }
    }
}

/// Get the identifiers of all active displays, in display-stack order.
///
/// # Errors
/// Returns [`Error::Platform`] if `CGGetActiveDisplayList` fails.
pub fn list_display_ids() -> Result<Vec<DisplayId>, Error> {
    let mut display_count: u32 = 0;

    unsafe {
        CGGetActiveDisplayList(u32::MAX, std::ptr::null_mut(), &mut display_count)
            .into_result("CGGetActiveDisplayList")?;
    }

    let mut active_displays: Vec<CGDirectDisplayID> = vec![0; display_count as usize];

    unsafe {
        CGGetActiveDisplayList(
            display_count,
            active_displays.as_mut_ptr(),
            &mut display_count,
        )
        .into_result("CGGetActiveDisplayList")?;
    }

    // The list can shrink between the two calls. The count written by the
    // second call is authoritative, not the buffer length.
    active_displays.truncate(display_count as usize);
    debug!("{} active displays", active_displays.len());

    Ok(active_displays)
}

/// Get id, vendor/model numbers and the localized name of all active displays.
///
/// # Errors
/// Returns [`Error::Platform`] if enumeration fails. The vendor/model lookups
/// themselves have no failure path.
pub fn list_displays() -> Result<Vec<DisplayInfo>, Error> {
    let ids = list_display_ids()?;
    let names = localized_names();

    Ok(ids
        .into_iter()
        .map(|id| DisplayInfo {
            id,
            vendor: CGDisplayVendorNumber(id),
            model: CGDisplayModelNumber(id),
            name: names.get(&id).cloned(),
        })
        .collect())
}

/// Map display ids to the localized names of the screens backing them.
///
/// `NSScreen` is only reachable from the main thread; anywhere else the
/// mapping is empty and callers fall back to their placeholder.
fn localized_names() -> HashMap<DisplayId, String> {
    let mut names = HashMap::new();

    let Some(mtm) = MainThreadMarker::new() else {
        return names;
    };

    let key = NSString::from_str("NSScreenNumber");
    for screen in NSScreen::screens(mtm).iter() {
        let Some(number) = screen
            .deviceDescription()
            .objectForKey(&key)
            .and_then(|object| object.downcast::<NSNumber>().ok())
        else {
            continue;
        };

        names.insert(
            number.unsignedIntValue(),
            screen.localizedName().to_string(),
        );
    }

    names
}

/// A pending display-configuration change.
///
/// The handle is platform-owned and must not outlive the operation that
/// created it. Dropping the guard without committing cancels the transaction.
struct ConfigTransaction {
    config: CGDisplayConfigRef,
    committed: bool,
}

impl ConfigTransaction {
    fn begin() -> Result<Self, Error> {
        let mut config: CGDisplayConfigRef = std::ptr::null_mut();

        unsafe {
            CGBeginDisplayConfiguration(&mut config).into_result("CGBeginDisplayConfiguration")?;
        }

        if config.is_null() {
            return Err(Error::Platform {
                api: "CGBeginDisplayConfiguration",
                code: CGError::CannotComplete.0,
            });
        }

        Ok(Self {
            config,
            committed: false,
        })
    }

    fn set_enabled(&mut self, id: DisplayId, enabled: bool) -> Result<(), Error> {
        unsafe {
            CGSConfigureDisplayEnabled(self.config, id, enabled)
                .into_result("CGSConfigureDisplayEnabled")
        }
    }

    fn commit(mut self) -> Result<(), Error> {
        self.committed = true;

        unsafe {
            CGCompleteDisplayConfiguration(self.config, CGConfigureOption::Permanently)
                .into_result("CGCompleteDisplayConfiguration")
        }
    }
}

impl Drop for ConfigTransaction {
    fn drop(&mut self) {
        if !self.committed {
            unsafe {
                let _ = CGCancelDisplayConfiguration(self.config);
            }
        }
    }
}

/// Switch a display on or off, permanently.
///
/// Runs one begin/mutate/complete configuration transaction. A failing step
/// aborts the remaining ones; the returned error names the step that failed.
/// Whether the platform reverts a mutation whose commit failed is left to the
/// platform.
///
/// # Errors
/// Returns [`Error::Platform`] if any step of the transaction fails.
pub fn set_display_enabled(id: DisplayId, enabled: bool) -> Result<(), Error> {
    debug!(id, enabled, "configuring display");

    let mut transaction = ConfigTransaction::begin()?;
    transaction.set_enabled(id, enabled)?;
    transaction.commit()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn enumeration_is_stable_without_hardware_changes() {
        let first: HashSet<_> = list_display_ids().unwrap().into_iter().collect();
        let second: HashSet<_> = list_display_ids().unwrap().into_iter().collect();

        assert_eq!(first, second);
    }

    #[test]
    fn every_enumerated_display_has_vendor_and_model() {
        // The lookups always answer, possibly with 0; only enumeration itself
        // can fail here.
        for info in list_displays().unwrap() {
            assert_eq!(info.vendor, CGDisplayVendorNumber(info.id));
            assert_eq!(info.model, CGDisplayModelNumber(info.id));
        }
    }
}
