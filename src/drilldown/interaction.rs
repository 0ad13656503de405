//! Interaction mode detection
//!
//! Hover tooltips only work with a precise pointer. On touch screens a tap
//! opens a summary sheet instead, and drilling down is a second, explicit
//! action from that sheet.

/// Pointer capabilities reported by the host environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerCapabilities {
    /// The primary pointer is coarse (`pointer: coarse`)
    pub coarse_primary: bool,
    /// Any available pointer is coarse (`any-pointer: coarse`)
    pub coarse_any: bool,
    /// Touch events are supported
    pub touch_events: bool,
    /// Maximum number of simultaneous touch points
    pub max_touch_points: u32,
}

/// How region selection behaves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractionMode {
    /// Mouse or trackpad: hover shows details, click drills down
    #[default]
    Precise,
    /// Touch screen: tap opens the summary sheet
    Touch,
}

impl InteractionMode {
    /// Pick the mode for the reported capabilities
    ///
    /// A coarse primary pointer decides first, then any coarse pointer, then
    /// legacy touch support.
    #[must_use]
    pub const fn detect(caps: &PointerCapabilities) -> Self {
        if caps.coarse_primary || caps.coarse_any || caps.touch_events || caps.max_touch_points > 0 {
            Self::Touch
        } else {
            Self::Precise
        }
    }

    /// Whether selections open the summary sheet
    #[must_use]
    pub const fn is_touch(self) -> bool {
        matches!(self, Self::Touch)
    }
}
