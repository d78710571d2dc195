//! Event kinds understood by the dispatcher.
//!
//! `EventKind` is the closed set of X11 core protocol events that can be
//! routed to callbacks. Events outside the set are decoded as
//! [`Event::Unsupported`](super::Event::Unsupported) and have no kind.

use std::fmt;

use serde::{Deserialize, Serialize};

/// X11 core event kinds, tagged with their wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EventKind {
    KeyPress = 2,
    KeyRelease = 3,
    ButtonPress = 4,
    ButtonRelease = 5,
    MotionNotify = 6,
    EnterNotify = 7,
    LeaveNotify = 8,
    FocusIn = 9,
    FocusOut = 10,
    KeymapNotify = 11,
    Expose = 12,
    GraphicsExposure = 13,
    NoExposure = 14,
    VisibilityNotify = 15,
    CreateNotify = 16,
    DestroyNotify = 17,
    UnmapNotify = 18,
    MapNotify = 19,
    MapRequest = 20,
    ReparentNotify = 21,
    ConfigureNotify = 22,
    ConfigureRequest = 23,
    GravityNotify = 24,
    ResizeRequest = 25,
    CirculateNotify = 26,
    CirculateRequest = 27,
    PropertyNotify = 28,
    SelectionClear = 29,
    SelectionRequest = 30,
    SelectionNotify = 31,
    ColormapNotify = 32,
    ClientMessage = 33,
    MappingNotify = 34,
}

impl EventKind {
    /// Returns the protocol name of this kind (e.g. `"MotionNotify"`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::KeyPress => "KeyPress",
            Self::KeyRelease => "KeyRelease",
            Self::ButtonPress => "ButtonPress",
            Self::ButtonRelease => "ButtonRelease",
            Self::MotionNotify => "MotionNotify",
            Self::EnterNotify => "EnterNotify",
            Self::LeaveNotify => "LeaveNotify",
            Self::FocusIn => "FocusIn",
            Self::FocusOut => "FocusOut",
            Self::KeymapNotify => "KeymapNotify",
            Self::Expose => "Expose",
            Self::GraphicsExposure => "GraphicsExposure",
            Self::NoExposure => "NoExposure",
            Self::VisibilityNotify => "VisibilityNotify",
            Self::CreateNotify => "CreateNotify",
            Self::DestroyNotify => "DestroyNotify",
            Self::UnmapNotify => "UnmapNotify",
            Self::MapNotify => "MapNotify",
            Self::MapRequest => "MapRequest",
            Self::ReparentNotify => "ReparentNotify",
            Self::ConfigureNotify => "ConfigureNotify",
            Self::ConfigureRequest => "ConfigureRequest",
            Self::GravityNotify => "GravityNotify",
            Self::ResizeRequest => "ResizeRequest",
            Self::CirculateNotify => "CirculateNotify",
            Self::CirculateRequest => "CirculateRequest",
            Self::PropertyNotify => "PropertyNotify",
            Self::SelectionClear => "SelectionClear",
            Self::SelectionRequest => "SelectionRequest",
            Self::SelectionNotify => "SelectionNotify",
            Self::ColormapNotify => "ColormapNotify",
            Self::ClientMessage => "ClientMessage",
            Self::MappingNotify => "MappingNotify",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_protocol_name() {
        assert_eq!(EventKind::ConfigureRequest.to_string(), "ConfigureRequest");
        assert_eq!(EventKind::MappingNotify.to_string(), "MappingNotify");
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&EventKind::MotionNotify).unwrap();
        assert_eq!(json, r#""motion_notify""#);

        let kind: EventKind = serde_json::from_str(r#""selection_request""#).unwrap();
        assert_eq!(kind, EventKind::SelectionRequest);
    }
}
