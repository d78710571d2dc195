//! Decoded event payloads.
//!
//! These mirror the field layout of the X11 core protocol events. Decoding
//! from the wire is the connection's job; the dispatcher only reads the
//! routing fields and, for motion coalescing, rewrites time and position.
//!
//! Every payload defaults to zeroed fields so replay scripts only need to
//! spell out what they care about.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server timestamp in milliseconds.
pub type Timestamp = u32;

/// Interned atom identifier.
pub type Atom = u32;

/// Resource identifier used as the routing key for callbacks.
///
/// Drawables and windows share the same id space, so `GraphicsExposure` and
/// `NoExposure` route on their drawable through this type as well.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Window(pub u32);

impl Window {
    /// Routing key for events that are not about any window
    /// (`KeymapNotify`, `MappingNotify`).
    pub const NONE: Self = Self(0);
}

impl From<u32> for Window {
    fn from(id: u32) -> Self { Self(id) }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:#x}", self.0) }
}

/// Key, button and motion events share one layout.
///
/// `detail` is the keycode for key events, the button for button events and
/// the hint flag for `MotionNotify`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputEvent {
    pub detail: u8,
    pub time: Timestamp,
    pub root: Window,
    pub event: Window,
    pub child: Window,
    pub root_x: i16,
    pub root_y: i16,
    pub event_x: i16,
    pub event_y: i16,
    pub state: u16,
    pub same_screen: bool,
}

impl InputEvent {
    /// Copies time and pointer position from a newer event of the same source.
    pub const fn take_position(&mut self, newer: &Self) {
        self.time = newer.time;
        self.root_x = newer.root_x;
        self.root_y = newer.root_y;
        self.event_x = newer.event_x;
        self.event_y = newer.event_y;
    }
}

/// `EnterNotify` / `LeaveNotify`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossingEvent {
    pub detail: u8,
    pub time: Timestamp,
    pub root: Window,
    pub event: Window,
    pub child: Window,
    pub root_x: i16,
    pub root_y: i16,
    pub event_x: i16,
    pub event_y: i16,
    pub state: u16,
    pub mode: u8,
    pub same_screen_focus: u8,
}

/// `FocusIn` / `FocusOut`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusEvent {
    pub detail: u8,
    pub event: Window,
    pub mode: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeymapNotifyEvent {
    pub keys: [u8; 31],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposeEvent {
    pub window: Window,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub count: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsExposureEvent {
    pub drawable: Window,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub minor_opcode: u16,
    pub count: u16,
    pub major_opcode: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoExposureEvent {
    pub drawable: Window,
    pub minor_opcode: u16,
    pub major_opcode: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityNotifyEvent {
    pub window: Window,
    pub state: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateNotifyEvent {
    pub parent: Window,
    pub window: Window,
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
    pub border_width: u16,
    pub override_redirect: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DestroyNotifyEvent {
    pub event: Window,
    pub window: Window,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnmapNotifyEvent {
    pub event: Window,
    pub window: Window,
    pub from_configure: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapNotifyEvent {
    pub event: Window,
    pub window: Window,
    pub override_redirect: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapRequestEvent {
    pub parent: Window,
    pub window: Window,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReparentNotifyEvent {
    pub event: Window,
    pub window: Window,
    pub parent: Window,
    pub x: i16,
    pub y: i16,
    pub override_redirect: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigureNotifyEvent {
    pub event: Window,
    pub window: Window,
    pub above_sibling: Window,
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
    pub border_width: u16,
    pub override_redirect: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigureRequestEvent {
    pub stack_mode: u8,
    pub parent: Window,
    pub window: Window,
    pub sibling: Window,
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
    pub border_width: u16,
    pub value_mask: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityNotifyEvent {
    pub event: Window,
    pub window: Window,
    pub x: i16,
    pub y: i16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeRequestEvent {
    pub window: Window,
    pub width: u16,
    pub height: u16,
}

/// `CirculateNotify` / `CirculateRequest`.
///
/// For requests `event` is the parent of `window`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CirculateEvent {
    pub event: Window,
    pub window: Window,
    pub place: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyNotifyEvent {
    pub window: Window,
    pub atom: Atom,
    pub time: Timestamp,
    pub state: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionClearEvent {
    pub time: Timestamp,
    pub owner: Window,
    pub selection: Atom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionRequestEvent {
    pub time: Timestamp,
    pub owner: Window,
    pub requestor: Window,
    pub selection: Atom,
    pub target: Atom,
    pub property: Atom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionNotifyEvent {
    pub time: Timestamp,
    pub requestor: Window,
    pub selection: Atom,
    pub target: Atom,
    pub property: Atom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColormapNotifyEvent {
    pub window: Window,
    pub colormap: u32,
    pub new: bool,
    pub state: u8,
}

/// `ClientMessage`, with the 20 data bytes viewed as five 32-bit words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientMessageEvent {
    pub format: u8,
    pub window: Window,
    pub message_type: Atom,
    pub data: [u32; 5],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingNotifyEvent {
    pub request: u8,
    pub first_keycode: u8,
    pub count: u8,
}
