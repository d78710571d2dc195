//! Decoded protocol events and queue entries.
//!
//! An [`Event`] is one decoded X11 core event. Classification into an
//! [`EventKind`] and the routing targets of each event live here so the
//! dispatcher can stay a thin loop over the queue:
//!
//! - [`Event::kind`] is the single exhaustive classification step, with
//!   [`Event::Unsupported`] as the explicit fallthrough.
//! - [`Event::targets`] returns the windows whose callbacks receive the event.
//!   Only `MapRequest` and `ConfigureRequest` have two (window, then parent).

mod kind;
mod payload;
mod protocol_error;

use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

pub use kind::EventKind;
pub use payload::{
    Atom, CirculateEvent, ClientMessageEvent, ColormapNotifyEvent, ConfigureNotifyEvent,
    ConfigureRequestEvent, CreateNotifyEvent, CrossingEvent, DestroyNotifyEvent, ExposeEvent,
    FocusEvent, GraphicsExposureEvent, GravityNotifyEvent, InputEvent, KeymapNotifyEvent,
    MapNotifyEvent, MapRequestEvent, MappingNotifyEvent, NoExposureEvent, PropertyNotifyEvent,
    ReparentNotifyEvent, ResizeRequestEvent, SelectionClearEvent, SelectionNotifyEvent,
    SelectionRequestEvent, Timestamp, UnmapNotifyEvent, VisibilityNotifyEvent, Window,
};
pub use protocol_error::ProtocolError;

/// Routing targets of one event, in dispatch order.
pub type Targets = SmallVec<[Window; 2]>;

/// A decoded X11 core event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    KeyPress(InputEvent),
    KeyRelease(InputEvent),
    ButtonPress(InputEvent),
    ButtonRelease(InputEvent),
    MotionNotify(InputEvent),
    EnterNotify(CrossingEvent),
    LeaveNotify(CrossingEvent),
    FocusIn(FocusEvent),
    FocusOut(FocusEvent),
    KeymapNotify(KeymapNotifyEvent),
    Expose(ExposeEvent),
    GraphicsExposure(GraphicsExposureEvent),
    NoExposure(NoExposureEvent),
    VisibilityNotify(VisibilityNotifyEvent),
    CreateNotify(CreateNotifyEvent),
    DestroyNotify(DestroyNotifyEvent),
    UnmapNotify(UnmapNotifyEvent),
    MapNotify(MapNotifyEvent),
    MapRequest(MapRequestEvent),
    ReparentNotify(ReparentNotifyEvent),
    ConfigureNotify(ConfigureNotifyEvent),
    ConfigureRequest(ConfigureRequestEvent),
    GravityNotify(GravityNotifyEvent),
    ResizeRequest(ResizeRequestEvent),
    CirculateNotify(CirculateEvent),
    CirculateRequest(CirculateEvent),
    PropertyNotify(PropertyNotifyEvent),
    SelectionClear(SelectionClearEvent),
    SelectionRequest(SelectionRequestEvent),
    SelectionNotify(SelectionNotifyEvent),
    ColormapNotify(ColormapNotifyEvent),
    ClientMessage(ClientMessageEvent),
    MappingNotify(MappingNotifyEvent),
    /// An event the connection decoded but that falls outside the core set
    /// (extension events, generic events). Logged and skipped on dispatch.
    Unsupported {
        /// Wire response type.
        code: u8,
    },
}

impl Event {
    /// Classifies this event. `None` means [`Event::Unsupported`].
    #[must_use]
    pub const fn kind(&self) -> Option<EventKind> {
        let kind = match self {
            Self::KeyPress(_) => EventKind::KeyPress,
            Self::KeyRelease(_) => EventKind::KeyRelease,
            Self::ButtonPress(_) => EventKind::ButtonPress,
            Self::ButtonRelease(_) => EventKind::ButtonRelease,
            Self::MotionNotify(_) => EventKind::MotionNotify,
            Self::EnterNotify(_) => EventKind::EnterNotify,
            Self::LeaveNotify(_) => EventKind::LeaveNotify,
            Self::FocusIn(_) => EventKind::FocusIn,
            Self::FocusOut(_) => EventKind::FocusOut,
            Self::KeymapNotify(_) => EventKind::KeymapNotify,
            Self::Expose(_) => EventKind::Expose,
            Self::GraphicsExposure(_) => EventKind::GraphicsExposure,
            Self::NoExposure(_) => EventKind::NoExposure,
            Self::VisibilityNotify(_) => EventKind::VisibilityNotify,
            Self::CreateNotify(_) => EventKind::CreateNotify,
            Self::DestroyNotify(_) => EventKind::DestroyNotify,
            Self::UnmapNotify(_) => EventKind::UnmapNotify,
            Self::MapNotify(_) => EventKind::MapNotify,
            Self::MapRequest(_) => EventKind::MapRequest,
            Self::ReparentNotify(_) => EventKind::ReparentNotify,
            Self::ConfigureNotify(_) => EventKind::ConfigureNotify,
            Self::ConfigureRequest(_) => EventKind::ConfigureRequest,
            Self::GravityNotify(_) => EventKind::GravityNotify,
            Self::ResizeRequest(_) => EventKind::ResizeRequest,
            Self::CirculateNotify(_) => EventKind::CirculateNotify,
            Self::CirculateRequest(_) => EventKind::CirculateRequest,
            Self::PropertyNotify(_) => EventKind::PropertyNotify,
            Self::SelectionClear(_) => EventKind::SelectionClear,
            Self::SelectionRequest(_) => EventKind::SelectionRequest,
            Self::SelectionNotify(_) => EventKind::SelectionNotify,
            Self::ColormapNotify(_) => EventKind::ColormapNotify,
            Self::ClientMessage(_) => EventKind::ClientMessage,
            Self::MappingNotify(_) => EventKind::MappingNotify,
            Self::Unsupported { .. } => return None,
        };
        Some(kind)
    }

    /// Returns the windows whose callbacks receive this event, in order.
    ///
    /// Empty for unsupported events.
    #[must_use]
    pub fn targets(&self) -> Targets {
        match self {
            Self::KeyPress(e)
            | Self::KeyRelease(e)
            | Self::ButtonPress(e)
            | Self::ButtonRelease(e)
            | Self::MotionNotify(e) => smallvec![e.event],
            Self::EnterNotify(e) | Self::LeaveNotify(e) => smallvec![e.event],
            Self::FocusIn(e) | Self::FocusOut(e) => smallvec![e.event],
            Self::KeymapNotify(_) | Self::MappingNotify(_) => smallvec![Window::NONE],
            Self::Expose(e) => smallvec![e.window],
            Self::GraphicsExposure(e) => smallvec![e.drawable],
            Self::NoExposure(e) => smallvec![e.drawable],
            Self::VisibilityNotify(e) => smallvec![e.window],
            Self::CreateNotify(e) => smallvec![e.window],
            Self::DestroyNotify(e) => smallvec![e.window],
            Self::UnmapNotify(e) => smallvec![e.window],
            Self::MapNotify(e) => smallvec![e.window],
            Self::MapRequest(e) => smallvec![e.window, e.parent],
            Self::ReparentNotify(e) => smallvec![e.window],
            Self::ConfigureNotify(e) => smallvec![e.window],
            Self::ConfigureRequest(e) => smallvec![e.window, e.parent],
            Self::GravityNotify(e) => smallvec![e.window],
            Self::ResizeRequest(e) => smallvec![e.window],
            Self::CirculateNotify(e) | Self::CirculateRequest(e) => smallvec![e.window],
            Self::PropertyNotify(e) => smallvec![e.window],
            Self::SelectionClear(e) => smallvec![e.owner],
            Self::SelectionRequest(e) => smallvec![e.requestor],
            Self::SelectionNotify(e) => smallvec![e.requestor],
            Self::ColormapNotify(e) => smallvec![e.window],
            Self::ClientMessage(e) => smallvec![e.window],
            Self::Unsupported { .. } => SmallVec::new(),
        }
    }

    /// Returns the server timestamp for kinds that update the last-seen time.
    #[must_use]
    pub const fn time(&self) -> Option<Timestamp> {
        match self {
            Self::KeyPress(e)
            | Self::KeyRelease(e)
            | Self::ButtonPress(e)
            | Self::ButtonRelease(e)
            | Self::MotionNotify(e) => Some(e.time),
            Self::EnterNotify(e) | Self::LeaveNotify(e) => Some(e.time),
            Self::PropertyNotify(e) => Some(e.time),
            Self::SelectionClear(e) => Some(e.time),
            Self::SelectionRequest(e) => Some(e.time),
            Self::SelectionNotify(e) => Some(e.time),
            _ => None,
        }
    }

    /// Returns the motion payload if this is a `MotionNotify`.
    #[must_use]
    pub const fn as_motion(&self) -> Option<&InputEvent> {
        if let Self::MotionNotify(motion) = self { Some(motion) } else { None }
    }
}

/// One unit of work in the event queue: an event or a protocol error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueEntry {
    Event(Event),
    Error(ProtocolError),
}

impl QueueEntry {
    /// Returns the event, if this entry holds one.
    #[must_use]
    pub const fn as_event(&self) -> Option<&Event> {
        if let Self::Event(event) = self { Some(event) } else { None }
    }

    /// Returns `true` for protocol errors.
    #[must_use]
    pub const fn is_error(&self) -> bool { matches!(self, Self::Error(_)) }
}

impl From<Event> for QueueEntry {
    fn from(event: Event) -> Self { Self::Event(event) }
}

impl From<ProtocolError> for QueueEntry {
    fn from(error: ProtocolError) -> Self { Self::Error(error) }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn map_request(window: u32, parent: u32) -> Event {
        Event::MapRequest(MapRequestEvent { parent: Window(parent), window: Window(window) })
    }

    #[test]
    fn test_kind_of_unsupported_is_none() {
        assert_eq!(Event::Unsupported { code: 85 }.kind(), None);
        assert!(Event::Unsupported { code: 85 }.targets().is_empty());
    }

    fn one_of_each_kind() -> Vec<Event> {
        vec![
            Event::KeyPress(InputEvent::default()),
            Event::KeyRelease(InputEvent::default()),
            Event::ButtonPress(InputEvent::default()),
            Event::ButtonRelease(InputEvent::default()),
            Event::MotionNotify(InputEvent::default()),
            Event::EnterNotify(CrossingEvent::default()),
            Event::LeaveNotify(CrossingEvent::default()),
            Event::FocusIn(FocusEvent::default()),
            Event::FocusOut(FocusEvent::default()),
            Event::KeymapNotify(KeymapNotifyEvent::default()),
            Event::Expose(ExposeEvent::default()),
            Event::GraphicsExposure(GraphicsExposureEvent::default()),
            Event::NoExposure(NoExposureEvent::default()),
            Event::VisibilityNotify(VisibilityNotifyEvent::default()),
            Event::CreateNotify(CreateNotifyEvent::default()),
            Event::DestroyNotify(DestroyNotifyEvent::default()),
            Event::UnmapNotify(UnmapNotifyEvent::default()),
            Event::MapNotify(MapNotifyEvent::default()),
            Event::MapRequest(MapRequestEvent::default()),
            Event::ReparentNotify(ReparentNotifyEvent::default()),
            Event::ConfigureNotify(ConfigureNotifyEvent::default()),
            Event::ConfigureRequest(ConfigureRequestEvent::default()),
            Event::GravityNotify(GravityNotifyEvent::default()),
            Event::ResizeRequest(ResizeRequestEvent::default()),
            Event::CirculateNotify(CirculateEvent::default()),
            Event::CirculateRequest(CirculateEvent::default()),
            Event::PropertyNotify(PropertyNotifyEvent::default()),
            Event::SelectionClear(SelectionClearEvent::default()),
            Event::SelectionRequest(SelectionRequestEvent::default()),
            Event::SelectionNotify(SelectionNotifyEvent::default()),
            Event::ColormapNotify(ColormapNotifyEvent::default()),
            Event::ClientMessage(ClientMessageEvent::default()),
            Event::MappingNotify(MappingNotifyEvent::default()),
        ]
    }

    #[test]
    fn test_only_request_events_have_two_targets() {
        let events = one_of_each_kind();
        let kinds: BTreeSet<_> = events.iter().filter_map(Event::kind).collect();
        assert_eq!(kinds.len(), events.len());

        for event in &events {
            let kind = event.kind().unwrap();
            let expected = match kind {
                EventKind::MapRequest | EventKind::ConfigureRequest => 2,
                _ => 1,
            };
            assert_eq!(event.targets().len(), expected, "{kind}");
        }
    }

    #[test]
    fn test_time_is_reported_by_input_property_and_selection_events() {
        for event in one_of_each_kind() {
            let kind = event.kind().unwrap();
            let timed = matches!(
                kind,
                EventKind::KeyPress
                    | EventKind::KeyRelease
                    | EventKind::ButtonPress
                    | EventKind::ButtonRelease
                    | EventKind::MotionNotify
                    | EventKind::EnterNotify
                    | EventKind::LeaveNotify
                    | EventKind::PropertyNotify
                    | EventKind::SelectionClear
                    | EventKind::SelectionRequest
                    | EventKind::SelectionNotify
            );
            assert_eq!(event.time().is_some(), timed, "{kind}");
        }
    }

    #[test]
    fn test_request_events_target_window_then_parent() {
        assert_eq!(map_request(5, 1).targets().as_slice(), &[Window(5), Window(1)]);

        let configure = Event::ConfigureRequest(ConfigureRequestEvent {
            parent: Window(1),
            window: Window(9),
            ..ConfigureRequestEvent::default()
        });
        assert_eq!(configure.targets().as_slice(), &[Window(9), Window(1)]);
    }

    #[test]
    fn test_notify_events_have_single_target() {
        let notify = Event::MapNotify(MapNotifyEvent {
            event: Window(1),
            window: Window(5),
            override_redirect: false,
        });
        assert_eq!(notify.targets().as_slice(), &[Window(5)]);

        let reparent = Event::ReparentNotify(ReparentNotifyEvent {
            event: Window(1),
            window: Window(5),
            parent: Window(2),
            ..ReparentNotifyEvent::default()
        });
        assert_eq!(reparent.targets().as_slice(), &[Window(5)]);
    }

    #[test]
    fn test_windowless_events_route_to_none() {
        let keymap = Event::KeymapNotify(KeymapNotifyEvent::default());
        assert_eq!(keymap.targets().as_slice(), &[Window::NONE]);

        let mapping = Event::MappingNotify(MappingNotifyEvent::default());
        assert_eq!(mapping.targets().as_slice(), &[Window::NONE]);
    }

    #[test]
    fn test_selection_events_route_to_owner_or_requestor() {
        let clear = Event::SelectionClear(SelectionClearEvent {
            time: 1,
            owner: Window(3),
            selection: 1,
        });
        assert_eq!(clear.targets().as_slice(), &[Window(3)]);

        let request = Event::SelectionRequest(SelectionRequestEvent {
            owner: Window(3),
            requestor: Window(4),
            ..SelectionRequestEvent::default()
        });
        assert_eq!(request.targets().as_slice(), &[Window(4)]);
    }

    #[test]
    fn test_exposure_events_route_to_drawable() {
        let exposure = Event::NoExposure(NoExposureEvent {
            drawable: Window(77),
            minor_opcode: 0,
            major_opcode: 62,
        });
        assert_eq!(exposure.targets().as_slice(), &[Window(77)]);
    }

    #[test]
    fn test_entry_deserializes_tagged_json() {
        let entry: QueueEntry = serde_json::from_str(
            r#"{"event": {"type": "motion_notify", "event": 42, "time": 7, "root_x": 3}}"#,
        )
        .unwrap();
        let motion = entry.as_event().and_then(Event::as_motion).unwrap();
        assert_eq!(motion.event, Window(42));
        assert_eq!(motion.time, 7);
        assert_eq!(motion.root_x, 3);

        let entry: QueueEntry =
            serde_json::from_str(r#"{"error": {"code": 3, "bad_value": 12}}"#).unwrap();
        assert!(entry.is_error());

        let entry: QueueEntry =
            serde_json::from_str(r#"{"event": {"type": "unsupported", "code": 90}}"#).unwrap();
        assert_eq!(entry, QueueEntry::Event(Event::Unsupported { code: 90 }));
    }
}
