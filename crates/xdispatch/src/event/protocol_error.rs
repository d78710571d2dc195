//! Protocol errors reported by the server.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An X11 error packet as decoded by the connection.
///
/// These are queued alongside events and handed to the registry's error
/// handler; they never abort the event loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolError {
    /// Error code (1..=17 for core errors, higher for extensions).
    pub code: u8,
    /// Sequence number of the failed request.
    pub sequence: u16,
    /// Offending resource id or value.
    pub bad_value: u32,
    pub minor_opcode: u16,
    pub major_opcode: u8,
}

impl ProtocolError {
    /// Returns the core protocol name of this error (e.g. `"BadWindow"`),
    /// or `None` for extension errors.
    #[must_use]
    pub const fn name(&self) -> Option<&'static str> {
        let name = match self.code {
            1 => "BadRequest",
            2 => "BadValue",
            3 => "BadWindow",
            4 => "BadPixmap",
            5 => "BadAtom",
            6 => "BadCursor",
            7 => "BadFont",
            8 => "BadMatch",
            9 => "BadDrawable",
            10 => "BadAccess",
            11 => "BadAlloc",
            12 => "BadColormap",
            13 => "BadGContext",
            14 => "BadIDChoice",
            15 => "BadName",
            16 => "BadLength",
            17 => "BadImplementation",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}")?,
            None => write!(f, "Error {}", self.code)?,
        }
        write!(
            f,
            " (sequence {}, value {:#x}, opcode {}.{})",
            self.sequence, self.bad_value, self.major_opcode, self.minor_opcode
        )
    }
}

impl std::error::Error for ProtocolError {}
