//! Device Profile Catalog
//!
//! Each supported hardware device is identified by a handshake command and
//! the keywords an authentic device answers with. Profiles are tried in
//! catalog order against every enumerated port until one handshake
//! succeeds.

/// Baud rate every handshake starts at.
pub const BAUD_DEFAULT: u32 = 115_200;

/// Immutable description of one supported serial device.
#[derive(Debug, Clone, Copy)]
pub struct DeviceProfile {
    /// Short profile name, used in status messages
    pub name: &'static str,

    /// Version query written to the port during the handshake
    pub handshake: &'static [u8],

    /// Accepted response keywords; any-of, case-insensitive substring match
    pub keywords: &'static [&'static str],

    /// Baud rate to switch to after a successful handshake
    pub baud_high: u32,

    /// Raw bytes written once right after the handshake succeeds (may be empty)
    pub init_sequence: &'static [u8],

    /// Text command written after the baud switch (may be empty)
    pub init_command: &'static [u8],
}

impl DeviceProfile {
    /// Whether a drained, lower-cased handshake response identifies this
    /// device.
    pub fn matches(&self, response: &str) -> bool {
        self.keywords.iter().any(|keyword| response.contains(keyword))
    }
}

/// Binary mode-switch sequence for the makcu control box.
const MAKCU_INIT_SEQUENCE: &[u8] = &[0xDE, 0xAD, 0x05, 0x00, 0xA5, 0x00, 0x09, 0x3D, 0x00];

/// Supported devices, in the order they are tried.
pub const CATALOG: &[DeviceProfile] = &[
    DeviceProfile {
        name: "makcu",
        handshake: b"km.version()\r\n",
        keywords: &["km.makcu", "km"],
        baud_high: 4_000_000,
        init_sequence: MAKCU_INIT_SEQUENCE,
        init_command: b"km.buttons(1)\r\n",
    },
    DeviceProfile {
        name: "otherbox",
        handshake: b"box.version()\r\n",
        keywords: &["otherbox"],
        baud_high: BAUD_DEFAULT,
        init_sequence: b"",
        init_command: b"",
    },
];

/// Format a relative-motion command for a connected device.
pub fn move_command(dx: i32, dy: i32) -> Vec<u8> {
    format!("km.move({dx},{dy})\r").into_bytes()
}
