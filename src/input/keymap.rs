//! Scan Code Mapping Table
//!
//! Keypad scan code to Linux evdev keycode mapping. The keypad reports
//! USB HID keyboard usage IDs, so the table follows the HID usage order
//! for the 98 codes the device is able to send.

/// Generic key identifier (Linux evdev keycode numbering)
pub type KeyCode = u32;

/// Keycode value meaning "no mapping"
pub const UNMAPPED: KeyCode = 0;

/// Number of entries in [`SCAN_CODE_MAP`]
pub const SCAN_CODE_MAP_SIZE: usize = 98;

/// Linux evdev codes used by this device
pub mod keycodes {
    use super::KeyCode;

    pub const KEY_ESC: KeyCode = 1;
    pub const KEY_1: KeyCode = 2;
    pub const KEY_2: KeyCode = 3;
    pub const KEY_3: KeyCode = 4;
    pub const KEY_4: KeyCode = 5;
    pub const KEY_5: KeyCode = 6;
    pub const KEY_6: KeyCode = 7;
    pub const KEY_7: KeyCode = 8;
    pub const KEY_8: KeyCode = 9;
    pub const KEY_9: KeyCode = 10;
    pub const KEY_0: KeyCode = 11;
    pub const KEY_MINUS: KeyCode = 12;
    pub const KEY_EQUAL: KeyCode = 13;
    pub const KEY_BACKSPACE: KeyCode = 14;
    pub const KEY_TAB: KeyCode = 15;
    pub const KEY_Q: KeyCode = 16;
    pub const KEY_W: KeyCode = 17;
    pub const KEY_E: KeyCode = 18;
    pub const KEY_R: KeyCode = 19;
    pub const KEY_T: KeyCode = 20;
    pub const KEY_Y: KeyCode = 21;
    pub const KEY_U: KeyCode = 22;
    pub const KEY_I: KeyCode = 23;
    pub const KEY_O: KeyCode = 24;
    pub const KEY_P: KeyCode = 25;
    pub const KEY_LEFTBRACE: KeyCode = 26;
    pub const KEY_RIGHTBRACE: KeyCode = 27;
    pub const KEY_ENTER: KeyCode = 28;
    pub const KEY_A: KeyCode = 30;
    pub const KEY_S: KeyCode = 31;
    pub const KEY_D: KeyCode = 32;
    pub const KEY_F: KeyCode = 33;
    pub const KEY_G: KeyCode = 34;
    pub const KEY_H: KeyCode = 35;
    pub const KEY_J: KeyCode = 36;
    pub const KEY_K: KeyCode = 37;
    pub const KEY_L: KeyCode = 38;
    pub const KEY_SEMICOLON: KeyCode = 39;
    pub const KEY_APOSTROPHE: KeyCode = 40;
    pub const KEY_GRAVE: KeyCode = 41;
    pub const KEY_BACKSLASH: KeyCode = 43;
    pub const KEY_Z: KeyCode = 44;
    pub const KEY_X: KeyCode = 45;
    pub const KEY_C: KeyCode = 46;
    pub const KEY_V: KeyCode = 47;
    pub const KEY_B: KeyCode = 48;
    pub const KEY_N: KeyCode = 49;
    pub const KEY_M: KeyCode = 50;
    pub const KEY_COMMA: KeyCode = 51;
    pub const KEY_DOT: KeyCode = 52;
    pub const KEY_SLASH: KeyCode = 53;
    pub const KEY_KPASTERISK: KeyCode = 55;
    pub const KEY_SPACE: KeyCode = 57;
    pub const KEY_CAPSLOCK: KeyCode = 58;

    // Function keys
    pub const KEY_F1: KeyCode = 59;
    pub const KEY_F2: KeyCode = 60;
    pub const KEY_F3: KeyCode = 61;
    pub const KEY_F4: KeyCode = 62;
    pub const KEY_F5: KeyCode = 63;
    pub const KEY_F6: KeyCode = 64;
    pub const KEY_F7: KeyCode = 65;
    pub const KEY_F8: KeyCode = 66;
    pub const KEY_F9: KeyCode = 67;
    pub const KEY_F10: KeyCode = 68;
    pub const KEY_F11: KeyCode = 87;
    pub const KEY_F12: KeyCode = 88;

    // Numpad
    pub const KEY_NUMLOCK: KeyCode = 69;
    pub const KEY_SCROLLLOCK: KeyCode = 70;
    pub const KEY_KP7: KeyCode = 71;
    pub const KEY_KP8: KeyCode = 72;
    pub const KEY_KP9: KeyCode = 73;
    pub const KEY_KPMINUS: KeyCode = 74;
    pub const KEY_KP4: KeyCode = 75;
    pub const KEY_KP5: KeyCode = 76;
    pub const KEY_KP6: KeyCode = 77;
    pub const KEY_KPPLUS: KeyCode = 78;
    pub const KEY_KP1: KeyCode = 79;
    pub const KEY_KP2: KeyCode = 80;
    pub const KEY_KP3: KeyCode = 81;
    pub const KEY_KPENTER: KeyCode = 96;
    pub const KEY_KPSLASH: KeyCode = 98;

    // Navigation
    pub const KEY_SYSRQ: KeyCode = 99;
    pub const KEY_HOME: KeyCode = 102;
    pub const KEY_UP: KeyCode = 103;
    pub const KEY_PAGEUP: KeyCode = 104;
    pub const KEY_LEFT: KeyCode = 105;
    pub const KEY_RIGHT: KeyCode = 106;
    pub const KEY_END: KeyCode = 107;
    pub const KEY_DOWN: KeyCode = 108;
    pub const KEY_PAGEDOWN: KeyCode = 109;
    pub const KEY_INSERT: KeyCode = 110;
    pub const KEY_DELETE: KeyCode = 111;
    pub const KEY_PAUSE: KeyCode = 119;

    // Browser navigation
    pub const KEY_BACK: KeyCode = 158;
    pub const KEY_FORWARD: KeyCode = 159;

    // Mouse buttons
    pub const BTN_LEFT: KeyCode = 0x110;
    pub const BTN_RIGHT: KeyCode = 0x111;
    pub const BTN_MIDDLE: KeyCode = 0x112;
    pub const BTN_FORWARD: KeyCode = 0x115;
    pub const BTN_BACK: KeyCode = 0x116;
    pub const BTN_TOOL_DOUBLETAP: KeyCode = 0x14d;

    // Relative axes
    pub const REL_X: u16 = 0x00;
    pub const REL_Y: u16 = 0x01;
    pub const REL_HWHEEL: u16 = 0x06;
    pub const REL_WHEEL: u16 = 0x08;
    pub const REL_WHEEL_HI_RES: u16 = 0x0b;
    pub const REL_HWHEEL_HI_RES: u16 = 0x0c;
}

use keycodes::{
    KEY_0, KEY_1, KEY_2, KEY_3, KEY_4, KEY_5, KEY_6, KEY_7, KEY_8, KEY_9,
    KEY_A, KEY_APOSTROPHE, KEY_B, KEY_BACK, KEY_BACKSLASH, KEY_BACKSPACE, KEY_C, KEY_CAPSLOCK,
    KEY_COMMA, KEY_D, KEY_DELETE, KEY_DOT, KEY_DOWN, KEY_E, KEY_END, KEY_ENTER, KEY_EQUAL, KEY_ESC,
    KEY_F, KEY_F1, KEY_F10, KEY_F11, KEY_F12, KEY_F2, KEY_F3, KEY_F4, KEY_F5, KEY_F6, KEY_F7,
    KEY_F8, KEY_F9, KEY_FORWARD, KEY_G, KEY_GRAVE, KEY_H, KEY_HOME, KEY_I, KEY_INSERT, KEY_J,
    KEY_K, KEY_KP1, KEY_KP2, KEY_KP3, KEY_KP4, KEY_KP5, KEY_KP6, KEY_KP7, KEY_KP8, KEY_KP9,
    KEY_KPASTERISK, KEY_KPENTER, KEY_KPMINUS, KEY_KPPLUS, KEY_KPSLASH, KEY_L, KEY_LEFT,
    KEY_LEFTBRACE, KEY_M, KEY_MINUS, KEY_N, KEY_NUMLOCK, KEY_O, KEY_P, KEY_PAGEDOWN, KEY_PAGEUP,
    KEY_PAUSE, KEY_Q, KEY_R, KEY_RIGHT, KEY_RIGHTBRACE, KEY_S, KEY_SCROLLLOCK, KEY_SEMICOLON,
    KEY_SLASH, KEY_SPACE, KEY_SYSRQ, KEY_T, KEY_TAB, KEY_U, KEY_UP, KEY_V, KEY_W, KEY_X, KEY_Y,
    KEY_Z
};

/// Scan code (index) to keycode (value); [`UNMAPPED`] where the device
/// code has no meaning. Non-US `#` (0x32) reads as backslash.
#[rustfmt::skip]
pub const SCAN_CODE_MAP: [KeyCode; SCAN_CODE_MAP_SIZE] = [
    /* 0x00 */ 0,              0,              0,              0,
    /* 0x04 */ KEY_A,          KEY_B,          KEY_C,          KEY_D,
    /* 0x08 */ KEY_E,          KEY_F,          KEY_G,          KEY_H,
    /* 0x0C */ KEY_I,          KEY_J,          KEY_K,          KEY_L,
    /* 0x10 */ KEY_M,          KEY_N,          KEY_O,          KEY_P,
    /* 0x14 */ KEY_Q,          KEY_R,          KEY_S,          KEY_T,
    /* 0x18 */ KEY_U,          KEY_V,          KEY_W,          KEY_X,
    /* 0x1C */ KEY_Y,          KEY_Z,          KEY_1,          KEY_2,
    /* 0x20 */ KEY_3,          KEY_4,          KEY_5,          KEY_6,
    /* 0x24 */ KEY_7,          KEY_8,          KEY_9,          KEY_0,
    /* 0x28 */ KEY_ENTER,      KEY_ESC,        KEY_BACKSPACE,  KEY_TAB,
    /* 0x2C */ KEY_SPACE,      KEY_MINUS,      KEY_EQUAL,      KEY_LEFTBRACE,
    /* 0x30 */ KEY_RIGHTBRACE, KEY_BACKSLASH,  KEY_BACKSLASH,  KEY_SEMICOLON,
    /* 0x34 */ KEY_APOSTROPHE, KEY_GRAVE,      KEY_COMMA,      KEY_DOT,
    /* 0x38 */ KEY_SLASH,      KEY_CAPSLOCK,   KEY_F1,         KEY_F2,
    /* 0x3C */ KEY_F3,         KEY_F4,         KEY_F5,         KEY_F6,
    /* 0x40 */ KEY_F7,         KEY_F8,         KEY_F9,         KEY_F10,
    /* 0x44 */ KEY_F11,        KEY_F12,        KEY_SYSRQ,      KEY_SCROLLLOCK,
    /* 0x48 */ KEY_PAUSE,      KEY_INSERT,     KEY_HOME,       KEY_PAGEUP,
    /* 0x4C */ KEY_DELETE,     KEY_END,        KEY_PAGEDOWN,   KEY_RIGHT,
    /* 0x50 */ KEY_LEFT,       KEY_DOWN,       KEY_UP,         KEY_NUMLOCK,
    /* 0x54 */ KEY_KPSLASH,    KEY_KPASTERISK, KEY_KPMINUS,    KEY_KPPLUS,
    /* 0x58 */ KEY_KPENTER,    KEY_KP1,        KEY_KP2,        KEY_KP3,
    /* 0x5C */ KEY_KP4,        KEY_KP5,        KEY_KP6,        KEY_KP7,
    /* 0x60 */ KEY_KP8,        KEY_KP9,
];

/// Keys declared to the input layer although no scan code produces them
pub const AUXILIARY_KEYS: [KeyCode; 2] = [KEY_BACK, KEY_FORWARD];

/// Keys intercepted by the wheel emulator instead of being forwarded
pub const RESERVED_KEYS: [KeyCode; 4] = [KEY_KP8, KEY_KP2, KEY_KP4, KEY_KP6];

/// Translate a device scan code to a keycode
///
/// Returns `None` for codes outside the table and for table holes.
pub fn lookup(scan_code: usize) -> Option<KeyCode> {
    match SCAN_CODE_MAP.get(scan_code) {
        Some(&code) if code != UNMAPPED => Some(code),
        _ => None,
    }
}

/// Check whether a keycode is one of the emulator's direction keys
pub fn is_reserved(code: KeyCode) -> bool {
    RESERVED_KEYS.contains(&code)
}

/// Keycodes forwarded as ordinary key events, in scan code order
///
/// Each keycode is yielded once even when several scan codes map to it.
pub fn forwarded_keys() -> impl Iterator<Item = KeyCode> {
    SCAN_CODE_MAP
        .iter()
        .enumerate()
        .filter(|&(index, &code)| {
            code != UNMAPPED && !is_reserved(code) && !SCAN_CODE_MAP[..index].contains(&code)
        })
        .map(|(_, &code)| code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_follow_hid_usage() {
        assert_eq!(lookup(0x04), Some(KEY_A));
        assert_eq!(lookup(0x1D), Some(KEY_Z));
        assert_eq!(lookup(0x27), Some(KEY_0));
    }

    #[test]
    fn test_punctuation_block() {
        assert_eq!(lookup(0x2D), Some(KEY_MINUS));
        assert_eq!(lookup(0x2E), Some(KEY_EQUAL));
        assert_eq!(lookup(0x2F), Some(KEY_LEFTBRACE));
        assert_eq!(lookup(0x30), Some(KEY_RIGHTBRACE));
        assert_eq!(lookup(0x31), Some(KEY_BACKSLASH));
        assert_eq!(lookup(0x32), Some(KEY_BACKSLASH));
        assert_eq!(lookup(0x33), Some(KEY_SEMICOLON));
        assert_eq!(lookup(0x34), Some(KEY_APOSTROPHE));
        assert_eq!(lookup(0x35), Some(KEY_GRAVE));
        assert_eq!(lookup(0x36), Some(KEY_COMMA));
        assert_eq!(lookup(0x37), Some(KEY_DOT));
        assert_eq!(lookup(0x38), Some(KEY_SLASH));
        assert_eq!(lookup(0x39), Some(KEY_CAPSLOCK));
    }

    #[test]
    fn test_navigation_block() {
        assert_eq!(lookup(0x45), Some(KEY_F12));
        assert_eq!(lookup(0x46), Some(KEY_SYSRQ));
        assert_eq!(lookup(0x47), Some(KEY_SCROLLLOCK));
        assert_eq!(lookup(0x48), Some(KEY_PAUSE));
        assert_eq!(lookup(0x49), Some(KEY_INSERT));
        assert_eq!(lookup(0x4A), Some(KEY_HOME));
        assert_eq!(lookup(0x4D), Some(KEY_END));
        assert_eq!(lookup(0x4F), Some(KEY_RIGHT));
        assert_eq!(lookup(0x52), Some(KEY_UP));
    }

    #[test]
    fn test_keypad_block() {
        assert_eq!(lookup(0x53), Some(KEY_NUMLOCK));
        assert_eq!(lookup(0x54), Some(KEY_KPSLASH));
        assert_eq!(lookup(0x55), Some(KEY_KPASTERISK));
        assert_eq!(lookup(0x56), Some(KEY_KPMINUS));
        assert_eq!(lookup(0x57), Some(KEY_KPPLUS));
        assert_eq!(lookup(0x58), Some(KEY_KPENTER));
        assert_eq!(lookup(0x59), Some(KEY_KP1));
        assert_eq!(lookup(0x5A), Some(KEY_KP2));
        assert_eq!(lookup(0x5C), Some(KEY_KP4));
        assert_eq!(lookup(0x5E), Some(KEY_KP6));
        assert_eq!(lookup(0x60), Some(KEY_KP8));
        assert_eq!(lookup(0x61), Some(KEY_KP9));
    }

    #[test]
    fn test_every_usage_from_a_is_mapped() {
        assert!((0x04..SCAN_CODE_MAP_SIZE).all(|code| lookup(code).is_some()));
    }

    #[test]
    fn test_unmapped_codes() {
        assert_eq!(lookup(0), None);
        assert_eq!(lookup(0x03), None);
        assert_eq!(lookup(SCAN_CODE_MAP_SIZE), None);
        assert_eq!(lookup(127), None);
        assert_eq!(lookup(255), None);
    }

    #[test]
    fn test_reserved_keys() {
        assert!(is_reserved(KEY_KP8));
        assert!(is_reserved(KEY_KP2));
        assert!(is_reserved(KEY_KP4));
        assert!(is_reserved(KEY_KP6));
        assert!(!is_reserved(KEY_KP5));
        assert!(!is_reserved(KEY_A));
    }

    #[test]
    fn test_forwarded_keys_skip_reserved() {
        let keys: Vec<KeyCode> = forwarded_keys().collect();
        assert!(keys.contains(&KEY_A));
        assert!(keys.contains(&KEY_KP5));
        assert!(keys.contains(&KEY_KPPLUS));
        assert!(!keys.contains(&KEY_KP8));
        assert!(!keys.contains(&UNMAPPED));
        // 94 mapped entries, one duplicate backslash, 4 direction keys
        assert_eq!(keys.len(), 89);
        assert_eq!(keys.iter().filter(|&&code| code == KEY_BACKSLASH).count(), 1);
    }
}
