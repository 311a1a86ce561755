// Copyright (C) 2024-2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Translates a single keypress, together with the modifier keys held down
//! and the terminal's current cursor-key/keypad modes, into the byte
//! sequence that should be written to the pty. Pure function of its
//! inputs: the same [`KeyEvent`] and mode pair always produce the same
//! bytes.

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum KeyCode {
    Char,
    Enter,
    Backspace,
    Tab,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    Function(u8),
}

#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub key: Option<char>,
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            key: None,
            shift: false,
            alt: false,
            ctrl: false,
            meta: false,
        }
    }

    #[must_use]
    pub const fn with_char(mut self, c: char) -> Self {
        self.key = Some(c);
        self
    }

    #[must_use]
    pub const fn with_modifiers(mut self, shift: bool, alt: bool, ctrl: bool, meta: bool) -> Self {
        self.shift = shift;
        self.alt = alt;
        self.ctrl = ctrl;
        self.meta = meta;
        self
    }
}

/// xterm's modifier parameter: `1 + shift(1) + alt(2) + ctrl(4) + meta(8)`.
const fn modifier_param(event: &KeyEvent) -> u8 {
    1 + (event.shift as u8) + 2 * (event.alt as u8) + 4 * (event.ctrl as u8) + 8 * (event.meta as u8)
}

pub struct KeyEncoder;

impl KeyEncoder {
    /// Encode a key event into the bytes that should be written to the pty,
    /// or `None` if the key produces no output (e.g. a bare modifier key).
    #[must_use]
    pub fn encode(event: &KeyEvent, decckm_mode: bool, keypad_application_mode: bool) -> Option<Vec<u8>> {
        let modifier = modifier_param(event);
        let has_modifier = modifier != 1;

        match event.code {
            KeyCode::Char => encode_char(event),
            KeyCode::Enter => Some(b"\r".to_vec()),
            KeyCode::Backspace => Some(b"\x7f".to_vec()),
            KeyCode::Tab => Some(b"\t".to_vec()),
            KeyCode::Escape => Some(b"\x1b".to_vec()),
            KeyCode::ArrowUp => Some(encode_cursor_key(b'A', decckm_mode, modifier, has_modifier)),
            KeyCode::ArrowDown => Some(encode_cursor_key(b'B', decckm_mode, modifier, has_modifier)),
            KeyCode::ArrowRight => Some(encode_cursor_key(b'C', decckm_mode, modifier, has_modifier)),
            KeyCode::ArrowLeft => Some(encode_cursor_key(b'D', decckm_mode, modifier, has_modifier)),
            KeyCode::Home => Some(encode_cursor_key(b'H', decckm_mode, modifier, has_modifier)),
            KeyCode::End => Some(encode_cursor_key(b'F', decckm_mode, modifier, has_modifier)),
            KeyCode::PageUp => Some(encode_tilde_key(5, modifier, has_modifier)),
            KeyCode::PageDown => Some(encode_tilde_key(6, modifier, has_modifier)),
            KeyCode::Insert => Some(encode_tilde_key(2, modifier, has_modifier)),
            KeyCode::Delete => Some(encode_tilde_key(3, modifier, has_modifier)),
            KeyCode::Function(n) => encode_function_key(n, modifier, has_modifier, keypad_application_mode),
        }
    }
}

fn encode_char(event: &KeyEvent) -> Option<Vec<u8>> {
    let c = event.key?;

    let mut bytes = Vec::new();
    if event.ctrl && c.is_ascii_alphabetic() {
        bytes.push(c.to_ascii_uppercase() as u8 & 0x1F);
    } else {
        let mut buf = [0u8; 4];
        bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }

    if event.alt || event.meta {
        let mut out = vec![0x1B];
        out.extend(bytes);
        return Some(out);
    }

    Some(bytes)
}

fn encode_cursor_key(final_byte: u8, decckm_mode: bool, modifier: u8, has_modifier: bool) -> Vec<u8> {
    if has_modifier {
        let mut out = format!("\x1b[1;{modifier}").into_bytes();
        out.push(final_byte);
        out
    } else if decckm_mode {
        vec![0x1B, b'O', final_byte]
    } else {
        vec![0x1B, b'[', final_byte]
    }
}

fn encode_tilde_key(id: u8, modifier: u8, has_modifier: bool) -> Vec<u8> {
    if has_modifier {
        format!("\x1b[{id};{modifier}~").into_bytes()
    } else {
        format!("\x1b[{id}~").into_bytes()
    }
}

/// F1-F4 use the same SS3/CSI final-byte form as the cursor keys; F5 and up
/// are CSI-tilde sequences with xterm's historical id assignment (which
/// skips 16 and 22).
fn encode_function_key(n: u8, modifier: u8, has_modifier: bool, keypad_application_mode: bool) -> Option<Vec<u8>> {
    match n {
        1..=4 => {
            let final_byte = b'P' + (n - 1);
            if has_modifier {
                let mut out = format!("\x1b[1;{modifier}").into_bytes();
                out.push(final_byte);
                Some(out)
            } else if keypad_application_mode {
                Some(vec![0x1B, b'O', final_byte])
            } else {
                Some(vec![0x1B, b'[', final_byte])
            }
        }
        5..=12 => {
            let id = match n {
                5 => 15,
                6 => 17,
                7 => 18,
                8 => 19,
                9 => 20,
                10 => 21,
                11 => 23,
                12 => 24,
                _ => unreachable!(),
            };
            Some(encode_tilde_key(id, modifier, has_modifier))
        }
        _ => None,
    }
}
