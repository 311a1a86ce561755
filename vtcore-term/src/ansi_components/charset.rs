// Copyright (C) 2024-2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! G0-G3 character set designation and GL/GR invocation, per ECMA-48/DEC STD 070.

/// One of the four designatable character set slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GSlot {
    G0,
    G1,
    G2,
    G3,
}

/// Where a `GSlot` is bound: the graphic-left column (codes 0x20-0x7f) or
/// graphic-right column (codes 0xa0-0xff).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GColumn {
    Gl,
    Gr,
}

/// A designatable character set. `Ascii` is the power-on default for every slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharacterSet {
    #[default]
    Ascii,
    DecSpecialGraphics,
    Uk,
    Dutch,
    Finnish,
    French,
    FrenchCanadian,
    German,
    Italian,
    NorwegianDanish,
    Spanish,
    Swedish,
    Swiss,
}

impl CharacterSet {
    /// Remap a single GL byte (0x20-0x7e) through this character set's substitution
    /// table. Bytes outside the national-replacement positions pass through unchanged.
    #[must_use]
    pub fn remap(self, byte: u8) -> char {
        if let Self::DecSpecialGraphics = self {
            if let Some(replacement) = dec_special_graphics_replacement(byte) {
                return replacement;
            }
            return byte as char;
        }

        // ISO-646 national variants only ever differ from US-ASCII at these 13
        // code positions; everything else (letters, digits, control codes) is shared.
        let replacement = match (self, byte) {
            (Self::Uk, 0x23) => Some('£'),
            (Self::Dutch, 0x23) => Some('£'),
            (Self::Dutch, 0x40) => Some('¾'),
            (Self::Dutch, 0x5b) => Some('ĳ'),
            (Self::Dutch, 0x5c) => Some('½'),
            (Self::Dutch, 0x5d) => Some('|'),
            (Self::Dutch, 0x7b) => Some('¨'),
            (Self::Dutch, 0x7c) => Some('f'),
            (Self::Dutch, 0x7d) => Some('¼'),
            (Self::Dutch, 0x7e) => Some('´'),
            (Self::Finnish, 0x5b) => Some('Ä'),
            (Self::Finnish, 0x5c) => Some('Ö'),
            (Self::Finnish, 0x5d) => Some('Å'),
            (Self::Finnish, 0x5e) => Some('Ü'),
            (Self::Finnish, 0x60) => Some('é'),
            (Self::Finnish, 0x7b) => Some('ä'),
            (Self::Finnish, 0x7c) => Some('ö'),
            (Self::Finnish, 0x7d) => Some('å'),
            (Self::Finnish, 0x7e) => Some('ü'),
            (Self::French, 0x23) => Some('£'),
            (Self::French, 0x40) => Some('à'),
            (Self::French, 0x5b) => Some('°'),
            (Self::French, 0x5c) => Some('ç'),
            (Self::French, 0x5d) => Some('§'),
            (Self::French, 0x7b) => Some('é'),
            (Self::French, 0x7c) => Some('ù'),
            (Self::French, 0x7d) => Some('è'),
            (Self::French, 0x7e) => Some('¨'),
            (Self::FrenchCanadian, 0x40) => Some('à'),
            (Self::FrenchCanadian, 0x5b) => Some('â'),
            (Self::FrenchCanadian, 0x5c) => Some('ç'),
            (Self::FrenchCanadian, 0x5d) => Some('ê'),
            (Self::FrenchCanadian, 0x5e) => Some('î'),
            (Self::FrenchCanadian, 0x60) => Some('ô'),
            (Self::FrenchCanadian, 0x7b) => Some('é'),
            (Self::FrenchCanadian, 0x7c) => Some('ù'),
            (Self::FrenchCanadian, 0x7d) => Some('è'),
            (Self::FrenchCanadian, 0x7e) => Some('û'),
            (Self::German, 0x40) => Some('§'),
            (Self::German, 0x5b) => Some('Ä'),
            (Self::German, 0x5c) => Some('Ö'),
            (Self::German, 0x5d) => Some('Ü'),
            (Self::German, 0x7b) => Some('ä'),
            (Self::German, 0x7c) => Some('ö'),
            (Self::German, 0x7d) => Some('ü'),
            (Self::German, 0x7e) => Some('ß'),
            (Self::Italian, 0x23) => Some('£'),
            (Self::Italian, 0x40) => Some('§'),
            (Self::Italian, 0x5b) => Some('°'),
            (Self::Italian, 0x5c) => Some('ç'),
            (Self::Italian, 0x5d) => Some('é'),
            (Self::Italian, 0x60) => Some('ù'),
            (Self::Italian, 0x7b) => Some('à'),
            (Self::Italian, 0x7c) => Some('ò'),
            (Self::Italian, 0x7d) => Some('è'),
            (Self::Italian, 0x7e) => Some('ì'),
            (Self::NorwegianDanish, 0x40) => Some('Ä'),
            (Self::NorwegianDanish, 0x5b) => Some('Æ'),
            (Self::NorwegianDanish, 0x5c) => Some('Ø'),
            (Self::NorwegianDanish, 0x5d) => Some('Å'),
            (Self::NorwegianDanish, 0x5e) => Some('Ü'),
            (Self::NorwegianDanish, 0x60) => Some('ä'),
            (Self::NorwegianDanish, 0x7b) => Some('æ'),
            (Self::NorwegianDanish, 0x7c) => Some('ø'),
            (Self::NorwegianDanish, 0x7d) => Some('å'),
            (Self::NorwegianDanish, 0x7e) => Some('ü'),
            (Self::Spanish, 0x23) => Some('£'),
            (Self::Spanish, 0x40) => Some('§'),
            (Self::Spanish, 0x5b) => Some('¡'),
            (Self::Spanish, 0x5c) => Some('Ñ'),
            (Self::Spanish, 0x5d) => Some('¿'),
            (Self::Spanish, 0x7b) => Some('°'),
            (Self::Spanish, 0x7c) => Some('ñ'),
            (Self::Spanish, 0x7d) => Some('ç'),
            (Self::Swedish, 0x40) => Some('É'),
            (Self::Swedish, 0x5b) => Some('Ä'),
            (Self::Swedish, 0x5c) => Some('Ö'),
            (Self::Swedish, 0x5d) => Some('Å'),
            (Self::Swedish, 0x5e) => Some('Ü'),
            (Self::Swedish, 0x60) => Some('é'),
            (Self::Swedish, 0x7b) => Some('ä'),
            (Self::Swedish, 0x7c) => Some('ö'),
            (Self::Swedish, 0x7d) => Some('å'),
            (Self::Swedish, 0x7e) => Some('ü'),
            (Self::Swiss, 0x23) => Some('ù'),
            (Self::Swiss, 0x40) => Some('à'),
            (Self::Swiss, 0x5b) => Some('é'),
            (Self::Swiss, 0x5c) => Some('ç'),
            (Self::Swiss, 0x5d) => Some('ê'),
            (Self::Swiss, 0x5e) => Some('î'),
            (Self::Swiss, 0x5f) => Some('è'),
            (Self::Swiss, 0x60) => Some('ô'),
            (Self::Swiss, 0x7b) => Some('ä'),
            (Self::Swiss, 0x7c) => Some('ö'),
            (Self::Swiss, 0x7d) => Some('ü'),
            (Self::Swiss, 0x7e) => Some('û'),
            _ => None,
        };

        replacement.unwrap_or(byte as char)
    }
}

/// Normative DEC Special Graphics (VT100 line-drawing) substitution table.
#[must_use]
pub const fn dec_special_graphics_replacement(byte: u8) -> Option<char> {
    Some(match byte {
        0x5f => '\u{00A0}',
        0x60 => '\u{25C6}',
        0x61 => '\u{2592}',
        0x62 => '\u{2409}',
        0x63 => '\u{240C}',
        0x64 => '\u{240D}',
        0x65 => '\u{240A}',
        0x66 => '\u{00B0}',
        0x67 => '\u{00B1}',
        0x68 => '\u{2424}',
        0x69 => '\u{240B}',
        0x6a => '\u{2518}',
        0x6b => '\u{2510}',
        0x6c => '\u{250C}',
        0x6d => '\u{2514}',
        0x6e => '\u{253C}',
        0x6f => '\u{23BA}',
        0x70 => '\u{23BB}',
        0x71 => '\u{2500}',
        0x72 => '\u{23BC}',
        0x73 => '\u{23BD}',
        0x74 => '\u{251C}',
        0x75 => '\u{2524}',
        0x76 => '\u{2534}',
        0x77 => '\u{252C}',
        0x78 => '\u{2502}',
        0x79 => '\u{2264}',
        0x7a => '\u{2265}',
        0x7b => '\u{03C0}',
        0x7c => '\u{2260}',
        0x7d => '\u{00A3}',
        0x7e => '\u{00B7}',
        _ => return None,
    })
}

/// Owns the G0-G3 designation slots and the current GL/GR/single-shift bindings,
/// and remaps printable GL bytes through the invoked character set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSetManager {
    slots: [CharacterSet; 4],
    gl: GSlot,
    gr: GSlot,
    single_shift: Option<GSlot>,
}

impl Default for CharacterSetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterSetManager {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [CharacterSet::Ascii; 4],
            gl: GSlot::G0,
            gr: GSlot::G1,
            single_shift: None,
        }
    }

    /// Reset to power-on defaults (RIS).
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Designate a character set into a `GSlot` (`ESC ( / ) / * / +  <final>`).
    pub fn designate(&mut self, slot: GSlot, charset: CharacterSet) {
        self.slots[slot_index(slot)] = charset;
    }

    /// Invoke a `GSlot` as GL via a locking shift (SI, SO, LS2, LS3).
    pub const fn lock_gl(&mut self, slot: GSlot) {
        self.gl = slot;
    }

    /// Invoke a `GSlot` as GR via a locking shift (LS1R, LS2R, LS3R).
    pub const fn lock_gr(&mut self, slot: GSlot) {
        self.gr = slot;
    }

    /// Invoke a `GSlot` for exactly the next graphic character (SS2, SS3).
    pub const fn single_shift(&mut self, slot: GSlot) {
        self.single_shift = Some(slot);
    }

    const fn active_gl_slot(&self) -> GSlot {
        match self.single_shift {
            Some(slot) => slot,
            None => self.gl,
        }
    }

    /// Remap one incoming byte through the currently invoked GL character set,
    /// consuming any pending single shift.
    pub fn translate(&mut self, byte: u8) -> char {
        let slot = self.active_gl_slot();
        self.single_shift = None;

        if byte < 0x20 || byte == 0x7f {
            return byte as char;
        }

        self.slots[slot_index(slot)].remap(byte)
    }
}

const fn slot_index(slot: GSlot) -> usize {
    match slot {
        GSlot::G0 => 0,
        GSlot::G1 => 1,
        GSlot::G2 => 2,
        GSlot::G3 => 3,
    }
}
