// Copyright (C) 2024-2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#[cfg(debug_assertions)]
use std::time::Instant;

use vtcore_buffer::buffer::Buffer;
use vtcore_common::{
    buffer_states::{
        cursor::{CursorPos, ReverseVideo, StateColors},
        fonts::{FontDecorations, FontWeight},
        format_tag::FormatTag,
        line_draw::DecSpecialGraphics,
        mode::{Mode, SetMode, TerminalModes},
        modes::{
            decarm::Decarm, decawm::Decawm, decckm::Decckm, dectcem::Dectcem, lnm::Lnm,
            mouse::MouseTrack, sync_updates::SynchronizedUpdates, theme::Theming,
            xtcblink::XtCBlink, xtextscrn::XtExtscrn, xtmsewin::XtMseWin, MouseModeNumber,
            ReportMode,
        },
        tchar::TChar,
        url::Url,
    },
    cursor::CursorVisualStyle,
    sgr::SelectGraphicRendition,
    terminal_size::{DEFAULT_HEIGHT, DEFAULT_WIDTH},
    window_manipulation::WindowManipulation,
};

use crate::{
    ansi::{FreminalAnsiParser, TerminalOutput},
    ansi_components::{
        charset::{CharacterSet, CharacterSetManager, GSlot},
        kitty::{ImageManager, KittyEvent},
        osc::{AnsiOscInternalType, AnsiOscType, UrlResponse},
    },
    io::OutboundEvent,
};

/// SGR attributes that apply to cells as they're written, kept separately
/// from cursor position since the buffer only tracks the latter.
#[derive(Debug, Clone, PartialEq)]
struct CursorStyle {
    colors: StateColors,
    font_weight: FontWeight,
    font_decorations: Vec<FontDecorations>,
    url: Option<Url>,
}

impl Default for CursorStyle {
    fn default() -> Self {
        Self {
            colors: StateColors::default(),
            font_weight: FontWeight::Normal,
            font_decorations: Vec::new(),
            url: None,
        }
    }
}

impl CursorStyle {
    fn as_format_tag(&self) -> FormatTag {
        FormatTag {
            start: 0,
            end: usize::MAX,
            colors: self.colors.clone(),
            font_weight: self.font_weight,
            font_decorations: self.font_decorations.clone(),
            url: self.url.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl From<bool> for Theme {
    fn from(dark_mode: bool) -> Self {
        if dark_mode {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

/// Drives a [`vtcore_buffer::buffer::Buffer`] from parsed terminal output,
/// owning everything needed to interpret a byte stream: the ANSI parser,
/// character-set designation state, the Kitty graphics image table, and
/// the cell attributes applied to newly written text.
///
/// Has no pty, child process, or rendering surface of its own. Bytes come
/// in via [`Executor::handle_incoming_data`]; bytes the terminal itself
/// wants to emit (reports, responses) go out via `write_tx`.
#[allow(clippy::struct_excessive_bools)]
pub struct Executor {
    pub parser: FreminalAnsiParser,
    pub buffer: Buffer,
    width: usize,
    height: usize,
    pub modes: TerminalModes,
    pub images: ImageManager,
    charset: CharacterSetManager,
    pending_charset_slot: GSlot,
    style: CursorStyle,
    saved_cursor: Option<(CursorPos, CursorStyle)>,
    show_cursor: Dectcem,
    cell_width_px: u32,
    cell_height_px: u32,
    write_tx: crossbeam_channel::Sender<OutboundEvent>,
    changed: bool,
    leftover_data: Option<Vec<u8>>,
    character_replace: DecSpecialGraphics,
    window_focused: bool,
    window_commands: Vec<WindowManipulation>,
    theme: Theme,
    cursor_visual_style: CursorVisualStyle,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("parser", &self.parser)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("modes", &self.modes)
            .field("images", &self.images)
            .field("charset", &self.charset)
            .field("style", &self.style)
            .field("show_cursor", &self.show_cursor)
            .field("changed", &self.changed)
            .field("leftover_data", &self.leftover_data)
            .field("character_replace", &self.character_replace)
            .field("window_focused", &self.window_focused)
            .field("window_commands", &self.window_commands)
            .field("theme", &self.theme)
            .field("cursor_visual_style", &self.cursor_visual_style)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Executor {
    fn eq(&self, other: &Self) -> bool {
        self.parser == other.parser
            && self.modes == other.modes
            && self.changed == other.changed
            && self.leftover_data == other.leftover_data
            && self.character_replace == other.character_replace
    }
}

impl Default for Executor {
    /// This method should never really be used outside tests: a real caller
    /// almost always wants the channel receiver too, which `new` returns.
    fn default() -> Self {
        Self::new(
            DEFAULT_WIDTH as usize,
            DEFAULT_HEIGHT as usize,
            crossbeam_channel::unbounded().0,
        )
    }
}

impl Executor {
    #[must_use]
    pub fn new(
        width: usize,
        height: usize,
        write_tx: crossbeam_channel::Sender<OutboundEvent>,
    ) -> Self {
        Self {
            parser: FreminalAnsiParser::new(),
            buffer: Buffer::new(width, height),
            width,
            height,
            modes: TerminalModes::default(),
            images: ImageManager::new(),
            charset: CharacterSetManager::new(),
            pending_charset_slot: GSlot::G0,
            style: CursorStyle::default(),
            saved_cursor: None,
            show_cursor: Dectcem::default(),
            cell_width_px: 10,
            cell_height_px: 20,
            write_tx,
            changed: false,
            leftover_data: None,
            character_replace: DecSpecialGraphics::DontReplace,
            window_focused: true,
            window_commands: Vec::new(),
            theme: Theme::default(),
            cursor_visual_style: CursorVisualStyle::default(),
        }
    }

    #[must_use]
    pub const fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Updates the cell dimensions (in pixels) used to size Kitty image
    /// placements specified in cells rather than explicit pixel dimensions.
    pub const fn set_cell_pixel_size(&mut self, width_px: u32, height_px: u32) {
        self.cell_width_px = width_px;
        self.cell_height_px = height_px;
    }

    #[must_use]
    pub fn get_cursor_visual_style(&self) -> CursorVisualStyle {
        self.cursor_visual_style.clone()
    }

    pub const fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    #[must_use]
    pub const fn is_normal_display(&self) -> bool {
        self.modes.invert_screen.is_normal_display()
    }

    #[must_use]
    pub fn should_repeat_keys(&self) -> bool {
        self.modes.repeat_keys == Decarm::RepeatKey
    }

    #[must_use]
    pub const fn show_cursor(&self) -> bool {
        matches!(self.show_cursor, Dectcem::Show)
    }

    #[must_use]
    pub fn skip_draw_always(&self) -> bool {
        self.modes.synchronized_updates == SynchronizedUpdates::DontDraw
    }

    #[must_use]
    pub fn is_changed(&self) -> bool {
        if self.modes.synchronized_updates == SynchronizedUpdates::DontDraw {
            debug!("Executor: synchronized updates set to DontDraw, reporting unchanged");
            return false;
        }
        self.changed
    }

    pub const fn clear_changed(&mut self) {
        self.changed = false;
    }

    #[must_use]
    pub fn get_cursor_key_mode(&self) -> Decckm {
        self.modes.cursor_key.clone()
    }

    pub fn drain_window_commands(&mut self) -> Vec<WindowManipulation> {
        std::mem::take(&mut self.window_commands)
    }

    /// A clone of the sender this executor reports bytes through, for a
    /// caller (the Controller) that needs to push additional outbound bytes
    /// of its own, e.g. encoded key presses.
    #[must_use]
    pub fn outbound_sender(&self) -> crossbeam_channel::Sender<OutboundEvent> {
        self.write_tx.clone()
    }

    /// Whether the numeric keypad is in application mode. The VT100 wire
    /// protocol conflates DECCKM and DECKPAM onto the same pair of
    /// escape sequences (`ESC =` / `ESC >`), so this tracks the same state
    /// as [`Self::get_cursor_key_mode`].
    #[must_use]
    pub fn is_keypad_application_mode(&self) -> bool {
        self.modes.cursor_key == Decckm::Application
    }

    pub fn set_window_focused(&mut self, focused: bool) {
        self.window_focused = focused;

        if self.modes.focus_reporting == XtMseWin::Disabled {
            return;
        }

        let report = if focused { b"\x1b[I".to_vec() } else { b"\x1b[O".to_vec() };
        self.write_bytes(report);
        debug!("Reported focus change to terminal");
    }

    /// Resize the grid. Reflows the primary buffer to the new width.
    pub fn set_size(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }

        self.width = width;
        self.height = height;
        self.buffer.set_size(width, height);
        self.set_state_changed();
    }

    fn write_bytes(&self, bytes: Vec<u8>) {
        if let Err(e) = self.write_tx.send(OutboundEvent::Write(bytes)) {
            error!("Failed to write terminal output: {e}");
        }
    }

    fn set_state_changed(&mut self) {
        self.changed = true;
    }

    /// Translate DEC Special Graphics / national character set replacements,
    /// then decode the result into grapheme-aware [`TChar`]s.
    fn translate_and_insert(&mut self, data: &[u8]) {
        let mut translated = Vec::with_capacity(data.len());
        for &byte in data {
            if byte < 0x80 {
                let mut buf = [0u8; 4];
                translated.extend_from_slice(self.charset.translate(byte).encode_utf8(&mut buf).as_bytes());
            } else {
                translated.push(byte);
            }
        }

        match TChar::from_vec(&translated) {
            Ok(chars) => self.buffer.insert_text(&chars),
            Err(e) => error!("Failed to decode incoming text as TChars: {e}"),
        }
    }

    fn handle_data(&mut self, data: &[u8]) {
        // SI/SO are locking shifts, not printable data; strip them from the
        // stream before splitting into UTF-8 runs.
        let mut runs: Vec<u8> = Vec::with_capacity(data.len());
        for &byte in data {
            match byte {
                0x0e => self.charset.lock_gl(GSlot::G1),
                0x0f => self.charset.lock_gl(GSlot::G0),
                _ => runs.push(byte),
            }
        }

        if self.character_replace == DecSpecialGraphics::Replace {
            self.charset.designate(GSlot::G0, CharacterSet::DecSpecialGraphics);
        }

        if !runs.is_empty() {
            self.translate_and_insert(&runs);
        }
    }

    fn set_cursor_pos(&mut self, x: Option<usize>, y: Option<usize>) {
        self.buffer.set_cursor_pos(x, y);
    }

    fn set_cursor_pos_rel(&mut self, x: Option<i32>, y: Option<i32>) {
        self.buffer
            .move_cursor_relative(x.map(i64::from), y.map(i64::from));
    }

    fn reset_style(&mut self) {
        self.style = CursorStyle::default();
        self.buffer.set_format(self.style.as_format_tag());
    }

    fn sgr(&mut self, sgr: SelectGraphicRendition) {
        match sgr {
            SelectGraphicRendition::NoOp => return,
            SelectGraphicRendition::Reset => {
                self.reset_style();
                return;
            }
            SelectGraphicRendition::Bold => self.style.font_weight = FontWeight::Bold,
            SelectGraphicRendition::ResetBold => self.style.font_weight = FontWeight::Normal,
            SelectGraphicRendition::Underline => {
                add_decoration(&mut self.style.font_decorations, FontDecorations::Underline);
            }
            SelectGraphicRendition::NotUnderlined => {
                remove_decoration(&mut self.style.font_decorations, &FontDecorations::Underline);
            }
            SelectGraphicRendition::Italic => {
                add_decoration(&mut self.style.font_decorations, FontDecorations::Italic);
            }
            SelectGraphicRendition::NotItalic => {
                remove_decoration(&mut self.style.font_decorations, &FontDecorations::Italic);
            }
            SelectGraphicRendition::Faint => {
                add_decoration(&mut self.style.font_decorations, FontDecorations::Faint);
            }
            SelectGraphicRendition::NormalIntensity => {
                remove_decoration(&mut self.style.font_decorations, &FontDecorations::Faint);
            }
            SelectGraphicRendition::Strikethrough => {
                add_decoration(&mut self.style.font_decorations, FontDecorations::Strikethrough);
            }
            SelectGraphicRendition::NotStrikethrough => {
                remove_decoration(&mut self.style.font_decorations, &FontDecorations::Strikethrough);
            }
            SelectGraphicRendition::ReverseVideo => self.style.colors.set_reverse_video(ReverseVideo::On),
            SelectGraphicRendition::ResetReverseVideo => {
                self.style.colors.set_reverse_video(ReverseVideo::Off);
            }
            SelectGraphicRendition::Foreground(color) => self.style.colors.set_color(color),
            SelectGraphicRendition::Background(color) => self.style.colors.set_background_color(color),
            SelectGraphicRendition::UnderlineColor(color) => {
                self.style.colors.set_underline_color(color);
            }
            SelectGraphicRendition::Unknown(n) => {
                warn!("Unknown sgr: {n}");
                return;
            }
            other => {
                warn!("Unhandled sgr: {other:?}");
                return;
            }
        }

        self.buffer.set_format(self.style.as_format_tag());
    }

    fn screen_alignment_test(&mut self) {
        self.reset_style();
        self.buffer.erase_scrollback();
        self.buffer.screen_alignment_test();
    }

    fn report_mode(&self, report: &str) {
        self.write_bytes(report.as_bytes().to_vec());
    }

    #[allow(clippy::too_many_lines)]
    fn set_mode(&mut self, mode: &Mode) {
        match mode {
            Mode::NoOp => {}
            Mode::Decckm(Decckm::Query) => {
                self.report_mode(&self.get_cursor_key_mode().report(None));
            }
            Mode::Decckm(decckm) => self.modes.cursor_key = decckm.clone(),
            Mode::Decawm(Decawm::Query) => {
                self.report_mode(&Decawm::AutoWrap.report(None));
            }
            Mode::Decawm(Decawm::NoAutoWrap) => {
                warn!("DECAWM no-autowrap requested, but the buffer always autowraps");
            }
            Mode::Decawm(_) => {}
            Mode::Dectem(Dectcem::Query) => {
                let report = self.show_cursor.report(None);
                self.report_mode(&report);
            }
            Mode::Dectem(dectem) => self.show_cursor = dectem.clone(),
            Mode::BracketedPaste(bracketed_paste) => {
                self.modes.bracketed_paste = bracketed_paste.clone();
                if let vtcore_common::buffer_states::modes::rl_bracket::RlBracket::Query = bracketed_paste
                {
                    self.report_mode(&self.modes.bracketed_paste.report(None));
                }
            }
            Mode::Decscnm(decscnm) => {
                if let vtcore_common::buffer_states::modes::decscnm::Decscnm::Query = decscnm {
                    self.report_mode(&self.modes.invert_screen.report(None));
                } else {
                    self.modes.invert_screen = decscnm.clone();
                }
            }
            Mode::XtCBlink(XtCBlink::Query) => {
                self.report_mode(&self.modes.cursor_blinking.report(None));
            }
            Mode::XtCBlink(xtcblink) => {
                self.modes.cursor_blinking = xtcblink.clone();
                self.cursor_visual_style = match (self.modes.cursor_blinking.clone(), &self.cursor_visual_style) {
                    (XtCBlink::Blinking, CursorVisualStyle::BlockCursorSteady) => {
                        CursorVisualStyle::BlockCursorBlink
                    }
                    (XtCBlink::Blinking, CursorVisualStyle::UnderlineCursorSteady) => {
                        CursorVisualStyle::UnderlineCursorBlink
                    }
                    (XtCBlink::Blinking, CursorVisualStyle::VerticalLineCursorSteady) => {
                        CursorVisualStyle::VerticalLineCursorBlink
                    }
                    (XtCBlink::Steady, CursorVisualStyle::BlockCursorBlink) => {
                        CursorVisualStyle::BlockCursorSteady
                    }
                    (XtCBlink::Steady, CursorVisualStyle::UnderlineCursorBlink) => {
                        CursorVisualStyle::UnderlineCursorSteady
                    }
                    (XtCBlink::Steady, CursorVisualStyle::VerticalLineCursorBlink) => {
                        CursorVisualStyle::VerticalLineCursorSteady
                    }
                    (_, style) => style.clone(),
                };
            }
            Mode::XtExtscrn(XtExtscrn::Query) => {
                let report = XtExtscrn::Primary.report(None);
                self.report_mode(&report);
            }
            Mode::XtExtscrn(XtExtscrn::Alternate) => {
                debug!("Switching to alternate screen buffer");
                self.buffer.enter_alternate();
            }
            Mode::XtExtscrn(XtExtscrn::Primary) => {
                debug!("Switching to primary screen buffer");
                self.buffer.leave_alternate();
            }
            Mode::XtMseWin(XtMseWin::Query) => {
                self.report_mode(&self.modes.focus_reporting.report(None));
            }
            Mode::XtMseWin(XtMseWin::Enabled) => {
                self.modes.focus_reporting = XtMseWin::Enabled;
                let report = if self.window_focused { b"\x1b[I".to_vec() } else { b"\x1b[O".to_vec() };
                self.write_bytes(report);
            }
            Mode::XtMseWin(XtMseWin::Disabled) => self.modes.focus_reporting = XtMseWin::Disabled,
            Mode::MouseMode(MouseTrack::Query(v)) => {
                let is_set = if self.modes.mouse_tracking.mouse_mode_number() == *v {
                    SetMode::DecSet
                } else {
                    SetMode::DecRst
                };
                self.report_mode(&self.modes.mouse_tracking.report(Some(is_set)));
            }
            Mode::MouseMode(mouse_mode) => {
                if let MouseTrack::XtMsex10
                | MouseTrack::XtMseX11
                | MouseTrack::XtMseBtn
                | MouseTrack::NoTracking
                | MouseTrack::XtMseAny
                | MouseTrack::XtMseSgr = mouse_mode
                {
                    self.modes.mouse_tracking = mouse_mode.clone();
                } else {
                    warn!("Unhandled mouse mode: {mouse_mode}");
                }
            }
            Mode::SynchronizedUpdates(SynchronizedUpdates::Query) => {
                self.report_mode(&self.modes.synchronized_updates.report(None));
            }
            Mode::SynchronizedUpdates(sync) => self.modes.synchronized_updates = sync.clone(),
            Mode::LineFeedMode(Lnm::Query) => {
                self.report_mode(&self.modes.line_feed_mode.report(None));
            }
            Mode::LineFeedMode(lnm) => self.modes.line_feed_mode = lnm.clone(),
            Mode::Decarm(Decarm::Query) => {
                self.report_mode(&self.modes.repeat_keys.report(None));
            }
            Mode::Decarm(decarm) => self.modes.repeat_keys = decarm.clone(),
            Mode::UnknownQuery(m) => {
                let query = String::from_utf8(m.clone()).unwrap_or_else(|_| "<invalid utf8>".to_string());
                warn!("Querying unknown mode: {query}");
                self.report_mode(&mode.report(None));
            }
            _ => {
                // Every remaining variant (DECOM, DECCOLM, DECSCLM, reverse
                // wrap-around, allow-column-switch, grapheme clustering,
                // theming queries) is acknowledged but not actually applied.
                if let Mode::Unknown(m) = mode {
                    warn!("Unhandled mode: {m}");
                } else {
                    self.modes_fallback(mode);
                }
            }
        }
    }

    /// Handles the remaining DEC private modes that are recognized but have
    /// no effect on a headless buffer: they're reported back on query, and
    /// otherwise silently accepted.
    fn modes_fallback(&mut self, mode: &Mode) {
        use vtcore_common::buffer_states::modes::{
            allow_column_mode_switch::AllowColumnModeSwitch, decom::Decom,
            grapheme::GraphemeClustering, reverse_wrap_around::ReverseWrapAround,
        };

        match mode {
            Mode::Decom(Decom::Query) | Mode::Decom(_) => {
                if matches!(mode, Mode::Decom(Decom::Query)) {
                    self.report_mode(&Decom::Query.report(None));
                }
            }
            Mode::AllowColumnModeSwitch(AllowColumnModeSwitch::Query) => {
                self.report_mode(&AllowColumnModeSwitch::Query.report(None));
            }
            Mode::ReverseWrapAround(ReverseWrapAround::Query) => {
                self.report_mode(&self.modes.reverse_wrap_around.report(None));
            }
            Mode::ReverseWrapAround(wrap) => self.modes.reverse_wrap_around = wrap.clone(),
            Mode::GraphemeClustering(GraphemeClustering::Query) => {
                self.report_mode(&GraphemeClustering::Query.report(None));
            }
            Mode::Theming(Theming::Query) => {
                let set = match self.theme {
                    Theme::Light => SetMode::DecSet,
                    Theme::Dark => SetMode::DecRst,
                };
                self.report_mode(&Theming::Query.report(Some(set)));
            }
            _ => {}
        }
    }

    fn report_da(&self) {
        self.write_bytes(b"\x1b[?65;1;2;4;6;17;18;22c".to_vec());
    }

    fn osc_response(&mut self, osc: AnsiOscType) {
        match osc {
            AnsiOscType::NoOp => (),
            AnsiOscType::Url(UrlResponse::End) => self.style.url = None,
            AnsiOscType::Url(UrlResponse::Url(url)) => self.style.url = Some(url),
            AnsiOscType::RequestColorQueryBackground(AnsiOscInternalType::Query) => {
                self.write_bytes(b"\x1b]11;rgb:45/47/5a\x1b\\".to_vec());
            }
            AnsiOscType::RequestColorQueryForeground(AnsiOscInternalType::Query) => {
                self.write_bytes(b"\x1b]10;rgb:ff/ff/ff\x1b\\".to_vec());
            }
            AnsiOscType::RequestColorQueryBackground(_) | AnsiOscType::RequestColorQueryForeground(_) => {
                warn!("Unsupported OSC color query variant");
            }
            AnsiOscType::SetTitleBar(title) => {
                self.window_commands.push(WindowManipulation::SetTitleBarText(title));
            }
            AnsiOscType::Ftcs(value) => debug!("Ftcs is not supported: {value}"),
            AnsiOscType::RemoteHost(value) => debug!("Received remote host: {value}"),
            AnsiOscType::ResetCursorColor => {}
            AnsiOscType::ITerm2 => debug!("iTerm2 OSC codes are not supported"),
        }
    }

    fn report_cursor_position(&mut self) {
        let pos = self.buffer.get_cursor().pos;
        self.write_bytes(format!("\x1b[{};{}R", pos.y + 1, pos.x + 1).into_bytes());
    }

    pub fn report_window_state(&mut self, minimized: bool) {
        self.write_bytes(if minimized { b"\x1b[2t".to_vec() } else { b"\x1b[1t".to_vec() });
    }

    pub fn report_window_position(&mut self, x: usize, y: usize) {
        self.write_bytes(format!("\x1b[3;{x};{y}t").into_bytes());
    }

    pub fn report_window_size(&mut self, width: usize, height: usize) {
        self.write_bytes(format!("\x1b[4;{height};{width}t").into_bytes());
    }

    pub fn report_root_window_size(&mut self, width: usize, height: usize) {
        self.write_bytes(format!("\x1b[5;{height};{width}t").into_bytes());
    }

    pub fn report_character_size(&mut self, width: usize, height: usize) {
        self.write_bytes(format!("\x1b[6;{height};{width}t").into_bytes());
    }

    pub fn report_terminal_size_in_characters(&mut self, width: usize, height: usize) {
        self.write_bytes(format!("\x1b[8;{height};{width}t").into_bytes());
    }

    pub fn report_root_terminal_size_in_characters(&mut self, width: usize, height: usize) {
        self.write_bytes(format!("\x1b[9;{height};{width}t").into_bytes());
    }

    pub fn report_icon_label(&mut self, title: &str) {
        self.write_bytes(format!("\x1b]L{title}\x1b\\").into_bytes());
    }

    pub fn report_device_name_and_version(&mut self) {
        self.write_bytes(
            format!("\x1bP>|{} {}\x1b\\", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")).into_bytes(),
        );
    }

    pub fn report_title(&mut self, title: &str) {
        self.write_bytes(format!("\x1b]l{title}\x1b\\").into_bytes());
    }

    /// Applies one designated character set to the G-slot selected by the
    /// most recent designator prefix (`ESC ( / ) / * / +`).
    fn designate_pending(&mut self, charset: CharacterSet) {
        self.charset.designate(self.pending_charset_slot, charset);
    }

    fn handle_kitty(&mut self, body: &[u8]) {
        use crate::ansi_components::kitty::KittyGraphicsParser;

        let command = match KittyGraphicsParser::parse(body) {
            Ok(command) => command,
            Err(e) => {
                warn!("Malformed kitty graphics command: {e}");
                return;
            }
        };

        let pos = self.buffer.get_cursor().pos;
        match self.images.handle_command(
            &command,
            pos.y,
            pos.x,
            self.cell_width_px,
            self.cell_height_px,
            Some(self.width),
            Some(self.height),
        ) {
            Ok(KittyEvent::Placed(_) | KittyEvent::Deleted(_) | KittyEvent::None) => {}
            Err(e) => warn!("Kitty graphics command failed: {e}"),
        }
    }

    #[allow(clippy::too_many_lines)]
    pub fn handle_incoming_data(&mut self, incoming: &[u8]) {
        debug!("Executor: handling incoming data");
        #[cfg(debug_assertions)]
        let now = Instant::now();

        let mut incoming = self.leftover_data.take().map_or_else(
            || incoming.to_vec(),
            |leftover_data| {
                let mut new_data = Vec::with_capacity(leftover_data.len() + incoming.len());
                new_data.extend_from_slice(&leftover_data);
                new_data.extend_from_slice(incoming);
                new_data
            },
        );

        let mut leftover_bytes = vec![];
        while let Err(_e) = String::from_utf8(incoming.clone()) {
            let Some(p) = incoming.pop() else { break };
            leftover_bytes.insert(0, p);
        }

        if !leftover_bytes.is_empty() {
            match self.leftover_data {
                Some(ref mut self_leftover) => self_leftover.splice(0..0, leftover_bytes),
                None => self.leftover_data = Some(leftover_bytes),
            }
        }

        let parsed = self.parser.push(&incoming);

        for segment in parsed {
            match segment {
                TerminalOutput::Data(data) => self.handle_data(&data),
                TerminalOutput::SetCursorPos { x, y } => self.set_cursor_pos(x, y),
                TerminalOutput::SetCursorPosRel { x, y } => self.set_cursor_pos_rel(x, y),
                TerminalOutput::ClearDisplayfromCursortoEndofDisplay => {
                    self.buffer.erase_to_end_of_display();
                }
                TerminalOutput::ClearDisplayfromStartofDisplaytoCursor => {
                    self.buffer.erase_to_beginning_of_display();
                }
                TerminalOutput::ClearScrollbackandDisplay => {
                    self.buffer.erase_display();
                    self.buffer.erase_scrollback();
                }
                TerminalOutput::ClearDisplay => self.buffer.erase_display(),
                TerminalOutput::ClearLineForwards => self.buffer.erase_line_to_end(),
                TerminalOutput::ClearLineBackwards => self.buffer.erase_line_to_beginning(),
                TerminalOutput::ClearLine => self.buffer.erase_line(),
                TerminalOutput::CarriageReturn => self.buffer.handle_cr(),
                TerminalOutput::Newline => {
                    self.buffer.handle_lf();
                    if self.modes.line_feed_mode == Lnm::NewLine {
                        self.buffer.handle_cr();
                    }
                }
                TerminalOutput::Backspace => self.buffer.handle_backspace(),
                TerminalOutput::InsertLines(n) => self.buffer.insert_lines(n),
                TerminalOutput::Delete(n) => self.buffer.delete_chars(n),
                TerminalOutput::Erase(n) => self.buffer.erase_chars(n),
                TerminalOutput::Sgr(sgr) => self.sgr(sgr),
                TerminalOutput::Mode(mode) => self.set_mode(&mode),
                TerminalOutput::InsertSpaces(n) => self.buffer.insert_spaces(n),
                TerminalOutput::OscResponse(osc) => self.osc_response(osc),
                TerminalOutput::DecSpecialGraphics(replace) => self.character_replace = replace,
                TerminalOutput::CursorReport => self.report_cursor_position(),
                TerminalOutput::ApplicationKeypadMode => self.modes.cursor_key = Decckm::Application,
                TerminalOutput::NormalKeypadMode => self.modes.cursor_key = Decckm::Ansi,
                TerminalOutput::CursorVisualStyle(style) => self.cursor_visual_style = style,
                TerminalOutput::WindowManipulation(manip) => self.window_commands.push(manip),
                TerminalOutput::SetTopAndBottomMargins { top_margin, bottom_margin } => {
                    self.buffer.set_scroll_region(top_margin, bottom_margin);
                    self.set_cursor_pos(Some(1), Some(1));
                }
                TerminalOutput::RequestDeviceAttributes => self.report_da(),
                TerminalOutput::ScreenAlignmentTest => self.screen_alignment_test(),
                TerminalOutput::SaveCursor => {
                    self.saved_cursor = Some((self.buffer.get_cursor().pos, self.style.clone()));
                }
                TerminalOutput::RestoreCursor => {
                    if let Some((pos, style)) = self.saved_cursor.clone() {
                        self.buffer.set_cursor_pos(Some(pos.x + 1), Some(pos.y + 1));
                        self.style = style;
                        self.buffer.set_format(self.style.as_format_tag());
                    }
                }
                TerminalOutput::RequestDeviceNameAndVersion => self.report_device_name_and_version(),
                TerminalOutput::ApplicationProgramCommand(body) => self.handle_kitty(&body),
                TerminalOutput::DeviceControlString(body) => self.handle_kitty(&body),
                TerminalOutput::CharsetG0 => self.pending_charset_slot = GSlot::G0,
                TerminalOutput::CharsetG1 => self.pending_charset_slot = GSlot::G1,
                TerminalOutput::CharsetG2 => self.pending_charset_slot = GSlot::G2,
                TerminalOutput::CharsetG3 => self.pending_charset_slot = GSlot::G3,
                TerminalOutput::CharsetG1AsGR => self.charset.lock_gr(GSlot::G1),
                TerminalOutput::CharsetG2AsGR => self.charset.lock_gr(GSlot::G2),
                TerminalOutput::CharsetG3AsGR => self.charset.lock_gr(GSlot::G3),
                TerminalOutput::CharsetG2AsGL => self.charset.lock_gl(GSlot::G2),
                TerminalOutput::CharsetG3AsGL => self.charset.lock_gl(GSlot::G3),
                TerminalOutput::CharsetUK => self.designate_pending(CharacterSet::Uk),
                TerminalOutput::CharsetUS | TerminalOutput::CharsetUSASCII => {
                    self.designate_pending(CharacterSet::Ascii);
                }
                TerminalOutput::CharsetDutch => self.designate_pending(CharacterSet::Dutch),
                TerminalOutput::CharsetFinnish => self.designate_pending(CharacterSet::Finnish),
                TerminalOutput::CharsetFrench => self.designate_pending(CharacterSet::French),
                TerminalOutput::CharsetFrenchCanadian => {
                    self.designate_pending(CharacterSet::FrenchCanadian);
                }
                TerminalOutput::CharsetGerman => self.designate_pending(CharacterSet::German),
                TerminalOutput::CharsetItalian => self.designate_pending(CharacterSet::Italian),
                TerminalOutput::CharsetNorwegianDanish => {
                    self.designate_pending(CharacterSet::NorwegianDanish);
                }
                TerminalOutput::CharsetSpanish => self.designate_pending(CharacterSet::Spanish),
                TerminalOutput::CharsetSwedish => self.designate_pending(CharacterSet::Swedish),
                TerminalOutput::CharsetSwiss => self.designate_pending(CharacterSet::Swiss),
                TerminalOutput::DecSpecial => self.designate_pending(CharacterSet::DecSpecialGraphics),
                TerminalOutput::CharsetDefault | TerminalOutput::CharsetUTF8 => {
                    self.charset.reset();
                }
                TerminalOutput::CursorToLowerLeftCorner => {
                    let (_, height) = self.size();
                    self.buffer.set_cursor_pos(Some(1), Some(height));
                }
                TerminalOutput::ResetDevice => {
                    self.charset.reset();
                    self.reset_style();
                    self.modes = TerminalModes::default();
                }
                TerminalOutput::Skipped
                | TerminalOutput::Bell
                | TerminalOutput::Invalid
                | TerminalOutput::MemoryLock
                | TerminalOutput::MemoryUnlock
                | TerminalOutput::EightBitControl
                | TerminalOutput::SevenBitControl
                | TerminalOutput::AnsiConformanceLevelOne
                | TerminalOutput::AnsiConformanceLevelTwo
                | TerminalOutput::AnsiConformanceLevelThree
                | TerminalOutput::DoubleLineHeightTop
                | TerminalOutput::DoubleLineHeightBottom
                | TerminalOutput::SingleWidthLine
                | TerminalOutput::DoubleWidthLine
                | TerminalOutput::RequestSecondaryDeviceAttributes { .. }
                | TerminalOutput::RequestXtVersion => (),
            }
        }

        self.set_state_changed();

        #[cfg(debug_assertions)]
        {
            let elapsed = now.elapsed();
            if elapsed.as_millis() > 0 {
                debug!("Data processing time: {}ms", elapsed.as_millis());
            } else {
                debug!("Data processing time: {}μs", elapsed.as_micros());
            }
        }
    }
}

fn add_decoration(decorations: &mut Vec<FontDecorations>, decoration: FontDecorations) {
    if !decorations.contains(&decoration) {
        decorations.push(decoration);
    }
}

fn remove_decoration(decorations: &mut Vec<FontDecorations>, decoration: &FontDecorations) {
    decorations.retain(|d| d != decoration);
}
