// Copyright (C) 2024-2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Binds an [`Executor`] to an external byte pipe. The Controller owns no
//! parsing or screen-mutation logic of its own: it forwards inbound bytes
//! into the executor, drains the executor's outbound replies, and encodes
//! key presses via [`KeyEncoder`] using the executor's current mode state.

use std::ops::Range;

use crossbeam_channel::{Receiver, Sender};

use vtcore_common::{
    buffer_states::modes::decckm::Decckm,
    terminal_size::{DEFAULT_HEIGHT, DEFAULT_WIDTH},
};

use crate::{
    io::OutboundEvent,
    key_encoder::{KeyEncoder, KeyEvent},
    state::internal::Executor,
};

pub struct Controller {
    executor: Executor,
    outbound_rx: Receiver<OutboundEvent>,
    sink: Sender<OutboundEvent>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH as usize, DEFAULT_HEIGHT as usize)
    }
}

impl Controller {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            executor: Executor::new(width, height, tx.clone()),
            outbound_rx: rx,
            sink: tx,
        }
    }

    #[must_use]
    pub const fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut Executor {
        &mut self.executor
    }

    /// Feed a chunk of bytes read from the external pipe into the emulator.
    pub fn write(&mut self, bytes: &[u8]) {
        self.executor.handle_incoming_data(bytes);
    }

    /// Encode a key event under the executor's current mode state and send
    /// the resulting bytes out through the same sink the executor reports
    /// on, so a caller sees both in the order they were produced.
    pub fn send_key(&mut self, event: &KeyEvent) {
        let decckm_mode = self.executor.get_cursor_key_mode() == Decckm::Application;
        let keypad_application_mode = self.executor.is_keypad_application_mode();

        if let Some(bytes) = KeyEncoder::encode(event, decckm_mode, keypad_application_mode) {
            if let Err(e) = self.sink.send(OutboundEvent::Write(bytes)) {
                error!("Failed to send encoded key bytes: {e}");
            }
        }
    }

    /// Resize the grid and notify whatever owns the other end of the pipe.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.executor.set_size(width, height);

        if let Err(e) = self.sink.send(OutboundEvent::Resize(crate::io::TerminalResize {
            width,
            height,
            pixel_width: 0,
            pixel_height: 0,
        })) {
            error!("Failed to send resize notification: {e}");
        }
    }

    /// Drain a single outbound event without blocking, or `None` if nothing
    /// is pending.
    pub fn try_recv_outbound(&self) -> Option<OutboundEvent> {
        self.outbound_rx.try_recv().ok()
    }

    /// Concatenate the on-screen text within `row_range` (relative to the
    /// visible viewport) and `col_range` (applied to every row), trimming
    /// trailing default cells from each row. Intended for copy/paste.
    #[must_use]
    pub fn selection_text(&self, row_range: Range<usize>, col_range: Range<usize>) -> String {
        let rows = self.executor.buffer.visible_rows();
        let mut lines = Vec::with_capacity(row_range.len());

        for row_idx in row_range {
            let Some(row) = rows.get(row_idx) else {
                continue;
            };

            let end_col = col_range.end.min(row.max_width());
            if col_range.start >= end_col {
                lines.push(String::new());
                continue;
            }

            let mut line = String::new();
            for col in col_range.start..end_col {
                let cell = row.resolve_cell(col);
                if cell.is_continuation() {
                    continue;
                }
                line.push_str(&cell.into_utf8());
            }

            while line.ends_with(' ') {
                line.pop();
            }

            lines.push(line);
        }

        lines.join("\n")
    }
}
