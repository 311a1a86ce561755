// Copyright (C) 2024-2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::PathBuf;

use clap::Parser;

use crate::terminal_size::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Command-line arguments for the replay harness binary.
///
/// The harness feeds a file (or stdin, when no file is given) through the
/// emulator core and prints the resulting grid. It exists to exercise the
/// crate end to end without a GUI.
#[derive(Debug, Parser)]
#[command(
    name = "vtcore-cli",
    version,
    about = "Replay a VT/ANSI byte stream through the vtcore emulator core"
)]
pub struct Args {
    /// File containing the byte stream to replay. Reads stdin when omitted.
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Grid width in columns.
    #[arg(long, default_value_t = DEFAULT_WIDTH as usize)]
    pub cols: usize,

    /// Grid height in rows.
    #[arg(long, default_value_t = DEFAULT_HEIGHT as usize)]
    pub rows: usize,

    /// Explicit config file, bypassing the layered system/user/env lookup.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug-level logging for every crate, not just vtcore.
    #[arg(long)]
    pub show_all_debug: bool,
}
