// Copyright (C) 2024-2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Kitty graphics protocol: parsing of the `key=value,...;payload` body
//! carried by an Application Program Command, plus the image store that
//! assembles chunked transmissions and tracks placements on the grid.

use std::collections::HashMap;
use std::io::Read;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use flate2::read::ZlibDecoder;
use thiserror::Error;

const DEFAULT_CELL_WIDTH_PX: u32 = 10;
const DEFAULT_CELL_HEIGHT_PX: u32 = 20;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
#[error(transparent)]
pub enum KittyError {
    #[error("malformed kitty graphics command: {0}")]
    Malformed(String),
    #[error("unsupported transmission medium: {0:?}")]
    UnsupportedMedium(Medium),
    #[error("unsupported pixel format: {0}")]
    UnsupportedFormat(u32),
    #[error("raw pixel transmission is missing explicit width/height")]
    MissingDimensions,
    #[error("transmission payload is shorter than its declared dimensions")]
    TruncatedPayload,
    #[error("payload is not valid base64: {0}")]
    InvalidBase64(String),
    #[error("zlib decompression failed: {0}")]
    InvalidCompression(String),
    #[error("image decode failed: {0}")]
    DecodeFailed(String),
    #[error("display command references unknown image id {0}")]
    UnknownImage(u32),
    #[error("display command is missing an image id")]
    MissingImageId,
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum KittyAction {
    Transmit,
    Display,
    Delete,
}

#[derive(Debug, Eq, PartialEq, Clone, Copy, Default)]
pub enum Compression {
    #[default]
    None,
    Zlib,
}

#[derive(Debug, Eq, PartialEq, Clone, Copy, Default)]
pub enum Medium {
    #[default]
    Direct,
    File,
    TempFile,
    SharedMemory,
}

/// One parsed `a=...,i=...,...;payload` Kitty graphics command.
#[derive(Debug, Clone, Default)]
pub struct KittyCommand {
    pub action: Option<KittyAction>,
    pub image_id: Option<u32>,
    pub placement_id: Option<u32>,
    pub format: Option<u32>,
    pub pixel_width: Option<u32>,
    pub pixel_height: Option<u32>,
    pub source_x: Option<u32>,
    pub source_y: Option<u32>,
    pub source_width: Option<u32>,
    pub source_height: Option<u32>,
    pub cell_columns: Option<u32>,
    pub cell_rows: Option<u32>,
    pub more: bool,
    pub compression: Compression,
    pub medium: Medium,
    pub z_index: Option<i32>,
    pub unicode_placeholder: Option<u32>,
    pub payload: Vec<u8>,
}

/// Parses the APC body of a Kitty graphics sequence (everything between
/// `ESC _ G` and the terminating `ESC \`) into a [`KittyCommand`].
pub struct KittyGraphicsParser;

impl KittyGraphicsParser {
    /// # Errors
    /// Returns [`KittyError::Malformed`] if a key has no `=value`, the
    /// action letter is unrecognised, or the header is not valid UTF-8.
    pub fn parse(body: &[u8]) -> Result<KittyCommand, KittyError> {
        let split_at = body.iter().position(|&b| b == b';');
        let (header, payload) = match split_at {
            Some(idx) => (&body[..idx], &body[idx + 1..]),
            None => (body, &body[body.len()..]),
        };

        let header = std::str::from_utf8(header)
            .map_err(|e| KittyError::Malformed(format!("header is not utf8: {e}")))?;
        // The APC payload begins with a literal `G` marker glued directly onto
        // the first key, e.g. `Ga=t,i=1`, not a comma-separated token of its own.
        let header = header.strip_prefix('G').unwrap_or(header);

        let mut cmd = KittyCommand {
            payload: payload.to_vec(),
            ..KittyCommand::default()
        };

        for pair in header.split(',') {
            if pair.is_empty() {
                continue;
            }
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or_default();
            let value = parts.next().ok_or_else(|| {
                KittyError::Malformed(format!("key `{key}` has no value"))
            })?;

            match key {
                "a" => cmd.action = Some(parse_action(value)?),
                "i" => cmd.image_id = value.parse().ok(),
                "p" => cmd.placement_id = value.parse().ok(),
                "f" => cmd.format = value.parse().ok(),
                "s" => cmd.pixel_width = value.parse().ok(),
                "v" => cmd.pixel_height = value.parse().ok(),
                "x" => cmd.source_x = value.parse().ok(),
                "y" => cmd.source_y = value.parse().ok(),
                "w" => cmd.source_width = value.parse().ok(),
                "h" => cmd.source_height = value.parse().ok(),
                "c" => cmd.cell_columns = value.parse().ok(),
                "r" => cmd.cell_rows = value.parse().ok(),
                "m" => cmd.more = value == "1",
                "o" => cmd.compression = if value == "z" { Compression::Zlib } else { Compression::None },
                "t" => cmd.medium = parse_medium(value),
                "z" => cmd.z_index = value.parse().ok(),
                "U" => cmd.unicode_placeholder = value.parse().ok(),
                _ => {}
            }
        }

        Ok(cmd)
    }
}

fn parse_action(value: &str) -> Result<KittyAction, KittyError> {
    match value {
        "t" => Ok(KittyAction::Transmit),
        "d" => Ok(KittyAction::Display),
        "D" => Ok(KittyAction::Delete),
        other => Err(KittyError::Malformed(format!("unknown action `{other}`"))),
    }
}

const fn parse_medium(value: &str) -> Medium {
    match value.as_bytes() {
        [b'f'] => Medium::File,
        [b't'] => Medium::TempFile,
        [b's'] => Medium::SharedMemory,
        _ => Medium::Direct,
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Rgb,
    Rgba,
}

#[derive(Debug, Clone)]
pub struct ImageData {
    pub id: u32,
    pub pixels: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
    pub format: ImageFormat,
    pub has_alpha: bool,
}

#[derive(Debug, Clone)]
pub struct ImagePlacement {
    pub placement_id: u32,
    pub image_id: u32,
    pub row: usize,
    pub col: usize,
    pub width_cells: u32,
    pub height_cells: u32,
    pub source_x: Option<u32>,
    pub source_y: Option<u32>,
    pub source_width: Option<u32>,
    pub source_height: Option<u32>,
    pub z_index: Option<i32>,
    pub unicode_placeholder: Option<u32>,
}

#[derive(Debug, Clone, Default)]
struct TransmissionState {
    chunks: Vec<u8>,
    format: Option<u32>,
    compression: Compression,
    pixel_width: Option<u32>,
    pixel_height: Option<u32>,
}

#[derive(Debug, Clone)]
pub enum KittyEvent {
    Placed(ImagePlacement),
    Deleted(Vec<u32>),
    None,
}

/// Owns decoded image bitmaps and their placements on the grid. Counters
/// for auto-generated ids are monotonic and only ever move forward, even
/// when the peer supplies its own ids out of order.
#[derive(Debug, Default)]
pub struct ImageManager {
    images: HashMap<u32, ImageData>,
    placements: HashMap<u32, ImagePlacement>,
    transmissions: HashMap<u32, TransmissionState>,
    next_image_id: u32,
    next_placement_id: u32,
}

impl ImageManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
            placements: HashMap::new(),
            transmissions: HashMap::new(),
            next_image_id: 1,
            next_placement_id: 1,
        }
    }

    pub fn generate_image_id(&mut self) -> u32 {
        let id = self.next_image_id;
        self.next_image_id = self.next_image_id.saturating_add(1);
        id
    }

    pub fn generate_placement_id(&mut self) -> u32 {
        let id = self.next_placement_id;
        self.next_placement_id = self.next_placement_id.saturating_add(1);
        id
    }

    fn reserve_image_id(&mut self, id: u32) {
        self.next_image_id = self.next_image_id.max(id.saturating_add(1));
    }

    fn reserve_placement_id(&mut self, id: u32) {
        self.next_placement_id = self.next_placement_id.max(id.saturating_add(1));
    }

    /// Insert or replace an image's data without disturbing the id counter
    /// beyond advancing it past the supplied id.
    pub fn store_image(&mut self, image: ImageData) {
        self.reserve_image_id(image.id);
        self.images.insert(image.id, image);
    }

    #[must_use]
    pub fn image(&self, id: u32) -> Option<&ImageData> {
        self.images.get(&id)
    }

    #[must_use]
    pub fn placement(&self, id: u32) -> Option<&ImagePlacement> {
        self.placements.get(&id)
    }

    /// Apply a parsed command, mutating image/placement state as needed.
    ///
    /// # Errors
    /// See [`KittyError`] variants.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_command(
        &mut self,
        cmd: &KittyCommand,
        cursor_row: usize,
        cursor_col: usize,
        cell_width_px: u32,
        cell_height_px: u32,
        screen_cols: Option<usize>,
        screen_rows: Option<usize>,
    ) -> Result<KittyEvent, KittyError> {
        match cmd.action {
            Some(KittyAction::Transmit) => {
                self.handle_transmit(cmd)?;
                Ok(KittyEvent::None)
            }
            Some(KittyAction::Display) => {
                let placement = self.handle_display(
                    cmd,
                    cursor_row,
                    cursor_col,
                    cell_width_px,
                    cell_height_px,
                    screen_cols,
                    screen_rows,
                )?;
                Ok(KittyEvent::Placed(placement))
            }
            Some(KittyAction::Delete) => Ok(KittyEvent::Deleted(self.handle_delete(cmd))),
            None => Ok(KittyEvent::None),
        }
    }

    fn handle_transmit(&mut self, cmd: &KittyCommand) -> Result<(), KittyError> {
        if cmd.medium != Medium::Direct {
            return Err(KittyError::UnsupportedMedium(cmd.medium));
        }

        let image_id = cmd.image_id.unwrap_or_else(|| self.generate_image_id());
        self.reserve_image_id(image_id);

        let state = self.transmissions.entry(image_id).or_default();
        state.chunks.extend_from_slice(&cmd.payload);
        if cmd.format.is_some() {
            state.format = cmd.format;
        }
        if cmd.compression != Compression::None {
            state.compression = cmd.compression;
        }
        if cmd.pixel_width.is_some() {
            state.pixel_width = cmd.pixel_width;
        }
        if cmd.pixel_height.is_some() {
            state.pixel_height = cmd.pixel_height;
        }

        if cmd.more {
            return Ok(());
        }

        let state = self.transmissions.remove(&image_id).unwrap_or_default();
        let raw = BASE64
            .decode(&state.chunks)
            .map_err(|e| KittyError::InvalidBase64(e.to_string()))?;

        let decompressed = if state.compression == Compression::Zlib {
            let mut decoder = ZlibDecoder::new(&raw[..]);
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|e| KittyError::InvalidCompression(e.to_string()))?;
            out
        } else {
            raw
        };

        let image = decode_image(
            image_id,
            state.format,
            state.pixel_width,
            state.pixel_height,
            &decompressed,
        )?;
        self.images.insert(image_id, image);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_display(
        &mut self,
        cmd: &KittyCommand,
        cursor_row: usize,
        cursor_col: usize,
        cell_width_px: u32,
        cell_height_px: u32,
        screen_cols: Option<usize>,
        screen_rows: Option<usize>,
    ) -> Result<ImagePlacement, KittyError> {
        let image_id = cmd.image_id.ok_or(KittyError::MissingImageId)?;
        let image = self
            .images
            .get(&image_id)
            .ok_or(KittyError::UnknownImage(image_id))?;

        let cell_w = if cell_width_px == 0 { DEFAULT_CELL_WIDTH_PX } else { cell_width_px };
        let cell_h = if cell_height_px == 0 { DEFAULT_CELL_HEIGHT_PX } else { cell_height_px };

        let (mut width_cells, mut height_cells) = match (cmd.cell_columns, cmd.cell_rows) {
            (Some(c), Some(r)) => (c, r),
            _ => {
                let (px_w, px_h) = match (cmd.source_width, cmd.source_height) {
                    (Some(w), Some(h)) => (w, h),
                    _ => (image.width_px, image.height_px),
                };
                (ceil_div(px_w, cell_w), ceil_div(px_h, cell_h))
            }
        };

        let row = cursor_row;
        let col = cursor_col;

        if let Some(cols) = screen_cols {
            let max_width = u32::try_from(cols.saturating_sub(col)).unwrap_or(0);
            width_cells = if col >= cols { 0 } else { width_cells.min(max_width) };
        }
        if let Some(rows) = screen_rows {
            let max_height = u32::try_from(rows.saturating_sub(row)).unwrap_or(0);
            height_cells = if row >= rows { 0 } else { height_cells.min(max_height) };
        }

        let placement_id = cmd.placement_id.unwrap_or_else(|| self.generate_placement_id());
        self.reserve_placement_id(placement_id);

        let placement = ImagePlacement {
            placement_id,
            image_id,
            row,
            col,
            width_cells,
            height_cells,
            source_x: cmd.source_x,
            source_y: cmd.source_y,
            source_width: cmd.source_width,
            source_height: cmd.source_height,
            z_index: cmd.z_index,
            unicode_placeholder: cmd.unicode_placeholder,
        };

        self.placements.insert(placement_id, placement.clone());
        Ok(placement)
    }

    fn handle_delete(&mut self, cmd: &KittyCommand) -> Vec<u32> {
        if let Some(placement_id) = cmd.placement_id {
            return if self.placements.remove(&placement_id).is_some() {
                vec![placement_id]
            } else {
                Vec::new()
            };
        }

        if let Some(image_id) = cmd.image_id {
            self.images.remove(&image_id);
            let removed: Vec<u32> = self
                .placements
                .iter()
                .filter(|(_, p)| p.image_id == image_id)
                .map(|(id, _)| *id)
                .collect();
            for id in &removed {
                self.placements.remove(id);
            }
            return removed;
        }

        Vec::new()
    }

    /// Release every decoded bitmap and placement. Called when the
    /// terminal instance is torn down.
    pub fn dispose(&mut self) {
        self.images.clear();
        self.placements.clear();
        self.transmissions.clear();
    }
}

const fn ceil_div(a: u32, b: u32) -> u32 {
    if b == 0 { 0 } else { (a + b - 1) / b }
}

fn decode_image(
    id: u32,
    format: Option<u32>,
    pixel_width: Option<u32>,
    pixel_height: Option<u32>,
    data: &[u8],
) -> Result<ImageData, KittyError> {
    match format {
        Some(24) => decode_raw(id, pixel_width, pixel_height, data, 3, ImageFormat::Rgb, false),
        Some(32) => decode_raw(id, pixel_width, pixel_height, data, 4, ImageFormat::Rgba, true),
        Some(100) | None => decode_encoded(id, data, image::ImageFormat::Png, ImageFormat::Png),
        Some(101) => decode_encoded(id, data, image::ImageFormat::Jpeg, ImageFormat::Jpeg),
        Some(102) => decode_encoded(id, data, image::ImageFormat::Gif, ImageFormat::Gif),
        Some(other) => Err(KittyError::UnsupportedFormat(other)),
    }
}

fn decode_raw(
    id: u32,
    pixel_width: Option<u32>,
    pixel_height: Option<u32>,
    data: &[u8],
    bytes_per_pixel: usize,
    format: ImageFormat,
    has_alpha: bool,
) -> Result<ImageData, KittyError> {
    let width = pixel_width.ok_or(KittyError::MissingDimensions)?;
    let height = pixel_height.ok_or(KittyError::MissingDimensions)?;

    let expected = (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(bytes_per_pixel);
    if data.len() < expected {
        return Err(KittyError::TruncatedPayload);
    }

    let pixels = if has_alpha {
        data[..expected].to_vec()
    } else {
        let mut out = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for chunk in data[..expected].chunks_exact(3) {
            out.extend_from_slice(&[chunk[0], chunk[1], chunk[2], 255]);
        }
        out
    };

    Ok(ImageData {
        id,
        pixels,
        width_px: width,
        height_px: height,
        format,
        has_alpha,
    })
}

fn decode_encoded(
    id: u32,
    data: &[u8],
    wire_format: image::ImageFormat,
    format: ImageFormat,
) -> Result<ImageData, KittyError> {
    let decoded = image::load_from_memory_with_format(data, wire_format)
        .map_err(|e| KittyError::DecodeFailed(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (width_px, height_px) = rgba.dimensions();

    Ok(ImageData {
        id,
        pixels: rgba.into_raw(),
        width_px,
        height_px,
        format,
        has_alpha: true,
    })
}
