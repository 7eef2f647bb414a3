use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::NaiveDate;
use image::{ImageOutputFormat, RgbaImage};
use std::io::Cursor;

use crate::canvas::raster::CanvasSnapshot;

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";
pub const DOWNLOAD_FILE_PREFIX: &str = "math-note";

pub fn encode_png(snapshot: &CanvasSnapshot) -> Result<Vec<u8>> {
    if snapshot.is_empty() {
        return Err(anyhow!(
            "cannot encode a {}x{} canvas",
            snapshot.width(),
            snapshot.height()
        ));
    }
    let image = RgbaImage::from_raw(
        snapshot.width(),
        snapshot.height(),
        snapshot.rgba_pixels().to_vec(),
    )
    .ok_or_else(|| anyhow!("pixel buffer does not match canvas size"))?;

    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .context("encode canvas as png")?;
    Ok(bytes)
}

pub fn to_data_url(png: &[u8]) -> String {
    format!("{PNG_DATA_URL_PREFIX}{}", general_purpose::STANDARD.encode(png))
}

/// Reverses [`to_data_url`].
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let encoded = data_url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or_else(|| anyhow!("not a png data url"))?;
    general_purpose::STANDARD
        .decode(encoded)
        .context("decode base64 payload")
}

pub fn download_file_name(date: NaiveDate) -> String {
    format!("{DOWNLOAD_FILE_PREFIX}-{}.png", date.format("%Y-%m-%d"))
}
