//! Accent ("spine") color sampling.
//!
//! Given a cover image, produce one representative color for adjacent UI
//! decoration. The sampling is intentionally the cheapest correct average:
//! a single box-filter pass over every pixel, no histogram or quantization.
//! Extraction never fails from the caller's point of view; anything that goes
//! wrong resolves to [`FALLBACK_COLOR`], because the value is cosmetic and
//! must not block an upload flow.

use std::fmt;

use anyhow::{Context, bail};

/// Neutral brown used whenever an image cannot be fetched, decoded or read.
pub const FALLBACK_COLOR: AccentColor = AccentColor {
    red: 0x8b,
    green: 0x45,
    blue: 0x13,
};

/// An immutable RGB value. The canonical external form is the 7-character
/// lowercase `#rrggbb` string produced by [`AccentColor::to_hex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccentColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl AccentColor {
    /// Lowercase `#rrggbb`, always 7 characters, two zero-padded hex digits
    /// per channel.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Input to extraction. Callers are not required to pre-decode: encoded bytes
/// and fetchable URLs are handled internally, while `Pixels` lets a caller
/// (or a test) hand over an already decoded RGBA8 buffer.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Encoded image bytes (PNG, JPEG, ...).
    Bytes(Vec<u8>),
    /// A URL the extractor fetches itself.
    Url(String),
    /// Raw RGBA8 pixel data, row-major, `rgba.len() == width * height * 4`.
    Pixels {
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    },
}

#[derive(Debug, Clone)]
pub struct AccentColorExtractor {
    http: reqwest::Client,
}

impl Default for AccentColorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl AccentColorExtractor {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Resolve `source` to its average color.
    ///
    /// Never returns an error: fetch failures, undecodable data, zero-size
    /// images and malformed pixel buffers all yield [`FALLBACK_COLOR`]. The
    /// swallowed cause is logged at `warn`.
    #[tracing::instrument(level = "debug", skip(self, source))]
    pub async fn extract_color(&self, source: ImageSource) -> AccentColor {
        match self.try_extract(source).await {
            Ok(color) => color,
            Err(e) => {
                tracing::warn!(error = %e, fallback = %FALLBACK_COLOR, "accent extraction failed");
                FALLBACK_COLOR
            }
        }
    }

    async fn try_extract(&self, source: ImageSource) -> anyhow::Result<AccentColor> {
        let (width, height, rgba) = match source {
            ImageSource::Pixels {
                width,
                height,
                rgba,
            } => (width, height, rgba),
            ImageSource::Bytes(bytes) => decode(&bytes)?,
            ImageSource::Url(url) => {
                let bytes = self.fetch(&url).await?;
                decode(&bytes)?
            }
        };
        average(width, height, &rgba)
    }

    async fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        tracing::debug!(%url, "GET image");
        let resp = self.http.get(url).send().await?;
        let resp = resp.error_for_status()?;
        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }
}

fn decode(bytes: &[u8]) -> anyhow::Result<(u32, u32, Vec<u8>)> {
    let img = image::load_from_memory(bytes).context("failed to decode image")?;
    let rgba = img.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());
    Ok((width, height, rgba.into_raw()))
}

/// Area-average of every pixel's R, G and B channels; alpha is ignored.
/// Each channel is rounded half up to the nearest integer in [0, 255], so
/// averaging a constant field reproduces the constant exactly and repeated
/// runs over the same bytes are deterministic.
fn average(width: u32, height: u32, rgba: &[u8]) -> anyhow::Result<AccentColor> {
    let count = width as u64 * height as u64;
    if count == 0 {
        bail!("image has zero pixels");
    }
    let expected_len = count
        .checked_mul(4)
        .with_context(|| format!("{}x{} overflows an RGBA buffer length", width, height))?;
    if rgba.len() as u64 != expected_len {
        bail!(
            "pixel buffer length {} does not match {}x{} RGBA",
            rgba.len(),
            width,
            height
        );
    }

    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for px in rgba.chunks_exact(4) {
        r += px[0] as u64;
        g += px[1] as u64;
        b += px[2] as u64;
    }

    // Round half up: (2 * sum + n) / (2 * n).
    let channel = |sum: u64| ((2 * sum + count) / (2 * count)) as u8;
    Ok(AccentColor {
        red: channel(r),
        green: channel(g),
        blue: channel(b),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> ImageSource {
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            rgba.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 0xff]);
        }
        ImageSource::Pixels {
            width,
            height,
            rgba,
        }
    }

    #[tokio::test]
    async fn uniform_image_yields_exact_color() {
        let extractor = AccentColorExtractor::new();
        let color = extractor.extract_color(solid(3, 2, [0x0c, 0xc8, 0x07])).await;
        assert_eq!(color.to_hex(), "#0cc807");
    }

    #[tokio::test]
    async fn two_pixel_average_rounds_half_up() {
        let extractor = AccentColorExtractor::new();
        // (255,0,0) and (0,255,0): both R and G average to 127.5.
        let source = ImageSource::Pixels {
            width: 2,
            height: 1,
            rgba: vec![255, 0, 0, 255, 0, 255, 0, 255],
        };
        let color = extractor.extract_color(source).await;
        assert_eq!(color.to_hex(), "#808000");
    }

    #[tokio::test]
    async fn alpha_channel_is_ignored() {
        let extractor = AccentColorExtractor::new();
        let source = ImageSource::Pixels {
            width: 2,
            height: 1,
            rgba: vec![10, 20, 30, 0, 10, 20, 30, 255],
        };
        let color = extractor.extract_color(source).await;
        assert_eq!(
            color,
            AccentColor {
                red: 10,
                green: 20,
                blue: 30
            }
        );
    }

    #[tokio::test]
    async fn undecodable_bytes_fall_back() {
        let extractor = AccentColorExtractor::new();
        let color = extractor
            .extract_color(ImageSource::Bytes(b"not an image".to_vec()))
            .await;
        assert_eq!(color, FALLBACK_COLOR);
        assert_eq!(color.to_hex(), "#8b4513");
    }

    #[tokio::test]
    async fn zero_size_pixel_data_falls_back() {
        let extractor = AccentColorExtractor::new();
        let source = ImageSource::Pixels {
            width: 0,
            height: 0,
            rgba: vec![],
        };
        assert_eq!(extractor.extract_color(source).await, FALLBACK_COLOR);
    }

    #[tokio::test]
    async fn overflowing_dimensions_fall_back() {
        let extractor = AccentColorExtractor::new();
        // Declared dimensions whose RGBA byte length exceeds u64 must degrade,
        // not panic or slip past the length check.
        for (width, height) in [(u32::MAX, u32::MAX), (1 << 31, 1 << 31)] {
            let source = ImageSource::Pixels {
                width,
                height,
                rgba: vec![],
            };
            assert_eq!(extractor.extract_color(source).await, FALLBACK_COLOR);
        }
    }

    #[tokio::test]
    async fn truncated_pixel_buffer_falls_back() {
        let extractor = AccentColorExtractor::new();
        let source = ImageSource::Pixels {
            width: 2,
            height: 2,
            rgba: vec![1, 2, 3, 4],
        };
        assert_eq!(extractor.extract_color(source).await, FALLBACK_COLOR);
    }

    #[tokio::test]
    async fn extraction_is_deterministic() {
        let extractor = AccentColorExtractor::new();
        let png = encode_png(4, 3, [200, 100, 50]);
        let a = extractor
            .extract_color(ImageSource::Bytes(png.clone()))
            .await;
        let b = extractor.extract_color(ImageSource::Bytes(png)).await;
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), "#c86432");
    }

    fn encode_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn hex_is_zero_padded_and_lowercase() {
        let c = AccentColor {
            red: 0x00,
            green: 0x0a,
            blue: 0xff,
        };
        assert_eq!(c.to_hex(), "#000aff");
        assert_eq!(c.to_hex().len(), 7);
    }
}
