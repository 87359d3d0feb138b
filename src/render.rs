use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

use ab_glyph::{Font, FontRef, ScaleFont};
use image::{Rgb, RgbImage};
use log::debug;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};

use crate::config::{CANVAS_HEIGHT, CANVAS_WIDTH, TEXT_COLOR};
use crate::domain::Readings;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn blank() -> Canvas {
        Canvas {
            image: RgbImage::new(CANVAS_WIDTH, CANVAS_HEIGHT),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }

    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, &Rgb<u8>)> {
        self.image.enumerate_pixels()
    }

    /// Binary PPM with magic, size and maxval each on their own line.
    /// The led-matrix driver reads the header line by line and rejects anything else.
    pub fn to_ppm(&self) -> Vec<u8> {
        let (width, height) = self.dimensions();
        let header = format!("P6\n{} {}\n255\n", width, height);

        let mut bytes = Vec::with_capacity(header.len() + self.image.as_raw().len());
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(self.image.as_raw());

        bytes
    }
}

fn draw_error(error: impl std::fmt::Display) -> Error {
    Error::Draw { reason: error.to_string() }
}

// plotters keeps registered fonts for the life of the process, so each file is read and leaked once
fn font_bytes(path: &Path) -> Result<&'static [u8]> {
    static LOADED: OnceLock<Mutex<HashMap<PathBuf, &'static [u8]>>> = OnceLock::new();

    let mut loaded = LOADED
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    if let Some(bytes) = loaded.get(path) {
        return Ok(*bytes);
    }

    let bytes = fs::read(path).map_err(|source| Error::Font {
        path: path.to_path_buf(),
        source,
    })?;
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    loaded.insert(path.to_path_buf(), bytes);

    Ok(bytes)
}

pub struct Renderer {
    family: String,
    scale: f32,
    baseline: i32,
    color: RGBColor,
}

impl Renderer {
    pub fn load(path: &Path, size: f32) -> Result<Renderer> {
        let bytes = font_bytes(path)?;
        let invalid = || Error::InvalidFont { path: PathBuf::from(path) };

        let font = FontRef::try_from_slice(bytes).map_err(|_| invalid())?;
        let units_per_em = font.units_per_em().ok_or_else(invalid)?;
        // size is an em size, plotters wants a height scale
        let scale = size * font.height_unscaled() / units_per_em;
        // plotters puts the baseline half a scale below the anchor
        let baseline = (font.as_scaled(scale).ascent() - scale / 2.0).round() as i32;

        let family = path.to_string_lossy().into_owned();
        register_font(&family, FontStyle::Normal, bytes).map_err(|_| invalid())?;

        debug!("Loaded {} at scale {:.2}, baseline offset {}", family, scale, baseline);

        Ok(Renderer {
            family,
            scale,
            baseline,
            color: RGBColor(TEXT_COLOR.0, TEXT_COLOR.1, TEXT_COLOR.2),
        })
    }

    pub fn render(&self, readings: &Readings) -> Result<Canvas> {
        let lines = readings.lines();

        self.draw_lines(lines.iter().map(|(line, row)| (line.as_str(), *row)))
    }

    pub fn draw_lines<'a>(&self, lines: impl IntoIterator<Item = (&'a str, i32)>) -> Result<Canvas> {
        let mut canvas = Canvas::blank();
        let (width, height) = canvas.dimensions();

        {
            let output = BitMapBackend::with_buffer(&mut canvas.image, (width, height))
                .into_drawing_area();

            output.fill(&BLACK).map_err(draw_error)?;

            let style = (self.family.as_str(), f64::from(self.scale))
                .into_font()
                .color(&self.color);

            for (line, row) in lines {
                output
                    .draw_text(line, &style, (0, row + self.baseline))
                    .map_err(draw_error)?;
            }

            output.present().map_err(draw_error)?;
        }

        Ok(canvas)
    }
}
