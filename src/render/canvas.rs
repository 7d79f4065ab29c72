use std::{fmt::Display, fs::File, io::Write};

use clap::ValueEnum;
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;

use crate::math::color::Color;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ImageFormat {
    Ppm,
    Png,
}

impl Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageFormat::Ppm => write!(f, "ppm"),
            ImageFormat::Png => write!(f, "png"),
        }
    }
}

/// Destination for finished 8-bit RGB pixels, such as a window surface.
pub trait FrameBuffer {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn write_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]);
    /// Called once after every pixel of a frame was written.
    fn present(&mut self);
}

/// Tightly packed row-major RGB bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbBuffer {
    width: usize,
    height: usize,
    bytes: Vec<u8>,
}

impl RgbBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bytes: vec![0; width * height * 3],
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl FrameBuffer for RgbBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn write_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let start = (self.width * y + x) * 3;
        self.bytes[start..start + 3].copy_from_slice(&rgb);
    }

    fn present(&mut self) {}
}

#[derive(Debug, Clone)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Canvas {
    pub fn with_color(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; height * width],
        }
    }

    pub fn new(width: usize, height: usize) -> Self {
        Self::with_color(width, height, Color::black())
    }

    fn index(&self, x: usize, y: usize) -> usize {
        self.width * y + x
    }

    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn pixel_at(&self, x: usize, y: usize) -> Color {
        self.pixels[self.index(x, y)]
    }
    pub fn write_pixel(&mut self, x: usize, y: usize, new_color: Color) {
        let id = self.index(x, y);
        self.pixels[id] = new_color;
    }

    /// Evaluates `fun` for every pixel in parallel, each worker owning a disjoint entry.
    pub fn set_each_pixel<F>(&mut self, fun: F, progressbar: indicatif::ProgressBar)
    where
        F: Fn(usize, usize) -> Color + std::marker::Sync,
    {
        let width = self.width;

        self.pixels
            .par_iter_mut()
            .enumerate()
            .progress_with(progressbar)
            .for_each(|(id, pixel_color)| {
                let x = id % width;
                let y = id / width;
                *pixel_color = fun(x, y);
            })
    }

    /// Copies the canvas into `target` and presents it once.
    /// Pixels outside the target's bounds are skipped.
    pub fn blit<B: FrameBuffer + ?Sized>(&self, target: &mut B) {
        let width = self.width.min(target.width());
        let height = self.height.min(target.height());

        for y in 0..height {
            for x in 0..width {
                target.write_pixel(x, y, self.pixel_at(x, y).as_scaled_values());
            }
        }
        target.present();
    }

    pub fn as_u8_rgb(&self) -> Vec<u8> {
        let mut buffer = RgbBuffer::new(self.width, self.height);
        self.blit(&mut buffer);
        buffer.bytes
    }
}

/// saving image in ppm format
impl Canvas {
    const MAX_LINE_LEN: usize = 70;
    fn ppm_header(&self) -> String {
        format!("P3\n{} {}\n255\n", self.width, self.height)
    }

    fn ppm_data(&self) -> String {
        let mut line_len = 0;

        self.pixels
            .iter()
            .enumerate()
            .map(|(id, color)| {
                color
                    .as_scaled_values()
                    .into_iter()
                    .enumerate()
                    .map(|(j, val)| {
                        let val_str = val.to_string();
                        let sep = if (id % self.width == 0 && j == 0)
                            || line_len + val_str.len() + 1 > Self::MAX_LINE_LEN
                        {
                            line_len = 0;
                            '\n'
                        } else {
                            ' '
                        };

                        line_len += val_str.len() + 1;
                        if id == 0 && j == 0 {
                            val_str
                        } else if id == self.width * self.height - 1 && j == 2 {
                            format!("{}{}\n", sep, val_str)
                        } else {
                            format!("{}{}", sep, val_str)
                        }
                    })
                    .collect::<String>()
            })
            .collect::<String>()
    }

    pub fn save_to_file(&self, file: File, format: ImageFormat) -> std::io::Result<()> {
        match format {
            ImageFormat::Ppm => self.save_to_ppm(file),
            ImageFormat::Png => self.save_to_png(file),
        }
    }

    pub fn save_to_ppm(&self, mut file: File) -> std::io::Result<()> {
        file.write_all(self.ppm_header().as_bytes())?;
        file.write_all(self.ppm_data().as_bytes())?;
        Ok(())
    }
}

/// saving image in png format
impl Canvas {
    pub fn save_to_png(&self, file: File) -> std::io::Result<()> {
        let mut encoder = png::Encoder::new(file, self.width as u32, self.height as u32);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;

        writer
            .write_image_data(&self.as_u8_rgb())
            .map_err(|e| e.into())
    }
}
