// src/services/preview_image.rs
//! Fixed-size PNG card used as the OpenGraph / link-preview image.

use crate::config::PreviewConfig;
use crate::db::models::Certificate;
use crate::services::certificate_renderer::{format_duration, format_issue_date, RenderError};
use ab_glyph::{FontArc, PxScale};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::io::Cursor;

pub const WIDTH: u32 = 1200;
pub const HEIGHT: u32 = 630;

const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

const FRAME: u32 = 12;
const PADDING: i32 = 52;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const PRIMARY_BLUE: Rgba<u8> = Rgba([0x1a, 0x73, 0xe8, 255]);
const TEXT_GRAY: Rgba<u8> = Rgba([0x5f, 0x63, 0x68, 255]);
const TEXT_BLACK: Rgba<u8> = Rgba([0x20, 0x21, 0x24, 255]);
const WATERMARK: Rgba<u8> = Rgba([0xbd, 0xc1, 0xc6, 255]);

enum Align {
    Left,
    Center,
    Right,
}

pub struct PreviewRenderer {
    font: Option<FontArc>,
}

impl PreviewRenderer {
    pub fn new(font: Option<FontArc>) -> Self {
        Self { font }
    }

    /// Renderer using the DejaVu Sans Bold face compiled into the binary.
    pub fn bundled() -> Self {
        match FontArc::try_from_slice(BUNDLED_FONT) {
            Ok(font) => Self::new(Some(font)),
            Err(e) => {
                log::error!("Bundled preview font is invalid: {}", e);
                Self::new(None)
            }
        }
    }

    /// Loads `font_path` when set. An unreadable or invalid override falls
    /// back to the bundled font.
    pub fn from_config(config: &PreviewConfig) -> Self {
        let Some(path) = config.font_path.as_deref() else {
            return Self::bundled();
        };

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Could not read preview font {}: {}; using bundled font", path, e);
                return Self::bundled();
            }
        };

        match FontArc::try_from_vec(bytes) {
            Ok(font) => {
                log::info!("Using preview font {}", path);
                Self::new(Some(font))
            }
            Err(e) => {
                log::warn!("Invalid preview font {}: {}; using bundled font", path, e);
                Self::bundled()
            }
        }
    }

    pub fn render(&self, certificate: &Certificate) -> Result<Vec<u8>, RenderError> {
        let mut canvas = blank_card();
        draw_frame(&mut canvas);

        let content_width = WIDTH as i32 - 2 * PADDING;
        let right = WIDTH as i32 - PADDING;

        // header and footer rules
        draw_rule(&mut canvas, PADDING, 118, content_width as u32, 1);
        draw_rule(&mut canvas, PADDING, 520, content_width as u32, 1);
        // divider between headline and stats
        draw_rule(&mut canvas, (WIDTH as i32 - 400) / 2, 390, 400, 2);

        if let Some(font) = &self.font {
            let mut text = TextPainter {
                canvas: &mut canvas,
                font,
                max_width: content_width as u32,
            };

            text.draw("CertifYT", PADDING, 58, 36.0, PRIMARY_BLUE, Align::Left);
            text.draw("CERTIFICATE OF COMPLETION", right, 68, 20.0, TEXT_GRAY, Align::Right);

            let center = WIDTH as i32 / 2;
            text.draw("This is to certify that", center, 140, 28.0, TEXT_GRAY, Align::Center);
            text.draw(&certificate.user_name, center, 180, 90.0, TEXT_BLACK, Align::Center);
            text.draw(
                "has successfully completed the playlist",
                center,
                285,
                28.0,
                TEXT_GRAY,
                Align::Center,
            );
            text.draw(&certificate.playlist_title, center, 325, 40.0, PRIMARY_BLUE, Align::Center);

            let left_col = center - 180;
            let right_col = center + 180;
            text.draw("TOTAL DURATION", left_col, 420, 18.0, TEXT_GRAY, Align::Center);
            text.draw(
                &format_duration(certificate.total_duration_seconds),
                left_col,
                448,
                32.0,
                TEXT_BLACK,
                Align::Center,
            );
            text.draw("SOURCE CHANNEL", right_col, 420, 18.0, TEXT_GRAY, Align::Center);
            text.max_width = 340;
            text.draw(&certificate.channel_name, right_col, 448, 32.0, TEXT_BLACK, Align::Center);
            text.max_width = content_width as u32;

            text.draw("Date Issued", PADDING, 536, 16.0, TEXT_GRAY, Align::Left);
            text.draw(
                &format_issue_date(&certificate.created_at),
                PADDING,
                558,
                20.0,
                TEXT_BLACK,
                Align::Left,
            );
            text.draw(
                "This certificate verifies completion of a YouTube playlist. CertifYT is not affiliated with YouTube.",
                right,
                540,
                12.0,
                WATERMARK,
                Align::Right,
            );
            text.draw(
                &format!("ID: {}", certificate.id),
                right,
                562,
                14.0,
                WATERMARK,
                Align::Right,
            );
        }

        encode_png(canvas)
    }

    /// Plain card for ids that resolve to nothing.
    pub fn render_not_found(&self) -> Result<Vec<u8>, RenderError> {
        let mut canvas = blank_card();
        if let Some(font) = &self.font {
            let mut text = TextPainter {
                canvas: &mut canvas,
                font,
                max_width: WIDTH,
            };
            text.draw("404", WIDTH as i32 / 2, 250, 120.0, TEXT_GRAY, Align::Center);
        }
        encode_png(canvas)
    }
}

struct TextPainter<'a> {
    canvas: &'a mut RgbaImage,
    font: &'a FontArc,
    max_width: u32,
}

impl TextPainter<'_> {
    /// Draws `content` anchored at `x` with its top at `y`, shrinking the
    /// scale until it fits `max_width`.
    fn draw(&mut self, content: &str, x: i32, y: i32, size: f32, color: Rgba<u8>, align: Align) {
        if content.is_empty() {
            return;
        }

        let mut scale = PxScale::from(size);
        let (mut width, _) = text_size(scale, self.font, content);
        if width > self.max_width {
            scale = PxScale::from(size * self.max_width as f32 / width as f32);
            width = text_size(scale, self.font, content).0;
        }

        let left = match align {
            Align::Left => x,
            Align::Center => x - width as i32 / 2,
            Align::Right => x - width as i32,
        };

        draw_text_mut(&mut *self.canvas, color, left, y, scale, self.font, content);
    }
}

fn blank_card() -> RgbaImage {
    RgbaImage::from_pixel(WIDTH, HEIGHT, WHITE)
}

fn draw_frame(canvas: &mut RgbaImage) {
    draw_filled_rect_mut(canvas, Rect::at(0, 0).of_size(WIDTH, FRAME), PRIMARY_BLUE);
    draw_filled_rect_mut(
        canvas,
        Rect::at(0, (HEIGHT - FRAME) as i32).of_size(WIDTH, FRAME),
        PRIMARY_BLUE,
    );
    draw_filled_rect_mut(canvas, Rect::at(0, 0).of_size(FRAME, HEIGHT), PRIMARY_BLUE);
    draw_filled_rect_mut(
        canvas,
        Rect::at((WIDTH - FRAME) as i32, 0).of_size(FRAME, HEIGHT),
        PRIMARY_BLUE,
    );
}

fn draw_rule(canvas: &mut RgbaImage, x: i32, y: i32, width: u32, thickness: u32) {
    draw_filled_rect_mut(canvas, Rect::at(x, y).of_size(width, thickness), PRIMARY_BLUE);
}

fn encode_png(canvas: RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut png = Vec::new();
    DynamicImage::ImageRgba8(canvas).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}
