//! Stroked text drawn over a finished thumbnail.

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use serde::Deserialize;

use crate::constants::OVERLAY_MARGIN;
use crate::error::StudioError;

/// Smallest accepted font size.
pub const MIN_FONT_SIZE: u32 = 20;
/// Largest accepted font size.
pub const MAX_FONT_SIZE: u32 = 120;
/// Largest accepted stroke width.
pub const MAX_STROKE_WIDTH: u32 = 10;

/// Where the text block sits vertically. It's always centred horizontally.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TextPosition {
    /// Middle of the image
    #[default]
    Center,
    /// Near the top edge
    Top,
    /// Near the bottom edge
    Bottom,
}

impl From<&str> for TextPosition {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            _ => Self::Center,
        }
    }
}

impl<'de> Deserialize<'de> for TextPosition {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from(value.as_str()))
    }
}

/// Text plus how to draw it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextOverlay {
    /// What to write
    pub text: String,
    /// Pixel height of the text
    pub font_size: u32,
    /// Fill colour, a name or `#rrggbb`
    pub text_color: String,
    /// Outline colour, a name or `#rrggbb`
    pub stroke_color: String,
    /// Outline thickness in pixels; 0 disables it
    pub stroke_width: u32,
    /// Vertical placement
    pub position: TextPosition,
}

impl TextOverlay {
    /// An overlay with the default styling.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: 60,
            text_color: "white".to_string(),
            stroke_color: "black".to_string(),
            stroke_width: 3,
            position: TextPosition::Center,
        }
    }

    /// Rejects sizes outside the supported ranges and unknown colours.
    pub fn validate(&self) -> Result<(), StudioError> {
        validate_ranges(self.font_size, self.stroke_width)?;
        parse_color(&self.text_color)?;
        parse_color(&self.stroke_color)?;
        Ok(())
    }

    /// Draws the text onto `image`, outline first.
    pub fn draw(&self, image: &mut RgbImage, font: &FontArc) -> Result<(), StudioError> {
        let fill = parse_color(&self.text_color)?;
        let stroke = parse_color(&self.stroke_color)?;
        let scale = PxScale::from(self.font_size as f32);
        let (text_w, text_h) = text_size(scale, font, &self.text);
        let (x, y) = text_origin(image.width(), image.height(), text_w, text_h, self.position);

        let width = i32::try_from(self.stroke_width).unwrap_or(0);
        for dx in -width..=width {
            for dy in -width..=width {
                if dx != 0 || dy != 0 {
                    draw_text_mut(image, stroke, x + dx, y + dy, scale, font, &self.text);
                }
            }
        }
        draw_text_mut(image, fill, x, y, scale, font, &self.text);
        Ok(())
    }
}

/// Rejects a font size or stroke width outside the supported ranges.
pub fn validate_ranges(font_size: u32, stroke_width: u32) -> Result<(), StudioError> {
    if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&font_size) {
        return Err(StudioError::BadRequest(format!(
            "font_size must be between {MIN_FONT_SIZE} and {MAX_FONT_SIZE}"
        )));
    }
    if stroke_width > MAX_STROKE_WIDTH {
        return Err(StudioError::BadRequest(format!(
            "stroke_width must be between 0 and {MAX_STROKE_WIDTH}"
        )));
    }
    Ok(())
}

/// Top-left corner for a `text_w` x `text_h` block.
pub fn text_origin(
    image_w: u32,
    image_h: u32,
    text_w: u32,
    text_h: u32,
    position: TextPosition,
) -> (i32, i32) {
    let centered = |outer: u32, inner: u32| (i64::from(outer) - i64::from(inner)).div_euclid(2);
    let x = centered(image_w, text_w);
    let y = match position {
        TextPosition::Center => centered(image_h, text_h),
        TextPosition::Top => i64::from(OVERLAY_MARGIN),
        TextPosition::Bottom => {
            i64::from(image_h) - i64::from(text_h) - i64::from(OVERLAY_MARGIN)
        }
    };
    (clamp_i32(x), clamp_i32(y))
}

fn clamp_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Parses a colour name or `#rgb`/`#rrggbb` hex string.
pub fn parse_color(value: &str) -> Result<Rgb<u8>, StudioError> {
    let value = value.trim().to_ascii_lowercase();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex)
            .ok_or_else(|| StudioError::BadRequest(format!("Invalid colour: #{hex}")));
    }
    let rgb = match value.as_str() {
        "white" => [255, 255, 255],
        "black" => [0, 0, 0],
        "red" => [255, 0, 0],
        "green" => [0, 128, 0],
        "lime" => [0, 255, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "orange" => [255, 165, 0],
        "purple" => [128, 0, 128],
        "pink" => [255, 192, 203],
        "cyan" => [0, 255, 255],
        "magenta" => [255, 0, 255],
        "gray" | "grey" => [128, 128, 128],
        "gold" => [255, 215, 0],
        _ => return Err(StudioError::BadRequest(format!("Invalid colour: {value}"))),
    };
    Ok(Rgb(rgb))
}

fn parse_hex(hex: &str) -> Option<Rgb<u8>> {
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    match hex.len() {
        6 => Some(Rgb([
            channel(hex.get(0..2)?)?,
            channel(hex.get(2..4)?)?,
            channel(hex.get(4..6)?)?,
        ])),
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, digit) in rgb.iter_mut().zip(hex.chars()) {
                let value = u8::try_from(digit.to_digit(16)?).ok()?;
                *slot = value * 17;
            }
            Some(Rgb(rgb))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions() {
        assert_eq!(
            text_origin(1280, 720, 400, 60, TextPosition::Center),
            (440, 330)
        );
        assert_eq!(text_origin(1280, 720, 400, 60, TextPosition::Top), (440, 50));
        assert_eq!(
            text_origin(1280, 720, 400, 60, TextPosition::Bottom),
            (440, 610)
        );
    }

    #[test]
    fn wide_text_goes_negative() {
        assert_eq!(
            text_origin(1280, 720, 1300, 60, TextPosition::Center),
            (-10, 330)
        );
    }

    #[test]
    fn unknown_position_is_center() {
        assert_eq!(TextPosition::from("middle"), TextPosition::Center);
        assert_eq!(TextPosition::from("TOP"), TextPosition::Top);
        let parsed: TextPosition = serde_json::from_str("\"bottom\"").expect("parse");
        assert_eq!(parsed, TextPosition::Bottom);
    }

    #[test]
    fn colours() {
        assert_eq!(parse_color("White").expect("white"), Rgb([255, 255, 255]));
        assert_eq!(parse_color("#ff8000").expect("hex"), Rgb([255, 128, 0]));
        assert_eq!(parse_color("#f80").expect("short hex"), Rgb([255, 136, 0]));
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#gg0000").is_err());
        assert!(parse_color("chartreuse-ish").is_err());
    }

    #[test]
    fn validation_bounds() {
        let mut overlay = TextOverlay::new("WOW");
        assert!(overlay.validate().is_ok());

        overlay.font_size = 19;
        assert!(matches!(overlay.validate(), Err(StudioError::BadRequest(_))));
        overlay.font_size = 120;
        assert!(overlay.validate().is_ok());

        overlay.stroke_width = 11;
        assert!(overlay.validate().is_err());
        overlay.stroke_width = 0;
        assert!(overlay.validate().is_ok());

        overlay.text_color = "nope".to_string();
        assert!(overlay.validate().is_err());
    }

    #[test]
    fn ranges_checked_without_text() {
        assert!(validate_ranges(60, 3).is_ok());
        assert!(validate_ranges(20, 0).is_ok());
        assert!(validate_ranges(500, 3).is_err());
        assert!(validate_ranges(60, 11).is_err());
    }

    const BACKGROUND: Rgb<u8> = Rgb([40, 90, 160]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn count(image: &RgbImage, colour: Rgb<u8>) -> usize {
        image.pixels().filter(|pixel| **pixel == colour).count()
    }

    /// First and last rows holding anything but the background.
    fn painted_rows(image: &RgbImage) -> Option<(u32, u32)> {
        let rows: Vec<u32> = (0..image.height())
            .filter(|&y| (0..image.width()).any(|x| *image.get_pixel(x, y) != BACKGROUND))
            .collect();
        Some((*rows.first()?, *rows.last()?))
    }

    // these need a system font; hosts without one skip the drawing checks
    fn system_font() -> Option<FontArc> {
        crate::thumbnail::load_font(None)
    }

    #[test]
    fn draws_fill_and_stroke() {
        let Some(font) = system_font() else {
            return;
        };
        let mut image = RgbImage::from_pixel(1280, 720, BACKGROUND);
        TextOverlay::new("HELLO WORLD")
            .draw(&mut image, &font)
            .expect("draw");
        assert!(count(&image, WHITE) > 500);
        assert!(count(&image, BLACK) > 500);
    }

    #[test]
    fn zero_stroke_draws_no_outline() {
        let Some(font) = system_font() else {
            return;
        };
        let mut image = RgbImage::from_pixel(1280, 720, BACKGROUND);
        let mut overlay = TextOverlay::new("HELLO WORLD");
        overlay.stroke_width = 0;
        overlay.draw(&mut image, &font).expect("draw");
        assert!(count(&image, WHITE) > 500);
        assert_eq!(count(&image, BLACK), 0);
    }

    #[test]
    fn painted_area_follows_position() {
        let Some(font) = system_font() else {
            return;
        };
        let mut tops = Vec::new();
        for position in [TextPosition::Top, TextPosition::Center, TextPosition::Bottom] {
            let mut image = RgbImage::from_pixel(1280, 720, BACKGROUND);
            let mut overlay = TextOverlay::new("HELLO WORLD");
            overlay.position = position;
            overlay.draw(&mut image, &font).expect("draw");

            let scale = PxScale::from(overlay.font_size as f32);
            let (text_w, text_h) = text_size(scale, &font, &overlay.text);
            let (_, origin_y) = text_origin(1280, 720, text_w, text_h, position);
            let (top, bottom) = painted_rows(&image).expect("something was drawn");
            let tolerance = i64::from(overlay.font_size / 2);
            assert!(
                (i64::from(top) - i64::from(origin_y)).abs() <= tolerance,
                "{position:?}: painted from {top}, origin {origin_y}"
            );
            assert!(bottom < 720);
            tops.push(top);
        }
        assert!(tops[0] < tops[1] && tops[1] < tops[2], "{tops:?}");
    }
}
