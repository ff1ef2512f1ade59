//! # Drawing Surface
//!
//! The small slice of a 2D canvas that decorator renderers need. Coordinates
//! are node-local: x from the node's left edge, y from its top.
//!
//! [`PainterSurface`] maps the calls onto an `egui::Painter`.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub bold: bool,
}

impl FontSpec {
    pub fn new(size: f32, bold: bool) -> Self {
        Self { size, bold }
    }
}

pub trait Surface {
    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke);

    /// Stroke a polyline with a `[dash, gap]` pattern.
    fn dashed_path(&mut self, points: &[Pos2], dash: f32, gap: f32, stroke: Stroke);

    /// Fill a rectangle; `radius` of `None` draws square corners.
    fn fill_rect(&mut self, rect: Rect, radius: Option<f32>, color: Color32);

    /// Draw text with its top-left corner at `pos`.
    fn text(&mut self, pos: Pos2, text: &str, font: FontSpec, color: Color32);

    fn measure_text(&self, text: &str, font: FontSpec) -> f32;

    fn supports_rounded_rect(&self) -> bool {
        true
    }
}

/// Largest glyph size handed to egui's font atlas.
pub const MAX_FONT_PX: f32 = 256.0;

/// Font size egui can rasterize. Stored sizes are kept as entered, so
/// zero, negative, non-finite and huge values are pinned here instead.
pub fn font_px(size: f32) -> f32 {
    if size.is_finite() {
        size.clamp(1.0, MAX_FONT_PX)
    } else {
        1.0
    }
}

/// egui backend. `origin` is the screen position of the node's top-left.
pub struct PainterSurface<'a> {
    painter: &'a Painter,
    origin: Pos2,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a Painter, origin: Pos2) -> Self {
        Self { painter, origin }
    }

    fn to_screen(&self, p: Pos2) -> Pos2 {
        self.origin + p.to_vec2()
    }
}

impl Surface for PainterSurface<'_> {
    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.painter
            .line_segment([self.to_screen(from), self.to_screen(to)], stroke);
    }

    fn dashed_path(&mut self, points: &[Pos2], dash: f32, gap: f32, stroke: Stroke) {
        for pair in points.windows(2) {
            draw_dashed_line(
                self.painter,
                self.to_screen(pair[0]),
                self.to_screen(pair[1]),
                dash,
                gap,
                stroke,
            );
        }
    }

    fn fill_rect(&mut self, rect: Rect, radius: Option<f32>, color: Color32) {
        let rect = rect.translate(self.origin.to_vec2());
        self.painter.rect_filled(rect, radius.unwrap_or(0.0), color);
    }

    fn text(&mut self, pos: Pos2, text: &str, font: FontSpec, color: Color32) {
        let pos = self.to_screen(pos);
        let font_id = FontId::proportional(font_px(font.size));
        self.painter
            .text(pos, Align2::LEFT_TOP, text, font_id.clone(), color);
        // egui ships no bold face by default; overstrike for weight.
        if font.bold {
            self.painter
                .text(pos + Vec2::new(0.6, 0.0), Align2::LEFT_TOP, text, font_id, color);
        }
    }

    fn measure_text(&self, text: &str, font: FontSpec) -> f32 {
        let galley = self.painter.layout_no_wrap(
            text.to_string(),
            FontId::proportional(font_px(font.size)),
            Color32::WHITE,
        );
        let extra = if font.bold { 0.6 } else { 0.0 };
        galley.size().x + extra
    }
}

/// Draw a dashed line on a painter.
pub fn draw_dashed_line(
    painter: &Painter,
    start: Pos2,
    end: Pos2,
    dash_length: f32,
    gap_length: f32,
    stroke: Stroke,
) {
    let dir = end - start;
    let total_length = dir.length();
    if total_length < 0.001 {
        return;
    }

    let unit = dir / total_length;
    let mut pos = 0.0;
    let mut drawing = true;

    while pos < total_length {
        let segment_length = if drawing { dash_length } else { gap_length };
        let segment_end = (pos + segment_length).min(total_length);

        if drawing {
            let p1 = start + unit * pos;
            let p2 = start + unit * segment_end;
            painter.line_segment([p1, p2], stroke);
        }

        pos = segment_end;
        drawing = !drawing;
    }
}

#[cfg(test)]
pub(crate) mod recording {
    //! Surface that records calls instead of painting.

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum DrawCall {
        Line {
            from: Pos2,
            to: Pos2,
            color: Color32,
        },
        Dashed {
            points: Vec<Pos2>,
        },
        Rect {
            rect: Rect,
            radius: Option<f32>,
            color: Color32,
        },
        Text {
            pos: Pos2,
            text: String,
            font: FontSpec,
            color: Color32,
        },
    }

    /// Every glyph measures `char_width × font size`.
    pub struct RecordingSurface {
        pub calls: Vec<DrawCall>,
        pub char_width: f32,
        pub rounded: bool,
    }

    impl Default for RecordingSurface {
        fn default() -> Self {
            Self {
                calls: Vec::new(),
                char_width: 0.5,
                rounded: true,
            }
        }
    }

    impl RecordingSurface {
        pub fn texts(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    DrawCall::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
            self.calls.push(DrawCall::Line {
                from,
                to,
                color: stroke.color,
            });
        }

        fn dashed_path(&mut self, points: &[Pos2], _dash: f32, _gap: f32, _stroke: Stroke) {
            self.calls.push(DrawCall::Dashed {
                points: points.to_vec(),
            });
        }

        fn fill_rect(&mut self, rect: Rect, radius: Option<f32>, color: Color32) {
            self.calls.push(DrawCall::Rect {
                rect,
                radius,
                color,
            });
        }

        fn text(&mut self, pos: Pos2, text: &str, font: FontSpec, color: Color32) {
            self.calls.push(DrawCall::Text {
                pos,
                text: text.to_string(),
                font,
                color,
            });
        }

        fn measure_text(&self, text: &str, font: FontSpec) -> f32 {
            text.chars().count() as f32 * self.char_width * font.size
        }

        fn supports_rounded_rect(&self) -> bool {
            self.rounded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_px_pins_unusable_sizes() {
        assert_eq!(font_px(12.0), 12.0);
        assert_eq!(font_px(0.0), 1.0);
        assert_eq!(font_px(-5.0), 1.0);
        assert_eq!(font_px(5000.0), MAX_FONT_PX);
        assert_eq!(font_px(f32::NAN), 1.0);
        assert_eq!(font_px(f32::INFINITY), 1.0);
    }

    #[test]
    fn test_painter_surface_survives_out_of_range_font_sizes() {
        let ctx = egui::Context::default();
        let mut widths = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            let mut surface = PainterSurface::new(&painter, Pos2::ZERO);
            for size in [12.0, 0.0, -5.0, 5000.0, f32::NAN] {
                for bold in [false, true] {
                    let font = FontSpec::new(size, bold);
                    widths.push(surface.measure_text("hello world", font));
                    surface.text(Pos2::new(4.0, 4.0), "hello world", font, Color32::WHITE);
                }
            }
        });
        assert!(widths.len() >= 10);
        assert!(widths.iter().all(|w| w.is_finite() && *w > 0.0));
        // The regular 12px measurement is unaffected by clamping.
        assert!(widths[0] > widths[2]);
    }
}
