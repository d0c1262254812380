use printpdf::graphics::{LinePoint, PaintMode, Point, Polygon, PolygonRing, WindingOrder};
use printpdf::ops::Op;
use printpdf::{BuiltinFont, Pt, Rgb, TextItem};
use worksheet_layout::{Rect, Rgb8};

fn to_pdf_color(color: Rgb8) -> printpdf::color::Color {
    let (r, g, b) = color.to_unit();
    printpdf::color::Color::Rgb(Rgb::new(r, g, b, None))
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

/// Operation list for one page
#[derive(Default)]
pub(super) struct PageOps {
    ops: Vec<Op>,
}

impl PageOps {
    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }

    /// Single run of text with its baseline origin at (x, y)
    pub fn text(&mut self, x: f32, y: f32, size: f32, font: BuiltinFont, color: Rgb8, text: &str) {
        if text.is_empty() {
            return;
        }
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetFillColor {
            col: to_pdf_color(color),
        });
        self.ops.push(Op::SetTextCursor {
            pos: Point { x: Pt(x), y: Pt(y) },
        });
        self.ops.push(Op::SetFontSizeBuiltinFont {
            font,
            size: Pt(size),
        });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font,
        });
        self.ops.push(Op::EndTextSection);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgb8) {
        self.ops.push(Op::SetFillColor {
            col: to_pdf_color(color),
        });
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing {
                    points: corners(rect),
                }],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::EvenOdd,
            },
        });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Rgb8, thickness: f32) {
        self.set_outline(color, thickness);
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing {
                    points: corners(rect),
                }],
                mode: PaintMode::Stroke,
                winding_order: WindingOrder::EvenOdd,
            },
        });
    }

    /// Horizontal rule from `x1` to `x2`
    pub fn rule(&mut self, x1: f32, x2: f32, y: f32, color: Rgb8, thickness: f32) {
        self.set_outline(color, thickness);
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing {
                    points: vec![point(x1, y), point(x2, y)],
                }],
                mode: PaintMode::Stroke,
                winding_order: WindingOrder::EvenOdd,
            },
        });
    }

    fn set_outline(&mut self, color: Rgb8, thickness: f32) {
        self.ops.push(Op::SetOutlineThickness { pt: Pt(thickness) });
        self.ops.push(Op::SetOutlineColor {
            col: to_pdf_color(color),
        });
    }
}

fn corners(rect: Rect) -> Vec<LinePoint> {
    vec![
        point(rect.x, rect.y),
        point(rect.right(), rect.y),
        point(rect.right(), rect.top()),
        point(rect.x, rect.top()),
    ]
}
