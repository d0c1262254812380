//! LaTeX source for the typesetting backends
//!
//! Every element is an absolutely positioned `textpos` block at the same
//! coordinates the drawing backend uses. Units are big points (`bp`), which
//! are PDF points, with textpos measuring from the top-left corner.

use worksheet_layout::notation::{escape_latex, to_latex};
use worksheet_layout::text::{LINE_HEIGHT_FACTOR, text_width_pt};
use worksheet_layout::{
    ColorRole, HeaderBlock, HeaderLayout, LayoutTemplate, PageGeometry, PageModel, Rect, Rgb8,
};

/// Name of the source file inside the working directory
pub const TEX_FILE: &str = "worksheet.tex";
/// Name of the PDF the compilers write next to it
pub const PDF_FILE: &str = "worksheet.pdf";

const RULE_THICKNESS_BP: f32 = 0.5;

const COLOR_NAMES: [(ColorRole, &str); 4] = [
    (ColorRole::Header, "wsheader"),
    (ColorRole::Body, "wsbody"),
    (ColorRole::Footer, "wsfooter"),
    (ColorRole::TableFill, "wsfill"),
];

fn color_name(role: ColorRole) -> &'static str {
    COLOR_NAMES
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, name)| *name)
        .unwrap_or("black")
}

fn hex(color: Rgb8) -> String {
    format!("{:02X}{:02X}{:02X}", color.r, color.g, color.b)
}

struct Markup<'a> {
    out: String,
    geometry: &'a PageGeometry,
}

impl Markup<'_> {
    /// Vertical textpos coordinate of a PDF y value
    fn from_top(&self, y: f32) -> f32 {
        self.geometry.page_height_pt - y
    }

    /// Block whose bottom-left corner sits at PDF coordinates (x, y)
    fn block(&mut self, x: f32, y: f32, width: f32, body: &str) {
        self.out.push_str(&format!(
            "\\begin{{textblock*}}{{{:.2}bp}}[0,1]({:.2},{:.2}){}\\end{{textblock*}}\n",
            width.max(1.0),
            x,
            self.from_top(y),
            body
        ));
    }

    /// Single unbreakable line with its baseline at (x, y); `tex` is already escaped
    ///
    /// The line is smashed so descenders add no depth and the block's bottom
    /// edge is the baseline itself.
    fn text(&mut self, x: f32, y: f32, size: f32, bold: bool, role: ColorRole, tex: &str) {
        if tex.is_empty() {
            return;
        }
        let width = self.geometry.page_width_pt - x;
        let weight = if bold { "\\bfseries" } else { "" };
        let body = format!(
            "\\fontsize{{{:.2}bp}}{{{:.2}bp}}\\selectfont{}\\color{{{}}}\\smash{{{}}}",
            size,
            size * LINE_HEIGHT_FACTOR,
            weight,
            color_name(role),
            tex
        );
        self.block(x, y, width, &body);
    }

    fn boxed(&mut self, rect: &Rect) {
        let inner_w = (rect.width - 2.0 * RULE_THICKNESS_BP).max(0.0);
        let inner_h = (rect.height - 2.0 * RULE_THICKNESS_BP).max(0.0);
        let body = format!(
            "\\fcolorbox{{{}}}{{{}}}{{\\rule{{0bp}}{{{:.2}bp}}\\rule{{{:.2}bp}}{{0bp}}}}",
            color_name(ColorRole::Body),
            color_name(ColorRole::TableFill),
            inner_h,
            inner_w
        );
        self.block(rect.x, rect.y, rect.width, &body);
    }

    fn rule(&mut self, x1: f32, x2: f32, y: f32) {
        let body = format!(
            "\\textcolor{{{}}}{{\\rule{{{:.2}bp}}{{{:.2}bp}}}}",
            color_name(ColorRole::Body),
            (x2 - x1).max(0.0),
            RULE_THICKNESS_BP
        );
        self.block(x1, y, x2 - x1, &body);
    }
}

/// Complete LaTeX document for `pages`, one output page per model
pub fn worksheet_markup(pages: &[PageModel], template: &LayoutTemplate) -> String {
    let geometry = template.geometry();
    let header = geometry.header_layout(template);

    let mut markup = Markup {
        out: preamble(template, &geometry),
        geometry: &geometry,
    };

    for page in pages {
        page_markup(&mut markup, page, template, &header);
        markup.out.push_str("\\null\\newpage\n");
    }
    markup.out.push_str("\\end{document}\n");
    markup.out
}

fn preamble(template: &LayoutTemplate, geometry: &PageGeometry) -> String {
    let mut out = String::new();
    out.push_str("\\documentclass{article}\n");
    out.push_str(&format!(
        "\\usepackage[paperwidth={:.2}bp,paperheight={:.2}bp,margin=0bp]{{geometry}}\n",
        geometry.page_width_pt, geometry.page_height_pt
    ));
    out.push_str("\\usepackage[absolute]{textpos}\n");
    out.push_str("\\usepackage{xcolor}\n");
    out.push_str("\\usepackage{helvet}\n");
    out.push_str("\\renewcommand{\\familydefault}{\\sfdefault}\n");
    out.push_str("\\pagestyle{empty}\n");
    out.push_str("\\setlength{\\parindent}{0pt}\n");
    out.push_str("\\setlength{\\TPHorizModule}{1bp}\n");
    out.push_str("\\setlength{\\TPVertModule}{1bp}\n");
    out.push_str("\\textblockorigin{0bp}{0bp}\n");
    out.push_str("\\setlength{\\fboxsep}{0bp}\n");
    out.push_str(&format!("\\setlength{{\\fboxrule}}{{{RULE_THICKNESS_BP}bp}}\n"));
    for (role, name) in COLOR_NAMES {
        out.push_str(&format!(
            "\\definecolor{{{}}}{{HTML}}{{{}}}\n",
            name,
            hex(template.color(role))
        ));
    }
    out.push_str("\\begin{document}\n");
    out
}

fn page_markup(markup: &mut Markup, page: &PageModel, template: &LayoutTemplate, header: &HeaderLayout) {
    let geometry = markup.geometry;
    let fonts = &template.fonts;

    match &page.header {
        Some(block) => header_markup(markup, block, page.label.as_deref(), template, header),
        None => {
            if let Some(label) = &page.label {
                let (x, y) = geometry.label_baseline(header.label.size_pt);
                markup.text(x, y, header.label.size_pt, true, ColorRole::Header, &escape_latex(label));
            }
        }
    }

    for placement in &page.placements {
        let rect = geometry.placement_rect(placement);
        markup.text(
            rect.x,
            geometry.line_baseline(&rect, 0),
            fonts.body_pt,
            true,
            ColorRole::Body,
            &format!("({})", placement.number),
        );
        let text_x = rect.x + geometry.number_indent_pt;
        for (i, line) in placement.lines.iter().enumerate() {
            markup.text(
                text_x,
                geometry.line_baseline(&rect, i),
                fonts.body_pt,
                false,
                ColorRole::Body,
                &to_latex(line),
            );
        }
    }

    if let Some(footer) = &template.footer_text {
        let (center_x, y) = geometry.footer_anchor(fonts.footer_pt);
        markup.text(
            center_x - text_width_pt(footer, fonts.footer_pt) / 2.0,
            y,
            fonts.footer_pt,
            false,
            ColorRole::Footer,
            &escape_latex(footer),
        );
    }
}

fn header_markup(
    markup: &mut Markup,
    block: &HeaderBlock,
    label: Option<&str>,
    template: &LayoutTemplate,
    header: &HeaderLayout,
) {
    let geometry = markup.geometry;
    let body_pt = template.fonts.body_pt;

    markup.text(
        header.brand.x,
        header.brand.y,
        header.brand.size_pt,
        true,
        ColorRole::Header,
        &escape_latex(&template.brand),
    );
    if let Some(label) = label {
        markup.text(
            header.label.x,
            header.label.y,
            header.label.size_pt,
            true,
            ColorRole::Header,
            &escape_latex(label),
        );
    }
    markup.text(
        header.centred_x(&block.topic),
        header.title.y,
        header.title.size_pt,
        true,
        ColorRole::Body,
        &escape_latex(&block.topic),
    );

    for (field, (anchor, rule_start, rule_end)) in block
        .student_fields
        .iter()
        .zip(geometry.student_field_cells(header, &block.student_fields))
    {
        markup.text(
            anchor.x,
            anchor.y,
            anchor.size_pt,
            false,
            ColorRole::Body,
            &escape_latex(&format!("{field}:")),
        );
        markup.rule(rule_start, rule_end, anchor.y - 2.0);
    }

    for (band, cell) in template.score_bands.iter().zip(&header.score_boxes) {
        markup.boxed(cell);
        let (label_y, mistakes_y) = geometry.score_baselines(cell);
        for (text, y) in [(&band.label, label_y), (&band.mistakes, mistakes_y)] {
            markup.text(
                cell.center_x() - text_width_pt(text, body_pt) / 2.0,
                y,
                body_pt,
                false,
                ColorRole::Body,
                &escape_latex(text),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worksheet_layout::{WorksheetSpec, paginate_worksheet};

    #[test]
    fn test_one_page_break_per_model() {
        let spec = WorksheetSpec::new("C", "Addition", vec!["1 + 1 =".to_string(); 30]);
        let template = LayoutTemplate::elementary();
        let pages = paginate_worksheet(&spec, &template).unwrap();
        let tex = worksheet_markup(&pages, &template);
        assert_eq!(tex.matches("\\newpage").count(), pages.len());
        assert!(tex.contains("paperwidth=612.00bp"));
        assert!(tex.contains("\\definecolor{wsheader}{HTML}{4B2E83}"));
    }

    #[test]
    fn test_problem_text_is_converted() {
        let spec = WorksheetSpec::new("G", "Fractions", vec!["3/4 + 50% =".to_string()]);
        let template = LayoutTemplate::advanced();
        let pages = paginate_worksheet(&spec, &template).unwrap();
        let tex = worksheet_markup(&pages, &template);
        assert!(tex.contains("$\\frac{3}{4}$ + 50\\%"));
        assert!(tex.contains("G 1 a"));
        assert!(tex.contains("69\\%\\textasciitilde{}"));
    }

    #[test]
    fn test_lines_are_smashed_to_their_baseline() {
        let spec = WorksheetSpec::new("G", "Patterns", vec!["Find y, g and q".to_string()]);
        let template = LayoutTemplate::advanced();
        let pages = paginate_worksheet(&spec, &template).unwrap();
        let tex = worksheet_markup(&pages, &template);
        assert!(tex.contains("\\smash{(1)}"));
        assert!(tex.contains("\\smash{Find y, g and q}"));
        assert!(!tex.contains("\\mbox{"));
    }
}
