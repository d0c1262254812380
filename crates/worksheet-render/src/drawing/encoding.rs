//! WinAnsi text for the builtin Helvetica faces
//!
//! printpdf declares builtin fonts with `/WinAnsiEncoding` but writes text
//! operands as UTF-8. The saved document is rewritten so every shown string
//! holds one WinAnsi byte per character.

use lopdf::content::Content;
use lopdf::{Document, Object};

/// WinAnsi code of characters outside Latin-1 that the encoding covers
const WIN_ANSI_EXTRA: [(char, u8); 27] = [
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

/// Encode `s` for a WinAnsi font
///
/// Math signs WinAnsi lacks are spelled out; anything else unmapped becomes `?`.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\u{2264}' => out.extend_from_slice(b"<="),
            '\u{2265}' => out.extend_from_slice(b">="),
            '\u{2212}' => out.push(b'-'),
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => out.push(c as u8),
            c => out.push(
                WIN_ANSI_EXTRA
                    .iter()
                    .find(|(from, _)| *from == c)
                    .map(|(_, code)| *code)
                    .unwrap_or(b'?'),
            ),
        }
    }
    out
}

fn reencode_operand(operand: &mut Object) {
    match operand {
        Object::String(bytes, _) => {
            if let Ok(text) = std::str::from_utf8(bytes) {
                *bytes = to_win_ansi(text);
            }
        }
        Object::Array(items) => items.iter_mut().for_each(reencode_operand),
        _ => {}
    }
}

/// Rewrite the operands of every text-showing operator in `pdf`
pub fn reencode_text(pdf: &[u8]) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = Document::load_mem(pdf)?;
    let page_ids: Vec<_> = doc.get_pages().into_values().collect();

    for page_id in page_ids {
        let mut content = Content::decode(&doc.get_page_content(page_id)?)?;
        for operation in &mut content.operations {
            if matches!(operation.operator.as_str(), "Tj" | "TJ" | "'" | "\"") {
                operation.operands.iter_mut().for_each(reencode_operand);
            }
        }
        doc.change_page_content(page_id, content.encode()?)?;
    }

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}
