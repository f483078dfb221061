//! HTML table extraction for rich clipboard pastes.
//!
//! Spreadsheet and document apps put a `<table>` fragment on the clipboard
//! next to the plain text. We read it with quick-xml in a lenient mode (no
//! end-name checking, HTML attribute syntax) and do our own tag matching so
//! that void elements like `<br>` are accepted while genuinely unclosed or
//! mismatched tags reject the whole fragment.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::format::{CellFormatting, FontStyle, FontWeight, FormattedCellData, TextAlign};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Extract the first top-level table as rows of styled cells.
///
/// Returns `None` when there is no table, the markup is malformed, or the
/// table has no cells. Rows are not padded here.
pub fn parse_html_table(html: &str) -> Option<Vec<Vec<FormattedCellData>>> {
    let lower = html.to_ascii_lowercase();
    let start = lower.find("<table")?;
    let end = lower.rfind("</table>")? + "</table>".len();
    if end <= start {
        return None;
    }
    let fragment = &html[start..end];

    let mut reader = Reader::from_str(fragment);
    reader.config_mut().trim_text(false);
    reader.config_mut().check_end_names = false;
    let mut buf = Vec::new();

    let mut open: Vec<String> = Vec::new();
    let mut table = TableBuilder::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = tag_name(e);
                table.start(&name, e);
                if !VOID_ELEMENTS.contains(&name.as_str()) {
                    open.push(name);
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = tag_name(e);
                table.start(&name, e);
                table.end(&name);
            }
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                if !VOID_ELEMENTS.contains(&name.as_str()) {
                    if open.pop().as_deref() != Some(name.as_str()) {
                        log::debug!("clipboard html: mismatched </{}>", name);
                        return None;
                    }
                    table.end(&name);
                }
            }
            Ok(Event::Text(ref e)) => {
                table.text(&decode_entities(&String::from_utf8_lossy(e.as_ref())));
            }
            Ok(Event::GeneralRef(ref e)) => {
                table.text(&decode_entity(&String::from_utf8_lossy(&e[..])));
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                log::debug!("clipboard html: {}", err);
                return None;
            }
            _ => {}
        }
        buf.clear();
    }

    if !open.is_empty() {
        log::debug!("clipboard html: unclosed <{}>", open.join("> <"));
        return None;
    }

    let rows = table.finish();
    if rows.iter().all(Vec::is_empty) {
        return None;
    }
    Some(rows)
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase()
}

#[derive(Default)]
struct TableBuilder {
    rows: Vec<Vec<FormattedCellData>>,
    row: Option<Vec<FormattedCellData>>,
    row_style: CellFormatting,
    cell: Option<CellBuilder>,
    /// Nesting depth of `<table>`; only depth 1 produces cells.
    depth: usize,
}

struct CellBuilder {
    text: String,
    formatting: CellFormatting,
    colspan: usize,
}

impl TableBuilder {
    fn start(&mut self, name: &str, e: &BytesStart<'_>) {
        if name == "table" {
            self.depth += 1;
            return;
        }
        if self.depth != 1 {
            return;
        }
        match name {
            "tr" => {
                self.finish_row();
                self.row = Some(Vec::new());
                self.row_style = element_style(name, e);
            }
            "td" | "th" => {
                self.finish_cell();
                if self.row.is_none() {
                    self.row = Some(Vec::new());
                }
                let mut formatting = self.row_style.clone().merged(&element_style(name, e));
                if name == "th" {
                    formatting.is_header = Some(true);
                }
                self.cell = Some(CellBuilder {
                    text: String::new(),
                    formatting,
                    colspan: colspan(e),
                });
            }
            "br" => {
                if let Some(cell) = self.cell.as_mut() {
                    let trimmed = cell.text.trim_end_matches(' ').len();
                    cell.text.truncate(trimmed);
                    cell.text.push('\n');
                }
            }
            _ => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.formatting.merge(&element_style(name, e));
                }
            }
        }
    }

    fn end(&mut self, name: &str) {
        match name {
            "table" => {
                if self.depth == 1 {
                    self.finish_row();
                }
                self.depth = self.depth.saturating_sub(1);
            }
            "td" | "th" if self.depth == 1 => self.finish_cell(),
            "tr" if self.depth == 1 => self.finish_row(),
            _ => {}
        }
    }

    fn text(&mut self, s: &str) {
        if self.depth != 1 {
            return;
        }
        let Some(cell) = self.cell.as_mut() else {
            return;
        };
        for ch in s.chars() {
            if ch.is_whitespace() {
                let last = cell.text.chars().last();
                if !cell.text.is_empty() && last != Some(' ') && last != Some('\n') {
                    cell.text.push(' ');
                }
            } else {
                cell.text.push(ch);
            }
        }
    }

    fn finish_cell(&mut self) {
        let Some(cell) = self.cell.take() else {
            return;
        };
        let value = cell
            .text
            .split('\n')
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n")
            .trim_matches('\n')
            .to_string();

        let row = self.row.get_or_insert_with(Vec::new);
        row.push(FormattedCellData {
            value,
            formatting: cell.formatting,
        });
        for _ in 1..cell.colspan {
            row.push(FormattedCellData::default());
        }
    }

    fn finish_row(&mut self) {
        self.finish_cell();
        if let Some(row) = self.row.take() {
            if !row.is_empty() {
                self.rows.push(row);
            }
        }
        self.row_style = CellFormatting::default();
    }

    fn finish(mut self) -> Vec<Vec<FormattedCellData>> {
        self.finish_row();
        self.rows
    }
}

fn colspan(e: &BytesStart<'_>) -> usize {
    attributes(e)
        .into_iter()
        .find(|(k, _)| k == "colspan")
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .map(|n| n.clamp(1, 256))
        .unwrap_or(1)
}

/// Lowercased attribute names with entity-decoded values.
fn attributes(e: &BytesStart<'_>) -> Vec<(String, String)> {
    e.html_attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
            let value = decode_entities(&String::from_utf8_lossy(&attr.value));
            (key, value)
        })
        .collect()
}

/// Formatting implied by an element: its tag semantics, legacy presentational
/// attributes, then its inline `style`.
fn element_style(name: &str, e: &BytesStart<'_>) -> CellFormatting {
    let mut f = CellFormatting::default();
    match name {
        "b" | "strong" => f.font_weight = Some(FontWeight::Bold),
        "i" | "em" => f.font_style = Some(FontStyle::Italic),
        "u" | "ins" => f.text_decoration = Some("underline".to_string()),
        "s" | "strike" | "del" => f.text_decoration = Some("line-through".to_string()),
        _ => {}
    }

    for (key, value) in attributes(e) {
        match key.as_str() {
            "bgcolor" => f.background_color = non_empty(&value),
            "align" => f.text_align = TextAlign::from_css(&value),
            "color" if name == "font" => f.text_color = non_empty(&value),
            "face" if name == "font" => f.font_family = non_empty(&value),
            "size" if name == "font" => f.font_size = non_empty(&value),
            "style" => f.merge(&parse_css_style(&value)),
            _ => {}
        }
    }
    f
}

/// Parse the declarations of an inline `style` attribute we care about.
pub(crate) fn parse_css_style(style: &str) -> CellFormatting {
    let mut f = CellFormatting::default();
    for decl in style.split(';') {
        let Some((prop, value)) = decl.split_once(':') else {
            continue;
        };
        let prop = prop.trim().to_ascii_lowercase();
        let value = value.trim();
        let value = value
            .strip_suffix("!important")
            .map(str::trim)
            .unwrap_or(value);
        if value.is_empty() {
            continue;
        }

        match prop.as_str() {
            "background-color" | "background" => f.background_color = Some(value.to_string()),
            "color" => f.text_color = Some(value.to_string()),
            "font-weight" => f.font_weight = FontWeight::from_css(value),
            "font-style" => f.font_style = FontStyle::from_css(value),
            "border" => f.border = Some(value.to_string()),
            "text-align" => f.text_align = TextAlign::from_css(value),
            "font-size" => f.font_size = Some(value.to_string()),
            "font-family" => {
                f.font_family = Some(value.trim_matches(|c| c == '"' || c == '\'').to_string())
            }
            "text-decoration" | "text-decoration-line" => {
                f.text_decoration = (value != "none").then(|| value.to_string())
            }
            _ => {}
        }
    }
    f
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Resolve one entity reference name (without `&` and `;`).
fn decode_entity(name: &str) -> String {
    let resolved = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => name.strip_prefix('#').and_then(|num| {
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => num.parse::<u32>().ok(),
            };
            code.and_then(char::from_u32)
        }),
    };
    match resolved {
        Some(ch) => ch.to_string(),
        None => format!("&{};", name),
    }
}

/// Decode entity references embedded in a string.
fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match after.find(';') {
            Some(semi) if semi > 0 && semi <= 10 => {
                out.push_str(&decode_entity(&after[..semi]));
                rest = &after[semi + 1..];
            }
            _ => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
