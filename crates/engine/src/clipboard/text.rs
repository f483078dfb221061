/// Split tab-separated clipboard text into rows of cells.
///
/// Accepts `\n`, `\r\n` and bare `\r` line endings. Spreadsheet apps end
/// copied text with a newline, so one trailing line break is dropped rather
/// than producing an empty last row. Rows are not padded here.
pub fn parse_tsv(text: &str) -> Vec<Vec<String>> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let body = normalized.strip_suffix('\n').unwrap_or(&normalized);
    if body.is_empty() {
        return Vec::new();
    }

    body.split('\n')
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}
