// End-to-end paste scenarios through Document.

use taskgrid_engine::*;

fn names(doc: &Document) -> Vec<String> {
    doc.grid().tasks().iter().map(|t| t.name.clone()).collect()
}

fn doc_with_names(list: &[&str]) -> Document {
    let mut doc = Document::with_rows(list.len(), DocumentOptions::default());
    let ids: Vec<String> = doc.grid().tasks().iter().map(|t| t.id.clone()).collect();
    for (id, name) in ids.iter().zip(list) {
        doc.edit_cell(id, "col-name", *name).unwrap();
    }
    doc
}

#[test]
fn append_two_rows_into_three_row_grid() {
    let mut doc = doc_with_names(&["design", "build", "ship"]);
    let original: Vec<Task> = doc.grid().tasks().to_vec();

    doc.select(SelectionRange::single((0, 0))).unwrap();
    let outcome = doc
        .paste(None, "a\tb\nc\td\n", PasteMode::Append)
        .unwrap()
        .unwrap();

    assert_eq!(doc.grid().row_count(), 5);
    assert_eq!(&doc.grid().tasks()[..3], &original[..]);
    assert_eq!(names(&doc)[3..], ["a", "c"]);
    assert_eq!(doc.grid().tasks()[3].status, "b");
    assert_eq!(doc.grid().tasks()[4].status, "d");
    assert_eq!(outcome.rows_added, 2);
}

#[test]
fn malformed_html_still_pastes_text() {
    let mut doc = doc_with_names(&["one", "two"]);
    doc.select(SelectionRange::single((0, 0))).unwrap();

    let html = "<table><tr><td><b>bold<td>x</tr>";
    doc.paste(Some(html), "first\nsecond", PasteMode::Replace)
        .unwrap()
        .unwrap();

    assert_eq!(names(&doc), vec!["first", "second"]);
    assert!(doc.formatting().is_empty());
}

#[test]
fn html_paste_carries_styles_and_undoes_as_one_step() {
    let mut doc = doc_with_names(&["one", "two"]);
    let before = doc.snapshot();
    doc.select(SelectionRange::new((1, 0), (0, 0))).unwrap();

    let html = concat!(
        "<meta charset='utf-8'><table>",
        "<tr><td style=\"font-weight:bold;background-color:#fde68a\">Alpha</td><td>Open</td></tr>",
        "<tr><td><i>Beta</i></td><td align=\"center\">Done</td></tr>",
        "<tr><td>Gamma</td><td>Open</td></tr>",
        "</table>"
    );
    let outcome = doc
        .paste(Some(html), "Alpha\tOpen\nBeta\tDone\nGamma\tOpen", PasteMode::Replace)
        .unwrap()
        .unwrap();

    assert_eq!(outcome.rows_added, 1);
    assert_eq!(names(&doc), vec!["Alpha", "Beta", "Gamma"]);

    let alpha = doc.grid().cell_id_at(CellCoordinate::new(0, 0)).unwrap();
    let style = doc.formatting().get_formatting(&alpha);
    assert_eq!(style.weight(), FontWeight::Bold);
    assert_eq!(style.background_color.as_deref(), Some("#fde68a"));

    let done = doc.grid().cell_id_at(CellCoordinate::new(1, 1)).unwrap();
    assert_eq!(doc.formatting().get_formatting(&done).alignment(), TextAlign::Center);

    assert_eq!(doc.history().undo_len(), 3);
    assert!(doc.undo());
    assert_eq!(doc.snapshot(), before);
}

#[test]
fn values_only_keeps_existing_styles() {
    let mut doc = doc_with_names(&["one"]);
    doc.select(SelectionRange::single((0, 0))).unwrap();
    doc.format_selection(&CellFormatting::default().with_text_color("#333"));

    let html = "<table><tr><td style=\"color:red\">new</td></tr></table>";
    doc.paste(Some(html), "new", PasteMode::ValuesOnly).unwrap();

    let cell = doc.grid().cell_id_at(CellCoordinate::new(0, 0)).unwrap();
    assert_eq!(names(&doc), vec!["new"]);
    assert_eq!(
        doc.formatting().get_formatting(&cell).text_color.as_deref(),
        Some("#333")
    );
}

#[test]
fn insert_columns_then_undo_restores_layout() {
    let mut doc = doc_with_names(&["one", "two"]);
    let columns_before: Vec<Column> = doc.grid().columns().to_vec();
    doc.select(SelectionRange::single((0, 2))).unwrap();

    doc.paste(None, "x\ty\nz\tw", PasteMode::InsertColumns).unwrap();
    assert_eq!(doc.grid().column_count(), 7);
    assert_eq!(doc.selection().normalized_range(), Some(Range::single(0, 4)));

    doc.undo();
    assert_eq!(doc.grid().columns(), &columns_before[..]);
}

#[test]
fn paste_without_selection_does_nothing() {
    let mut doc = doc_with_names(&["one"]);
    assert_eq!(doc.paste(None, "x", PasteMode::Replace).unwrap(), None);
    assert_eq!(names(&doc), vec!["one"]);
}

#[test]
fn selection_grows_over_pasted_block() {
    let mut doc = doc_with_names(&["one", "two"]);
    doc.select(SelectionRange::single((0, 0))).unwrap();
    doc.paste(None, "a\tb\nc\td", PasteMode::Replace).unwrap().unwrap();
    assert_eq!(doc.selection().normalized_range(), Some(Range::new(0, 0, 1, 1)));

    // A larger selection is kept whole
    doc.select(SelectionRange::new((0, 0), (1, 2))).unwrap();
    doc.paste(None, "z", PasteMode::ValuesOnly).unwrap().unwrap();
    assert_eq!(doc.selection().normalized_range(), Some(Range::new(0, 0, 1, 2)));
}

#[test]
fn append_selects_new_rows() {
    let mut doc = doc_with_names(&["one", "two"]);
    doc.select(SelectionRange::single((0, 1))).unwrap();
    doc.paste(None, "x\ny\nz", PasteMode::Append).unwrap().unwrap();
    assert_eq!(doc.selection().normalized_range(), Some(Range::new(2, 1, 4, 1)));
}

#[test]
fn replace_reports_clipped_columns() {
    let mut doc = doc_with_names(&["one"]);
    doc.select(SelectionRange::single((0, 3))).unwrap();
    let outcome = doc.paste(None, "a\tb\tc", PasteMode::Replace).unwrap().unwrap();
    assert_eq!(outcome.columns_clipped, 1);
    assert_eq!(outcome.rows_clipped, 0);
    assert_eq!(doc.grid().value_at(CellCoordinate::new(0, 4)), Some("b"));
    assert_eq!(doc.selection().normalized_range(), Some(Range::new(0, 3, 0, 4)));
}
