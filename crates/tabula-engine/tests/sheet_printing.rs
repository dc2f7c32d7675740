use tabula_engine::{Position, Sheet, Size};

fn pos(addr: &str) -> Position {
    Position::from_string(addr)
}

fn printed_values(sheet: &Sheet) -> String {
    let mut out = Vec::new();
    sheet.print_values(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn printed_texts(sheet: &Sheet) -> String {
    let mut out = Vec::new();
    sheet.print_texts(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn empty_sheet_prints_nothing() {
    let sheet = Sheet::new();
    assert_eq!(sheet.printable_size(), Size::new(0, 0));
    assert_eq!(printed_values(&sheet), "");
    assert_eq!(printed_texts(&sheet), "");
}

#[test]
fn printable_region_tightens_after_clear() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("C3"), "x").unwrap();
    sheet.set_cell(pos("A1"), "y").unwrap();
    assert_eq!(sheet.printable_size(), Size::new(3, 3));

    sheet.clear_cell(pos("C3")).unwrap();
    assert_eq!(sheet.printable_size(), Size::new(1, 1));
    assert_eq!(printed_texts(&sheet), "y\n");
}

#[test]
fn rows_and_cells_are_tab_and_newline_separated() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "y").unwrap();
    sheet.set_cell(pos("C3"), "x").unwrap();

    // Absent cells print as nothing between the separators, rows in the gap
    // included.
    assert_eq!(printed_values(&sheet), "y\t\t\n\t\t\n\t\tx\n");
    assert_eq!(printed_texts(&sheet), "y\t\t\n\t\t\n\t\tx\n");
}

#[test]
fn values_and_texts_differ_for_formulas_and_escapes() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "2").unwrap();
    sheet.set_cell(pos("B1"), "=A1+3").unwrap();
    sheet.set_cell(pos("C1"), "'=A1+3").unwrap();

    assert_eq!(printed_values(&sheet), "2\t5\t=A1+3\n");
    assert_eq!(printed_texts(&sheet), "2\t=A1+3\t'=A1+3\n");
}

#[test]
fn error_values_print_their_codes() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=1/0").unwrap();
    sheet.set_cell(pos("B1"), "words").unwrap();
    sheet.set_cell(pos("C1"), "=B1*2").unwrap();
    sheet.set_cell(pos("D1"), "=ZZZ999").unwrap();

    assert_eq!(printed_values(&sheet), "#ARITHM!\twords\t#VALUE!\t#REF!\n");
    assert_eq!(printed_texts(&sheet), "=1/0\twords\t=B1*2\t=ZZZ999\n");
}

#[test]
fn materialized_reference_targets_extend_the_printable_region() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=B3").unwrap();
    assert_eq!(sheet.printable_size(), Size::new(3, 2));
    assert_eq!(printed_values(&sheet), "0\t\n\t\n\t\n");
}

#[test]
fn number_values_print_with_default_float_formatting() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=7/2").unwrap();
    sheet.set_cell(pos("B1"), "=4/2").unwrap();
    assert_eq!(printed_values(&sheet), "3.5\t2\n");
}
