use tabula_engine::{CellValue, Position, Sheet};

fn pos(addr: &str) -> Position {
    Position::from_string(addr)
}

fn value(sheet: &Sheet, addr: &str) -> CellValue {
    sheet.get_value(pos(addr)).unwrap()
}

fn text(sheet: &Sheet, addr: &str) -> String {
    sheet.get_cell(pos(addr)).unwrap().unwrap().get_text()
}

#[test]
fn escaped_text_displays_without_the_escape_character() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "'=1+2").unwrap();
    assert_eq!(value(&sheet, "A1"), CellValue::Text("=1+2".to_string()));
    assert_eq!(text(&sheet, "A1"), "'=1+2");
}

#[test]
fn lone_escape_character_has_empty_value_and_non_empty_text() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "'").unwrap();
    assert_eq!(value(&sheet, "A1"), CellValue::Text(String::new()));
    assert_eq!(text(&sheet, "A1"), "'");
}

#[test]
fn lone_equals_sign_is_text() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=").unwrap();
    assert_eq!(value(&sheet, "A1"), CellValue::Text("=".to_string()));
    assert_eq!(text(&sheet, "A1"), "=");
}

#[test]
fn is_referenced_reports_outbound_references() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=B1+C1").unwrap();
    sheet.set_cell(pos("B1"), "2").unwrap();

    // A1 references other cells; B1 is referenced *by* A1 but references
    // nothing itself.
    assert!(sheet.get_cell(pos("A1")).unwrap().unwrap().is_referenced());
    assert!(!sheet.get_cell(pos("B1")).unwrap().unwrap().is_referenced());
    assert!(!sheet.get_cell(pos("C1")).unwrap().unwrap().is_referenced());
}

#[test]
fn referenced_cells_come_back_in_first_occurrence_order() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=C1+B1*C1+A2").unwrap();
    let cells = sheet
        .get_cell(pos("A1"))
        .unwrap()
        .unwrap()
        .get_referenced_cells();
    assert_eq!(cells, vec![pos("C1"), pos("B1"), pos("A2")]);

    sheet.set_cell(pos("B1"), "text").unwrap();
    assert_eq!(
        sheet
            .get_cell(pos("B1"))
            .unwrap()
            .unwrap()
            .get_referenced_cells(),
        Vec::new()
    );
}

#[test]
fn setting_the_same_content_twice_is_idempotent() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "3").unwrap();
    sheet.set_cell(pos("B1"), "=A1*2").unwrap();
    sheet.set_cell(pos("B1"), "=A1*2").unwrap();

    assert_eq!(text(&sheet, "B1"), "=A1*2");
    assert_eq!(value(&sheet, "B1"), CellValue::Number(6.0));
    assert_eq!(sheet.printable_size(), tabula_engine::Size::new(1, 2));

    // Upstream invalidation still reaches B1 exactly as after a single set.
    sheet.set_cell(pos("A1"), "4").unwrap();
    assert_eq!(value(&sheet, "B1"), CellValue::Number(8.0));
}

#[test]
fn overwriting_content_transitions_between_all_variants() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "hello").unwrap();
    assert_eq!(value(&sheet, "A1"), CellValue::Text("hello".to_string()));

    sheet.set_cell(pos("A1"), "=1+1").unwrap();
    assert_eq!(value(&sheet, "A1"), CellValue::Number(2.0));

    sheet.set_cell(pos("A1"), "").unwrap();
    assert_eq!(value(&sheet, "A1"), CellValue::Empty);
    assert_eq!(text(&sheet, "A1"), "");

    sheet.set_cell(pos("A1"), "world").unwrap();
    assert_eq!(value(&sheet, "A1"), CellValue::Text("world".to_string()));
}

#[test]
fn clearing_a_missing_cell_is_a_no_op() {
    let mut sheet = Sheet::new();
    sheet.clear_cell(pos("J10")).unwrap();
    assert_eq!(sheet.printable_size(), tabula_engine::Size::new(0, 0));
}

#[test]
fn parse_formula_works_without_a_sheet() {
    let formula = tabula_engine::parse_formula("=2*(3+4)").unwrap();
    assert_eq!(formula.to_string(), "2*(3+4)");
    assert_eq!(formula.referenced_cells(), Vec::new());
    assert!(tabula_engine::parse_formula("2*+").is_err());
}
