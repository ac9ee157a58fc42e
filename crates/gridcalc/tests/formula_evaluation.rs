//! Tests for formula evaluation with cell references

use gridcalc::prelude::*;
use gridcalc::{parse_formula, FormulaValue};
use pretty_assertions::assert_eq;

fn pos(a1: &str) -> Position {
    a1.parse().unwrap()
}

/// Test basic formula evaluation without cell references
#[test]
fn test_evaluate_simple_formulas() {
    let mut sheet = Sheet::new();

    sheet.set_cell(pos("A1"), "=1+2*3").unwrap();
    assert_eq!(sheet.value_at(pos("A1")).unwrap(), CellValue::Number(7.0));

    sheet.set_cell(pos("A2"), "=(1+2)*3").unwrap();
    assert_eq!(sheet.value_at(pos("A2")).unwrap(), CellValue::Number(9.0));

    sheet.set_cell(pos("A3"), "=-(4-10)/4").unwrap();
    assert_eq!(sheet.value_at(pos("A3")).unwrap(), CellValue::Number(1.5));
}

/// Test formula evaluation with cell references
#[test]
fn test_evaluate_with_cell_references() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "10").unwrap();
    sheet.set_cell(pos("A2"), "20").unwrap();
    sheet.set_cell(pos("A3"), "30").unwrap();
    sheet.set_cell(pos("B1"), "5").unwrap();

    sheet.set_cell(pos("C1"), "=A1").unwrap();
    assert_eq!(sheet.value_at(pos("C1")).unwrap(), CellValue::Number(10.0));

    sheet.set_cell(pos("C2"), "=A1+B1").unwrap();
    assert_eq!(sheet.value_at(pos("C2")).unwrap(), CellValue::Number(15.0));

    sheet.set_cell(pos("C3"), "=(A1+A2+A3)/B1").unwrap();
    assert_eq!(sheet.value_at(pos("C3")).unwrap(), CellValue::Number(12.0));
}

/// Test that formulas read through other formulas
#[test]
fn test_evaluate_chained_formulas() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "2").unwrap();
    sheet.set_cell(pos("A2"), "=A1*A1").unwrap();
    sheet.set_cell(pos("A3"), "=A2*A2").unwrap();
    sheet.set_cell(pos("A4"), "=A3-A2-A1").unwrap();

    assert_eq!(sheet.value_at(pos("A4")).unwrap(), CellValue::Number(10.0));
}

/// Test how referenced text is read as a number
#[test]
fn test_evaluate_text_references() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "  3.5").unwrap();
    sheet.set_cell(pos("A2"), "'4").unwrap();
    sheet.set_cell(pos("A3"), "four").unwrap();

    sheet.set_cell(pos("B1"), "=A1*2").unwrap();
    sheet.set_cell(pos("B2"), "=A2+1").unwrap();
    sheet.set_cell(pos("B3"), "=A3+1").unwrap();

    assert_eq!(sheet.value_at(pos("B1")).unwrap(), CellValue::Number(7.0));
    assert_eq!(sheet.value_at(pos("B2")).unwrap(), CellValue::Number(5.0));
    assert_eq!(
        sheet.value_at(pos("B3")).unwrap(),
        CellValue::Error(CellError::Value)
    );
}

/// Test that evaluation errors are values and propagate downstream
#[test]
fn test_evaluate_errors() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=1/0").unwrap();
    sheet.set_cell(pos("A2"), "=A1+1").unwrap();
    sheet.set_cell(pos("A3"), "=1/(A4-A4)").unwrap();

    assert_eq!(sheet.value_at(pos("A1")).unwrap(), CellValue::Error(CellError::Div0));
    assert_eq!(sheet.value_at(pos("A2")).unwrap(), CellValue::Error(CellError::Div0));
    assert_eq!(sheet.value_at(pos("A3")).unwrap(), CellValue::Error(CellError::Div0));
    assert_eq!(sheet.value_at(pos("A1")).unwrap().to_string(), "#DIV/0!");
}

/// Test that positions never written read as zero through a formula and empty directly
#[test]
fn test_unset_cells_read_as_zero() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=Z99+1").unwrap();

    assert_eq!(sheet.value_at(pos("A1")).unwrap(), CellValue::Number(1.0));
    assert_eq!(sheet.value_at(pos("Z99")).unwrap(), CellValue::Empty);
    assert_eq!(sheet.text_at(pos("Z99")).unwrap(), "");
    assert_eq!(sheet.text_at(pos("Y50")).unwrap(), "");
}

/// Test that texts round-trip, with formulas in canonical form
#[test]
fn test_text_round_trip() {
    let mut sheet = Sheet::new();

    for text in ["hello", "42", "'=not a formula", "=", "=A1+B2*3"] {
        sheet.set_cell(pos("C3"), text).unwrap();
        assert_eq!(sheet.text_at(pos("C3")).unwrap(), text);
    }

    sheet.set_cell(pos("C3"), "= ( A1 + B2 ) * 3 ").unwrap();
    assert_eq!(sheet.text_at(pos("C3")).unwrap(), "=(A1+B2)*3");
    let canonical = sheet.text_at(pos("C3")).unwrap();
    assert_eq!(
        parse_formula(&canonical[1..]).unwrap(),
        parse_formula(" ( A1 + B2 ) * 3 ").unwrap()
    );
}

/// Test the escape marker
#[test]
fn test_escaped_text() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "'=1+2").unwrap();

    let cell = sheet.get_cell(pos("A1")).unwrap().unwrap();
    assert!(!cell.is_formula());
    assert_eq!(cell.text(), "'=1+2");
    assert_eq!(cell.value(), CellValue::text("=1+2"));
}

/// Test that a lone formula sign is literal text
#[test]
fn test_formula_sign_alone_is_text() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=").unwrap();

    let cell = sheet.get_cell(pos("A1")).unwrap().unwrap();
    assert!(!cell.is_formula());
    assert_eq!(cell.value(), CellValue::text("="));
}

/// Test that malformed formulas are rejected without touching the cell
#[test]
fn test_parse_errors() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=2").unwrap();

    for bad in ["=1+", "=(1", "=A0", "=a1", "=1 2", "=ZZZZ1", "=#"] {
        let result = sheet.set_cell(pos("A1"), bad);
        assert!(
            matches!(result, Err(Error::FormulaParse(_))),
            "{bad} should fail to parse"
        );
        assert_eq!(sheet.text_at(pos("A1")).unwrap(), "=2");
    }
}

/// Test the lower-level formula API re-exported from the formula crate
#[test]
fn test_formula_api() {
    let formula = parse_formula("B2*(A1+A1)").unwrap();
    assert_eq!(formula.referenced_cells(), &[pos("A1"), pos("B2")]);
    assert_eq!(formula.expression(), "B2*(A1+A1)");
    assert_eq!(formula.evaluate(&|_| Ok(3.0)), FormulaValue::Number(18.0));
}
