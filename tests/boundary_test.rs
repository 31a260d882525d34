//! Boundary Tests for xlshift
//!
//! Degenerate and edge-case schedule layouts. None of these are errors:
//! missing scan signals shrink the discovered regions, possibly to zero,
//! and extraction simply produces smaller (or empty) results.

use rust_xlsxwriter::{Color, Format, Workbook, XlsxError};
use serde_json::json;
use std::io::Cursor;
use xlshift::ExtractorBuilder;

// Helper module for generating boundary test fixtures
mod fixtures {
    use super::*;

    pub fn name_fill() -> Format {
        Format::new().set_background_color(Color::Yellow)
    }

    /// Dates present, but no background-filled name rows at all
    pub fn generate_no_filled_names() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("1")?;

        worksheet.write_number(2, 10, 1.0)?;
        worksheet.write_number(2, 11, 2.0)?;
        // Names without the fill signal
        worksheet.write_string(3, 9, "Alice")?;
        worksheet.write_string(4, 9, "Bob")?;

        Ok(workbook.save_to_buffer()?)
    }

    /// Filled names, but the first date column holds non-numeric text
    pub fn generate_non_numeric_dates() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("1")?;
        let fill = name_fill();

        worksheet.write_string(2, 10, "Mon")?;
        worksheet.write_string(2, 11, "Tue")?;
        worksheet.write_string_with_format(3, 9, "Alice", &fill)?;
        worksheet.write_string(3, 10, "D")?;

        Ok(workbook.save_to_buffer()?)
    }

    /// An unfilled row sits between two filled name rows
    pub fn generate_name_gap() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("1")?;
        let fill = name_fill();

        worksheet.write_number(2, 10, 1.0)?;
        worksheet.write_string_with_format(3, 9, "Alice", &fill)?;
        worksheet.write_string(4, 9, "Bob")?;
        worksheet.write_string_with_format(5, 9, "Carol", &fill)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// A non-numeric cell sits between two numeric date cells
    pub fn generate_date_gap() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("1")?;
        let fill = name_fill();

        worksheet.write_number(2, 10, 1.0)?;
        worksheet.write_string(2, 11, "x")?;
        worksheet.write_number(2, 12, 3.0)?;
        worksheet.write_string_with_format(3, 9, "Alice", &fill)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// Date cells stored as text and booleans, which still coerce to numbers
    pub fn generate_coercible_dates() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("1")?;
        let fill = name_fill();

        worksheet.write_number(2, 10, 1.0)?;
        worksheet.write_string(2, 11, "2")?;
        worksheet.write_boolean(2, 12, true)?;
        worksheet.write_string_with_format(3, 9, "Alice", &fill)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// A filled name cell with no value at all (style-only blank cell)
    pub fn generate_filled_blank_name() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("1")?;
        let fill = name_fill();

        worksheet.write_number(2, 10, 1.0)?;
        worksheet.write_blank(3, 9, &fill)?;
        worksheet.write_string(3, 10, "D")?;

        Ok(workbook.save_to_buffer()?)
    }

    /// A month sheet with no cells at all
    pub fn generate_empty_month_sheet() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("5")?;
        // No cells written - completely empty sheet
        Ok(workbook.save_to_buffer()?)
    }

    /// A workbook whose only sheet keeps the default non-numeric name
    pub fn generate_default_sheet_name() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let _worksheet = workbook.add_worksheet();
        Ok(workbook.save_to_buffer()?)
    }
}

#[test]
fn test_no_filled_names_yields_empty_data() {
    let buffer = fixtures::generate_no_filled_names().unwrap();
    let extractor = ExtractorBuilder::new().build().unwrap();

    let months = extractor.extract(Cursor::new(buffer), 2024).unwrap();

    assert_eq!(months.len(), 1);
    assert!(months[0].data.is_empty());
}

#[test]
fn test_non_numeric_first_date_yields_empty_shift_lists() {
    let buffer = fixtures::generate_non_numeric_dates().unwrap();
    let extractor = ExtractorBuilder::new().build().unwrap();

    let months = extractor.extract(Cursor::new(buffer), 2024).unwrap();

    assert_eq!(months[0].data.len(), 1);
    assert!(months[0].data[0].shifts.is_empty());
}

#[test]
fn test_name_scan_truncates_at_unfilled_row() {
    let buffer = fixtures::generate_name_gap().unwrap();
    let extractor = ExtractorBuilder::new().build().unwrap();

    let months = extractor.extract(Cursor::new(buffer), 2024).unwrap();
    let names: Vec<&str> = months[0]
        .data
        .iter()
        .map(|person| person.name.as_str())
        .collect();

    // The scan stops at the first unfilled row; "Carol" after the gap is lost
    assert_eq!(names, vec!["Alice"]);
}

#[test]
fn test_date_scan_truncates_at_non_numeric_cell() {
    let buffer = fixtures::generate_date_gap().unwrap();
    let extractor = ExtractorBuilder::new().build().unwrap();

    let months = extractor.extract(Cursor::new(buffer), 2024).unwrap();
    let dates: Vec<f64> = months[0].data[0].shifts.iter().map(|s| s.date).collect();

    assert_eq!(dates, vec![1.0]);
}

#[test]
fn test_date_scan_coerces_text_and_booleans() {
    let buffer = fixtures::generate_coercible_dates().unwrap();
    let extractor = ExtractorBuilder::new().build().unwrap();

    let months = extractor.extract(Cursor::new(buffer), 2024).unwrap();
    let dates: Vec<f64> = months[0].data[0].shifts.iter().map(|s| s.date).collect();

    assert_eq!(dates, vec![1.0, 2.0, 1.0]);
}

#[test]
fn test_filled_blank_name_cell_is_still_a_person() {
    let buffer = fixtures::generate_filled_blank_name().unwrap();
    let extractor = ExtractorBuilder::new().build().unwrap();

    let months = extractor.extract(Cursor::new(buffer), 2024).unwrap();

    assert_eq!(months[0].data.len(), 1);
    assert_eq!(months[0].data[0].name, "");
    assert_eq!(months[0].data[0].shifts.len(), 1);
    assert_eq!(months[0].data[0].shifts[0].value, Some(json!("D")));
}

#[test]
fn test_empty_month_sheet_yields_empty_month() {
    let buffer = fixtures::generate_empty_month_sheet().unwrap();
    let extractor = ExtractorBuilder::new().build().unwrap();

    let months = extractor.extract(Cursor::new(buffer), 2023).unwrap();

    assert_eq!(months.len(), 1);
    assert_eq!(months[0].year, 2023);
    assert_eq!(months[0].month, 5);
    assert!(months[0].data.is_empty());
}

#[test]
fn test_workbook_without_month_sheets_yields_nothing() {
    let buffer = fixtures::generate_default_sheet_name().unwrap();
    let extractor = ExtractorBuilder::new().build().unwrap();

    let months = extractor.extract(Cursor::new(buffer), 2024).unwrap();

    assert!(months.is_empty());
}
