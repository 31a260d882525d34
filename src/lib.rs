//! xlshift - Pure-Rust Excel shift schedule extractor and JSON converter
//!
//! This crate reads shift-schedule workbooks (XLSX), locates the schedule
//! block on each month sheet by scanning cell background fills and numeric
//! date headers, reshapes it into per-person, per-date records, and writes
//! the result as JSON.
//!
//! Cell values are decoded with `calamine`; background-fill information is
//! not exposed by `calamine`, so it is resolved by parsing the workbook's
//! internal XML (`xl/styles.xml` and the worksheet parts) directly.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use xlshift::{ExtractorBuilder, JsonReport, UserFilter};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create an extractor with default settings (anchor cell J3)
//!     let extractor = ExtractorBuilder::new().build()?;
//!
//!     // The year is derived from the 4-digit number in the filename
//!     let months = extractor.extract_path("roster_2024.xlsx")?;
//!
//!     // Emit every person's schedule as JSON
//!     let report = JsonReport::build(months, &UserFilter::All);
//!     let output = File::create("shifts.json")?;
//!     report.render(output)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Filtering to a Single Person
//!
//! ```rust,no_run
//! use xlshift::{ExtractorBuilder, JsonReport, UserFilter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = ExtractorBuilder::new().build()?;
//! let months = extractor.extract_path("roster_2024.xlsx")?;
//!
//! // Exact, case-sensitive name match; absent names yield empty shift lists
//! let report = JsonReport::build(months, &UserFilter::Name("Alice".to_string()));
//! println!("{}", report.to_json_string()?);
//! # Ok(())
//! # }
//! ```
//!
//! # In-Memory Conversion
//!
//! For in-memory conversion, use `Cursor`:
//!
//! ```rust,no_run
//! use std::io::Cursor;
//! use xlshift::ExtractorBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = ExtractorBuilder::new().build()?;
//! let excel_data: Vec<u8> = vec![]; // Your Excel file bytes
//! let months = extractor.extract(Cursor::new(excel_data), 2024)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Custom Anchor Cell
//!
//! ```rust,no_run
//! use xlshift::ExtractorBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Schedules whose grid starts elsewhere can override the anchor
//! let extractor = ExtractorBuilder::new()
//!     .with_anchor("B2")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

mod api;
mod builder;
mod error;
mod extractor;
mod grid;
mod output;
mod parser;
mod schedule;
mod security;
mod types;

// 公開API
pub use api::UserFilter;
pub use builder::{Extractor, ExtractorBuilder};
pub use error::XlShiftError;
pub use extractor::year_from_filename;
pub use output::JsonReport;
pub use schedule::{filter_months, FilteredMonthData, MonthData, Shift, ShiftData};
