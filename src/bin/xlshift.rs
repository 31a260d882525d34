//! xlshift command-line tool
//!
//! Converts Excel shift-schedule workbooks to JSON. Month sheets are scanned
//! from the anchor cell J3: rows below it with a background fill are person
//! names, columns to its right with numeric values are dates.

use std::env;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process;

use xlshift::{year_from_filename, ExtractorBuilder, JsonReport, UserFilter, XlShiftError};

fn main() {
    let args: Vec<String> = env::args().collect();

    let Some(input_arg) = args.get(1) else {
        eprintln!("Error: an input filename argument is required");
        print_usage(&args[0]);
        process::exit(1);
    };
    let Some(output_arg) = args.get(2) else {
        eprintln!("Error: an output filename argument is required");
        process::exit(1);
    };
    let Some(filter_arg) = args.get(3) else {
        eprintln!("Error: a filter user argument is required (use \"all\" to disable filtering)");
        process::exit(1);
    };

    let input_files = split_list(input_arg);
    let output_files = split_list(output_arg);

    if input_files.is_empty() {
        eprintln!("Error: at least one input filename is required");
        process::exit(1);
    }
    if output_files.len() != 1 {
        eprintln!("Error: exactly one output filename is required");
        process::exit(1);
    }
    let output_file = &output_files[0];

    // Validate every input filename before any workbook is opened, so that
    // no partial output is written on bad arguments
    for input_file in &input_files {
        if year_from_filename(input_file).is_none() {
            eprintln!(
                "Error: input filename '{}' must contain a 4-digit year",
                input_file
            );
            process::exit(1);
        }
    }

    let filter = UserFilter::from_arg(filter_arg);

    match run(&input_files, output_file, &filter) {
        Ok(entries) => {
            println!("Wrote {} month entries to {}", entries, output_file);
        }
        Err(error) => {
            handle_error(error);
            process::exit(1);
        }
    }
}

fn run(
    input_files: &[String],
    output_file: &str,
    filter: &UserFilter,
) -> Result<usize, XlShiftError> {
    let extractor = ExtractorBuilder::new().build()?;

    // Files are parsed one at a time, each with its own filename-derived year;
    // months are concatenated in input-file order
    let months = extractor.extract_paths(input_files)?;
    let report = JsonReport::build(months, filter);

    if let Some(parent) = Path::new(output_file).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let output = File::create(output_file)?;
    let mut writer = BufWriter::new(output);
    report.render(&mut writer)?;
    writer.flush()?;

    Ok(report.len())
}

/// Split a comma-separated argument, trimming entries and dropping empties.
fn split_list(arg: &str) -> Vec<String> {
    arg.split(',')
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn print_usage(program: &str) {
    eprintln!();
    eprintln!("Usage: {} <inputFilenames> <outputFilename> <filterUser>", program);
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <inputFilenames>   comma-separated Excel files; each filename must contain a 4-digit year");
    eprintln!("  <outputFilename>   JSON output path (parent directories are created if absent)");
    eprintln!("  <filterUser>       exact person name, or \"all\" for every person");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} roster_2024.xlsx shifts.json all", program);
    eprintln!("  {} a_2023.xlsx,b_2024.xlsx out/shifts.json Alice", program);
}

fn handle_error(error: XlShiftError) {
    match error {
        XlShiftError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that the file exists and you have permission to access it.");
        }
        XlShiftError::Parse(parse_err) => {
            eprintln!("Parse Error: {}", parse_err);
            eprintln!("The file may not be a valid Excel file or may be corrupted.");
        }
        XlShiftError::Config(msg) => {
            eprintln!("Configuration Error: {}", msg);
        }
        XlShiftError::Utf8(utf8_err) => {
            eprintln!("UTF-8 Conversion Error: {}", utf8_err);
            eprintln!("The file contains invalid UTF-8 characters.");
        }
        XlShiftError::Zip(msg) => {
            eprintln!("ZIP Archive Error: {}", msg);
            eprintln!("The file may be corrupted or not a valid ZIP archive.");
        }
        XlShiftError::ParseInt(parse_int_err) => {
            eprintln!("Number Parse Error: {}", parse_int_err);
            eprintln!("Failed to parse a number in the file.");
        }
        XlShiftError::SecurityViolation(msg) => {
            eprintln!("Security Violation: {}", msg);
            eprintln!("The file violates security constraints (e.g., file size limit).");
        }
    }
}
