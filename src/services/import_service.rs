use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Reader};

use crate::error::{Error, Result};
use crate::utils::files::extension;

pub const IMPORT_REQUIRED: &[&str] = &["Candidate Name", "Role Interviewed For"];
pub const IMPORT_OPTIONAL: &[&str] = &[
    "Candidate Email",
    "Phone Number",
    "Total Experience",
    "Relevant Domain Experience",
    "Current Organization",
    "Current Role/Title",
    "Previous Organizations/Roles",
    "Screening Notes",
    "Highest Education",
    "DOB",
    "Marital Status",
    "Family Status (if Married)",
    "Children – Number & Age",
    "Current Location",
    "Desired Location",
    "Nationality",
    "Iqama Status",
    "Profession in Iqama",
    "Current Compensation",
    "Expected Compensation",
    "Notice Period",
    "Ever Interviewed by the client before? (Yes/No)",
    "Recorded By",
    "Gov ID / Iqama / Passport #",
];
pub const REQUESTOR_COLUMN: &str = "Requestor Username";

const TEMPLATE_SAMPLE: &[&str] = &[
    "Jane Doe",
    "Facilities Supervisor",
    "jane@example.com",
    "0500000000",
    "7",
    "5",
    "ACME Co.",
    "Supervisor",
    "Company X; Company Y",
    "Good profile",
    "Bachelor's Degree",
    "1995-06-20",
    "Single",
    "",
    "–",
    "Dammam",
    "Riyadh",
    "Saudi",
    "Valid",
    "Engineer",
    "8000",
    "9000",
    "Immediate",
    "No",
    "Zahra",
    "1234567890",
    "",
];

pub fn import_columns() -> Vec<&'static str> {
    IMPORT_REQUIRED
        .iter()
        .chain(IMPORT_OPTIONAL)
        .chain(std::iter::once(&REQUESTOR_COLUMN))
        .copied()
        .collect()
}

/// Single-row CSV showing the accepted import columns.
pub fn template_csv() -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(import_columns())?;
    writer.write_record(TEMPLATE_SAMPLE)?;
    writer
        .into_inner()
        .map_err(|e| Error::Internal(format!("Failed to build template: {}", e)))
}

/// Reads the first non-empty data row of an uploaded `.xlsx`/`.xls`/`.csv`
/// file, keyed by header, and checks the required columns.
pub fn parse_first_row(filename: &str, data: &[u8]) -> Result<HashMap<String, String>> {
    let rows = match extension(filename).as_str() {
        "xlsx" | "xls" => read_spreadsheet(data)?,
        "csv" => read_csv(data)?,
        _ => return Err(Error::Import("Use .xlsx or .csv.".into())),
    };

    let row = rows
        .into_iter()
        .find(|r| r.values().any(|v| !v.trim().is_empty()))
        .ok_or_else(|| Error::Import("No data found.".into()))?;

    for column in IMPORT_REQUIRED {
        if row.get(*column).map_or(true, |v| v.trim().is_empty()) {
            return Err(Error::Import(format!("Missing \"{}\" in first row.", column)));
        }
    }
    Ok(row)
}

fn keyed(headers: &[String], values: impl Iterator<Item = String>) -> HashMap<String, String> {
    headers
        .iter()
        .zip(values)
        .filter(|(h, _)| !h.is_empty())
        .map(|(h, v)| (h.clone(), v.trim().to_string()))
        .collect()
}

fn read_spreadsheet(data: &[u8]) -> Result<Vec<HashMap<String, String>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data.to_vec()))
        .map_err(|e| Error::Import(format!("File read error: {}", e)))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Import("No data found.".into()))?
        .map_err(|e| Error::Import(format!("File read error: {}", e)))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => return Ok(Vec::new()),
    };
    Ok(rows
        .map(|row| keyed(&headers, row.iter().map(|c| c.to_string())))
        .collect())
}

fn read_csv(data: &[u8]) -> Result<Vec<HashMap<String, String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(keyed(&headers, record.iter().map(str::to_string)));
    }
    Ok(rows)
}
