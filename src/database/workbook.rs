use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use umya_spreadsheet::Spreadsheet;

use super::table::{Row, SheetRecord, Table};
use crate::error::{Error, Result};

pub const WRITE_ATTEMPTS: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_millis(700);

/// The shared workbook. Every sheet is read and written whole; all access in
/// this process is serialised by one async mutex so read-modify-write cycles
/// made through [`WorkbookStore::update`] cannot lose each other's changes.
#[derive(Clone)]
pub struct WorkbookStore {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl WorkbookStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Missing or unreadable workbooks and sheets read as empty tables.
    pub async fn read(&self, sheet: &str) -> Table {
        let _guard = self.lock.lock().await;
        self.read_unlocked(sheet).await
    }

    pub async fn records<T: SheetRecord>(&self) -> Vec<T> {
        self.read(T::SHEET).await.records()
    }

    /// Replaces one sheet, leaving the others as they are.
    pub async fn write(&self, sheet: &str, table: &Table) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.write_unlocked(sheet, table.clone()).await
    }

    /// Reads `sheet`, applies `mutate`, and writes the result back while holding
    /// the store lock. Nothing is written when `mutate` fails.
    pub async fn update<T, F>(&self, sheet: &str, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut Table) -> Result<T>,
    {
        let _guard = self.lock.lock().await;
        let mut table = self.read_unlocked(sheet).await;
        let out = mutate(&mut table)?;
        self.write_unlocked(sheet, table).await?;
        Ok(out)
    }

    /// Removes matching rows from several sheets in one workbook rewrite.
    pub async fn remove_from_sheets(
        &self,
        sheets: &[&str],
        pred: impl Fn(&Row) -> bool,
    ) -> Result<usize> {
        let _guard = self.lock.lock().await;
        let mut tables = Vec::with_capacity(sheets.len());
        let mut removed = 0;
        for sheet in sheets {
            let mut table = self.read_unlocked(sheet).await;
            let n = table.remove_where(&pred);
            if n > 0 {
                removed += n;
                tables.push((sheet.to_string(), table));
            }
        }
        if !tables.is_empty() {
            self.write_tables_unlocked(tables).await?;
        }
        Ok(removed)
    }

    async fn read_unlocked(&self, sheet: &str) -> Table {
        let path = self.path.clone();
        let name = sheet.to_string();
        let result = tokio::task::spawn_blocking(move || read_sheet(&path, &name)).await;
        match result {
            Ok(Ok(table)) => table,
            Ok(Err(e)) => {
                tracing::warn!(sheet, "Reading sheet failed, treating as empty: {}", e);
                Table::default()
            }
            Err(e) => {
                tracing::warn!(sheet, "Sheet reader task failed: {}", e);
                Table::default()
            }
        }
    }

    async fn write_unlocked(&self, sheet: &str, table: Table) -> Result<()> {
        self.write_tables_unlocked(vec![(sheet.to_string(), table)])
            .await
    }

    async fn write_tables_unlocked(&self, tables: Vec<(String, Table)>) -> Result<()> {
        let sheets: Vec<String> = tables.iter().map(|(name, _)| name.clone()).collect();
        for attempt in 1..=WRITE_ATTEMPTS {
            let path = self.path.clone();
            let batch = tables.clone();
            let outcome = tokio::task::spawn_blocking(move || write_sheets(&path, &batch))
                .await
                .map_err(|e| Error::Internal(format!("Sheet writer task failed: {}", e)))?;

            match outcome {
                Ok(()) => {
                    tracing::debug!(?sheets, attempt, "Workbook written");
                    return Ok(());
                }
                Err(WriteFailure::Locked(e)) if attempt < WRITE_ATTEMPTS => {
                    tracing::warn!(?sheets, attempt, "Workbook locked, retrying: {}", e);
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(WriteFailure::Locked(e)) => {
                    tracing::error!(?sheets, "Workbook still locked after {} attempts: {}", WRITE_ATTEMPTS, e);
                    return Err(Error::Storage(format!(
                        "Could not save {}: the workbook is locked by another program",
                        sheets.join(", ")
                    )));
                }
                Err(WriteFailure::Fatal(msg)) => {
                    tracing::error!(?sheets, "Workbook write failed: {}", msg);
                    return Err(Error::Storage(format!(
                        "Could not save {}: {}",
                        sheets.join(", "),
                        msg
                    )));
                }
            }
        }
        Err(Error::Storage("Workbook write did not run".into()))
    }
}

enum WriteFailure {
    Locked(std::io::Error),
    Fatal(String),
}

impl From<std::io::Error> for WriteFailure {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            ErrorKind::PermissionDenied | ErrorKind::WouldBlock => WriteFailure::Locked(e),
            _ => WriteFailure::Fatal(e.to_string()),
        }
    }
}

fn load_book(path: &Path) -> std::result::Result<Option<Spreadsheet>, WriteFailure> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(bytes), true)
        .map(Some)
        .map_err(|e| WriteFailure::Fatal(format!("workbook is unreadable: {}", e)))
}

fn read_sheet(path: &Path, sheet: &str) -> std::result::Result<Table, String> {
    let book = match load_book(path) {
        Ok(Some(book)) => book,
        Ok(None) => return Ok(Table::default()),
        Err(WriteFailure::Locked(e)) => return Err(e.to_string()),
        Err(WriteFailure::Fatal(msg)) => return Err(msg),
    };
    let Some(ws) = book.get_sheet_by_name(sheet) else {
        return Ok(Table::default());
    };

    let (max_col, max_row) = ws.get_highest_column_and_row();
    let header: Vec<(u32, String)> = (1..=max_col)
        .filter_map(|col| {
            let name = ws
                .get_cell((col, 1))
                .map(|c| c.get_value().trim().to_string())
                .unwrap_or_default();
            (!name.is_empty()).then_some((col, name))
        })
        .collect();

    let mut table = Table {
        columns: header.iter().map(|(_, name)| name.clone()).collect(),
        rows: Vec::new(),
    };
    for row_idx in 2..=max_row {
        let row: Row = header
            .iter()
            .map(|(col, name)| {
                let value = ws
                    .get_cell((*col, row_idx))
                    .map(|c| c.get_value().to_string())
                    .unwrap_or_default();
                (name.clone(), value)
            })
            .collect();
        if row.values().any(|v| !v.trim().is_empty()) {
            table.rows.push(row);
        }
    }
    Ok(table)
}

fn write_sheets(path: &Path, tables: &[(String, Table)]) -> std::result::Result<(), WriteFailure> {
    let mut book = load_book(path)?.unwrap_or_else(umya_spreadsheet::new_file_empty_worksheet);

    for (name, table) in tables {
        if book.get_sheet_by_name(name).is_some() {
            book.remove_sheet_by_name(name)
                .map_err(|e| WriteFailure::Fatal(e.to_string()))?;
        }
        let ws = book
            .new_sheet(name)
            .map_err(|e| WriteFailure::Fatal(e.to_string()))?;
        for (c, column) in table.columns.iter().enumerate() {
            ws.get_cell_mut((c as u32 + 1, 1)).set_value_string(column);
        }
        for (r, row) in table.rows.iter().enumerate() {
            for (c, column) in table.columns.iter().enumerate() {
                let value = Table::cell(row, column);
                if !value.is_empty() {
                    ws.get_cell_mut((c as u32 + 1, r as u32 + 2))
                        .set_value_string(value);
                }
            }
        }
    }

    let mut buf = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut buf)
        .map_err(|e| WriteFailure::Fatal(format!("serialising workbook: {}", e)))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("xlsx.tmp");
    std::fs::write(&tmp, buf.into_inner())?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
