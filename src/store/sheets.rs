use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{error_for_status, locate_bookable, SchedulingStore, ServiceAccountAuth, StoreError, StoreResult};
use crate::models::{SlotIdentifier, SlotRecord};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
// Row 1 holds the column headers.
const FIRST_DATA_ROW: usize = 2;

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Schedule kept in a Google Sheet with columns
/// `date | time | subject | teacher | student | contact`.
pub struct GoogleSheetsStore {
    client: reqwest::Client,
    auth: ServiceAccountAuth,
    spreadsheet_id: String,
    sheet_name: String,
}

impl GoogleSheetsStore {
    pub fn new(
        client: reqwest::Client,
        auth: ServiceAccountAuth,
        spreadsheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth,
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
        }
    }

    fn values_url(&self, range: &str, suffix: &str) -> StoreResult<Url> {
        let mut url = Url::parse(SHEETS_API_BASE)
            .map_err(|e| StoreError::Malformed(format!("bad Sheets base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Malformed("Sheets base URL cannot be a base".to_string()))?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&format!("{}{}", range, suffix));
        Ok(url)
    }

    async fn write_booking(&self, position: usize, student_name: &str, contact_info: &str) -> StoreResult<()> {
        let range = booking_range(&self.sheet_name, position);
        let url = self.values_url(&range, "")?;
        let token = self.auth.access_token().await?;

        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "range": range, "values": [[student_name, contact_info]] }))
            .send()
            .await?;
        error_for_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl SchedulingStore for GoogleSheetsStore {
    async fn list_slots(&self) -> StoreResult<Vec<SlotRecord>> {
        let url = self.values_url(&format!("{}!A{}:F", quote_sheet_name(&self.sheet_name), FIRST_DATA_ROW), "")?;
        let token = self.auth.access_token().await?;

        let response = self.client.get(url).bearer_auth(token).send().await?;
        let response = error_for_status(response).await?;
        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(format!("schedule values: {}", e)))?;

        Ok(parse_rows(&range.values))
    }

    async fn book_if_free(
        &self,
        slot: &SlotIdentifier,
        student_name: &str,
        contact_info: &str,
    ) -> StoreResult<()> {
        let current = self.list_slots().await?;
        let record = locate_bookable(&current, slot)?;

        tracing::debug!(row = record.position, "Writing booking to schedule sheet");
        self.write_booking(record.position, student_name, contact_info).await
    }

    async fn append_slot(&self, slot: &SlotIdentifier) -> StoreResult<()> {
        self.append_slots(std::slice::from_ref(slot)).await.map(|_| ())
    }

    async fn append_slots(&self, slots: &[SlotIdentifier]) -> StoreResult<usize> {
        if slots.is_empty() {
            return Ok(0);
        }

        let url = self.values_url(&format!("{}!A:F", quote_sheet_name(&self.sheet_name)), ":append")?;
        let token = self.auth.access_token().await?;
        let rows: Vec<Vec<String>> = slots.iter().map(open_row).collect();

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&json!({ "values": rows }))
            .send()
            .await?;
        error_for_status(response).await?;
        Ok(slots.len())
    }
}

fn cell_text(cell: Option<&Value>) -> String {
    match cell {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Converts raw sheet rows into records; blank rows keep their position.
fn parse_rows(rows: &[Vec<Value>]) -> Vec<SlotRecord> {
    rows.iter()
        .enumerate()
        .filter(|(_, cells)| cells.iter().any(|c| !cell_text(Some(c)).trim().is_empty()))
        .map(|(index, cells)| SlotRecord {
            position: index + FIRST_DATA_ROW,
            slot: SlotIdentifier::new(
                cell_text(cells.first()),
                cell_text(cells.get(1)),
                cell_text(cells.get(2)),
                cell_text(cells.get(3)),
            ),
            student_name: cell_text(cells.get(4)),
            contact_info: cell_text(cells.get(5)),
        })
        .collect()
}

fn open_row(slot: &SlotIdentifier) -> Vec<String> {
    let slot = slot.normalized();
    vec![slot.date, slot.time, slot.subject, slot.teacher, String::new(), String::new()]
}

fn booking_range(sheet_name: &str, position: usize) -> String {
    format!("{}!E{}:F{}", quote_sheet_name(sheet_name), position, position)
}

/// A1 notation needs the tab name quoted, with embedded quotes doubled.
fn quote_sheet_name(sheet_name: &str) -> String {
    format!("'{}'", sheet_name.replace('\'', "''"))
}
