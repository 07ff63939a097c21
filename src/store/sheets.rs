// Google Sheets backing store.
// One worksheet row per todo: id | task | status | score | created_at | updated_at,
// with a header in row 1 and data from row 2. Timestamps use the
// "%Y-%m-%d %H:%M:%S" format the production sheet carries.

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::config::SheetsConfig;
use crate::error::{Result, TidoError};
use crate::todo::{ListOutcome, Priority, Status, TodoDraft, TodoItem};

use super::TodoStore;
use super::http::{authenticated_client, check_response};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Row 1 is the header, so data row `i` (0-based) lives in sheet row `i + 2`.
const FIRST_DATA_ROW: usize = 2;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `spreadsheets.values` payload for reads and writes. The target range
/// always rides in the URL, so the body only carries the cells.
#[derive(Debug, Serialize, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Option<Vec<Vec<String>>>,
}

#[derive(Debug)]
pub struct SheetsStore {
    client: Client,
    spreadsheet_id: String,
    sheet_name: String,
    /// Numeric grid id of the worksheet, needed for row deletion.
    sheet_gid: u64,
}

impl SheetsStore {
    pub fn new(config: &SheetsConfig, token: &str) -> Result<Self> {
        Ok(Self {
            client: authenticated_client(token)?,
            spreadsheet_id: config.spreadsheet_id.clone(),
            sheet_name: config.sheet_name.clone(),
            sheet_gid: config.sheet_gid,
        })
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/{}/values/{}",
            SHEETS_API_BASE, self.spreadsheet_id, range
        )
    }

    fn data_range(&self) -> String {
        format!("{}!A{}:F", self.sheet_name, FIRST_DATA_ROW)
    }

    /// Read all data rows, keeping their sheet order.
    async fn read_rows(&self) -> Result<Vec<Vec<String>>> {
        let response = self.client.get(self.values_url(&self.data_range())).send().await?;
        let response = check_response(response, None).await?;
        let range: ValueRange = response.json().await?;
        Ok(range.values.unwrap_or_default())
    }

    /// Locate the data row holding `id`. Returns the 0-based data index.
    async fn find_row(&self, id: &str) -> Result<(usize, TodoItem)> {
        let rows = self.read_rows().await?;
        for (index, row) in rows.iter().enumerate() {
            if row.first().map(String::as_str) == Some(id) {
                return Ok((index, item_from_row(row)?));
            }
        }
        Err(TidoError::NotFound(id.to_string()))
    }
}

impl TodoStore for SheetsStore {
    async fn fetch_all(&self) -> Result<ListOutcome> {
        let rows = self.read_rows().await?;
        let mut outcome = ListOutcome::default();
        for row in &rows {
            match item_from_row(row) {
                Ok(item) => outcome.items.push(item),
                Err(err) => {
                    warn!(%err, "skipping unmappable worksheet row");
                    outcome.skipped += 1;
                }
            }
        }
        Ok(outcome)
    }

    async fn fetch(&self, id: &str) -> Result<TodoItem> {
        let (_, item) = self.find_row(id).await?;
        Ok(item)
    }

    async fn insert(&self, draft: &TodoDraft) -> Result<TodoItem> {
        // Sheets has no row key of its own, so the store mints one.
        let item = draft.clone().into_item(Uuid::new_v4().to_string());
        let url = format!("{}:append", self.values_url(&self.data_range()));
        let body = ValueRange {
            values: Some(vec![row_from_item(&item)]),
        };
        let response = self
            .client
            .post(&url)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body)
            .send()
            .await?;
        check_response(response, None).await?;
        Ok(item)
    }

    async fn replace(&self, item: &TodoItem) -> Result<TodoItem> {
        let (index, _) = self.find_row(&item.id).await?;
        let row_number = index + FIRST_DATA_ROW;
        let range = format!("{}!A{}:F{}", self.sheet_name, row_number, row_number);
        let body = ValueRange {
            values: Some(vec![row_from_item(item)]),
        };
        let response = self
            .client
            .put(self.values_url(&range))
            .query(&[("valueInputOption", "RAW")])
            .json(&body)
            .send()
            .await?;
        check_response(response, None).await?;
        Ok(item.clone())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let (index, _) = self.find_row(id).await?;
        // deleteDimension indexes are 0-based over the whole grid, header included.
        let start = index + FIRST_DATA_ROW - 1;
        let url = format!("{}/{}:batchUpdate", SHEETS_API_BASE, self.spreadsheet_id);
        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": self.sheet_gid,
                        "dimension": "ROWS",
                        "startIndex": start,
                        "endIndex": start + 1,
                    }
                }
            }]
        });
        let response = self.client.post(&url).json(&body).send().await?;
        check_response(response, None).await?;
        Ok(())
    }
}

fn cell<'a>(row: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    row.get(index)
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| TidoError::SchemaMismatch(format!("missing {} column", name)))
}

/// Map a worksheet row to a TodoItem, coercing cell strings to typed fields.
fn item_from_row(row: &[String]) -> Result<TodoItem> {
    let id = cell(row, 0, "id")?;
    let task = cell(row, 1, "task")?;
    let status_str = cell(row, 2, "status")?;
    let score_str = cell(row, 3, "score")?;

    let status = Status::parse(status_str)
        .ok_or_else(|| TidoError::SchemaMismatch(format!("invalid status {:?}", status_str)))?;

    let score: u8 = score_str
        .parse()
        .map_err(|_| TidoError::SchemaMismatch(format!("non-numeric score {:?}", score_str)))?;
    let priority = Priority::from_score(score)
        .ok_or_else(|| TidoError::SchemaMismatch(format!("score {} is not a priority", score)))?;

    let created_at = parse_timestamp(cell(row, 4, "created_at")?)?;
    let updated_at = parse_timestamp(cell(row, 5, "updated_at")?)?;

    Ok(TodoItem {
        id: id.to_string(),
        task: task.to_string(),
        status,
        priority,
        created_at,
        updated_at,
    })
}

fn row_from_item(item: &TodoItem) -> Vec<String> {
    vec![
        item.id.clone(),
        item.task.clone(),
        item.status.as_str().to_string(),
        item.priority.score().to_string(),
        format_timestamp(item.created_at),
        format_timestamp(item.updated_at),
    ]
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|_| TidoError::SchemaMismatch(format!("invalid timestamp {:?}", s)))?;
    Ok(naive.and_utc())
}

fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> Vec<String> {
        vec![
            "row-1".into(),
            "Buy milk".into(),
            "pending".into(),
            "10".into(),
            "2024-03-01 09:30:00".into(),
            "2024-03-02 10:00:00".into(),
        ]
    }

    #[test]
    fn test_item_from_row_coerces_types() {
        let item = item_from_row(&sample_row()).unwrap();
        assert_eq!(item.id, "row-1");
        assert_eq!(item.task, "Buy milk");
        assert_eq!(item.status, Status::Pending);
        assert_eq!(item.priority, Priority::High);
        assert_eq!(format_timestamp(item.created_at), "2024-03-01 09:30:00");
        assert!(item.updated_at > item.created_at);
    }

    #[test]
    fn test_row_roundtrip() {
        let item = item_from_row(&sample_row()).unwrap();
        assert_eq!(row_from_item(&item), sample_row());
    }

    #[test]
    fn test_short_row_is_schema_mismatch() {
        let mut row = sample_row();
        row.truncate(4);
        let err = item_from_row(&row).unwrap_err();
        assert!(matches!(err, TidoError::SchemaMismatch(_)));
    }

    #[test]
    fn test_bad_score_is_schema_mismatch() {
        let mut row = sample_row();
        row[3] = "3".into();
        assert!(matches!(
            item_from_row(&row).unwrap_err(),
            TidoError::SchemaMismatch(_)
        ));
        row[3] = "urgent".into();
        assert!(matches!(
            item_from_row(&row).unwrap_err(),
            TidoError::SchemaMismatch(_)
        ));
    }

    #[test]
    fn test_bad_status_is_schema_mismatch() {
        let mut row = sample_row();
        row[2] = "done".into();
        let err = item_from_row(&row).unwrap_err();
        assert!(matches!(err, TidoError::SchemaMismatch(_)));
    }

    #[test]
    fn test_bad_timestamp_is_schema_mismatch() {
        let mut row = sample_row();
        row[4] = "yesterday".into();
        let err = item_from_row(&row).unwrap_err();
        assert!(matches!(err, TidoError::SchemaMismatch(_)));
    }
}
