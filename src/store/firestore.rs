// Firestore backing store.
// One document per todo in a single collection, using the Firestore REST v1
// typed-value encoding (stringValue / integerValue / timestampValue).
// `currentDocument.exists` preconditions turn writes against a missing
// document into NotFound instead of silent upserts or no-op deletes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::FirestoreConfig;
use crate::error::{Result, TidoError};
use crate::todo::{ListOutcome, Priority, Status, TodoDraft, TodoItem};

use super::TodoStore;
use super::http::{authenticated_client, check_response};

const FIRESTORE_API_BASE: &str = "https://firestore.googleapis.com/v1";

/// Documents per list page; the API caps pages, so listing paginates.
const PAGE_SIZE: u32 = 300;

/// A Firestore typed value. Only the kinds this schema uses are modeled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Value {
    #[serde(skip_serializing_if = "Option::is_none")]
    string_value: Option<String>,
    /// Firestore serializes 64-bit integers as JSON strings.
    #[serde(skip_serializing_if = "Option::is_none")]
    integer_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp_value: Option<DateTime<Utc>>,
}

impl Value {
    fn string(s: impl Into<String>) -> Self {
        Self {
            string_value: Some(s.into()),
            ..Default::default()
        }
    }

    fn integer(i: i64) -> Self {
        Self {
            integer_value: Some(i.to_string()),
            ..Default::default()
        }
    }

    fn timestamp(dt: DateTime<Utc>) -> Self {
        Self {
            timestamp_value: Some(dt),
            ..Default::default()
        }
    }
}

type Fields = BTreeMap<String, Value>;

#[derive(Debug, Deserialize)]
struct Document {
    /// Full resource name; the document id is its last path segment.
    name: String,
    #[serde(default)]
    fields: Option<Fields>,
}

#[derive(Debug, Serialize)]
struct DocumentBody {
    fields: Fields,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Option<Vec<Document>>,
    next_page_token: Option<String>,
}

#[derive(Debug)]
pub struct FirestoreStore {
    client: Client,
    project_id: String,
    collection: String,
}

impl FirestoreStore {
    pub fn new(config: &FirestoreConfig, token: &str) -> Result<Self> {
        Ok(Self {
            client: authenticated_client(token)?,
            project_id: config.project_id.clone(),
            collection: config.collection.clone(),
        })
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            FIRESTORE_API_BASE, self.project_id, self.collection
        )
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    /// Query parameters shared by replace and remove: every write requires
    /// the document to already exist.
    fn precondition() -> [(&'static str, &'static str); 1] {
        [("currentDocument.exists", "true")]
    }
}

impl TodoStore for FirestoreStore {
    async fn fetch_all(&self) -> Result<ListOutcome> {
        let mut outcome = ListOutcome::default();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.collection_url())
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            let response = check_response(request.send().await?, None).await?;
            let page: ListDocumentsResponse = response.json().await?;

            for doc in page.documents.unwrap_or_default() {
                match item_from_document(&doc) {
                    Ok(item) => outcome.items.push(item),
                    Err(err) => {
                        warn!(%err, document = %doc.name, "skipping unmappable document");
                        outcome.skipped += 1;
                    }
                }
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(outcome)
    }

    async fn fetch(&self, id: &str) -> Result<TodoItem> {
        let response = self.client.get(self.document_url(id)).send().await?;
        let response = check_response(response, Some(id)).await?;
        let doc: Document = response.json().await?;
        item_from_document(&doc)
    }

    async fn insert(&self, draft: &TodoDraft) -> Result<TodoItem> {
        let body = DocumentBody {
            fields: fields_from_draft(draft),
        };
        let response = self
            .client
            .post(self.collection_url())
            .json(&body)
            .send()
            .await?;
        let response = check_response(response, None).await?;
        let doc: Document = response.json().await?;
        // Firestore assigned the id; read it back off the resource name.
        Ok(draft.clone().into_item(document_id(&doc.name).to_string()))
    }

    async fn replace(&self, item: &TodoItem) -> Result<TodoItem> {
        let body = DocumentBody {
            fields: fields_from_item(item),
        };
        let response = self
            .client
            .patch(self.document_url(&item.id))
            .query(&Self::precondition())
            .json(&body)
            .send()
            .await?;
        check_response(response, Some(&item.id)).await?;
        Ok(item.clone())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.document_url(id))
            .query(&Self::precondition())
            .send()
            .await?;
        check_response(response, Some(id)).await?;
        Ok(())
    }
}

fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn field<'a>(fields: &'a Fields, name: &str) -> Result<&'a Value> {
    fields
        .get(name)
        .ok_or_else(|| TidoError::SchemaMismatch(format!("missing field {:?}", name)))
}

fn string_field<'a>(fields: &'a Fields, name: &str) -> Result<&'a str> {
    field(fields, name)?
        .string_value
        .as_deref()
        .ok_or_else(|| TidoError::SchemaMismatch(format!("field {:?} is not a string", name)))
}

fn timestamp_field(fields: &Fields, name: &str) -> Result<DateTime<Utc>> {
    field(fields, name)?
        .timestamp_value
        .ok_or_else(|| TidoError::SchemaMismatch(format!("field {:?} is not a timestamp", name)))
}

/// Map a Firestore document to a TodoItem.
fn item_from_document(doc: &Document) -> Result<TodoItem> {
    let fields = doc
        .fields
        .as_ref()
        .ok_or_else(|| TidoError::SchemaMismatch("document has no fields".into()))?;

    let task = string_field(fields, "task")?;
    let status_str = string_field(fields, "status")?;
    let status = Status::parse(status_str)
        .ok_or_else(|| TidoError::SchemaMismatch(format!("invalid status {:?}", status_str)))?;

    let score_raw = field(fields, "score")?
        .integer_value
        .as_deref()
        .ok_or_else(|| TidoError::SchemaMismatch("field \"score\" is not an integer".into()))?;
    let score: u8 = score_raw
        .parse()
        .map_err(|_| TidoError::SchemaMismatch(format!("non-numeric score {:?}", score_raw)))?;
    let priority = Priority::from_score(score)
        .ok_or_else(|| TidoError::SchemaMismatch(format!("score {} is not a priority", score)))?;

    Ok(TodoItem {
        id: document_id(&doc.name).to_string(),
        task: task.to_string(),
        status,
        priority,
        created_at: timestamp_field(fields, "created_at")?,
        updated_at: timestamp_field(fields, "updated_at")?,
    })
}

fn fields_from_draft(draft: &TodoDraft) -> Fields {
    let mut fields = Fields::new();
    fields.insert("task".into(), Value::string(&draft.task));
    fields.insert("status".into(), Value::string(draft.status.as_str()));
    fields.insert("score".into(), Value::integer(draft.priority.score() as i64));
    fields.insert("created_at".into(), Value::timestamp(draft.created_at));
    fields.insert("updated_at".into(), Value::timestamp(draft.updated_at));
    fields
}

fn fields_from_item(item: &TodoItem) -> Fields {
    let mut fields = Fields::new();
    fields.insert("task".into(), Value::string(&item.task));
    fields.insert("status".into(), Value::string(item.status.as_str()));
    fields.insert("score".into(), Value::integer(item.priority.score() as i64));
    fields.insert("created_at".into(), Value::timestamp(item.created_at));
    fields.insert("updated_at".into(), Value::timestamp(item.updated_at));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Document {
        serde_json::from_value(serde_json::json!({
            "name": "projects/p/databases/(default)/documents/todos/abc123",
            "fields": {
                "task": { "stringValue": "Buy milk" },
                "status": { "stringValue": "completed" },
                "score": { "integerValue": "7" },
                "created_at": { "timestampValue": "2024-03-01T09:30:00Z" },
                "updated_at": { "timestampValue": "2024-03-02T10:00:00Z" },
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_item_from_document_coerces_types() {
        let item = item_from_document(&sample_document()).unwrap();
        assert_eq!(item.id, "abc123");
        assert_eq!(item.task, "Buy milk");
        assert_eq!(item.status, Status::Completed);
        assert_eq!(item.priority, Priority::MediumHigh);
        assert!(item.updated_at > item.created_at);
    }

    #[test]
    fn test_missing_field_is_schema_mismatch() {
        let mut doc = sample_document();
        doc.fields.as_mut().unwrap().remove("task");
        let err = item_from_document(&doc).unwrap_err();
        assert!(matches!(err, TidoError::SchemaMismatch(_)));
    }

    #[test]
    fn test_wrong_value_kind_is_schema_mismatch() {
        let mut doc = sample_document();
        doc.fields
            .as_mut()
            .unwrap()
            .insert("score".into(), Value::string("10"));
        let err = item_from_document(&doc).unwrap_err();
        assert!(matches!(err, TidoError::SchemaMismatch(_)));
    }

    #[test]
    fn test_fields_from_draft_match_wire_encoding() {
        let now = Utc::now();
        let draft = TodoDraft {
            task: "encode me".into(),
            status: Status::Pending,
            priority: Priority::Low,
            created_at: now,
            updated_at: now,
        };
        let fields = fields_from_draft(&draft);
        assert_eq!(fields["task"].string_value.as_deref(), Some("encode me"));
        assert_eq!(fields["status"].string_value.as_deref(), Some("pending"));
        assert_eq!(fields["score"].integer_value.as_deref(), Some("1"));
        assert_eq!(fields["created_at"].timestamp_value, Some(now));
    }

    #[test]
    fn test_document_id_takes_last_segment() {
        assert_eq!(document_id("projects/p/databases/(default)/documents/todos/xyz"), "xyz");
        assert_eq!(document_id("bare"), "bare");
    }
}
