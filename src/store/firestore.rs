//! A task store that talks to Firestore through its REST API
//!
//! Documents of the collection look like
//! `{"title": {"stringValue": ...}, "due": {"stringValue": "2024-03-05T14:30:00.000Z"}, "completed": {"booleanValue": false}}`

use std::error::Error;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use url::Url;

use crate::config::FirestoreSettings;
use crate::subscription::{feed_channel, publish_if_changed, FeedSender, FeedState, Subscription};
use crate::task::{parse_iso_string, to_iso_string, Task, TaskFields, TaskId, TaskPatch};
use crate::traits::TaskStore;

/// How many documents are requested per page when listing the collection
const PAGE_SIZE: u32 = 300;


/// A [`TaskStore`] backed by a Firestore collection.
///
/// Firestore's REST API has no live queries, so subscriptions re-read the whole collection periodically,
/// and only publish a new state when it differs from the previous one.
#[derive(Clone, Debug)]
pub struct FirestoreStore {
    http: reqwest::Client,
    /// `.../projects/{project}/databases/(default)/documents/{collection}`
    collection_url: Url,
    collection: String,
    api_key: String,
    poll_interval: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Value>,
    next_page_token: Option<String>,
}

impl FirestoreStore {
    /// Create a store. This does not start a connection
    pub fn new(settings: &FirestoreSettings) -> Result<Self, Box<dyn Error>> {
        let mut collection_url = Url::parse(&settings.base_url)?;
        collection_url.path_segments_mut()
            .map_err(|_| format!("{} cannot be used as a base URL", settings.base_url))?
            .pop_if_empty()
            .extend(&["projects", settings.project_id.as_str(), "databases", "(default)", "documents", settings.collection.as_str()]);

        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;

        Ok(Self {
            http,
            collection_url,
            collection: settings.collection.clone(),
            api_key: settings.api_key.clone(),
            poll_interval: settings.poll_interval(),
        })
    }

    fn authenticated(&self, mut url: Url) -> Url {
        url.query_pairs_mut().append_pair("key", &self.api_key);
        url
    }

    fn document_url(&self, id: &TaskId) -> Result<Url, Box<dyn Error>> {
        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|_| "Invalid collection URL")?
            .push(id.as_str());
        Ok(self.authenticated(url))
    }

    async fn list_page(&self, page_token: Option<&str>) -> Result<ListDocumentsResponse, Box<dyn Error>> {
        let mut url = self.authenticated(self.collection_url.clone());
        url.query_pairs_mut().append_pair("pageSize", &PAGE_SIZE.to_string());
        if let Some(token) = page_token {
            url.query_pairs_mut().append_pair("pageToken", token);
        }

        let response = self.http.get(url).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Re-read the collection every `poll_interval`, until every receiver is gone
    async fn poll(self, sender: FeedSender) {
        let mut interval = tokio::time::interval(self.poll_interval);
        loop {
            interval.tick().await;
            if sender.is_closed() {
                log::debug!("Nobody listens to {} anymore, stopping", self.collection);
                break;
            }

            let new_state = FeedState::from_read(self.get_tasks().await);
            if let FeedState::Failed(err) = &new_state {
                log::warn!("Unable to read collection {}: {}", self.collection, err);
            }
            let description = new_state.to_string();
            if publish_if_changed(&sender, new_state) {
                log::debug!("Collection {} changed: {}", self.collection, description);
            }
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, Box<dyn Error>> {
    let status = response.status();
    if status.is_success() == false {
        let text = response.text().await.unwrap_or_default();
        return Err(format!("Unexpected HTTP status code {:?}: {}", status, text).into());
    }
    Ok(response)
}

#[async_trait]
impl TaskStore for FirestoreStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn get_tasks(&self) -> Result<Vec<Task>, Box<dyn Error>> {
        let mut tasks = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.list_page(page_token.as_deref()).await?;
            for document in &page.documents {
                match decode_document(document) {
                    Ok(task) => tasks.push(task),
                    Err(err) => {
                        log::warn!("Invalid document in {} ({}). Ignoring it", self.collection, err);
                    },
                }
            }

            match page.next_page_token {
                Some(token) if token.is_empty() == false => page_token = Some(token),
                _ => break,
            }
        }

        log::debug!("Read {} task(s) from {}", tasks.len(), self.collection);
        Ok(tasks)
    }

    async fn get_task(&self, id: &TaskId) -> Result<Option<Task>, Box<dyn Error>> {
        let url = self.document_url(id)?;
        let response = self.http.get(url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response).await?;
        let document: Value = response.json().await?;
        Ok(Some(decode_document(&document)?))
    }

    async fn create(&self, fields: TaskFields) -> Result<TaskId, Box<dyn Error>> {
        let body = encode_fields(Some(&fields.title), Some(&fields.due), Some(fields.completed));
        let url = self.authenticated(self.collection_url.clone());

        let response = self.http.post(url).json(&body).send().await?;
        let response = check_status(response).await?;
        let document: Value = response.json().await?;
        let name = document["name"].as_str().ok_or("Created document has no name")?;
        let id = document_id(name)?;
        log::info!("Created task {} in {}", id, self.collection);
        Ok(id)
    }

    async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<(), Box<dyn Error>> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut url = self.document_url(id)?;
        for path in patch.field_paths() {
            url.query_pairs_mut().append_pair("updateMask.fieldPaths", path);
        }
        url.query_pairs_mut().append_pair("currentDocument.exists", "true");
        let body = encode_fields(patch.title.as_deref(), patch.due.as_ref(), patch.completed);

        let response = self.http.patch(url).json(&body).send().await?;
        check_status(response).await?;
        log::debug!("Updated {:?} of task {}", patch.field_paths(), id);
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> Result<(), Box<dyn Error>> {
        let url = self.document_url(id)?;
        let response = self.http.delete(url).send().await?;
        check_status(response).await?;
        log::info!("Deleted task {} from {}", id, self.collection);
        Ok(())
    }

    async fn subscribe(&self) -> Subscription {
        let (sender, receiver) = feed_channel();
        let store = self.clone();
        let feeder = tokio::spawn(store.poll(sender));
        Subscription::new(receiver, Some(feeder))
    }
}


/// Build the JSON body of a document that contains the given fields
fn encode_fields(title: Option<&str>, due: Option<&DateTime<Utc>>, completed: Option<bool>) -> Value {
    let mut fields = Map::new();
    if let Some(title) = title {
        fields.insert("title".to_string(), json!({ "stringValue": title }));
    }
    if let Some(due) = due {
        fields.insert("due".to_string(), json!({ "stringValue": to_iso_string(due) }));
    }
    if let Some(completed) = completed {
        fields.insert("completed".to_string(), json!({ "booleanValue": completed }));
    }
    json!({ "fields": fields })
}

/// The ID of a document is the last segment of its resource name
fn document_id(name: &str) -> Result<TaskId, Box<dyn Error>> {
    match name.rsplit('/').next() {
        Some(id) if id.is_empty() == false => Ok(TaskId::from(id)),
        _ => Err(format!("Invalid document name {:?}", name).into()),
    }
}

fn decode_document(document: &Value) -> Result<Task, Box<dyn Error>> {
    let name = document["name"].as_str().ok_or("Document has no name")?;
    let id = document_id(name)?;
    let fields = &document["fields"];

    let title = fields["title"]["stringValue"].as_str().unwrap_or_default().to_string();
    // Other clients may have written a native timestamp
    let due_text = fields["due"]["stringValue"].as_str()
        .or_else(|| fields["due"]["timestampValue"].as_str())
        .ok_or_else(|| format!("Document {} has no due date", id))?;
    let due = parse_iso_string(due_text)?;
    let completed = fields["completed"]["booleanValue"].as_bool().unwrap_or(false);

    Ok(Task::new(id, TaskFields { title, due, completed }))
}
