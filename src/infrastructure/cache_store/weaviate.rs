//! Weaviate-backed cache store over the REST and GraphQL APIs

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{
    CacheEntry, CacheStore, DomainError, EntryUpdate, FeedbackState, GeneratedResponse, Mode,
    NewCacheEntry, RetrievalHit, SearchParams,
};
use crate::infrastructure::http::{HttpClientTrait, HttpMethod, HttpResponse};

/// Vector store holding one object per cache entry.
///
/// Vectors are supplied by the caller (`vectorizer: none`). Similarity is
/// `1 - cosine distance`, so scores match the in-memory backend.
///
/// The class is created on first use and the check is retried by `search` and
/// `create` until it succeeds, so a backend that was down at startup recovers.
#[derive(Debug)]
pub struct WeaviateCacheStore<C: HttpClientTrait> {
    client: C,
    base_url: String,
    class_name: String,
    auth_header: Option<String>,
    schema_ready: AtomicBool,
}

#[derive(Debug, Deserialize)]
struct StoredProperties {
    message: String,
    mode: String,
    response: String,
    #[serde(default)]
    feedback: Option<String>,
    #[serde(default)]
    rating: Option<i64>,
    #[serde(default, rename = "createdAt")]
    created_at: Option<DateTime<Utc>>,
}

impl<C: HttpClientTrait> WeaviateCacheStore<C> {
    pub fn new(client: C, base_url: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            class_name: class_name.into(),
            auth_header: None,
            schema_ready: AtomicBool::new(false),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.auth_header = Some(format!("Bearer {}", api_key.into()));
        self
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Only canonical UUIDs reach the object path
    fn object_url(&self, id: &Uuid) -> String {
        self.url(&format!("/v1/objects/{}/{}", self.class_name, id.hyphenated()))
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(auth) = &self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }
        headers
    }

    async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&Value>,
    ) -> Result<HttpResponse, DomainError> {
        self.client
            .send_json(method, url, self.headers(), body)
            .await
            .map_err(|e| DomainError::cache_unavailable(format!("weaviate: {}", e)))
    }

    fn unexpected(operation: &str, response: &HttpResponse) -> DomainError {
        DomainError::cache_unavailable(format!(
            "weaviate {} failed with HTTP {}: {}",
            operation, response.status, response.body
        ))
    }

    async fn graphql(&self, query: String) -> Result<Value, DomainError> {
        let body = json!({ "query": query });
        let response = self
            .send(HttpMethod::Post, &self.url("/v1/graphql"), Some(&body))
            .await?;

        if !response.is_success() {
            return Err(Self::unexpected("graphql", &response));
        }

        if let Some(errors) = response.body.get("errors").filter(|e| !e.is_null()) {
            return Err(DomainError::cache_unavailable(format!(
                "weaviate graphql errors: {}",
                errors
            )));
        }

        Ok(response.body)
    }

    /// Create the class if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        self.create_class_if_missing().await?;
        self.schema_ready.store(true, Ordering::Release);
        Ok(())
    }

    pub fn is_schema_ready(&self) -> bool {
        self.schema_ready.load(Ordering::Acquire)
    }

    async fn ensure_ready(&self) -> Result<(), DomainError> {
        if self.is_schema_ready() {
            return Ok(());
        }
        self.ensure_schema().await
    }

    async fn create_class_if_missing(&self) -> Result<(), DomainError> {
        let url = self.url(&format!("/v1/schema/{}", self.class_name));
        let response = self.send(HttpMethod::Get, &url, None).await?;

        if response.is_success() {
            debug!(class = %self.class_name, "Weaviate class already exists");
            return Ok(());
        }

        if !response.is_not_found() {
            return Err(Self::unexpected("schema lookup", &response));
        }

        let class = json!({
            "class": self.class_name,
            "vectorizer": "none",
            "vectorIndexConfig": { "distance": "cosine" },
            "properties": [
                { "name": "message", "dataType": ["text"] },
                { "name": "mode", "dataType": ["text"], "tokenization": "field" },
                { "name": "response", "dataType": ["text"] },
                { "name": "feedback", "dataType": ["text"], "tokenization": "field" },
                { "name": "rating", "dataType": ["int"] },
                { "name": "createdAt", "dataType": ["date"] }
            ]
        });

        let response = self
            .send(HttpMethod::Post, &self.url("/v1/schema"), Some(&class))
            .await?;

        if response.is_success() || response.body.to_string().contains("already exists") {
            info!(class = %self.class_name, "Created Weaviate class");
            Ok(())
        } else {
            Err(Self::unexpected("schema create", &response))
        }
    }

    fn parse_id(id: &str) -> Option<Uuid> {
        let parsed = Uuid::parse_str(id).ok();
        if parsed.is_none() {
            debug!(entry_id = %id, "Rejecting non-UUID entry id");
        }
        parsed
    }

    fn where_filter(mode: Option<Mode>) -> Value {
        match mode {
            Some(mode) => json!({
                "path": ["mode"],
                "operator": "Equal",
                "valueText": mode.as_str()
            }),
            None => json!({
                "path": ["id"],
                "operator": "Like",
                "valueText": "*"
            }),
        }
    }

    fn decode_entry(
        id: &str,
        properties: Value,
        vector: Vec<f32>,
    ) -> Result<CacheEntry, DomainError> {
        let props: StoredProperties = serde_json::from_value(properties)
            .map_err(|e| DomainError::storage(format!("Entry '{}' has bad properties: {}", id, e)))?;

        let mode: Mode = props.mode.parse()?;
        let response: GeneratedResponse = serde_json::from_str(&props.response)
            .map_err(|e| DomainError::storage(format!("Entry '{}' has bad response: {}", id, e)))?;

        let entry = CacheEntry::restore(
            id,
            props.message,
            mode,
            response,
            vector,
            props.rating.unwrap_or(0),
            props
                .feedback
                .as_deref()
                .map(FeedbackState::parse_lenient)
                .unwrap_or_default(),
        );

        Ok(match props.created_at {
            Some(created_at) => entry.with_created_at(created_at),
            None => entry,
        })
    }
}

fn graphql_literal(value: &Value) -> String {
    // GraphQL input objects use bare keys and bare enum values for `operator`
    match value {
        Value::Object(map) => {
            let fields: Vec<String> = map
                .iter()
                .map(|(key, value)| {
                    if key == "operator" {
                        format!("{}: {}", key, value.as_str().unwrap_or_default())
                    } else {
                        format!("{}: {}", key, graphql_literal(value))
                    }
                })
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(graphql_literal).collect();
            format!("[{}]", items.join(", "))
        }
        other => other.to_string(),
    }
}

fn parse_vector(value: Option<&Value>) -> Vec<f32> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_f64)
                .map(|v| v as f32)
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl<C: HttpClientTrait> CacheStore for WeaviateCacheStore<C> {
    async fn search(
        &self,
        vector: &[f32],
        params: &SearchParams,
    ) -> Result<Vec<RetrievalHit>, DomainError> {
        self.ensure_ready().await?;

        let max_distance = (1.0 - params.min_similarity).clamp(0.0, 2.0);
        let query = format!(
            "{{ Get {{ {class}(nearVector: {{vector: {vector}, distance: {distance}}}, where: {filter}, limit: {limit}) {{ message mode response feedback rating createdAt _additional {{ id distance vector }} }} }} }}",
            class = self.class_name,
            vector = json!(vector),
            distance = max_distance,
            filter = graphql_literal(&Self::where_filter(Some(params.mode))),
            limit = params.limit,
        );

        let body = self.graphql(query).await?;
        let objects = body["data"]["Get"][&self.class_name]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let mut hits = Vec::with_capacity(objects.len());

        for mut object in objects {
            let additional = object
                .as_object_mut()
                .and_then(|o| o.remove("_additional"))
                .unwrap_or(Value::Null);

            let Some(id) = additional["id"].as_str() else {
                warn!("Skipping Weaviate object without id");
                continue;
            };

            let distance = additional["distance"].as_f64().unwrap_or(2.0) as f32;
            let similarity = (1.0 - distance).clamp(0.0, 1.0);

            if !params.accepts(similarity) {
                continue;
            }

            match Self::decode_entry(id, object, parse_vector(additional.get("vector"))) {
                Ok(entry) if entry.mode() == params.mode => {
                    hits.push(RetrievalHit::new(entry, similarity));
                }
                Ok(_) => {}
                Err(e) => warn!(entry_id = %id, error = %e, "Skipping unreadable cache entry"),
            }
        }

        hits.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        hits.truncate(params.limit);

        Ok(hits)
    }

    async fn create(&self, entry: NewCacheEntry) -> Result<String, DomainError> {
        self.ensure_ready().await?;

        let id = Uuid::new_v4().to_string();
        let response = serde_json::to_string(&entry.response)
            .map_err(|e| DomainError::internal(format!("Failed to encode response: {}", e)))?;

        let object = json!({
            "class": self.class_name,
            "id": id,
            "properties": {
                "message": entry.message,
                "mode": entry.mode.as_str(),
                "response": response,
                "feedback": FeedbackState::Neutral.as_str(),
                "rating": 0,
                "createdAt": Utc::now().to_rfc3339(),
            },
            "vector": entry.vector,
        });

        let result = self
            .send(HttpMethod::Post, &self.url("/v1/objects"), Some(&object))
            .await?;

        if !result.is_success() {
            return Err(Self::unexpected("create", &result));
        }

        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<CacheEntry>, DomainError> {
        let Some(uuid) = Self::parse_id(id) else {
            return Ok(None);
        };

        let url = format!("{}?include=vector", self.object_url(&uuid));
        let response = self.send(HttpMethod::Get, &url, None).await?;

        if response.is_not_found() {
            return Ok(None);
        }

        if !response.is_success() {
            return Err(Self::unexpected("get", &response));
        }

        let mut body = response.body;
        let vector = parse_vector(body.get("vector"));
        let properties = body
            .get_mut("properties")
            .map(Value::take)
            .unwrap_or(Value::Null);

        Self::decode_entry(&uuid.to_string(), properties, vector).map(Some)
    }

    async fn update(&self, id: &str, update: EntryUpdate) -> Result<(), DomainError> {
        let Some(uuid) = Self::parse_id(id) else {
            return Err(DomainError::not_found(format!("Cache entry '{}' not found", id)));
        };

        if update.is_empty() {
            return Ok(());
        }

        let mut properties = serde_json::Map::new();
        if let Some(rating) = update.rating {
            properties.insert("rating".into(), json!(rating));
        }
        if let Some(state) = update.feedback_state {
            properties.insert("feedback".into(), json!(state.as_str()));
        }

        let body = json!({ "class": self.class_name, "properties": properties });
        let response = self
            .send(HttpMethod::Patch, &self.object_url(&uuid), Some(&body))
            .await?;

        if response.is_not_found() {
            return Err(DomainError::not_found(format!("Cache entry '{}' not found", id)));
        }

        if !response.is_success() {
            return Err(Self::unexpected("update", &response));
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let Some(uuid) = Self::parse_id(id) else {
            return Ok(false);
        };

        let response = self
            .send(HttpMethod::Delete, &self.object_url(&uuid), None)
            .await?;

        if response.is_not_found() {
            return Ok(false);
        }

        if !response.is_success() {
            return Err(Self::unexpected("delete", &response));
        }

        Ok(true)
    }

    async fn clear(&self, mode: Option<Mode>) -> Result<usize, DomainError> {
        let body = json!({
            "match": {
                "class": self.class_name,
                "where": Self::where_filter(mode),
            },
            "output": "minimal",
        });

        let response = self
            .send(HttpMethod::Delete, &self.url("/v1/batch/objects"), Some(&body))
            .await?;

        if !response.is_success() {
            return Err(Self::unexpected("clear", &response));
        }

        let deleted = response.body["results"]["successful"].as_u64().unwrap_or(0) as usize;
        info!(class = %self.class_name, mode = ?mode, deleted, "Cleared cache entries");

        Ok(deleted)
    }

    async fn count(&self, mode: Option<Mode>) -> Result<usize, DomainError> {
        let filter = match mode {
            Some(mode) => format!("(where: {})", graphql_literal(&Self::where_filter(Some(mode)))),
            None => String::new(),
        };
        let query = format!(
            "{{ Aggregate {{ {class}{filter} {{ meta {{ count }} }} }} }}",
            class = self.class_name,
            filter = filter,
        );

        let body = self.graphql(query).await?;
        let count = body["data"]["Aggregate"][&self.class_name][0]["meta"]["count"]
            .as_u64()
            .unwrap_or(0);

        Ok(count as usize)
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        let response = self
            .send(HttpMethod::Get, &self.url("/v1/.well-known/ready"), None)
            .await?;

        if response.is_success() {
            Ok(())
        } else {
            Err(Self::unexpected("readiness", &response))
        }
    }
}
