//! `CatalogRemote` over the catalog service's JSON HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client, Method, RequestBuilder, Response,
};
use serde::Serialize;
use serde_json::Value;
use shared::{
    domain::{
        Category, CategoryDraft, CategoryId, EntityKind, Item, ItemDraft, ItemId, Location,
        LocationDraft, LocationId,
    },
    error::{ApiErrorBody, ShapeError},
    protocol::{CategoryDraftPayload, ItemDraftPayload, LocationDraftPayload},
};
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::{ClientSetupError, RemoteError},
    normalize::{decode_category, decode_collection, decode_item, decode_location},
    remote::CatalogRemote,
};

/// Trims, drops trailing slashes and defaults the scheme to `http://`.
pub fn normalize_server_url(raw: &str) -> Result<String, ClientSetupError> {
    let invalid = |reason: &str| ClientSetupError::InvalidServerUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(invalid("empty"));
    }
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let parsed = Url::parse(&candidate).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    Ok(candidate)
}

#[derive(Debug, Clone, Default)]
pub struct HttpClientOptions {
    pub timeout: Option<Duration>,
    /// Sent as `Authorization: Bearer <token>` on every request.
    pub api_token: Option<String>,
}

pub struct HttpCatalogClient {
    http: Client,
    server_url: String,
}

impl HttpCatalogClient {
    pub fn new(server_url: &str) -> Result<Self, ClientSetupError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_options(
        server_url: &str,
        options: HttpClientOptions,
    ) -> Result<Self, ClientSetupError> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(token) = options.api_token.filter(|token| !token.trim().is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .map_err(|err| ClientSetupError::Http(err.to_string()))?;
            value.set_sensitive(true);
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }
        let http = builder
            .build()
            .map_err(|err| ClientSetupError::Http(err.to_string()))?;
        Self::with_client(http, server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, ClientSetupError> {
        Ok(Self {
            http,
            server_url: normalize_server_url(server_url)?,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn request(&self, method: Method, route: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{route}", self.server_url))
    }

    async fn send(&self, request: RequestBuilder, route: &str) -> Result<Response, RemoteError> {
        let response = request.send().await.map_err(|err| {
            warn!(route, "http: request failed: {err}");
            RemoteError::Transport(err.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(route, status = status.as_u16(), "http: request succeeded");
            return Ok(response);
        }

        // The body is best effort; a missing or non-JSON body only loses the message.
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|body| body.server_message().map(str::to_string));
        warn!(
            route,
            status = status.as_u16(),
            message = message.as_deref().unwrap_or(""),
            "http: request rejected"
        );
        Err(RemoteError::rejected(status.as_u16(), message))
    }

    async fn read_json(response: Response) -> Result<Value, RemoteError> {
        response
            .json::<Value>()
            .await
            .map_err(|err| RemoteError::Decode(err.to_string()))
    }

    async fn list<T>(
        &self,
        route: &str,
        kind: EntityKind,
        decode_one: fn(Value) -> Result<T, ShapeError>,
    ) -> Result<Vec<T>, RemoteError> {
        let response = self.send(self.request(Method::GET, route), route).await?;
        match Self::read_json(response).await? {
            Value::Array(values) => Ok(decode_collection(kind, values, decode_one)),
            other => Err(RemoteError::Decode(format!(
                "expected a {kind} listing, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// A 2xx response is a completed write whatever its body says; the echoed
    /// entity is decoded when present and skipped with a warning otherwise.
    async fn write<P, T>(
        &self,
        method: Method,
        route: &str,
        payload: &P,
        decode_one: fn(Value) -> Result<T, ShapeError>,
    ) -> Result<Option<T>, RemoteError>
    where
        P: Serialize + ?Sized + Sync,
    {
        let request = self.request(method, route).json(payload);
        let response = self.send(request, route).await?;
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(route, "http: write accepted but body unreadable: {err}");
                return Ok(None);
            }
        };
        if body.trim().is_empty() {
            debug!(route, "http: write accepted without a body");
            return Ok(None);
        }
        let decoded = serde_json::from_str::<Value>(&body)
            .map_err(|err| err.to_string())
            .and_then(|value| decode_one(value).map_err(|err| err.to_string()));
        match decoded {
            Ok(entity) => Ok(Some(entity)),
            Err(reason) => {
                warn!(route, "http: write accepted, echoed entity ignored: {reason}");
                Ok(None)
            }
        }
    }

    async fn delete(&self, route: &str) -> Result<(), RemoteError> {
        self.send(self.request(Method::DELETE, route), route)
            .await
            .map(drop)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl CatalogRemote for HttpCatalogClient {
    async fn list_items(&self) -> Result<Vec<Item>, RemoteError> {
        self.list("/api/items/getAllItems", EntityKind::Item, decode_item)
            .await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RemoteError> {
        self.list(
            "/api/categories/getAllCategories",
            EntityKind::Category,
            decode_category,
        )
        .await
    }

    async fn list_locations(&self) -> Result<Vec<Location>, RemoteError> {
        self.list(
            "/api/locations/getAllLocations",
            EntityKind::Location,
            decode_location,
        )
        .await
    }

    async fn create_item(&self, draft: &ItemDraft) -> Result<Option<Item>, RemoteError> {
        self.write(
            Method::POST,
            "/api/items/addItem",
            &ItemDraftPayload::from(draft),
            decode_item,
        )
        .await
    }

    async fn update_item(
        &self,
        item_id: ItemId,
        draft: &ItemDraft,
    ) -> Result<Option<Item>, RemoteError> {
        self.write(
            Method::PUT,
            &format!("/api/items/updateItem/{item_id}"),
            &ItemDraftPayload::from(draft),
            decode_item,
        )
        .await
    }

    async fn delete_item(&self, item_id: ItemId) -> Result<(), RemoteError> {
        self.delete(&format!("/api/items/deleteItem/{item_id}"))
            .await
    }

    async fn create_category(
        &self,
        draft: &CategoryDraft,
    ) -> Result<Option<Category>, RemoteError> {
        self.write(
            Method::POST,
            "/api/categories/createCategory",
            &CategoryDraftPayload::from(draft),
            decode_category,
        )
        .await
    }

    async fn delete_category(&self, category_id: CategoryId) -> Result<(), RemoteError> {
        self.delete(&format!("/api/categories/deleteCategory/{category_id}"))
            .await
    }

    async fn create_location(
        &self,
        draft: &LocationDraft,
    ) -> Result<Option<Location>, RemoteError> {
        self.write(
            Method::POST,
            "/api/locations/createLocation",
            &LocationDraftPayload::from(draft),
            decode_location,
        )
        .await
    }

    async fn delete_location(&self, location_id: LocationId) -> Result<(), RemoteError> {
        self.delete(&format!("/api/locations/deleteLocation/{location_id}"))
            .await
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
