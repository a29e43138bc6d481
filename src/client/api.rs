//! Generic API client.
//!
//! Every verb comes in two forms:
//!
//! - a raw form (`get`, `post`, ...) returning the [`ApiResponse`] whatever the
//!   status code;
//! - a typed form (`get_json`, `post_json`, ...) deserializing the body into
//!   `T`, yielding `None` for an empty body or one that does not decode.
//!
//! Transport faults are returned as errors from both forms.
//!
//! # Examples
//!
//! ```ignore
//! use nifi_api_harness::{ApiClient, ClientConfig, Post};
//!
//! #[tokio::main]
//! async fn main() -> nifi_api_harness::Result<()> {
//!     let client = ApiClient::new(ClientConfig::new("https://jsonplaceholder.typicode.com"))?;
//!
//!     let response = client.get("/posts/1", None).await?;
//!     println!("Status: {}", response.status());
//!
//!     let post: Option<Post> = client.get_json("/posts/1", None).await?;
//!     println!("Title: {:?}", post.map(|p| p.title));
//!     Ok(())
//! }
//! ```

use crate::client::config::ClientConfig;
use crate::client::transport::Transport;
use crate::client::utils::deserialize_body;
use crate::error::Result;
use crate::types::{ApiRequest, ApiResponse, Headers};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Verb-level client over a [`Transport`].
#[derive(Clone)]
pub struct ApiClient {
    transport: Transport,
}

impl ApiClient {
    /// Create a client for the configured base URL.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(ApiClient {
            transport: Transport::new(config)?,
        })
    }

    /// Execute a fully built request.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.transport.execute(&request).await
    }

    /// Execute a request and deserialize the body.
    pub async fn execute_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Option<T>> {
        let response = self.execute(request).await?;
        Ok(deserialize_body(response.content()))
    }

    /// GET `path`.
    pub async fn get(&self, path: &str, headers: Option<&Headers>) -> Result<ApiResponse> {
        self.execute(ApiRequest::new(Method::GET, path).with_headers(headers)).await
    }

    /// GET `path` and deserialize the body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        headers: Option<&Headers>,
    ) -> Result<Option<T>> {
        self.execute_json(ApiRequest::new(Method::GET, path).with_headers(headers)).await
    }

    /// POST `body` as JSON to `path`.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        headers: Option<&Headers>,
    ) -> Result<ApiResponse> {
        self.execute(with_body(Method::POST, path, body, headers)?).await
    }

    /// POST `body` as JSON to `path` and deserialize the body.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        headers: Option<&Headers>,
    ) -> Result<Option<T>> {
        self.execute_json(with_body(Method::POST, path, body, headers)?).await
    }

    /// PUT `body` as JSON to `path`.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        headers: Option<&Headers>,
    ) -> Result<ApiResponse> {
        self.execute(with_body(Method::PUT, path, body, headers)?).await
    }

    /// PUT `body` as JSON to `path` and deserialize the body.
    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        headers: Option<&Headers>,
    ) -> Result<Option<T>> {
        self.execute_json(with_body(Method::PUT, path, body, headers)?).await
    }

    /// DELETE `path`.
    pub async fn delete(&self, path: &str, headers: Option<&Headers>) -> Result<ApiResponse> {
        self.execute(ApiRequest::new(Method::DELETE, path).with_headers(headers)).await
    }

    /// DELETE `path` and deserialize the body.
    pub async fn delete_json<T: DeserializeOwned>(
        &self,
        path: &str,
        headers: Option<&Headers>,
    ) -> Result<Option<T>> {
        self.execute_json(ApiRequest::new(Method::DELETE, path).with_headers(headers)).await
    }

    /// PATCH `body` as JSON to `path`.
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        headers: Option<&Headers>,
    ) -> Result<ApiResponse> {
        self.execute(with_body(Method::PATCH, path, body, headers)?).await
    }

    /// PATCH `body` as JSON to `path` and deserialize the body.
    pub async fn patch_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        headers: Option<&Headers>,
    ) -> Result<Option<T>> {
        self.execute_json(with_body(Method::PATCH, path, body, headers)?).await
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }
}

fn with_body<B: Serialize + ?Sized>(
    method: Method,
    path: &str,
    body: &B,
    headers: Option<&Headers>,
) -> Result<ApiRequest> {
    ApiRequest::new(method, path).with_headers(headers).with_json_body(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Item {
        id: u32,
        name: String,
    }

    fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(ClientConfig::new(server.url())).unwrap()
    }

    #[tokio::test]
    async fn test_raw_forms_never_fail_on_error_status() {
        let mut server = mockito::Server::new_async().await;
        let mut mocks = Vec::new();
        for (method, status) in [("GET", 404), ("POST", 400), ("PUT", 409), ("DELETE", 500), ("PATCH", 422)] {
            mocks.push(server.mock(method, "/thing").with_status(status).create_async().await);
        }
        let client = client_for(&server);
        let body = json!({"a": 1});

        let responses = vec![
            client.get("/thing", None).await.unwrap(),
            client.post("/thing", &body, None).await.unwrap(),
            client.put("/thing", &body, None).await.unwrap(),
            client.delete("/thing", None).await.unwrap(),
            client.patch("/thing", &body, None).await.unwrap(),
        ];
        let statuses: Vec<u16> = responses.iter().map(|r| r.status()).collect();
        assert_eq!(statuses, vec![404, 400, 409, 500, 422]);
        assert!(responses.iter().all(|r| !r.is_success()));
    }

    #[tokio::test]
    async fn test_typed_form_deserializes() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/items/7")
            .with_status(200)
            .with_body(r#"{"id": 7, "name": "seven"}"#)
            .create_async()
            .await;
        let client = client_for(&server);

        let item: Option<Item> = client.get_json("/items/7", None).await.unwrap();
        let item = item.unwrap();
        assert_eq!(item.id, 7);
        assert_eq!(item.name, "seven");
    }

    #[tokio::test]
    async fn test_typed_form_absent_on_empty_or_invalid_body() {
        let mut server = mockito::Server::new_async().await;
        let _empty = server.mock("GET", "/empty").with_status(200).create_async().await;
        let _garbage = server
            .mock("GET", "/garbage")
            .with_status(200)
            .with_body("<html>nope</html>")
            .create_async()
            .await;
        let _missing = server
            .mock("DELETE", "/items/1")
            .with_status(404)
            .with_body("{}")
            .create_async()
            .await;
        let client = client_for(&server);

        assert!(client.get_json::<Item>("/empty", None).await.unwrap().is_none());
        assert!(client.get_json::<Item>("/garbage", None).await.unwrap().is_none());
        assert!(client.delete_json::<Item>("/items/1", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_typed_body_methods_send_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/items/2")
            .match_body(Matcher::Json(json!({"name": "two"})))
            .match_header("x-req", "1")
            .with_status(200)
            .with_body(r#"{"id": 2, "name": "two"}"#)
            .create_async()
            .await;
        let client = client_for(&server);

        let mut headers = Headers::new();
        headers.insert("X-Req".into(), "1".into());
        let item: Option<Item> = client
            .patch_json("/items/2", &json!({"name": "two"}), Some(&headers))
            .await
            .unwrap();
        assert_eq!(item.unwrap().name, "two");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_header_map_is_noop() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("GET", "/ping").with_status(204).create_async().await;
        let client = client_for(&server);

        let response = client.get("/ping", Some(&Headers::new())).await.unwrap();
        assert_eq!(response.status(), 204);
        assert!(response.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_transport_fault_propagates_from_typed_form() {
        let client = ApiClient::new(ClientConfig::new("http://127.0.0.1:1")).unwrap();
        let err = client.get_json::<Item>("/items/1", None).await.unwrap_err();
        assert!(err.is_transport());
    }
}
