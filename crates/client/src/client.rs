//! Swift Cloud Tools API client
//!
//! One method per endpoint. Each builds the URL by concatenating the host with
//! a fixed path, serializes the body to JSON text for mutations, attaches the
//! `Content-type` and `X-Auth-Token` headers, and returns the response as the
//! server sent it. Status codes are never inspected here.

use std::io;

use serde::Serialize;

use sct_core::types::{ExpirerCreate, ExpirerDelete, TransferCreate};
use sct_core::{ApiRequest, ApiResponse, Error, HttpTransport, Method, Result};

use crate::transport::ReqwestTransport;

const EXPIRER_PATH: &str = "/v1/expirer/";
const TRANSFER_PATH: &str = "/v1/transfer/";
const TRANSFER_STATUS_PATH: &str = "/v1/transfer/status";

/// Client for the expirer and transfer endpoints
pub struct SctClient<T = ReqwestTransport> {
    host: String,
    api_key: String,
    transport: T,
}

impl SctClient<ReqwestTransport> {
    /// Create a client backed by reqwest
    ///
    /// `host` is used as given, so `http://h/` yields `http://h//v1/...`.
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::with_transport(host, api_key, ReqwestTransport::new()?))
    }
}

impl<T: HttpTransport> SctClient<T> {
    /// Create a client over any transport
    pub fn with_transport(
        host: impl Into<String>,
        api_key: impl Into<String>,
        transport: T,
    ) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
            transport,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    fn request(&self, method: Method, url: String) -> ApiRequest {
        ApiRequest::new(method, url, &self.api_key)
    }

    fn json_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: String,
        body: &B,
    ) -> Result<ApiRequest> {
        Ok(self.request(method, url).with_body(encode_body(body)?))
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse> {
        tracing::debug!(method = %request.method, url = %request.url, "Sending request");
        let response = self.transport.send(request).await?;
        tracing::debug!(status = response.status_code(), "Received response");
        Ok(response)
    }

    // ========== Expirer ==========

    /// Schedule `account/container/object` for deletion at `date`
    ///
    /// `date` should read `YYYY-MM-DD HH:MM:SS`; it is sent unchecked and the
    /// server answers 422 when it is empty or malformed.
    pub async fn expirer_create(
        &self,
        account: &str,
        container: &str,
        object: &str,
        date: &str,
    ) -> Result<ApiResponse> {
        let body = ExpirerCreate::new(account, container, object, date);
        let request = self.json_request(Method::Post, self.url(EXPIRER_PATH), &body)?;
        self.dispatch(request).await
    }

    /// Remove the expiration scheduled for `account/container/object`
    ///
    /// The identifying fields travel as a JSON body on the DELETE.
    pub async fn expirer_delete(
        &self,
        account: &str,
        container: &str,
        object: &str,
    ) -> Result<ApiResponse> {
        let body = ExpirerDelete::new(account, container, object);
        let request = self.json_request(Method::Delete, self.url(EXPIRER_PATH), &body)?;
        self.dispatch(request).await
    }

    // ========== Transfer ==========

    pub async fn transfer_create(
        &self,
        project_id: &str,
        project_name: &str,
        environment: &str,
    ) -> Result<ApiResponse> {
        let body = TransferCreate::new(project_id, project_name, environment);
        let request = self.json_request(Method::Post, self.url(TRANSFER_PATH), &body)?;
        self.dispatch(request).await
    }

    /// Fetch the transfer record of a project
    pub async fn transfer_get(&self, project_id: &str) -> Result<ApiResponse> {
        let url = format!("{}{}", self.url(TRANSFER_PATH), project_id);
        self.dispatch(self.request(Method::Get, url)).await
    }

    /// Fetch the status string (and progress) of a project's transfer
    pub async fn transfer_status(&self, project_id: &str) -> Result<ApiResponse> {
        let url = format!("{}/{}", self.url(TRANSFER_STATUS_PATH), project_id);
        self.dispatch(self.request(Method::Get, url)).await
    }

    /// Fetch one page of transfer records
    pub async fn transfer_status_all(&self, page: u32, per_page: u32) -> Result<ApiResponse> {
        let url = format!(
            "{}?page={page}&per_page={per_page}",
            self.url(TRANSFER_STATUS_PATH)
        );
        self.dispatch(self.request(Method::Get, url)).await
    }

    /// Fetch the records of several projects at once
    ///
    /// The body is a bare JSON array of ids.
    pub async fn transfer_status_by_projects<S: AsRef<str>>(
        &self,
        project_ids: &[S],
    ) -> Result<ApiResponse> {
        let ids: Vec<&str> = project_ids.iter().map(|id| id.as_ref()).collect();
        let request = self.json_request(Method::Post, self.url(TRANSFER_STATUS_PATH), &ids)?;
        self.dispatch(request).await
    }
}

/// Spaced JSON separators (`", "` and `": "`) with non-ASCII text escaped as
/// `\uXXXX`, the byte layout the API has always received.
struct BodyFormatter;

impl serde_json::ser::Formatter for BodyFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, BodyFormatter);
    body.serialize(&mut serializer)?;
    String::from_utf8(buf)
        .map_err(|e| Error::General(format!("Request body is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        pub Transport {}

        #[async_trait]
        impl HttpTransport for Transport {
            async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
        }
    }

    const HOST: &str = "http://swift-cloud-tools-dev.gcloud.dev.globoi.com";
    const API_KEY: &str = "d003d7dc6e2a48e99aed5082160de1fa";
    const ACCOUNT: &str = "auth_792079638c6441bca02071501f4eb273";
    const PROJECT_ID: &str = "64b10d56454c4b1eb91b46b62d27c8b2";

    fn expected(method: Method, url: String, api_key: &str, body: Option<&str>) -> ApiRequest {
        let request = ApiRequest::new(method, url, api_key);
        match body {
            Some(b) => request.with_body(b),
            None => request,
        }
    }

    /// Mock expecting exactly `request` once and answering `status`/`content`
    fn mock_once(request: ApiRequest, status: u16, content: String) -> MockTransport {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(move |actual| *actual == request)
            .times(1)
            .returning(move |_| Ok(ApiResponse::new(status, content.clone())));
        transport
    }

    fn record_json() -> serde_json::Value {
        serde_json::json!({
            "id": 22,
            "project_id": PROJECT_ID,
            "project_name": "alan",
            "environment": "dev",
            "container_count_swift": 0,
            "object_count_swift": 0,
            "bytes_used_swift": 0,
            "last_object": "",
            "count_error": 0,
            "container_count_gcp": 0,
            "object_count_gcp": 0,
            "bytes_used_gcp": 0,
            "initial_date": "2021-10-07 11:05:00",
            "final_date": "2021-10-07 11:29:00"
        })
    }

    fn expirer_create_body(object: &str, date: &str) -> String {
        format!(
            concat!(
                r#"{{"account": "{ACCOUNT}", "container": "container", "#,
                r#""object": "{object}", "date": "{date}"}}"#
            ),
            ACCOUNT = ACCOUNT,
            object = object,
            date = date,
        )
    }

    fn expirer_delete_body(object: &str) -> String {
        format!(
            r#"{{"account": "{ACCOUNT}", "container": "container", "object": "{object}"}}"#
        )
    }

    // ========== Expirer ==========

    #[tokio::test]
    async fn test_expirer_create() {
        let date = "2021-10-06 12:15:00";
        let content = format!("Expired object '{ACCOUNT}/container/object.jpeg' created");
        let transport = mock_once(
            expected(
                Method::Post,
                format!("{HOST}/v1/expirer/"),
                API_KEY,
                Some(expirer_create_body("object.jpeg", date).as_str()),
            ),
            201,
            content.clone(),
        );

        let client = SctClient::with_transport(HOST, API_KEY, transport);
        let response = client
            .expirer_create(ACCOUNT, "container", "object.jpeg", date)
            .await
            .unwrap();

        assert_eq!(response.status_code(), 201);
        assert_eq!(response.text(), content);
    }

    #[tokio::test]
    async fn test_expirer_create_unauthenticated() {
        let date = "2021-10-06 12:15:00";
        let transport = mock_once(
            expected(
                Method::Post,
                format!("{HOST}/v1/expirer/"),
                "123456789",
                Some(expirer_create_body("object.jpeg", date).as_str()),
            ),
            401,
            "Unauthenticated".to_string(),
        );

        let client = SctClient::with_transport(HOST, "123456789", transport);
        let response = client
            .expirer_create(ACCOUNT, "container", "object.jpeg", date)
            .await
            .unwrap();

        assert_eq!(response.status_code(), 401);
        assert_eq!(response.text(), "Unauthenticated");
    }

    #[tokio::test]
    async fn test_expirer_create_incorrect_parameters() {
        let transport = mock_once(
            expected(
                Method::Post,
                format!("{HOST}/v1/expirer/"),
                API_KEY,
                Some(expirer_create_body("object.jpeg", "").as_str()),
            ),
            422,
            "incorrect parameters".to_string(),
        );

        let client = SctClient::with_transport(HOST, API_KEY, transport);
        let response = client
            .expirer_create(ACCOUNT, "container", "object.jpeg", "")
            .await
            .unwrap();

        assert_eq!(response.status_code(), 422);
        assert_eq!(response.text(), "incorrect parameters");
    }

    #[tokio::test]
    async fn test_expirer_create_invalid_date_format() {
        let transport = mock_once(
            expected(
                Method::Post,
                format!("{HOST}/v1/expirer/"),
                API_KEY,
                Some(expirer_create_body("object.jpeg", "2021-10-06").as_str()),
            ),
            422,
            "invalid date format: YYYY-MM-DD HH:MM:SS".to_string(),
        );

        let client = SctClient::with_transport(HOST, API_KEY, transport);
        let response = client
            .expirer_create(ACCOUNT, "container", "object.jpeg", "2021-10-06")
            .await
            .unwrap();

        assert_eq!(response.status_code(), 422);
        assert_eq!(response.text(), "invalid date format: YYYY-MM-DD HH:MM:SS");
    }

    #[tokio::test]
    async fn test_expirer_delete() {
        let content = format!("Expired object '{ACCOUNT}/container/object.jpeg' deleted");
        let transport = mock_once(
            expected(
                Method::Delete,
                format!("{HOST}/v1/expirer/"),
                API_KEY,
                Some(expirer_delete_body("object.jpeg").as_str()),
            ),
            200,
            content.clone(),
        );

        let client = SctClient::with_transport(HOST, API_KEY, transport);
        let response = client
            .expirer_delete(ACCOUNT, "container", "object.jpeg")
            .await
            .unwrap();

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.text(), content);
    }

    #[tokio::test]
    async fn test_expirer_delete_incorrect_parameters() {
        let transport = mock_once(
            expected(
                Method::Delete,
                format!("{HOST}/v1/expirer/"),
                API_KEY,
                Some(expirer_delete_body("").as_str()),
            ),
            422,
            "incorrect parameters".to_string(),
        );

        let client = SctClient::with_transport(HOST, API_KEY, transport);
        let response = client.expirer_delete(ACCOUNT, "container", "").await.unwrap();

        assert_eq!(response.status_code(), 422);
        assert_eq!(response.text(), "incorrect parameters");
    }

    #[tokio::test]
    async fn test_expirer_delete_not_found() {
        let transport = mock_once(
            expected(
                Method::Delete,
                format!("{HOST}/v1/expirer/"),
                API_KEY,
                Some(expirer_delete_body("object.jpeg").as_str()),
            ),
            404,
            "not found".to_string(),
        );

        let client = SctClient::with_transport(HOST, API_KEY, transport);
        let response = client
            .expirer_delete(ACCOUNT, "container", "object.jpeg")
            .await
            .unwrap();

        assert_eq!(response.status_code(), 404);
        assert_eq!(response.text(), "not found");
    }

    // ========== Transfer ==========

    const TRANSFER_BODY: &str = concat!(
        r#"{"project_id": "64b10d56454c4b1eb91b46b62d27c8b2", "#,
        r#""project_name": "alan", "environment": "dev"}"#
    );

    #[tokio::test]
    async fn test_transfer_create() {
        let content = "Transfer project 'alan' environment 'dev' created".to_string();
        let transport = mock_once(
            expected(
                Method::Post,
                format!("{HOST}/v1/transfer/"),
                API_KEY,
                Some(TRANSFER_BODY),
            ),
            201,
            content.clone(),
        );

        let client = SctClient::with_transport(HOST, API_KEY, transport);
        let response = client.transfer_create(PROJECT_ID, "alan", "dev").await.unwrap();

        assert_eq!(response.status_code(), 201);
        assert_eq!(response.text(), content);
    }

    #[tokio::test]
    async fn test_transfer_create_unauthenticated() {
        let transport = mock_once(
            expected(
                Method::Post,
                format!("{HOST}/v1/transfer/"),
                "123456789",
                Some(TRANSFER_BODY),
            ),
            401,
            "Unauthenticated".to_string(),
        );

        let client = SctClient::with_transport(HOST, "123456789", transport);
        let response = client.transfer_create(PROJECT_ID, "alan", "dev").await.unwrap();

        assert_eq!(response.status_code(), 401);
        assert_eq!(response.text(), "Unauthenticated");
    }

    #[tokio::test]
    async fn test_transfer_create_incorrect_parameters() {
        let body = format!(
            r#"{{"project_id": "{PROJECT_ID}", "project_name": "alan", "environment": ""}}"#
        );
        let transport = mock_once(
            expected(
                Method::Post,
                format!("{HOST}/v1/transfer/"),
                API_KEY,
                Some(body.as_str()),
            ),
            422,
            "incorrect parameters".to_string(),
        );

        let client = SctClient::with_transport(HOST, API_KEY, transport);
        let response = client.transfer_create(PROJECT_ID, "alan", "").await.unwrap();

        assert_eq!(response.status_code(), 422);
        assert_eq!(response.text(), "incorrect parameters");
    }

    #[tokio::test]
    async fn test_transfer_get() {
        let content = record_json();
        let transport = mock_once(
            expected(
                Method::Get,
                format!("{HOST}/v1/transfer/{PROJECT_ID}"),
                API_KEY,
                None,
            ),
            200,
            content.to_string(),
        );

        let client = SctClient::with_transport(HOST, API_KEY, transport);
        let response = client.transfer_get(PROJECT_ID).await.unwrap();

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json_value().unwrap(), content);
    }

    #[tokio::test]
    async fn test_transfer_get_not_found() {
        let html = "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 3.2 Final//EN\">\n<title>404 Not Found</title>\n<h1>Not Found</h1>\n<p>The requested URL was not found on the server.  If you entered the URL manually please check your spelling and try again.</p>\n";
        let transport = mock_once(
            expected(
                Method::Get,
                format!("{HOST}/v1/transfer/{PROJECT_ID}"),
                API_KEY,
                None,
            ),
            404,
            html.to_string(),
        );

        let client = SctClient::with_transport(HOST, API_KEY, transport);
        let response = client.transfer_get(PROJECT_ID).await.unwrap();

        assert_eq!(response.status_code(), 404);
        assert_eq!(response.text(), html);
        assert!(response.json_value().is_err());
    }

    async fn assert_status_passthrough(project_id: &str, content: serde_json::Value) {
        let transport = mock_once(
            expected(
                Method::Get,
                format!("{HOST}/v1/transfer/status/{project_id}"),
                API_KEY,
                None,
            ),
            200,
            content.to_string(),
        );

        let client = SctClient::with_transport(HOST, API_KEY, transport);
        let response = client.transfer_status(project_id).await.unwrap();

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json_value().unwrap(), content);
    }

    #[tokio::test]
    async fn test_transfer_status_uninitialized() {
        assert_status_passthrough(
            "64b10d56454c4b1eb91b46b62d27c8b_",
            serde_json::json!({"status": "Migração não inicializada"}),
        )
        .await;
    }

    #[tokio::test]
    async fn test_transfer_status_completed() {
        assert_status_passthrough(
            PROJECT_ID,
            serde_json::json!({"status": "Migração concluída"}),
        )
        .await;
    }

    #[tokio::test]
    async fn test_transfer_status_waiting() {
        assert_status_passthrough(
            PROJECT_ID,
            serde_json::json!({"status": "Aguardando migração"}),
        )
        .await;
    }

    #[tokio::test]
    async fn test_transfer_status_progress() {
        let content = serde_json::json!({"status": "Migrando", "progress": 93});
        assert_status_passthrough(PROJECT_ID, content.clone()).await;

        let status: sct_core::TransferStatus = serde_json::from_value(content).unwrap();
        assert_eq!(status.state(), sct_core::TransferState::InProgress);
        assert_eq!(status.progress, Some(93.0));
    }

    #[tokio::test]
    async fn test_transfer_status_all() {
        let content = serde_json::json!({
            "page": 1,
            "per_page": 50,
            "pages": 0,
            "total": 0,
            "items": [record_json()]
        });
        let transport = mock_once(
            expected(
                Method::Get,
                format!("{HOST}/v1/transfer/status?page=1&per_page=50"),
                API_KEY,
                None,
            ),
            200,
            content.to_string(),
        );

        let client = SctClient::with_transport(HOST, API_KEY, transport);
        let response = client.transfer_status_all(1, 50).await.unwrap();

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json_value().unwrap(), content);

        let page: sct_core::TransferPage = response.json().unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_transfer_status_by_projects() {
        let content = serde_json::json!([record_json()]);
        let transport = mock_once(
            expected(
                Method::Post,
                format!("{HOST}/v1/transfer/status"),
                API_KEY,
                Some(r#"["64b10d56454c4b1eb91b46b62d27c8b2"]"#),
            ),
            200,
            content.to_string(),
        );

        let client = SctClient::with_transport(HOST, API_KEY, transport);
        let response = client
            .transfer_status_by_projects(&[PROJECT_ID])
            .await
            .unwrap();

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json_value().unwrap(), content);
    }

    #[tokio::test]
    async fn test_transfer_status_by_projects_bare_array() {
        let transport = mock_once(
            expected(
                Method::Post,
                format!("{HOST}/v1/transfer/status"),
                API_KEY,
                Some(r#"["p1", "p2"]"#),
            ),
            200,
            "[]".to_string(),
        );

        let client = SctClient::with_transport(HOST, API_KEY, transport);
        let ids = vec!["p1".to_string(), "p2".to_string()];
        let response = client.transfer_status_by_projects(&ids).await.unwrap();

        assert_eq!(response.status_code(), 200);
    }

    // ========== Construction ==========

    #[tokio::test]
    async fn test_host_used_verbatim() {
        let transport = mock_once(
            expected(
                Method::Get,
                "http://h//v1/transfer/p1".to_string(),
                API_KEY,
                None,
            ),
            200,
            "{}".to_string(),
        );

        let client = SctClient::with_transport("http://h/", API_KEY, transport);
        assert_eq!(client.host(), "http://h/");
        client.transfer_get("p1").await.unwrap();
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(Error::network("connection refused")));

        let client = SctClient::with_transport(HOST, API_KEY, transport);
        let err = client.transfer_get(PROJECT_ID).await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    // ========== Body encoding ==========

    #[test]
    fn test_body_layout() {
        let body = ExpirerDelete::new(ACCOUNT, "container", "object.jpeg");
        assert_eq!(
            encode_body(&body).unwrap(),
            format!(
                r#"{{"account": "{ACCOUNT}", "container": "container", "object": "object.jpeg"}}"#
            )
        );
        assert_eq!(encode_body(&["p1", "p2"]).unwrap(), r#"["p1", "p2"]"#);
        assert_eq!(encode_body::<[&str]>(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_body_escapes_non_ascii() {
        let body = TransferCreate::new("p1", "migração 🚀", "dev");
        assert_eq!(
            encode_body(&body).unwrap(),
            concat!(
                r#"{"project_id": "p1", "project_name": "#,
                r#""migra\u00e7\u00e3o \ud83d\ude80", "environment": "dev"}"#
            )
        );

        let escaped = encode_body(&["tab\there \"q\""]).unwrap();
        assert_eq!(escaped, r#"["tab\there \"q\""]"#);
    }
}
