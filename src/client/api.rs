//! HTTP client for the invoice API

use super::ClientError;
use crate::entities::Invoice;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

/// Typed client for `/api`
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:8000`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Upload a PDF and get the extracted invoice object
    pub async fn extract(&self, file_name: &str, pdf: Vec<u8>) -> Result<Value, ClientError> {
        let part = Part::bytes(pdf)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new().part("invoice", part);

        let response = self
            .http
            .post(self.url("/extract"))
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn create(&self, payload: &Value) -> Result<Invoice, ClientError> {
        let response = self
            .http
            .post(self.url("/invoices"))
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }

    /// List invoices, optionally filtered by a vendor-name / number substring
    pub async fn list(&self, query: Option<&str>) -> Result<Vec<Invoice>, ClientError> {
        let mut request = self.http.get(self.url("/invoices"));
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            request = request.query(&[("q", q)]);
        }
        decode(request.send().await?).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Invoice, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/invoices/{}", id)))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn update(&self, id: Uuid, payload: &Value) -> Result<Invoice, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/invoices/{}", id)))
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/invoices/{}", id)))
            .send()
            .await?;
        check(response).await.map(|_| ())
    }
}

/// Turn a non-2xx response into `ClientError::Api` with the server's message
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(status, &body),
    })
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = check(response).await?.text().await?;
    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}
