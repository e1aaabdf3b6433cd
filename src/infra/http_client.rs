use crate::app::ports::HealthProbePort;
use crate::error::Result;
use crate::extract::{extract_id, extract_token, parse_body, token_from_set_cookie};
use crate::types::ImageUpload;
use async_trait::async_trait;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::constants::JWT_COOKIE;

/// A response with its status left for the caller to classify.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
    /// `jwt` cookie set by the response, if any
    pub token_cookie: Option<String>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn id(&self) -> Option<String> {
        extract_id(&self.body)
    }

    /// Token from the body, falling back to the session cookie
    pub fn token(&self) -> Option<String> {
        extract_token(&self.body).or_else(|| self.token_cookie.clone())
    }
}

/// HTTP plumbing shared by both gateway flavors.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // The gateway checks the bearer header, the services behind it read the cookie.
    fn authorize(&self, req: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(t) => req
                .bearer_auth(t)
                .header(COOKIE, format!("{JWT_COOKIE}={t}")),
            None => req,
        }
    }

    pub async fn get_json(&self, path: &str, token: Option<&str>) -> Result<ApiResponse> {
        let req = self.authorize(self.client.get(self.url(path)), token);
        Self::read(req.send().await?).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<ApiResponse> {
        let req = self.authorize(self.client.post(self.url(path)).json(body), token);
        Self::read(req.send().await?).await
    }

    pub async fn patch_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<ApiResponse> {
        let req = self.authorize(self.client.patch(self.url(path)).json(body), token);
        Self::read(req.send().await?).await
    }

    /// POST a form with one JSON part named `part_name` and an optional image part.
    pub async fn post_multipart(
        &self,
        path: &str,
        query: &[(&str, &str)],
        part_name: &str,
        payload: &Value,
        image: Option<&ImageUpload>,
        token: Option<&str>,
    ) -> Result<ApiResponse> {
        let form = build_form(part_name, payload, image)?;
        let mut req = self.client.post(self.url(path)).multipart(form);
        if !query.is_empty() {
            req = req.query(query);
        }
        let req = self.authorize(req, token);
        Self::read(req.send().await?).await
    }

    async fn read(resp: reqwest::Response) -> Result<ApiResponse> {
        let status = resp.status().as_u16();
        let token_cookie = token_from_set_cookie(
            resp.headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok()),
        );
        let bytes = resp.bytes().await?;
        debug!(status, len = bytes.len(), "gateway response");
        Ok(ApiResponse {
            status,
            body: parse_body(&bytes),
            token_cookie,
        })
    }
}

pub fn build_form(part_name: &str, payload: &Value, image: Option<&ImageUpload>) -> Result<Form> {
    let json_part = Part::text(serde_json::to_string(payload)?).mime_str("application/json")?;
    let mut form = Form::new().part(part_name.to_string(), json_part);
    if let Some(img) = image {
        let file_part = Part::bytes(img.bytes.clone())
            .file_name(img.file_name.clone())
            .mime_str(img.mime)?;
        form = form.part(crate::constants::IMAGE_PART, file_part);
    }
    Ok(form)
}

/// Health probe backed by reqwest with a short per-request timeout.
pub struct ReqwestHealthProbe {
    client: reqwest::Client,
}

impl ReqwestHealthProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait]
impl HealthProbePort for ReqwestHealthProbe {
    async fn status(&self, url: &str) -> Result<u16> {
        let resp = self.client.get(url).send().await?;
        Ok(resp.status().as_u16())
    }
}
