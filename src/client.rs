use crate::constants::DEFAULT_SHRINK_ENDPOINT;
use crate::error::{Error, Result};
use crate::models::{Resize, ResizeMethod, ShrinkResult, StoreTarget, TransformOptions};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use reqwest::blocking::RequestBuilder;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Method;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, warn};

/// Blocking client for the Tinify compression API.
///
/// The API key is encoded into the `Authorization` header once, when the
/// client is built, and reused unchanged for every request. The client holds
/// no other state, so it can be shared between threads as long as the calls
/// write to different output paths.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::blocking::Client,
    authorization: HeaderValue,
    endpoint: String,
}

impl Client {
    pub fn new(api_key: &str) -> Result<Self> {
        let encoded = STANDARD.encode(api_key.as_bytes());
        let mut authorization = HeaderValue::from_str(&format!("Basic {}", encoded))?;
        authorization.set_sensitive(true);

        let http = reqwest::blocking::Client::builder().build()?;

        Ok(Self {
            http,
            authorization,
            endpoint: DEFAULT_SHRINK_ENDPOINT.to_string(),
        })
    }

    /// Points shrink uploads at a different endpoint (proxies, mock servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Uploads `input` for compression.
    ///
    /// # Arguments
    /// * `input` - Image file to upload, read fully into memory
    /// * `output` - Where to download the compressed image, if anywhere
    /// * `store` - Object storage target the service should push the result to
    ///   before the download happens
    ///
    /// # Returns
    /// * `Ok(ShrinkResult)` - The decoded response, which may carry an API
    ///   `error`; in that case nothing is downloaded
    /// * `Err(Error)` - If the file cannot be read, the service cannot be
    ///   reached, the body is not valid JSON or the download is refused
    pub fn shrink(
        &self,
        input: &Path,
        output: Option<&Path>,
        store: Option<&StoreTarget>,
    ) -> Result<ShrinkResult> {
        let data = fs::read(input)?;
        self.shrink_buffer(data, output, store)
    }

    /// Same as [`Client::shrink`] for an image already held in memory.
    pub fn shrink_buffer(
        &self,
        data: Vec<u8>,
        output: Option<&Path>,
        store: Option<&StoreTarget>,
    ) -> Result<ShrinkResult> {
        debug!(endpoint = %self.endpoint, bytes = data.len(), "uploading image");

        let response = self.request(Method::POST, &self.endpoint).body(data).send()?;
        let status = response.status();
        let body = response.bytes()?;
        let result: ShrinkResult = serde_json::from_slice(&body)?;

        if let Some(error) = &result.error {
            debug!(%status, error = %error, "shrink rejected by service");
            return Ok(result);
        }
        debug!(%status, url = ?result.output_url(), "shrink complete");

        if let (Some(output), Some(url)) = (output, result.output_url()) {
            if let Some(store) = store {
                self.execute(url, &TransformOptions::store(store.clone()))?;
            }
            self.download(url, output)?;
        }

        Ok(result)
    }

    /// Scales and crops the hosted result to exactly `width` x `height`.
    pub fn cover(
        &self,
        result: &ShrinkResult,
        width: u32,
        height: u32,
        output: Option<&Path>,
        store: Option<&StoreTarget>,
    ) -> Result<Bytes> {
        self.transform(result, Resize::new(ResizeMethod::Cover, width, height), output, store)
    }

    /// Scales the hosted result down to fit within `width` x `height`.
    pub fn fit(
        &self,
        result: &ShrinkResult,
        width: u32,
        height: u32,
        output: Option<&Path>,
        store: Option<&StoreTarget>,
    ) -> Result<Bytes> {
        self.transform(result, Resize::new(ResizeMethod::Fit, width, height), output, store)
    }

    /// Scales the hosted result proportionally. Pass `0` for the dimension
    /// the service should derive.
    pub fn scale(
        &self,
        result: &ShrinkResult,
        width: u32,
        height: u32,
        output: Option<&Path>,
        store: Option<&StoreTarget>,
    ) -> Result<Bytes> {
        self.transform(result, Resize::new(ResizeMethod::Scale, width, height), output, store)
    }

    fn transform(
        &self,
        result: &ShrinkResult,
        resize: Resize,
        output: Option<&Path>,
        store: Option<&StoreTarget>,
    ) -> Result<Bytes> {
        let url = result.output_url().ok_or(Error::MissingOutputUrl)?;
        let data = self.execute(url, &TransformOptions::resize(resize, store.cloned()))?;

        if let Some(path) = output {
            fs::write(path, &data)?;
            debug!(path = ?path, bytes = data.len(), "transform written");
        }

        Ok(data)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(AUTHORIZATION, self.authorization.clone())
    }

    fn execute(&self, url: &str, options: &TransformOptions) -> Result<Bytes> {
        debug!(url, resize = ?options.resize.as_ref().map(|r| r.method), "posting transform");

        let response = self.request(Method::POST, url).json(options).send()?;
        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "transform returned a non-success status");
        }

        Ok(response.bytes()?)
    }

    fn download(&self, url: &str, output: &Path) -> Result<u64> {
        let mut response = self.http.get(url).send()?.error_for_status()?;
        let mut file = File::create(output)?;
        let written = response.copy_to(&mut file)?;
        debug!(url, path = ?output, bytes = written, "output downloaded");
        Ok(written)
    }
}
