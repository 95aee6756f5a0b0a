use crate::constants::STORE_SERVICE_S3;
use serde::{Deserialize, Serialize};

/// Metadata about the uploaded source image.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ImageInput {
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Metadata about the compressed image hosted by the service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ImageOutput {
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    pub ratio: f64,
    pub url: String,
}

impl ImageOutput {
    /// Bytes saved relative to `input`, zero when the output grew.
    pub fn bytes_saved(&self, input: &ImageInput) -> u64 {
        input.size.saturating_sub(self.size)
    }
}

/// Decoded body of a shrink call.
///
/// The service reports logical failures (bad credentials, unsupported
/// files, exhausted quota) through `error` and `message` rather than
/// through the transport, so callers must check [`ShrinkResult::is_error`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShrinkResult {
    pub input: Option<ImageInput>,
    pub output: Option<ImageOutput>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ShrinkResult {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The hosted output URL, if the service issued a non-empty one.
    pub fn output_url(&self) -> Option<&str> {
        self.output
            .as_ref()
            .map(|output| output.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMethod {
    /// Scale and crop to exactly `width` x `height`.
    Cover,
    /// Scale down to fit inside `width` x `height`, keeping the aspect ratio.
    Fit,
    /// Scale proportionally from a single dimension.
    Scale,
}

impl ResizeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeMethod::Cover => "cover",
            ResizeMethod::Fit => "fit",
            ResizeMethod::Scale => "scale",
        }
    }
}

impl std::str::FromStr for ResizeMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cover" => Ok(ResizeMethod::Cover),
            "fit" => Ok(ResizeMethod::Fit),
            "scale" => Ok(ResizeMethod::Scale),
            other => Err(format!("unknown resize method: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Resize {
    pub method: ResizeMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Resize {
    /// A zero dimension is treated as unset and left out of the payload.
    pub fn new(method: ResizeMethod, width: u32, height: u32) -> Self {
        Self {
            method,
            width: Some(width).filter(|&w| w > 0),
            height: Some(height).filter(|&h| h > 0),
        }
    }
}

/// Third-party object storage destination, forwarded to the service as-is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreTarget {
    service: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub region: String,
    /// `<bucket>/<key>` the service writes the result to.
    pub path: String,
}

impl StoreTarget {
    pub fn new(
        aws_access_key_id: impl Into<String>,
        aws_secret_access_key: impl Into<String>,
        region: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            service: STORE_SERVICE_S3.to_string(),
            aws_access_key_id: aws_access_key_id.into(),
            aws_secret_access_key: aws_secret_access_key.into(),
            region: region.into(),
            path: path.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }
}

/// JSON body of a transform call against a hosted output URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransformOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize: Option<Resize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreTarget>,
}

impl TransformOptions {
    pub fn resize(resize: Resize, store: Option<StoreTarget>) -> Self {
        Self {
            resize: Some(resize),
            store,
        }
    }

    pub fn store(store: StoreTarget) -> Self {
        Self {
            resize: None,
            store: Some(store),
        }
    }
}
