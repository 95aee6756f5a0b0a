#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tiny_squeeze::{ImageOutput, ShrinkResult};
use wiremock::{Mock, MockServer, Request};

pub const FAKE_IMAGE: &[u8] = b"\x89PNG\r\n\x1a\nfake png data";

/// A wiremock server driven from a private runtime, so tests can call the
/// blocking client from the plain test thread.
pub struct MockApi {
    pub server: MockServer,
    runtime: tokio::runtime::Runtime,
}

impl MockApi {
    pub fn start() -> Self {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.server.uri(), path)
    }

    pub fn requests(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap()
    }
}

pub fn create_test_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    File::create(&path).unwrap().write_all(FAKE_IMAGE).unwrap();
    path
}

pub fn result_with_url(url: &str) -> ShrinkResult {
    ShrinkResult {
        output: Some(ImageOutput {
            size: 100,
            mime_type: "image/png".to_string(),
            url: url.to_string(),
            ..Default::default()
        }),
        ..Default::default()
    }
}
