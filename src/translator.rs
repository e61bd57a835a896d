//! Remote command translation.
//!
//! The translator is an external collaborator: transcript text in,
//! structured-command text out. The JSON shape of the response is the remote
//! model's contract with the caller; nothing here validates it, and nothing
//! here retries. Failures propagate as opaque errors.

use anyhow::{Context, Result};
use serde::Serialize;

/// Turns a transcript into structured-command text. Implementations must not
/// alter the transcript before sending it.
pub trait CommandTranslator {
    fn translate(&self, transcript: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    model: &'a str,
    input: &'a str,
}

/// HTTP-backed translator posting the transcript to a remote language model
/// endpoint. Endpoint, model name, and credential come from the caller;
/// loading them is out of scope here.
pub struct HttpTranslator {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl HttpTranslator {
    pub fn new(endpoint: String, model: String, api_key: String) -> Self {
        Self {
            endpoint,
            model,
            api_key,
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl CommandTranslator for HttpTranslator {
    fn translate(&self, transcript: &str) -> Result<String> {
        let request = TranslateRequest {
            model: &self.model,
            input: transcript,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .context("command translator request failed")?
            .error_for_status()
            .context("command translator returned an error status")?;
        // The body is passed through verbatim; a malformed command is the
        // caller's concern.
        response
            .text()
            .context("failed to read command translator response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_carries_model_and_input() {
        let request = TranslateRequest {
            model: "nav-commands",
            input: "go to the charging dock",
        };
        let body = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(body["model"], "nav-commands");
        assert_eq!(body["input"], "go to the charging dock");
    }
}
