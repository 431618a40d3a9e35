//! Blocking HTTP implementation of [`Gateway`] against the journal
//! server's JSON API.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::{Value, json};

use crate::entry::Entry;
use crate::gateway::{Gateway, GatewayError, SaveOutcome};
use crate::progress::ProgressSnapshot;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct RemoteGateway {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl RemoteGateway {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> Result<Value, GatewayError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        read_json(response)
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value, GatewayError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        read_json(response)
    }

    fn delete_request(&self, path: &str) -> Result<Value, GatewayError> {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        read_json(response)
    }
}

/// Turns a response into its JSON body. Non-2xx responses carrying a
/// structured `{"error": ...}` become [`GatewayError::Remote`]; anything
/// else is a transport failure.
fn read_json(response: reqwest::blocking::Response) -> Result<Value, GatewayError> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| GatewayError::Transport(e.to_string()))?;
    if !status.is_success() {
        if let Ok(value) = serde_json::from_str::<Value>(&body) {
            if let Some(message) = value["error"].as_str() {
                return Err(GatewayError::Remote(message.to_string()));
            }
        }
        return Err(GatewayError::Transport(format!("HTTP {status}: {body}")));
    }
    serde_json::from_str(&body).map_err(|e| GatewayError::Transport(e.to_string()))
}

/// Extracts the entries mapping from a fetch-all or export payload,
/// skipping individual entries that fail to parse.
fn parse_entries(value: &Value) -> HashMap<String, Entry> {
    let mut entries = HashMap::new();
    if let Some(map) = value["entries"].as_object() {
        for (key, raw) in map {
            if let Ok(mut entry) = serde_json::from_value::<Entry>(raw.clone()) {
                entry.key = key.clone();
                entries.insert(key.clone(), entry);
            }
        }
    }
    entries
}

fn parse_save_outcome(key: &str, value: &Value) -> Result<SaveOutcome, GatewayError> {
    if value["deleted"].as_bool() == Some(true) {
        return Ok(SaveOutcome::Deleted);
    }
    let raw = value
        .get("entry")
        .ok_or_else(|| GatewayError::UnexpectedResponse("save response without entry".into()))?;
    let mut entry: Entry = serde_json::from_value(raw.clone())
        .map_err(|e| GatewayError::UnexpectedResponse(e.to_string()))?;
    entry.key = key.to_string();
    let encouragement = value["encouragement"].as_str().map(str::to_string);
    Ok(SaveOutcome::Saved {
        entry,
        encouragement,
    })
}

fn validate_import_payload(payload: &Value) -> Result<(), GatewayError> {
    if !payload["entries"].is_object() {
        return Err(GatewayError::InvalidPayload(
            "missing entries mapping".to_string(),
        ));
    }
    Ok(())
}

impl Gateway for RemoteGateway {
    fn fetch_all(&self) -> HashMap<String, Entry> {
        // Fail soft: an unreachable server means a blank journal, not an
        // unusable client.
        match self.get("/api/entries") {
            Ok(value) => parse_entries(&value),
            Err(_) => HashMap::new(),
        }
    }

    fn save(
        &self,
        key: &str,
        text: &str,
        photos: &[String],
        tags: &[String],
    ) -> Result<SaveOutcome, GatewayError> {
        let body = json!({ "text": text, "photos": photos, "tags": tags });
        let value = self.post(&format!("/api/entries/{key}"), &body)?;
        parse_save_outcome(key, &value)
    }

    fn delete(&self, key: &str) -> Result<(), GatewayError> {
        self.delete_request(&format!("/api/entries/{key}"))?;
        Ok(())
    }

    fn fetch_stats(&self) -> Result<ProgressSnapshot, GatewayError> {
        let value = self.get("/api/stats")?;
        ProgressSnapshot::from_wire(value)
            .map_err(|e| GatewayError::UnexpectedResponse(e.to_string()))
    }

    fn rewrite(&self, text: &str) -> Result<String, GatewayError> {
        let value = self.post("/api/rewrite", &json!({ "text": text }))?;
        value["rewritten"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| GatewayError::UnexpectedResponse("rewrite without text".into()))
    }

    fn generate_from_nudges(
        &self,
        nudges: &[String],
        date_label: &str,
    ) -> Result<String, GatewayError> {
        let body = json!({ "nudges": nudges, "date": date_label });
        let value = self.post("/api/generate-from-nudges", &body)?;
        value["entry"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| GatewayError::UnexpectedResponse("generation without entry".into()))
    }

    fn export(&self) -> Result<Value, GatewayError> {
        self.get("/api/export")
    }

    fn import(&self, payload: &Value) -> Result<usize, GatewayError> {
        validate_import_payload(payload)?;
        let value = self.post("/api/import", payload)?;
        Ok(value["entries_count"].as_u64().unwrap_or(0) as usize)
    }
}
