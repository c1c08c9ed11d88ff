// src/analysis/service.rs
use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Request, Response};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::analysis::AnalysisResult;
use crate::config::Settings;
use crate::state::{Locale, Selection};

/// Multipart field the service reads the uploaded document from.
pub const FILE_FIELD: &str = "file";

const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("could not reach the analysis service: {0}")]
    Http(#[from] reqwest::Error),

    #[error("analysis service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("analysis service sent an unreadable reply: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Rejected(String),

    #[error("could not start the request worker: {0}")]
    Worker(#[from] std::io::Error),
}

/// The remote side of the dashboard. Implementations are called from worker
/// threads, never from the UI thread.
pub trait AnalysisService: Send + Sync + 'static {
    fn analyze(&self, selection: &Selection, locale: Locale) -> Result<AnalysisResult, ServiceError>;

    /// Asks the service to generate its report. Nothing in the reply is used.
    fn export(&self) -> Result<(), ServiceError>;

    fn ping(&self) -> Result<String, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct HttpAnalysisService {
    client: Client,
    base_url: String,
}

impl HttpAnalysisService {
    pub fn new(settings: &Settings) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .timeout(settings.request_timeout_secs.map(Duration::from_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn analyze_request(&self, selection: &Selection, locale: Locale) -> Result<Request, ServiceError> {
        let part = Part::bytes(selection.bytes.to_vec()).file_name(selection.file_name.clone());
        let form = Form::new().part(FILE_FIELD, part);

        Ok(self.client
            .post(self.url("/analyze"))
            .query(&[("lang", locale.code())])
            .multipart(form)
            .build()?)
    }

    pub fn export_request(&self) -> Result<Request, ServiceError> {
        Ok(self.client.get(self.url("/export")).build()?)
    }
}

impl AnalysisService for HttpAnalysisService {
    fn analyze(&self, selection: &Selection, locale: Locale) -> Result<AnalysisResult, ServiceError> {
        let request = self.analyze_request(selection, locale)?;
        debug!(url = %request.url(), file = %selection.file_name, bytes = selection.len(), "posting analysis request");
        let body = successful_body(self.client.execute(request)?)?;
        parse_reply(&body)
    }

    fn export(&self) -> Result<(), ServiceError> {
        let request = self.export_request()?;
        let response = self.client.execute(request)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body: String::new(),
            });
        }
        Ok(())
    }

    fn ping(&self) -> Result<String, ServiceError> {
        let body = successful_body(self.client.get(self.url("/")).send()?)?;
        let value: serde_json::Value = serde_json::from_str(&body)?;
        Ok(value
            .get("message")
            .and_then(|message| message.as_str())
            .unwrap_or("ok")
            .to_string())
    }
}

fn successful_body(response: Response) -> Result<String, ServiceError> {
    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        return Err(ServiceError::Status {
            status: status.as_u16(),
            body: truncate(body),
        });
    }
    Ok(body)
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: Option<String>,
}

/// Interprets an analysis reply body. The service reports input problems
/// with a 200 and an `{"error": ...}` object.
///
/// The result is read straight from the text; going through
/// `serde_json::Value` would sort the expense category keys.
pub fn parse_reply(body: &str) -> Result<AnalysisResult, ServiceError> {
    if let Ok(ErrorReply { error: Some(message) }) = serde_json::from_str(body) {
        return Err(ServiceError::Rejected(message));
    }
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::model::fixtures::{sample_result, SAMPLE_REPLY};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn service() -> HttpAnalysisService {
        let settings = Settings {
            base_url: "http://127.0.0.1:8000/".to_string(),
            ..Settings::default()
        };
        HttpAnalysisService::new(&settings).unwrap()
    }

    #[test]
    fn analyze_request_carries_locale_and_multipart_body() {
        let selection = Selection::new("q1.csv", b"date,revenue,expense\nJan,1,1\n".to_vec());
        let request = service().analyze_request(&selection, Locale::Hi).unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "http://127.0.0.1:8000/analyze?lang=hi");
        let content_type = request.headers()[reqwest::header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data"));
        assert!(request.body().is_some());
    }

    /// Accepts one connection, records the raw request and answers with
    /// the sample reply.
    fn capture_one_request() -> (String, thread::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            while !request_complete(&raw) {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                SAMPLE_REPLY.len(),
                SAMPLE_REPLY
            );
            stream.write_all(response.as_bytes()).unwrap();
            raw
        });

        (base_url, handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let Some(head_end) = find(raw, b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&raw[..head_end]).to_ascii_lowercase();
        let body = &raw[head_end + 4..];
        match head.lines().find_map(|line| line.strip_prefix("content-length:")) {
            Some(len) => body.len() >= len.trim().parse::<usize>().unwrap(),
            None => body.ends_with(b"0\r\n\r\n"),
        }
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|window| window == needle)
    }

    #[test]
    fn upload_sends_selection_as_file_field() {
        let contents = b"date,revenue,expense\nJan,90000,55000\n".to_vec();
        let selection = Selection::new("q1.csv", contents.clone());

        for locale in Locale::ALL {
            let (base_url, server) = capture_one_request();
            let settings = Settings {
                base_url,
                ..Settings::default()
            };
            let result = HttpAnalysisService::new(&settings)
                .unwrap()
                .analyze(&selection, locale)
                .unwrap();
            let raw = server.join().unwrap();
            let text = String::from_utf8_lossy(&raw);

            let request_line = format!("POST /analyze?lang={} HTTP/1.1", locale.code());
            assert!(text.starts_with(&request_line), "unexpected request: {}", text);
            assert!(text.contains(r#"Content-Disposition: form-data; name="file"; filename="q1.csv""#));
            assert!(find(&raw, &contents).is_some());
            assert_eq!(result, sample_result());
        }
    }

    #[test]
    fn export_request_has_no_parameters() {
        let request = service().export_request().unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().as_str(), "http://127.0.0.1:8000/export");
        assert!(request.url().query().is_none());
    }

    #[test]
    fn parses_a_full_reply() {
        assert_eq!(parse_reply(SAMPLE_REPLY).unwrap(), sample_result());
    }

    #[test]
    fn reply_keeps_category_order() {
        let body = SAMPLE_REPLY.replace(
            r#"{"Rent": 20000, "Payroll": 30000}"#,
            r#"{"Zeta": 1, "Alpha": 2, "Mid": 3}"#,
        );
        let result = parse_reply(&body).unwrap();
        let names: Vec<&str> = result.expense_categories
            .as_ref()
            .unwrap()
            .iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);

        let sample = parse_reply(SAMPLE_REPLY).unwrap();
        let names: Vec<&str> = sample.expense_categories
            .as_ref()
            .unwrap()
            .iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["Rent", "Payroll"]);
    }

    #[test]
    fn error_object_is_a_rejection() {
        let err = parse_reply(r#"{"error": "CSV must contain date, revenue, expense columns"}"#).unwrap_err();
        assert!(matches!(err, ServiceError::Rejected(_)));
        assert_eq!(err.to_string(), "CSV must contain date, revenue, expense columns");
    }

    #[test]
    fn malformed_bodies_are_json_errors() {
        assert!(matches!(parse_reply("<html>"), Err(ServiceError::Json(_))));
        assert!(matches!(parse_reply(r#"{"revenue": 1}"#), Err(ServiceError::Json(_))));
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = truncate("x".repeat(2000));
        assert!(body.chars().count() <= MAX_ERROR_BODY + 1);
        assert!(body.ends_with('…'));
        assert_eq!(truncate("short".to_string()), "short");
    }
}
