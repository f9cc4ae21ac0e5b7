use reqwest::blocking::multipart::{Form, Part};

use super::method::Endpoint;
use super::request::{AnalysisRequest, FILE_FIELD};
use super::result::{bind_response, AnalysisResult};
use crate::config::Config;
use crate::error::{AnalysisError, TransportError};

// ---------------------------------------------------------------------------
// HTTP client for the analysis service
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(AnalysisClient {
            http,
            base_url: config.service_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint.path())
    }

    /// POST the request as multipart form data and bind the response.
    ///
    /// Blocks until the service answers or the timeout expires.
    pub fn submit(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let url = self.url_for(request.endpoint);
        log::info!(
            "POST {url} ({}, {} bytes, fields {:?})",
            request.method,
            request.file_bytes.len(),
            request.fields
        );

        let file_part = Part::bytes(request.file_bytes.to_vec()).file_name(request.file_name.clone());
        let form = request
            .fields
            .iter()
            .fold(Form::new().part(FILE_FIELD, file_part), |form, (name, value)| {
                form.text(*name, value.clone())
            });

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        bind_response(status, &body, request.method, &request.file_name)
    }
}


/// Answer a single HTTP request on an ephemeral loopback port with a fixed
/// status line and body. Returns the base URL.
#[cfg(test)]
pub(crate) fn serve_once(status_line: &'static str, body: &'static str) -> String {
    use std::io::{BufRead, BufReader, Read, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let Ok((stream, _)) = listener.accept() else {
            return;
        };
        let mut reader = BufReader::new(stream);
        let mut content_length = 0usize;
        let mut line = String::new();
        while reader.read_line(&mut line).is_ok_and(|n| n > 0) && line != "\r\n" {
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
            line.clear();
        }
        let mut request_body = vec![0; content_length];
        let _ = reader.read_exact(&mut request_body);

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = reader.get_mut().write_all(response.as_bytes());
    });
    format!("http://{addr}")
}
