use serde::Deserialize;

use super::method::Method;
use crate::error::{AnalysisError, TransportError};

/// A rendered analysis result returned by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Locator of the rendered artifact, as returned by the service.
    pub reference: String,
    /// Method active when the request was submitted.
    pub method: Method,
    /// Name of the file the request carried.
    pub source_file: String,
}

impl AnalysisResult {
    /// Heading shown above the result image.
    pub fn label(&self) -> &'static str {
        self.method.result_label()
    }

    /// Locator usable by the image loader. Anything without a URI scheme is
    /// taken as a path on the service and joined onto `base_url`.
    pub fn display_uri(&self, base_url: &str) -> String {
        if has_scheme(&self.reference) {
            self.reference.clone()
        } else {
            format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                self.reference.trim_start_matches('/')
            )
        }
    }
}

/// `scheme ":"` prefix, where a scheme is a letter followed by letters,
/// digits, `+`, `-` or `.`.
fn has_scheme(reference: &str) -> bool {
    let Some((scheme, _)) = reference.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    #[serde(rename = "imageUrl")]
    image_url: String,
}

/// Turn a completed HTTP exchange into a result.
///
/// `method` must be the method captured when the request was sent, never the
/// current selection.
pub fn bind_response(
    status: u16,
    body: &str,
    method: Method,
    source_file: &str,
) -> Result<AnalysisResult, AnalysisError> {
    if !(200..300).contains(&status) {
        return Err(TransportError::Status {
            status,
            body: body.chars().take(200).collect(),
        }
        .into());
    }

    let response: AnalysisResponse =
        serde_json::from_str(body).map_err(|e| AnalysisError::ResponseFormat(e.to_string()))?;

    Ok(AnalysisResult {
        reference: response.image_url,
        method,
        source_file: source_file.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_binds_reference_and_method() {
        let result = bind_response(
            200,
            r#"{"imageUrl": "http://localhost:5000/static/corr.png", "extra": 1}"#,
            Method::PearsonCorrelation,
            "series.csv",
        )
        .unwrap();
        assert_eq!(result.reference, "http://localhost:5000/static/corr.png");
        assert_eq!(result.label(), "Correlation Result:");
        assert_eq!(result.source_file, "series.csv");
    }

    #[test]
    fn missing_or_mistyped_field_is_a_format_error() {
        for body in [r#"{"url": "x"}"#, r#"{"imageUrl": 3}"#, "<html>oops</html>", ""] {
            let err = bind_response(200, body, Method::Ewma, "a.csv").unwrap_err();
            assert!(matches!(err, AnalysisError::ResponseFormat(_)), "{body}");
            assert!(err.is_service_failure());
        }
    }

    #[test]
    fn non_success_status_is_a_transport_error() {
        let err = bind_response(500, "Internal Server Error", Method::Ewma, "a.csv").unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Transport(TransportError::Status {
                status: 500,
                body: "Internal Server Error".to_string()
            })
        );
    }

    #[test]
    fn label_follows_the_captured_method() {
        let body = r#"{"imageUrl": "/plot.png"}"#;
        let ewma = bind_response(200, body, Method::Ewma, "a.csv").unwrap();
        let arima = bind_response(200, body, Method::Arima, "a.csv").unwrap();
        assert_eq!(ewma.label(), "EWMA Result:");
        assert_eq!(arima.label(), "Analysis Result:");
    }

    #[test]
    fn relative_references_join_the_service_url() {
        let result = AnalysisResult {
            reference: "/static/plot.png".to_string(),
            method: Method::Ewma,
            source_file: "a.csv".to_string(),
        };
        assert_eq!(
            result.display_uri("http://localhost:5000/"),
            "http://localhost:5000/static/plot.png"
        );

        let absolute = AnalysisResult {
            reference: "https://cdn.example.org/p.png".to_string(),
            ..result
        };
        assert_eq!(absolute.display_uri("http://localhost:5000"), "https://cdn.example.org/p.png");
    }

    #[test]
    fn scheme_less_references_join_the_service_url() {
        let result = AnalysisResult {
            reference: "static/plot.png".to_string(),
            method: Method::PearsonCorrelation,
            source_file: "a.csv".to_string(),
        };
        assert_eq!(
            result.display_uri("http://localhost:5000"),
            "http://localhost:5000/static/plot.png"
        );
        assert_eq!(
            result.display_uri("http://localhost:5000/"),
            "http://localhost:5000/static/plot.png"
        );

        let nested = AnalysisResult {
            reference: "plots/run:1.png".to_string(),
            ..result.clone()
        };
        assert_eq!(nested.display_uri("http://svc"), "http://svc/plots/run:1.png");

        let inline = AnalysisResult {
            reference: "data:image/png;base64,AAAA".to_string(),
            ..result
        };
        assert_eq!(inline.display_uri("http://svc"), "data:image/png;base64,AAAA");
    }
}
