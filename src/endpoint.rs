use thiserror::Error;
use url::{ParseError, Url};

#[derive(Debug, Error)]
pub enum RequestUriError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{0:?} has no host, is the `//` after the scheme missing?")]
    NoAuthority(String),
}

/// Parses the input string as an absolute request URI.
///
/// Parsing adheres to the following rules:
/// - The input must carry a scheme, relative references are rejected.
/// - The scheme must be followed by an authority, so `host:8080` (read as
///   scheme `host` and path `8080`) or `mailto:x` are rejected.
/// - Any scheme is accepted otherwise, the client decides which ones it can
///   use.
pub fn parse_request_uri(input: &str) -> Result<Url, RequestUriError> {
    let url = Url::parse(input)?;

    if url.cannot_be_a_base() {
        return Err(RequestUriError::NoAuthority(input.to_string()));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:8080", "http://localhost:8080/")]
    #[case("https://target-allocator.monitoring.svc", "https://target-allocator.monitoring.svc/")]
    #[case("http://127.0.0.1:80/jobs", "http://127.0.0.1/jobs")]
    fn parse_request_uri_ok(#[case] input: &str, #[case] expected: url::Url) {
        let result = super::parse_request_uri(input).expect("expected no error");
        assert_eq!(expected, result);
    }

    #[rstest]
    #[case("")]
    #[case("not a url")]
    #[case("/relative/path")]
    #[case("target-allocator:8080")]
    #[case("mailto:x")]
    fn parse_request_uri_error(#[case] input: &str) {
        let _ = super::parse_request_uri(input).expect_err("expected a error");
    }

    #[test]
    fn missing_slashes_are_pointed_out() {
        let err = super::parse_request_uri("target-allocator:8080").unwrap_err();
        assert!(matches!(err, super::RequestUriError::NoAuthority(_)));
        assert!(err.to_string().contains("`//`"), "{err}");
    }
}
