/// HTTP Method enum
///
/// Only the two methods the fetch path issues: a request without a body is a
/// GET, a request with one is a POST.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    GET,
    POST,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
        }
    }
}

/// A single outgoing request, moved into exactly one fetch worker
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub body: Option<Vec<u8>>,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, body: Option<Vec<u8>>) -> Self {
        FetchRequest {
            url: url.into(),
            body,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url, None)
    }

    pub fn post(url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self::new(url, Some(body.into()))
    }

    pub fn method(&self) -> HttpMethod {
        if self.body.is_some() {
            HttpMethod::POST
        } else {
            HttpMethod::GET
        }
    }
}

/// How a fetch ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Placeholder left in the cell while a new fetch runs
    Pending,
    /// The server answered. `truncated` is set when the body hit the size cap.
    Completed { status: u16, truncated: bool },
    /// Timeout, DNS, connect, TLS or body read failure
    Failed { message: String },
}

/// Response published by a fetch worker
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchResponse {
    pub id: u64,
    pub outcome: FetchOutcome,
    /// Raw payload; empty on most failures, partial if the body stream broke
    pub body: Vec<u8>,
    pub time_ms: u64,
}

impl FetchResponse {
    /// Empty placeholder for fetch `id` while it is in flight
    pub fn pending(id: u64) -> Self {
        FetchResponse {
            id,
            outcome: FetchOutcome::Pending,
            body: Vec::new(),
            time_ms: 0,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Pending)
    }

    pub fn status_code(&self) -> Option<u16> {
        match self.outcome {
            FetchOutcome::Completed { status, .. } => Some(status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_follows_body_presence() {
        assert_eq!(FetchRequest::get("http://x").method(), HttpMethod::GET);
        assert_eq!(FetchRequest::post("http://x", "{}").method(), HttpMethod::POST);
        // An empty body is still a body.
        assert_eq!(FetchRequest::post("http://x", "").method(), HttpMethod::POST);
    }

    #[test]
    fn status_code_only_for_completed() {
        let mut resp = FetchResponse::pending(3);
        assert!(resp.is_pending());
        assert_eq!(resp.status_code(), None);

        resp.outcome = FetchOutcome::Completed { status: 204, truncated: false };
        assert_eq!(resp.status_code(), Some(204));

        resp.outcome = FetchOutcome::Failed { message: "boom".into() };
        assert_eq!(resp.status_code(), None);
    }
}
