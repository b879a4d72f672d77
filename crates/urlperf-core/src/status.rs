use serde::Serialize;
use std::fmt;

/// Coarse HTTP status class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusCategory {
    Informational,
    Success,
    Redirection,
    ClientError,
    ServerError,
}

impl StatusCategory {
    /// Classify a status code. Anything below 200, including the 0 used for
    /// recorded timeouts, is treated as informational.
    pub fn from_code(code: u16) -> Self {
        match code {
            500.. => StatusCategory::ServerError,
            400.. => StatusCategory::ClientError,
            300.. => StatusCategory::Redirection,
            200.. => StatusCategory::Success,
            _ => StatusCategory::Informational,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusCategory::Informational => "Informational",
            StatusCategory::Success => "Success",
            StatusCategory::Redirection => "Redirection",
            StatusCategory::ClientError => "Client Error",
            StatusCategory::ServerError => "Server Error",
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusCodeInfo {
    pub code: u16,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusGroup {
    pub range: &'static str,
    pub category: StatusCategory,
    pub codes: &'static [StatusCodeInfo],
}

const fn info(code: u16, name: &'static str, description: &'static str) -> StatusCodeInfo {
    StatusCodeInfo {
        code,
        name,
        description,
    }
}

/// Reference table of the status codes most often seen when sampling a URL
pub const STATUS_REFERENCE: &[StatusGroup] = &[
    StatusGroup {
        range: "1xx",
        category: StatusCategory::Informational,
        codes: &[
            info(100, "Continue", "The server has received the request headers and the client should proceed to send the request body."),
            info(101, "Switching Protocols", "The server is switching protocols as requested by the client."),
            info(102, "Processing", "The server is processing the request but no response is available yet."),
        ],
    },
    StatusGroup {
        range: "2xx",
        category: StatusCategory::Success,
        codes: &[
            info(200, "OK", "The request succeeded."),
            info(201, "Created", "The request succeeded and a new resource was created."),
            info(204, "No Content", "The request succeeded but there is no content to send."),
        ],
    },
    StatusGroup {
        range: "3xx",
        category: StatusCategory::Redirection,
        codes: &[
            info(301, "Moved Permanently", "The requested resource has been permanently moved to a new URL."),
            info(302, "Found", "The requested resource temporarily resides under a different URL."),
            info(304, "Not Modified", "The client can use cached data."),
        ],
    },
    StatusGroup {
        range: "4xx",
        category: StatusCategory::ClientError,
        codes: &[
            info(400, "Bad Request", "The server cannot process the request due to client error."),
            info(401, "Unauthorized", "Authentication is required and has failed or not been provided."),
            info(403, "Forbidden", "The server understood the request but refuses to authorize it."),
            info(404, "Not Found", "The requested resource could not be found on the server."),
            info(429, "Too Many Requests", "The user has sent too many requests in a given amount of time."),
        ],
    },
    StatusGroup {
        range: "5xx",
        category: StatusCategory::ServerError,
        codes: &[
            info(500, "Internal Server Error", "The server encountered an unexpected condition."),
            info(502, "Bad Gateway", "The server received an invalid response from the upstream server."),
            info(503, "Service Unavailable", "The server is temporarily unable to handle the request."),
            info(504, "Gateway Timeout", "The upstream server failed to send a request in time."),
        ],
    },
];

/// Look up a code in the reference table
pub fn lookup(code: u16) -> Option<&'static StatusCodeInfo> {
    STATUS_REFERENCE
        .iter()
        .flat_map(|group| group.codes.iter())
        .find(|info| info.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_thresholds() {
        assert_eq!(StatusCategory::from_code(0), StatusCategory::Informational);
        assert_eq!(StatusCategory::from_code(101), StatusCategory::Informational);
        assert_eq!(StatusCategory::from_code(200), StatusCategory::Success);
        assert_eq!(StatusCategory::from_code(299), StatusCategory::Success);
        assert_eq!(StatusCategory::from_code(304), StatusCategory::Redirection);
        assert_eq!(StatusCategory::from_code(404), StatusCategory::ClientError);
        assert_eq!(StatusCategory::from_code(500), StatusCategory::ServerError);
        assert_eq!(StatusCategory::from_code(599), StatusCategory::ServerError);
    }

    #[test]
    fn test_reference_groups_match_their_category() {
        for group in STATUS_REFERENCE {
            for code in group.codes {
                assert_eq!(
                    StatusCategory::from_code(code.code),
                    group.category,
                    "{} listed under {}",
                    code.code,
                    group.range
                );
            }
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup(429).map(|i| i.name), Some("Too Many Requests"));
        assert!(lookup(418).is_none());
    }
}
