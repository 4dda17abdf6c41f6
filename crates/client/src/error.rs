use serde::Deserialize;

/// Everything a client operation can fail with.
///
/// Messages from the server are kept verbatim; the server's error `code`
/// selects the variant.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Bad credentials, or a session that could not be refreshed.
    #[error("{0}")]
    Auth(String),

    /// Rejected input, either before the request was sent or by the server.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// The server could not store or remove a file.
    #[error("{0}")]
    Storage(String),

    /// Authenticated but not allowed (deactivated account, not the owner).
    #[error("{0}")]
    Forbidden(String),

    /// Any other non-success response.
    #[error("Server error ({status}): {message}")]
    Backend {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The request never completed (connection, timeout, TLS).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response whose body did not have the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// Persisted credentials could not be read or written.
    #[error("Token store error: {0}")]
    TokenStore(String),
}

impl ClientError {
    /// Convenience for required-field checks done before any request.
    pub(crate) fn required(field: &str) -> Self {
        ClientError::Validation(format!("{field} is required"))
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth(_))
    }

    /// Turn a non-success response into an error, keeping the server's message.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return ClientError::Transport(e),
        };
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => Self::from_code(status, body.code, body.error),
            Err(_) => ClientError::Backend {
                status,
                code: None,
                message: text,
            },
        }
    }

    fn from_code(status: u16, code: String, message: String) -> Self {
        match code.as_str() {
            "UNAUTHORIZED" => ClientError::Auth(message),
            "VALIDATION_ERROR" | "BAD_REQUEST" => ClientError::Validation(message),
            "NOT_FOUND" => ClientError::NotFound(message),
            "STORAGE_ERROR" => ClientError::Storage(message),
            "FORBIDDEN" => ClientError::Forbidden(message),
            _ => ClientError::Backend {
                status,
                code: Some(code),
                message,
            },
        }
    }
}

/// Error body returned by the API: `{ "error": ..., "code": ... }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn codes_select_variants_and_keep_messages() {
        assert_matches!(
            ClientError::from_code(401, "UNAUTHORIZED".into(), "Invalid email or password".into()),
            ClientError::Auth(msg) if msg == "Invalid email or password"
        );
        assert_matches!(
            ClientError::from_code(502, "STORAGE_ERROR".into(), "down".into()),
            ClientError::Storage(_)
        );
        assert_matches!(
            ClientError::from_code(409, "CONFLICT".into(), "dup".into()),
            ClientError::Backend { status: 409, code: Some(code), .. } if code == "CONFLICT"
        );
    }

    #[test]
    fn display_is_the_server_message() {
        let err = ClientError::from_code(400, "VALIDATION_ERROR".into(), "Line 3: person_name is required".into());
        assert_eq!(err.to_string(), "Line 3: person_name is required");
    }
}
