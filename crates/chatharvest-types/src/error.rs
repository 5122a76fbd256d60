use thiserror::Error;

/// Errors surfaced by the messaging client adapter.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("chat not found: '{0}'")]
    ChatNotFound(String),

    #[error("client not started")]
    NotStarted,

    #[error("bridge transport error: {0}")]
    Bridge(String),

    #[error("bridge protocol error: {0}")]
    Protocol(String),

    #[error("client request failed: {0}")]
    Request(String),
}

/// Errors from browser provisioning (resolve, download, launch, handshake).
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("no compatible browser executable found")]
    NoExecutable,

    #[error("snapshot download failed: {0}")]
    Download(String),

    #[error("archive extraction failed: {0}")]
    Extract(String),

    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("DevTools handshake failed: {0}")]
    Handshake(String),
}

/// Errors from rendering a QR token to an image data URL.
#[derive(Debug, Error)]
pub enum QrError {
    #[error("qr encoding failed: {0}")]
    Encode(String),

    #[error("png encoding failed: {0}")]
    Image(String),
}

/// Errors from driving a client session to a terminal state.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    #[error("client disconnected: {0}")]
    Disconnected(String),

    #[error("event stream closed before a terminal state was reached")]
    EventStreamClosed,

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("session store error: {0}")]
    Store(String),
}

/// Errors from the message extraction flow.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("failed to write output: {0}")]
    Output(String),
}

/// Invalid analysis selection from the command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("unknown analysis type: '{0}' (expected 'main_topics' or 'specific_messages')")]
    UnknownKind(String),

    #[error("analysis type 'specific_messages' requires a criteria argument")]
    MissingCriteria,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        let err = ClientError::ChatNotFound("12345@g.us".to_string());
        assert_eq!(err.to_string(), "chat not found: '12345@g.us'");
    }

    #[test]
    fn test_session_error_wraps_client_error() {
        let err = SessionError::from(ClientError::NotStarted);
        assert_eq!(err.to_string(), "client not started");
    }

    #[test]
    fn test_provision_error_display() {
        let err = ProvisionError::Download("HTTP 404".to_string());
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[test]
    fn test_analysis_error_display() {
        let err = AnalysisError::UnknownKind("topics".to_string());
        assert!(err.to_string().contains("'topics'"));
        assert!(
            AnalysisError::MissingCriteria
                .to_string()
                .contains("criteria")
        );
    }
}
