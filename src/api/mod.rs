//! HTTP clients for the external collaborators: the dispatch/optimization
//! backend and the geocoding service.

pub mod client;
pub mod geocoding;

use serde::de::DeserializeOwned;

use crate::error::DispatchError;

pub(crate) fn transport_error(err: reqwest::Error) -> DispatchError {
    if err.is_decode() {
        DispatchError::Decode(err.to_string())
    } else {
        // Connect failures, timeouts and everything else that never produced a
        // status line surface as the "backend unreachable" class.
        DispatchError::Unreachable(err.to_string())
    }
}

pub(crate) fn error_from_status(status: u16, body: &str) -> DispatchError {
    let message = embedded_error_message(body);

    if status >= 500 {
        DispatchError::Server {
            status,
            message: message.unwrap_or_else(|| "internal server error".to_string()),
        }
    } else {
        // 4xx with a structured body: the embedded message is shown verbatim.
        DispatchError::Rejected(
            message.unwrap_or_else(|| format!("request rejected with status {status}")),
        )
    }
}

fn embedded_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}

pub(crate) async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, DispatchError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(error_from_status(status.as_u16(), &body));
    }

    response
        .json::<T>()
        .await
        .map_err(|err| DispatchError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::error_from_status;
    use crate::error::DispatchError;

    #[test]
    fn server_failures_map_to_the_server_class() {
        let err = error_from_status(503, r#"{"error":"optimizer overloaded"}"#);
        match err {
            DispatchError::Server { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "optimizer overloaded");
            }
            other => panic!("expected Server, got {other:?}"),
        }
    }

    #[test]
    fn structured_client_failures_surface_the_message_verbatim() {
        let err = error_from_status(404, r#"{"error":"order o9 not found"}"#);
        match err {
            DispatchError::Rejected(message) => assert_eq!(message, "order o9 not found"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn unstructured_client_failures_fall_back_to_the_status() {
        let err = error_from_status(400, "not json");
        match err {
            DispatchError::Rejected(message) => assert!(message.contains("400")),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }
}
