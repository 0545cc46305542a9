//! The computation service seam.

use calcscene_core::{CalcSceneError, Result};
use serde_json::Value;

use crate::request::ComputeRequest;

/// Something that answers [`ComputeRequest`]s with a JSON object.
///
/// Implementations report connection failures and non-success HTTP
/// statuses as [`CalcSceneError::Transport`]; [`decode_response`] does the
/// status and body handling for HTTP clients.
#[allow(async_fn_in_trait)]
pub trait ComputeService {
    async fn fetch(&self, request: &ComputeRequest) -> Result<Value>;
}

/// Turns an HTTP status line and body into a decoded payload.
pub fn decode_response(status: u16, reason: &str, body: &str) -> Result<Value> {
    if !(200..300).contains(&status) {
        return Err(CalcSceneError::Transport(format!("HTTP {status}: {reason}")));
    }
    serde_json::from_str(body)
        .map_err(|e| CalcSceneError::Transport(format!("response is not valid JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_success_status_is_transport_error() {
        let err = decode_response(502, "Bad Gateway", "").unwrap_err();
        assert_eq!(err.to_string(), "transport error: HTTP 502: Bad Gateway");
    }

    #[test]
    fn body_is_decoded() {
        let value = decode_response(200, "OK", r#"{"derivada": "2*x"}"#).unwrap();
        assert_eq!(value["derivada"], "2*x");
        assert!(matches!(
            decode_response(200, "OK", "<html>"),
            Err(CalcSceneError::Transport(_))
        ));
    }
}
