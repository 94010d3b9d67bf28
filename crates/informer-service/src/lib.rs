//! Calculation service boundary
//!
//! Exposes the subnet calculator as a stateless `(ip, subnet)` call that any
//! transport can drive, plus a JSON-RPC 2.0 handler over it.
//!
//! # Methods
//!
//! - `calculate` - params `{"ip": "...", "subnet": "..."}`, `subnet` optional
//! - `ping` - liveness check
//!
//! Rejected address input is not a protocol error. It comes back as a
//! successful response whose result is `{"error": "<message>"}`.
//!
//! # Examples
//!
//! ```
//! use informer_service::Service;
//!
//! let service = Service::new();
//! let request = r#"{"jsonrpc":"2.0","method":"calculate","params":{"ip":"10.0.0.1/8"},"id":1}"#;
//!
//! let response = service.handle_request(request).unwrap();
//! assert!(response.contains(r#""num_usable_ips":16777214"#));
//! ```

use informer_cidr::{describe, normalize};
use informer_core::{InvalidAddressError, NetworkReport};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod transport;

pub use transport::StdioTransport;

/// Service errors
#[derive(Error, Debug)]
pub enum ServiceError {
    /// JSON-RPC parse error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Method not found
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Invalid method parameters
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Compute the report for one pair of form fields
///
/// `subnet` is ignored when `ip` is in CIDR notation.
pub fn calculate(ip: &str, subnet: &str) -> std::result::Result<NetworkReport, InvalidAddressError> {
    let network = normalize(ip, subnet)?;
    let report = describe(&network);
    debug!(%network, usable = %report.num_usable_ips, "calculated network report");
    Ok(report)
}

/// All-or-nothing result of a calculation, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CalcOutcome {
    /// The computed report
    Report(NetworkReport),
    /// A user-facing error message
    Error { error: String },
}

impl CalcOutcome {
    /// Run a calculation, folding any error into its message
    pub fn from_inputs(ip: &str, subnet: &str) -> Self {
        match calculate(ip, subnet) {
            Ok(report) => CalcOutcome::Report(report),
            Err(e) => {
                debug!(ip, subnet, error = %e, "rejected input");
                CalcOutcome::Error {
                    error: e.to_string(),
                }
            }
        }
    }

    /// The report, if the calculation succeeded
    pub fn report(&self) -> Option<&NetworkReport> {
        match self {
            CalcOutcome::Report(report) => Some(report),
            CalcOutcome::Error { .. } => None,
        }
    }

    /// The error message, if the calculation failed
    pub fn error_message(&self) -> Option<&str> {
        match self {
            CalcOutcome::Report(_) => None,
            CalcOutcome::Error { error } => Some(error),
        }
    }
}

/// JSON-RPC 2.0 request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default)]
    pub id: serde_json::Value,
}

/// JSON-RPC 2.0 response
///
/// Results are serialized straight from their typed form, so host counts
/// beyond `u64` survive intact.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<MethodResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: serde_json::Value,
}

impl JsonRpcResponse {
    fn success(id: serde_json::Value, result: MethodResult) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    fn failure(id: serde_json::Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// Result payload of a successful method call
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MethodResult {
    Calculated(CalcOutcome),
    Pong { status: String },
}

/// JSON-RPC 2.0 error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    fn with_code(code: i32, msg: &str) -> Self {
        Self {
            code,
            message: msg.to_string(),
            data: None,
        }
    }
}

impl From<&ServiceError> for JsonRpcError {
    fn from(err: &ServiceError) -> Self {
        let code = match err {
            ServiceError::ParseError(_) => -32700,
            ServiceError::InvalidRequest(_) => -32600,
            ServiceError::MethodNotFound(_) => -32601,
            ServiceError::InvalidParams(_) => -32602,
            ServiceError::InternalError(_) | ServiceError::Io(_) => -32603,
        };
        Self::with_code(code, &err.to_string())
    }
}

/// Calculate request parameters
#[derive(Debug, Deserialize)]
struct CalculateParams {
    ip: String,
    #[serde(default)]
    subnet: String,
}

/// JSON-RPC 2.0 front end for the calculator
///
/// Holds no state; one instance can serve any number of requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct Service;

impl Service {
    /// Create a new service
    pub fn new() -> Self {
        Self
    }

    /// Handle one JSON-RPC 2.0 request and return the serialized response
    ///
    /// Protocol problems become JSON-RPC error responses. Only a failure to
    /// serialize the response is returned as `Err`.
    pub fn handle_request(&self, request_str: &str) -> Result<String> {
        let response = match serde_json::from_str::<JsonRpcRequest>(request_str) {
            Ok(request) => self.dispatch(request),
            Err(e) => {
                let err = ServiceError::ParseError(e.to_string());
                warn!(error = %err, "unparseable request");
                JsonRpcResponse::failure(serde_json::Value::Null, JsonRpcError::from(&err))
            }
        };

        serde_json::to_string(&response).map_err(|e| ServiceError::InternalError(e.to_string()))
    }

    fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        if request.jsonrpc != "2.0" {
            let err = ServiceError::InvalidRequest("Invalid JSON-RPC version".to_string());
            warn!(version = %request.jsonrpc, "rejected request");
            return JsonRpcResponse::failure(request.id, JsonRpcError::from(&err));
        }

        let result = match request.method.as_str() {
            "calculate" => self.handle_calculate(&request.params),
            "ping" => Ok(MethodResult::Pong {
                status: "ok".to_string(),
            }),
            _ => Err(ServiceError::MethodNotFound(request.method.clone())),
        };

        match result {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(e) => {
                warn!(method = %request.method, error = %e, "request failed");
                JsonRpcResponse::failure(request.id, JsonRpcError::from(&e))
            }
        }
    }

    fn handle_calculate(&self, params: &serde_json::Value) -> Result<MethodResult> {
        let params: CalculateParams = serde_json::from_value(params.clone())
            .map_err(|e| ServiceError::InvalidParams(e.to_string()))?;

        Ok(MethodResult::Calculated(CalcOutcome::from_inputs(
            &params.ip,
            &params.subnet,
        )))
    }
}
