use alloy::{
    primitives::{Bytes, U256},
    transports::{RpcError, TransportErrorKind},
};
use thiserror::Error;

/// Failure reported by a [`crate::connector::ProviderConnector`].
#[derive(Debug, Clone, Error)]
pub enum ConnectorError {
    /// Node answered with a JSON-RPC error, possibly carrying revert data.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String, revert_data: Option<Bytes> },

    #[error("transport error: {0}")]
    Transport(String),

    /// No signer for the requested wallet or the signer refused to sign.
    #[error("signer error: {0}")]
    Signer(String),
}

impl ConnectorError {
    /// Revert data attached to a node error, if any.
    pub fn revert_data(&self) -> Option<&Bytes> {
        match self {
            ConnectorError::Rpc { revert_data, .. } => revert_data.as_ref(),
            _ => None,
        }
    }
}

impl From<RpcError<TransportErrorKind>> for ConnectorError {
    fn from(err: RpcError<TransportErrorKind>) -> Self {
        match err {
            RpcError::ErrorResp(payload) => ConnectorError::Rpc {
                code: payload.code,
                message: payload.message.to_string(),
                revert_data: payload.as_revert_data(),
            },
            other => ConnectorError::Transport(other.to_string()),
        }
    }
}

impl From<alloy::signers::Error> for ConnectorError {
    fn from(err: alloy::signers::Error) -> Self { ConnectorError::Signer(err.to_string()) }
}

#[derive(Debug, Error)]
pub enum LopError {
    #[error(transparent)]
    Connector(#[from] ConnectorError),

    #[error("abi decoding failed: {0}")]
    Abi(#[from] alloy::sol_types::Error),

    /// Contract call reverted with the decoded reason.
    #[error("contract reverted: {0}")]
    Revert(String),

    #[error("unexpected contract response: {0}")]
    UnexpectedResponse(Bytes),

    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: U256 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[cfg(test)]
mod tests {
    use alloy::rpc::json_rpc::ErrorPayload;

    use super::*;

    #[test]
    fn test_rpc_error_conversion() {
        let err = ConnectorError::from(RpcError::<TransportErrorKind>::ErrorResp(
            ErrorPayload::internal_error(),
        ));
        assert!(matches!(err, ConnectorError::Rpc { code: -32603, .. }));
        assert!(err.revert_data().is_none());

        let err = ConnectorError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "transport error: connection refused");
    }
}
