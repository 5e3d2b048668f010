use std::sync::LazyLock;

use alloy::{
    primitives::{Address, B256, Bytes, U256},
    sol_types::{SolCall, SolValue},
};
use regex::Regex;

use crate::{
    abi::LimitOrderProtocol::{
        DOMAIN_SEPARATORCall, advanceNonceCall, cancelOrderCall, cancelOrderRFQCall,
        checkPredicateCall, fillOrderCall, fillOrderRFQCall, increaseNonceCall, nonceCall,
        remainingCall, simulateCallsCall,
    },
    connector::ProviderConnector,
    error::{ConnectorError, LopError},
    types,
};

/// Prefix of the revert reason reported by `simulateCalls`, followed by one
/// digit per simulated call (`1` success, `0` failure).
pub const CALL_RESULTS_PREFIX: &str = "CALL_RESULTS_";

static CALL_RESULTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{}\d+", CALL_RESULTS_PREFIX)).expect("valid call results pattern")
});

/// Encodes limit order protocol calls and reads the protocol state.
///
/// Write operations (`fill_*`, `cancel_*`, nonce updates) only return call
/// data, the caller wraps it into a transaction and broadcasts it.
pub struct LimitOrderProtocolFacade<C> {
    contract_address: Address,
    connector: C,
}

impl<C> LimitOrderProtocolFacade<C> {
    pub fn new(contract_address: Address, connector: C) -> Self {
        Self { contract_address, connector }
    }

    pub fn contract_address(&self) -> Address { self.contract_address }

    pub fn connector(&self) -> &C { &self.connector }

    pub fn fill_limit_order(
        &self,
        order: &types::LimitOrder,
        signature: &types::LimitOrderSignature,
        taker_amount: U256,
        maker_amount: U256,
        threshold_amount: U256,
    ) -> Bytes {
        call_data(fillOrderCall {
            order: order.clone(),
            signature: signature.clone(),
            takerAmount: taker_amount,
            makerAmount: maker_amount,
            thresholdAmount: threshold_amount,
        })
    }

    pub fn fill_rfq_order(
        &self,
        order: &types::RfqOrder,
        signature: &types::LimitOrderSignature,
        taker_amount: U256,
        maker_amount: U256,
    ) -> Bytes {
        call_data(fillOrderRFQCall {
            order: order.clone(),
            signature: signature.clone(),
            takerAmount: taker_amount,
            makerAmount: maker_amount,
        })
    }

    pub fn cancel_limit_order(&self, order: &types::LimitOrder) -> Bytes {
        call_data(cancelOrderCall { order: order.clone() })
    }

    pub fn cancel_rfq_order(&self, order_info: types::RfqOrderInfo) -> Bytes {
        call_data(cancelOrderRFQCall { orderInfo: order_info.into() })
    }

    pub fn advance_nonce(&self, count: u8) -> Bytes { call_data(advanceNonceCall { amount: count }) }

    pub fn increase_nonce(&self) -> Bytes { call_data(increaseNonceCall {}) }
}

impl<C: ProviderConnector> LimitOrderProtocolFacade<C> {
    async fn call<T: SolCall>(&self, call: T) -> Result<Bytes, ConnectorError> {
        tracing::debug!(contract = %self.contract_address, method = T::SIGNATURE, "eth_call");
        self.connector
            .eth_call(self.contract_address, call_data(call))
            .await
    }

    /// Current nonce of the maker.
    pub async fn nonce(&self, maker: Address) -> Result<U256, LopError> {
        let result = self.call(nonceCall { maker }).await?;
        Ok(nonceCall::abi_decode_returns(&result)?)
    }

    /// Whether the order predicate currently holds.
    ///
    /// Never fails: call and decoding errors are logged and reported as
    /// `false`.
    pub async fn check_predicate(&self, order: &types::LimitOrder) -> bool {
        let result = match self.call(checkPredicateCall { order: order.clone() }).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(%err, "checkPredicate call failed");
                return false;
            },
        };
        match U256::abi_decode(&result) {
            Ok(value) => value == U256::from(1),
            Err(err) => {
                tracing::warn!(%err, %result, "checkPredicate result is not a number");
                false
            },
        }
    }

    /// Amount still fillable for the order.
    ///
    /// A response other than a single word is treated as an encoded revert
    /// reason and returned as [`LopError::Revert`].
    pub async fn remaining(&self, order_hash: types::LimitOrderHash) -> Result<U256, LopError> {
        let result = self.call(remainingCall { orderHash: order_hash }).await?;
        if let Some(remaining) = parse_remaining_response(&result) {
            return Ok(remaining);
        }
        Err(LopError::Revert(parse_contract_response(&result)?))
    }

    /// Simulates `data` calls to `tokens`, returns `true` if every call
    /// succeeds.
    ///
    /// The contract always reverts to discard state changes, reporting the
    /// outcome in the revert reason.
    pub async fn simulate_calls(
        &self,
        tokens: Vec<Address>,
        data: Vec<Bytes>,
    ) -> Result<bool, LopError> {
        let err = match self.call(simulateCallsCall { targets: tokens, data }).await {
            Ok(result) => {
                return parse_simulate_transfer_response(&result)
                    .ok_or(LopError::UnexpectedResponse(result));
            },
            Err(err) => err,
        };

        if let Some(parsed) = err.revert_data().and_then(parse_simulate_transfer_response) {
            return Ok(parsed);
        }
        if let Some(parsed) = parse_simulate_transfer_error(&err) {
            return Ok(parsed);
        }
        Err(err.into())
    }

    pub async fn domain_separator(&self) -> Result<B256, LopError> {
        let result = self.call(DOMAIN_SEPARATORCall {}).await?;
        Ok(DOMAIN_SEPARATORCall::abi_decode_returns(&result)?)
    }
}

fn call_data<T: SolCall>(call: T) -> Bytes { call.abi_encode().into() }

fn parse_remaining_response(response: &[u8]) -> Option<U256> {
    (response.len() == 32).then(|| U256::from_be_slice(response))
}

/// Decodes the reason string of an `Error(string)` encoded payload, ignoring
/// the selector.
fn parse_contract_response(response: &Bytes) -> Result<String, LopError> {
    if response.len() < 4 {
        return Err(LopError::UnexpectedResponse(response.clone()));
    }
    Ok(String::abi_decode(&response[4..])?)
}

fn call_results_succeeded(digits: &str) -> bool { !digits.contains('0') }

fn parse_simulate_transfer_response(response: &Bytes) -> Option<bool> {
    let reason = parse_contract_response(response).ok()?;
    reason
        .strip_prefix(CALL_RESULTS_PREFIX)
        .map(call_results_succeeded)
}

/// Compatibility fallback for nodes that do not return revert data: looks
/// for the call results marker in the error message.
fn parse_simulate_transfer_error(err: &ConnectorError) -> Option<bool> {
    let message = err.to_string();
    let found = CALL_RESULTS_RE.find(&message)?;
    Some(call_results_succeeded(&found.as_str()[CALL_RESULTS_PREFIX.len()..]))
}

#[cfg(test)]
mod tests {
    use alloy::sol_types::{Revert, SolError};

    use super::*;

    fn revert(reason: &str) -> Bytes { Revert { reason: reason.to_string() }.abi_encode().into() }

    #[test]
    fn test_parse_remaining_response() {
        let word = U256::from(123456).to_be_bytes::<32>();
        assert_eq!(parse_remaining_response(&word), Some(U256::from(123456)));
        assert_eq!(parse_remaining_response(&revert("LOP: Unknown order")), None);
    }

    #[test]
    fn test_parse_contract_response() {
        assert_eq!(
            parse_contract_response(&revert("LOP: Unknown order")).unwrap(),
            "LOP: Unknown order"
        );
        assert!(matches!(
            parse_contract_response(&Bytes::from_static(&[1, 2])),
            Err(LopError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_parse_simulate_transfer_response() {
        assert_eq!(parse_simulate_transfer_response(&revert("CALL_RESULTS_111")), Some(true));
        assert_eq!(parse_simulate_transfer_response(&revert("CALL_RESULTS_101")), Some(false));
        assert_eq!(parse_simulate_transfer_response(&revert("TRANSFER_FAILED")), None);
    }

    #[test]
    fn test_parse_simulate_transfer_error() {
        let err = |message: &str| ConnectorError::Rpc {
            code: 3,
            message: message.to_string(),
            revert_data: None,
        };
        assert_eq!(
            parse_simulate_transfer_error(&err("execution reverted: CALL_RESULTS_11")),
            Some(true)
        );
        assert_eq!(
            parse_simulate_transfer_error(&err("execution reverted: CALL_RESULTS_10, gas used")),
            Some(false)
        );
        assert_eq!(parse_simulate_transfer_error(&err("execution reverted")), None);
        assert_eq!(
            parse_simulate_transfer_error(&ConnectorError::Transport("CALL_RESULTS_".into())),
            None
        );
    }
}
