//! [`Limit Order Protocol`] SDK.
//!
//! # Overview
//!
//! Client-side helpers to construct, hash, sign and submit limit orders
//! against the on-chain limit order protocol contract.
//!
//! Use [`builder::LimitOrderBuilder`] to build [`types::LimitOrder`] or
//! [`types::RfqOrder`] records, derive their EIP-712 typed data, hash and
//! sign them.
//!
//! Use [`facade::LimitOrderProtocolFacade`] to encode contract calls (fill,
//! cancel, nonce management) and to query contract state (nonce, predicate,
//! remaining amount, call simulation).
//!
//! Both work on top of a [`connector::ProviderConnector`], which supplies
//! read-only contract calls and typed data signing. The facade never sends
//! transactions itself: wrap the returned call data into a transaction and
//! broadcast it, e.g. with
//! [`connector::PrivateKeyProviderConnector::send_transaction`].
//!
//! See `./tests` for examples.
//!
//! # Limitations/follow-ups
//!
//! * Only the protocol v1 ABI and EIP-712 schema are supported.
//!
//! * Nothing is retried: every failed call is returned to the caller as is.
//!
//! # Features
//!
//! | Feature | Default | Description |
//! | --- | --- | --- |
//! | `display` | yes | Enables colored [`std::fmt::Display`] for connection state. |
//! | `testing` | yes | Enables [`testing`] module. |
//!
//! [`Limit Order Protocol`]: https://github.com/1inch/limit-order-protocol

pub mod abi;
pub mod builder;
pub mod connections;
pub mod connector;
pub mod erc20;
pub mod error;
pub mod facade;
#[cfg(feature = "testing")]
pub mod testing;
pub mod types;

use alloy::primitives::{Address, TxHash, address};

#[derive(Clone, Debug)]
/// Chain the limit order protocol is deployed on.
pub struct Chain {
    chain_id: u64,
    contract: Address,
    rpc_url: String,
    explorer_url: String,
}

impl Chain {
    pub fn ethereum() -> Self {
        Self {
            chain_id: 1,
            contract: address!("0x3ef51736315f52d568d6d2cf289419b9cfffe782"),
            rpc_url: "https://cloudflare-eth.com".to_string(),
            explorer_url: "https://etherscan.io".to_string(),
        }
    }

    pub fn bsc() -> Self {
        Self {
            chain_id: 56,
            contract: address!("0xe3456f4ee65e745a44ec3bcb83d0f2529d1b84eb"),
            rpc_url: "https://bsc-dataseed.binance.org".to_string(),
            explorer_url: "https://bscscan.com".to_string(),
        }
    }

    pub fn polygon() -> Self {
        Self {
            chain_id: 137,
            contract: address!("0xb707d89d29c189421163515c59e42147371d6857"),
            rpc_url: "https://polygon-rpc.com".to_string(),
            explorer_url: "https://polygonscan.com".to_string(),
        }
    }

    /// Known deployment for the given chain ID.
    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        [Self::ethereum(), Self::bsc(), Self::polygon()]
            .into_iter()
            .find(|chain| chain.chain_id == chain_id)
    }

    pub fn custom(
        chain_id: u64,
        contract: Address,
        rpc_url: impl Into<String>,
        explorer_url: impl Into<String>,
    ) -> Self {
        Self { chain_id, contract, rpc_url: rpc_url.into(), explorer_url: explorer_url.into() }
    }

    pub fn with_contract(mut self, contract: Address) -> Self {
        self.contract = contract;
        self
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    pub fn with_explorer_url(mut self, explorer_url: impl Into<String>) -> Self {
        self.explorer_url = explorer_url.into();
        self
    }

    pub fn chain_id(&self) -> u64 { self.chain_id }

    pub fn contract(&self) -> Address { self.contract }

    pub fn rpc_url(&self) -> &str { &self.rpc_url }

    pub fn explorer_url(&self) -> &str { &self.explorer_url }

    /// Block explorer link to the transaction.
    pub fn explorer_tx_url(&self, tx_hash: &TxHash) -> String {
        format!("{}/tx/{}", self.explorer_url, tx_hash)
    }
}
