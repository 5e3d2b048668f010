//! In-memory connector for tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use alloy::{
    primitives::{Address, B256, Bytes},
    signers::{SignerSync, local::PrivateKeySigner},
};
use serde::Serialize;

use crate::{
    connector::ProviderConnector,
    error::ConnectorError,
    types::{Eip712TypedData, LimitOrderSignature, OrderSchema},
};

/// Recorded `eth_call`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub to: Address,
    pub data: Bytes,
}

/// Connector answering `eth_call` with scripted responses, in order, and
/// signing typed data with a local key.
///
/// Clones share the script and the call log.
#[derive(Clone, Debug)]
pub struct ScriptedConnector {
    signer: PrivateKeySigner,
    responses: Arc<Mutex<VecDeque<Result<Bytes, ConnectorError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedConnector {
    /// Connector with a random signing key.
    pub fn new() -> Self { Self::with_signer(PrivateKeySigner::random()) }

    pub fn with_signer(signer: PrivateKeySigner) -> Self {
        Self { signer, responses: Default::default(), calls: Default::default() }
    }

    /// Address typed data gets signed for.
    pub fn address(&self) -> Address { self.signer.address() }

    /// Queues a successful `eth_call` result.
    pub fn respond(&self, result: impl Into<Bytes>) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(result.into()));
        self
    }

    /// Queues a failed `eth_call`.
    pub fn fail(&self, err: ConnectorError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    /// Calls performed so far.
    pub fn calls(&self) -> Vec<RecordedCall> { self.calls.lock().unwrap().clone() }
}

impl Default for ScriptedConnector {
    fn default() -> Self { Self::new() }
}

impl ProviderConnector for ScriptedConnector {
    async fn eth_call(&self, to: Address, data: Bytes) -> Result<Bytes, ConnectorError> {
        self.calls.lock().unwrap().push(RecordedCall { to, data });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ConnectorError::Transport("no scripted response".to_string())))
    }

    async fn sign_typed_data<T>(
        &self,
        wallet: Address,
        typed_data: &Eip712TypedData<T>,
        _struct_hash: B256,
    ) -> Result<LimitOrderSignature, ConnectorError>
    where
        T: OrderSchema + Serialize + Sync,
    {
        if wallet != self.address() {
            return Err(ConnectorError::Signer(format!("no private key for {}", wallet)));
        }
        let signature = self.signer.sign_hash_sync(&typed_data.signing_hash())?;
        Ok(signature.as_bytes().into())
    }
}
