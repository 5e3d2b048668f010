//! Provider connectors: the external capabilities the builder and the facade
//! depend on.

use std::str::FromStr;

use alloy::{
    consensus::{Transaction, TxEnvelope},
    eips::eip2718::Encodable2718,
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, B256, Bytes, TxHash},
    providers::Provider,
    rpc::types::TransactionRequest,
    signers::{Signer, local::PrivateKeySigner},
};
use serde::Serialize;

use crate::{
    error::ConnectorError,
    types::{Eip712TypedData, LimitOrderSignature, OrderSchema},
};

/// Read-only contract calls and typed data signing.
///
/// ABI encoding and decoding does not need a connector, it is done with the
/// static bindings from [`crate::abi`].
pub trait ProviderConnector {
    /// Performs `eth_call` of `to` with `data` at the latest block.
    fn eth_call(
        &self,
        to: Address,
        data: Bytes,
    ) -> impl Future<Output = Result<Bytes, ConnectorError>> + Send;

    /// Signs the typed data on behalf of `wallet`.
    ///
    /// `struct_hash` is `hashStruct(message)` of the typed data.
    fn sign_typed_data<T>(
        &self,
        wallet: Address,
        typed_data: &Eip712TypedData<T>,
        struct_hash: B256,
    ) -> impl Future<Output = Result<LimitOrderSignature, ConnectorError>> + Send
    where
        T: OrderSchema + Serialize + Sync;
}

async fn call<P: Provider>(provider: &P, to: Address, data: Bytes) -> Result<Bytes, ConnectorError> {
    let request = TransactionRequest::default().with_to(to).with_input(data);
    Ok(provider.call(request).await?)
}

/// Connector signing with a local private key.
///
/// Besides typed data it signs raw transactions and broadcasts them through
/// the provider with `eth_sendRawTransaction`.
pub struct PrivateKeyProviderConnector<P> {
    signer: PrivateKeySigner,
    provider: P,
}

impl<P: Provider> PrivateKeyProviderConnector<P> {
    /// Creates connector from hex-encoded private key (`0x` prefix is
    /// optional).
    pub fn new(private_key: &str, provider: P) -> Result<Self, ConnectorError> {
        let signer = PrivateKeySigner::from_str(private_key)
            .map_err(|err| ConnectorError::Signer(format!("invalid private key: {}", err)))?;
        Ok(Self { signer, provider })
    }

    /// Address of the wallet the private key belongs to.
    pub fn address(&self) -> Address { self.signer.address() }

    pub fn provider(&self) -> &P { &self.provider }

    /// Fills in sender and nonce, then signs the transaction with the
    /// private key.
    ///
    /// The rest of the request (destination, gas, chain ID) must be set by
    /// the caller.
    pub async fn sign_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<TxEnvelope, ConnectorError> {
        let from = self.address();
        let nonce = self.provider.get_transaction_count(from).await?;
        let request = request.with_from(from).with_nonce(nonce);

        let wallet = EthereumWallet::from(self.signer.clone());
        request
            .build(&wallet)
            .await
            .map_err(|err| ConnectorError::Signer(err.to_string()))
    }

    /// Signs the transaction and broadcasts it with `eth_sendRawTransaction`.
    pub async fn send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<TxHash, ConnectorError> {
        let envelope = self.sign_transaction(request).await?;
        tracing::debug!(
            from = %self.address(),
            nonce = envelope.nonce(),
            tx_hash = %envelope.tx_hash(),
            "broadcasting transaction"
        );
        let pending = self
            .provider
            .send_raw_transaction(&envelope.encoded_2718())
            .await?;
        Ok(*pending.tx_hash())
    }
}

impl<P: Provider> ProviderConnector for PrivateKeyProviderConnector<P> {
    async fn eth_call(&self, to: Address, data: Bytes) -> Result<Bytes, ConnectorError> {
        call(&self.provider, to, data).await
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
        let signature = self.signer.sign_hash(&typed_data.signing_hash()).await?;
        Ok(signature.as_bytes().into())
    }
}

/// Connector delegating signing to the node (`eth_signTypedData_v4`), for
/// accounts managed by the node or a wallet in front of it.
pub struct RpcProviderConnector<P> {
    provider: P,
}

impl<P: Provider> RpcProviderConnector<P> {
    pub fn new(provider: P) -> Self { Self { provider } }

    pub fn provider(&self) -> &P { &self.provider }
}

impl<P: Provider> ProviderConnector for RpcProviderConnector<P> {
    async fn eth_call(&self, to: Address, data: Bytes) -> Result<Bytes, ConnectorError> {
        call(&self.provider, to, data).await
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
        Ok(self
            .provider
            .raw_request("eth_signTypedData_v4".into(), sign_typed_data_params(wallet, typed_data)?)
            .await?)
    }
}

/// `eth_signTypedData_v4` parameters: the wallet and the typed data JSON.
pub fn sign_typed_data_params<T: Serialize>(
    wallet: Address,
    typed_data: &Eip712TypedData<T>,
) -> Result<(Address, serde_json::Value), ConnectorError> {
    let payload =
        serde_json::to_value(typed_data).map_err(|err| ConnectorError::Signer(err.to_string()))?;
    Ok((wallet, payload))
}

impl<C: ProviderConnector + Sync> ProviderConnector for &C {
    fn eth_call(
        &self,
        to: Address,
        data: Bytes,
    ) -> impl Future<Output = Result<Bytes, ConnectorError>> + Send {
        (**self).eth_call(to, data)
    }

    fn sign_typed_data<T>(
        &self,
        wallet: Address,
        typed_data: &Eip712TypedData<T>,
        struct_hash: B256,
    ) -> impl Future<Output = Result<LimitOrderSignature, ConnectorError>> + Send
    where
        T: OrderSchema + Serialize + Sync,
    {
        (**self).sign_typed_data(wallet, typed_data, struct_hash)
    }
}
