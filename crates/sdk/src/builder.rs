use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::{Eip712Domain, SolCall},
};
use chrono::Utc;
use serde::Serialize;

use crate::{
    abi::LimitOrderProtocol::{getMakerAmountCall, getTakerAmountCall},
    connector::ProviderConnector,
    erc20,
    error::LopError,
    types::{self, OrderSchema},
};

/// Amount getters are stored as call prefix: selector + two amount words,
/// the swap amount gets appended by the protocol at fill time.
const AMOUNT_DATA_LEN: usize = 4 + 2 * 32;

/// Strategy generating order salts.
pub trait SaltGenerator {
    fn generate(&self) -> U256;
}

/// Default salt: `round(random() * now_millis)`.
///
/// Not unique in any cryptographic sense, supply another [`SaltGenerator`]
/// when collisions matter.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimestampSalt;

impl SaltGenerator for TimestampSalt {
    fn generate(&self) -> U256 {
        let now = Utc::now().timestamp_millis() as f64;
        U256::from((rand::random::<f64>() * now).round() as u64)
    }
}

impl<F: Fn() -> U256> SaltGenerator for F {
    fn generate(&self) -> U256 { self() }
}

/// Builds, hashes and signs limit orders for a particular protocol
/// deployment.
pub struct LimitOrderBuilder<C, S = TimestampSalt> {
    contract_address: Address,
    chain_id: u64,
    connector: C,
    salt: S,
}

impl<C> LimitOrderBuilder<C> {
    pub fn new(contract_address: Address, chain_id: u64, connector: C) -> Self {
        Self { contract_address, chain_id, connector, salt: TimestampSalt }
    }
}

impl<C, S> LimitOrderBuilder<C, S> {
    /// Replaces the salt strategy.
    pub fn with_salt_generator<G: SaltGenerator>(self, salt: G) -> LimitOrderBuilder<C, G> {
        LimitOrderBuilder {
            contract_address: self.contract_address,
            chain_id: self.chain_id,
            connector: self.connector,
            salt,
        }
    }

    pub fn contract_address(&self) -> Address { self.contract_address }

    pub fn chain_id(&self) -> u64 { self.chain_id }

    pub fn connector(&self) -> &C { &self.connector }

    /// EIP-712 domain orders are signed in.
    pub fn domain(&self) -> Eip712Domain {
        types::protocol_domain(self.chain_id, self.contract_address)
    }

    pub fn build_limit_order_typed_data(
        &self,
        order: types::LimitOrder,
    ) -> types::Eip712TypedData<types::LimitOrder> {
        types::Eip712TypedData::new(self.domain(), order)
    }

    pub fn build_rfq_order_typed_data(
        &self,
        order: types::RfqOrder,
    ) -> types::Eip712TypedData<types::RfqOrder> {
        types::Eip712TypedData::new(self.domain(), order)
    }

    /// EIP-712 signing hash of the typed data.
    pub fn build_limit_order_hash<T: OrderSchema>(
        &self,
        typed_data: &types::Eip712TypedData<T>,
    ) -> types::LimitOrderHash {
        typed_data.signing_hash()
    }

    pub fn build_rfq_order(&self, data: types::RfqOrderData) -> types::RfqOrder {
        let maker_address = data.maker_address.unwrap_or(Address::ZERO);
        types::RfqOrder {
            info: types::RfqOrderInfo::new(data.id, data.expires_in_timestamp).into(),
            feeAmount: data.fee_amount,
            takerAsset: data.taker_asset_address,
            makerAsset: data.maker_asset_address,
            feeTokenAddress: data.fee_token_address,
            frontendAddress: data.frontend_address,
            takerAssetData: erc20::transfer_from(
                data.taker_address,
                maker_address,
                data.taker_amount,
            ),
            makerAssetData: erc20::transfer_from(
                maker_address,
                data.taker_address,
                data.maker_amount,
            ),
        }
    }
}

impl<C, S: SaltGenerator> LimitOrderBuilder<C, S> {
    pub fn build_limit_order(&self, data: types::LimitOrderData) -> types::LimitOrder {
        types::LimitOrder {
            salt: self.salt.generate(),
            takerAsset: data.taker_asset_address,
            makerAsset: data.maker_asset_address,
            takerAssetData: erc20::transfer_from(
                data.taker_address,
                data.maker_address,
                data.taker_amount,
            ),
            makerAssetData: erc20::transfer_from(
                data.maker_address,
                data.taker_address,
                data.maker_amount,
            ),
            getTakerAmount: amount_data(getTakerAmountCall {
                takerAmount: data.taker_amount,
                makerAmount: data.maker_amount,
                swapMakerAmount: U256::ZERO,
            }),
            getMakerAmount: amount_data(getMakerAmountCall {
                takerAmount: data.taker_amount,
                makerAmount: data.maker_amount,
                swapTakerAmount: U256::ZERO,
            }),
            predicate: data.predicate,
            permit: data.permit,
            interaction: data.interaction,
        }
    }
}

impl<C: ProviderConnector, S> LimitOrderBuilder<C, S> {
    /// Asks the connector to sign the typed data on behalf of `wallet`.
    pub async fn build_order_signature<T>(
        &self,
        wallet: Address,
        typed_data: &types::Eip712TypedData<T>,
    ) -> Result<types::LimitOrderSignature, LopError>
    where
        T: OrderSchema + Serialize + Sync,
    {
        let struct_hash = typed_data.struct_hash();
        tracing::debug!(%wallet, %struct_hash, primary_type = typed_data.primary_type(), "signing order");
        Ok(self
            .connector
            .sign_typed_data(wallet, typed_data, struct_hash)
            .await?)
    }
}

fn amount_data<T: SolCall>(call: T) -> Bytes {
    let mut data = call.abi_encode();
    data.truncate(AMOUNT_DATA_LEN);
    data.into()
}
