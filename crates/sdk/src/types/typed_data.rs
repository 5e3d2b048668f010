use std::collections::BTreeMap;

use alloy::{
    primitives::{Address, B256, U256},
    sol_types::{Eip712Domain, SolStruct},
};
use serde::Serialize;

use crate::abi::{Order, OrderRFQ};

/// Name of the protocol in the EIP-712 domain.
pub const PROTOCOL_NAME: &str = "1inch Limit Order Protocol";

/// Version of the protocol in the EIP-712 domain.
pub const PROTOCOL_VERSION: &str = "1";

/// Field of an EIP-712 struct schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Eip712Field {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub r#type: &'static str,
}

const fn field(name: &'static str, r#type: &'static str) -> Eip712Field {
    Eip712Field { name, r#type }
}

pub const EIP712_DOMAIN: &[Eip712Field] = &[
    field("name", "string"),
    field("version", "string"),
    field("chainId", "uint256"),
    field("verifyingContract", "address"),
];

pub const ORDER_STRUCTURE: &[Eip712Field] = &[
    field("salt", "uint256"),
    field("takerAsset", "address"),
    field("makerAsset", "address"),
    field("takerAssetData", "bytes"),
    field("makerAssetData", "bytes"),
    field("getTakerAmount", "bytes"),
    field("getMakerAmount", "bytes"),
    field("predicate", "bytes"),
    field("permit", "bytes"),
    field("interaction", "bytes"),
];

pub const RFQ_ORDER_STRUCTURE: &[Eip712Field] = &[
    field("info", "uint256"),
    field("feeAmount", "uint256"),
    field("takerAsset", "address"),
    field("makerAsset", "address"),
    field("feeTokenAddress", "address"),
    field("frontendAddress", "address"),
    field("takerAssetData", "bytes"),
    field("makerAssetData", "bytes"),
];

/// Order struct with a published EIP-712 schema.
pub trait OrderSchema: SolStruct {
    const FIELDS: &'static [Eip712Field];
}

impl OrderSchema for Order {
    const FIELDS: &'static [Eip712Field] = ORDER_STRUCTURE;
}

impl OrderSchema for OrderRFQ {
    const FIELDS: &'static [Eip712Field] = RFQ_ORDER_STRUCTURE;
}

/// Limit order protocol EIP-712 domain.
pub fn protocol_domain(chain_id: u64, verifying_contract: Address) -> Eip712Domain {
    Eip712Domain::new(
        Some(PROTOCOL_NAME.into()),
        Some(PROTOCOL_VERSION.into()),
        Some(U256::from(chain_id)),
        Some(verifying_contract),
        None,
    )
}

/// EIP-712 envelope of an order: primary type, schema, domain and message.
///
/// Serializes to the JSON shape expected by `eth_signTypedData_v4`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712TypedData<T> {
    types: BTreeMap<&'static str, &'static [Eip712Field]>,
    primary_type: &'static str,
    domain: Eip712Domain,
    message: T,
}

impl<T: OrderSchema> Eip712TypedData<T> {
    pub fn new(domain: Eip712Domain, message: T) -> Self {
        let types = BTreeMap::from([("EIP712Domain", EIP712_DOMAIN), (T::NAME, T::FIELDS)]);
        Self { types, primary_type: T::NAME, domain, message }
    }

    pub fn primary_type(&self) -> &'static str { self.primary_type }

    pub fn types(&self) -> &BTreeMap<&'static str, &'static [Eip712Field]> { &self.types }

    pub fn domain(&self) -> &Eip712Domain { &self.domain }

    pub fn message(&self) -> &T { &self.message }

    /// `hashStruct(message)`.
    pub fn struct_hash(&self) -> B256 { self.message.eip712_hash_struct() }

    /// `keccak256(0x1901 ‖ domainSeparator ‖ hashStruct(message))`.
    pub fn signing_hash(&self) -> B256 { self.message.eip712_signing_hash(&self.domain) }
}
