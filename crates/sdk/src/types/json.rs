//! JSON representation of orders.
//!
//! Integer fields are written as base-10 strings. Reading accepts base-10 or
//! `0x`-prefixed hex strings and plain JSON numbers.

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::abi::{Order, OrderRFQ};

pub mod decimal {
    use std::str::FromStr;

    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        String(String),
        Number(u64),
    }

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::String(s) => U256::from_str(s.trim()).map_err(serde::de::Error::custom),
            Repr::Number(n) => Ok(U256::from(n)),
        }
    }
}

#[allow(non_snake_case)]
#[derive(Serialize, Deserialize)]
#[serde(remote = "Order")]
struct OrderDef {
    #[serde(with = "decimal")]
    salt: U256,
    takerAsset: Address,
    makerAsset: Address,
    takerAssetData: Bytes,
    makerAssetData: Bytes,
    getTakerAmount: Bytes,
    getMakerAmount: Bytes,
    predicate: Bytes,
    permit: Bytes,
    interaction: Bytes,
}

#[allow(non_snake_case)]
#[derive(Serialize, Deserialize)]
#[serde(remote = "OrderRFQ")]
struct OrderRfqDef {
    #[serde(with = "decimal")]
    info: U256,
    #[serde(with = "decimal")]
    feeAmount: U256,
    takerAsset: Address,
    makerAsset: Address,
    feeTokenAddress: Address,
    frontendAddress: Address,
    takerAssetData: Bytes,
    makerAssetData: Bytes,
}

impl Serialize for Order {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OrderDef::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Order {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        OrderDef::deserialize(deserializer)
    }
}

impl Serialize for OrderRFQ {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OrderRfqDef::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for OrderRFQ {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        OrderRfqDef::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;
    use serde_json::json;

    use super::*;
    use crate::types::RfqOrderInfo;

    fn rfq_order() -> OrderRFQ {
        OrderRFQ {
            info: RfqOrderInfo::new(7, 1700000000).into(),
            feeAmount: U256::from(5),
            takerAsset: address!("0x111111111117dc0aa78b770fa6a738034120c302"),
            makerAsset: address!("0x6b175474e89094c44da98b954eedeac495271d0f"),
            feeTokenAddress: Address::ZERO,
            frontendAddress: Address::ZERO,
            takerAssetData: Bytes::from_static(&[0x23, 0xb8]),
            makerAssetData: Bytes::new(),
        }
    }

    #[test]
    fn test_integers_as_decimal_strings() {
        let json = serde_json::to_value(rfq_order()).unwrap();
        assert_eq!(json["info"], "31359464925306237747200000007");
        assert_eq!(json["feeAmount"], "5");
        assert_eq!(json["takerAsset"], "0x111111111117dc0aa78b770fa6a738034120c302");
        assert_eq!(json["takerAssetData"], "0x23b8");

        let parsed: OrderRFQ = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, rfq_order());
    }

    #[test]
    fn test_reads_hex_and_numbers() {
        let mut json = serde_json::to_value(rfq_order()).unwrap();
        json["info"] = json!("0x6553f1000000000000000007");
        json["feeAmount"] = json!(5);
        let parsed: OrderRFQ = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(parsed, rfq_order());

        json["feeAmount"] = json!("five");
        assert!(serde_json::from_value::<OrderRFQ>(json).is_err());
    }
}
