use std::{fmt::Display, str::FromStr};

use alloy::primitives::{Address, Bytes, U256};

use crate::error::LopError;

/// Parameters of a new limit order.
///
/// Taker asset, maker asset and taker address are mandatory, the rest can be
/// set with `with_*` methods. Maker address defaults to the zero address,
/// which lets any maker fill the order.
#[derive(Clone, Debug)]
pub struct LimitOrderData {
    pub taker_asset_address: Address,
    pub maker_asset_address: Address,
    pub taker_address: Address,
    pub maker_address: Address,
    pub taker_amount: U256,
    pub maker_amount: U256,
    pub predicate: Bytes,
    pub permit: Bytes,
    pub interaction: Bytes,
}

impl LimitOrderData {
    pub fn new(
        taker_asset_address: Address,
        maker_asset_address: Address,
        taker_address: Address,
        taker_amount: U256,
        maker_amount: U256,
    ) -> Self {
        Self {
            taker_asset_address,
            maker_asset_address,
            taker_address,
            maker_address: Address::ZERO,
            taker_amount,
            maker_amount,
            predicate: Bytes::new(),
            permit: Bytes::new(),
            interaction: Bytes::new(),
        }
    }

    pub fn with_maker(mut self, maker_address: Address) -> Self {
        self.maker_address = maker_address;
        self
    }

    pub fn with_predicate(mut self, predicate: Bytes) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn with_permit(mut self, permit: Bytes) -> Self {
        self.permit = permit;
        self
    }

    pub fn with_interaction(mut self, interaction: Bytes) -> Self {
        self.interaction = interaction;
        self
    }
}

/// Parameters of a new RFQ order.
#[derive(Clone, Debug)]
pub struct RfqOrderData {
    pub id: u64,
    pub expires_in_timestamp: u64,
    pub taker_asset_address: Address,
    pub maker_asset_address: Address,
    pub taker_address: Address,
    /// Zero address when `None`.
    pub maker_address: Option<Address>,
    pub taker_amount: U256,
    pub maker_amount: U256,
    pub fee_amount: U256,
    pub fee_token_address: Address,
    pub frontend_address: Address,
}

/// Packed RFQ order info: expiration timestamp in the high 64 bits, order ID
/// in the low 64 bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RfqOrderInfo(u128);

impl RfqOrderInfo {
    pub fn new(id: u64, expires_at: u64) -> Self {
        Self(((expires_at as u128) << 64) | id as u128)
    }

    /// Packs arbitrary width values, failing if any of them does not fit
    /// into 64 bits.
    pub fn try_new(id: U256, expires_at: U256) -> Result<Self, LopError> {
        let id = u64::try_from(id).map_err(|_| LopError::OutOfRange { field: "id", value: id })?;
        let expires_at = u64::try_from(expires_at)
            .map_err(|_| LopError::OutOfRange { field: "expires_at", value: expires_at })?;
        Ok(Self::new(id, expires_at))
    }

    pub fn id(&self) -> u64 { self.0 as u64 }

    pub fn expires_at(&self) -> u64 { (self.0 >> 64) as u64 }
}

impl From<RfqOrderInfo> for U256 {
    fn from(info: RfqOrderInfo) -> Self { U256::from(info.0) }
}

impl TryFrom<U256> for RfqOrderInfo {
    type Error = LopError;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        u128::try_from(value)
            .map(RfqOrderInfo)
            .map_err(|_| LopError::OutOfRange { field: "info", value })
    }
}

impl std::fmt::Debug for RfqOrderInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RfqOrderInfo")
            .field("id", &self.id())
            .field("expires_at", &self.expires_at())
            .finish()
    }
}

impl Display for RfqOrderInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

impl FromStr for RfqOrderInfo {
    type Err = LopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = U256::from_str(s)
            .map_err(|_| LopError::InvalidArgument(format!("invalid order info: {}", s)))?;
        RfqOrderInfo::try_from(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_packing() {
        let info = RfqOrderInfo::new(7, 1700000000);
        assert_eq!(info.to_string(), "31359464925306237747200000007");
        assert_eq!(info.id(), 7);
        assert_eq!(info.expires_at(), 1700000000);
        assert_eq!(U256::from(info.0), (U256::from(1700000000u64) << 64) | U256::from(7));
        let value: U256 = info.into();
        assert_eq!(value.to_string(), "31359464925306237747200000007");
    }

    #[test]
    fn test_info_bounds() {
        let max = U256::from(u64::MAX);
        let info = RfqOrderInfo::try_new(max, max).unwrap();
        assert_eq!(info.id(), u64::MAX);
        assert_eq!(info.expires_at(), u64::MAX);

        let err = RfqOrderInfo::try_new(max + U256::from(1), U256::ZERO).unwrap_err();
        assert!(matches!(err, LopError::OutOfRange { field: "id", .. }));

        let err = RfqOrderInfo::try_new(U256::ZERO, U256::MAX).unwrap_err();
        assert!(matches!(err, LopError::OutOfRange { field: "expires_at", .. }));
    }

    #[test]
    fn test_info_from_str() {
        let info: RfqOrderInfo = "31359464925306237747200000007".parse().unwrap();
        assert_eq!(info, RfqOrderInfo::new(7, 1700000000));

        assert!("not a number".parse::<RfqOrderInfo>().is_err());
        assert!(
            U256::MAX
                .to_string()
                .parse::<RfqOrderInfo>()
                .is_err_and(|err| matches!(err, LopError::OutOfRange { field: "info", .. }))
        );
    }
}
