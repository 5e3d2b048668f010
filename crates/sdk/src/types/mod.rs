pub mod json;
mod order;
mod typed_data;

use alloy::primitives::{B256, Bytes};
pub use order::{LimitOrderData, RfqOrderData, RfqOrderInfo};
pub use typed_data::*;

pub use crate::abi::{Order as LimitOrder, OrderRFQ as RfqOrder};

/// EIP-712 signing hash of an order, rendered `0x`-prefixed.
pub type LimitOrderHash = B256;

/// Opaque signature produced by the signing capability.
pub type LimitOrderSignature = Bytes;
