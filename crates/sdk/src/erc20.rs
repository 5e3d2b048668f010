use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolCall,
};

use crate::abi::IERC20;

/// Call data of `transferFrom(from, to, amount)`.
///
/// Used as order asset data: the protocol calls the asset contract with it
/// when the order gets filled.
pub fn transfer_from(from: Address, to: Address, amount: U256) -> Bytes {
    IERC20::transferFromCall { from, to, amount }.abi_encode().into()
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, hex};

    use super::*;

    #[test]
    fn test_transfer_from() {
        let data = transfer_from(
            address!("0x00000000000000000000000000000000000000a1"),
            address!("0x00000000000000000000000000000000000000b2"),
            U256::from(1000),
        );
        assert_eq!(
            hex::encode(&data),
            concat!(
                "23b872dd",
                "00000000000000000000000000000000000000000000000000000000000000a1",
                "00000000000000000000000000000000000000000000000000000000000000b2",
                "00000000000000000000000000000000000000000000000000000000000003e8",
            )
        );
    }
}
