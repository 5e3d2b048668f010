use alloy::{
    network::TransactionBuilder,
    primitives::{
        Bytes, TxHash, U256,
        utils::{ParseUnits, parse_units},
    },
    providers::Provider,
    rpc::types::TransactionRequest,
};
use anyhow::Context;
use colored::Colorize;
use limit_order_sdk::{Chain, connector::PrivateKeyProviderConnector};

pub(crate) const FILL_GAS_LIMIT: u64 = 120_000;
pub(crate) const CANCEL_GAS_LIMIT: u64 = 50_000;

/// Converts decimal Gwei amount into Wei.
pub(crate) fn gwei_to_wei(gwei: &str) -> anyhow::Result<U256> {
    match parse_units(gwei.trim(), "gwei").with_context(|| format!("invalid gas price: {}", gwei))? {
        ParseUnits::U256(wei) => Ok(wei),
        ParseUnits::I256(_) => Err(anyhow::anyhow!("gas price must not be negative: {}", gwei)),
    }
}

/// Legacy zero-value contract call transaction.
pub(crate) fn request(
    chain: &Chain,
    call_data: Bytes,
    gas_limit: u64,
    gas_price: U256,
) -> anyhow::Result<TransactionRequest> {
    Ok(TransactionRequest::default()
        .with_to(chain.contract())
        .with_input(call_data)
        .with_value(U256::ZERO)
        .with_gas_limit(gas_limit)
        .with_gas_price(u128::try_from(gas_price).context("gas price is too large")?)
        .with_chain_id(chain.chain_id()))
}

/// Signs the transaction with the connector key and broadcasts it.
pub(crate) async fn send<P: Provider>(
    connector: &PrivateKeyProviderConnector<P>,
    request: TransactionRequest,
) -> anyhow::Result<TxHash> {
    tokio::select! {
        result = connector.send_transaction(request) => result.context("sending transaction"),
        _ = tokio::signal::ctrl_c() => Err(anyhow::anyhow!("interrupted")),
    }
}

/// Transaction hash alone in raw mode, otherwise titled explorer link. Chains
/// without an explorer get the hash in place of the link.
pub(crate) fn render(chain: &Chain, title: &str, tx_hash: TxHash, raw: bool) -> String {
    if raw {
        return tx_hash.to_string();
    }
    let link = if chain.explorer_url().is_empty() {
        tx_hash.to_string()
    } else {
        chain.explorer_tx_url(&tx_hash)
    };
    let border = "************************************************".white();
    format!("{}\n{}\n\n   {}\n\n{}", title.green().bold(), border, link.white().underline(), border)
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Address, b256};

    use super::*;

    const TX_HASH: TxHash =
        b256!("0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060");

    #[test]
    fn test_gwei_to_wei() {
        assert_eq!(gwei_to_wei("5").unwrap().to_string(), "5000000000");
        assert_eq!(gwei_to_wei("1.5").unwrap().to_string(), "1500000000");
        assert_eq!(gwei_to_wei("0.000000001").unwrap(), U256::from(1));
        assert!(gwei_to_wei("-5").is_err());
        assert!(gwei_to_wei("five").is_err());
    }

    #[test]
    fn test_request() {
        let chain = Chain::bsc();
        let request = request(&chain, Bytes::from_static(&[1, 2]), FILL_GAS_LIMIT, U256::from(7)).unwrap();
        assert_eq!(TransactionBuilder::to(&request), Some(chain.contract()));
        assert_eq!(TransactionBuilder::input(&request), Some(&Bytes::from_static(&[1, 2])));
        assert_eq!(TransactionBuilder::value(&request), Some(U256::ZERO));
        assert_eq!(TransactionBuilder::gas_limit(&request), Some(120_000));
        assert_eq!(TransactionBuilder::gas_price(&request), Some(7));
        assert_eq!(TransactionBuilder::chain_id(&request), Some(56));

        assert!(super::request(&chain, Bytes::new(), CANCEL_GAS_LIMIT, U256::MAX).is_err());
    }

    #[test]
    fn test_render() {
        assert_eq!(render(&Chain::bsc(), "Tx: ", TX_HASH, true), TX_HASH.to_string());

        let decorated = render(&Chain::bsc(), "Tx: ", TX_HASH, false);
        assert!(decorated.contains(&format!("https://bscscan.com/tx/{}", TX_HASH)));

        let local = Chain::custom(31337, Address::ZERO, "http://localhost:8545", "");
        let decorated = render(&local, "Tx: ", TX_HASH, false);
        assert!(decorated.contains(&TX_HASH.to_string()));
        assert!(!decorated.contains("/tx/"));
    }
}
