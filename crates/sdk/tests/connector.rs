use alloy::{
    consensus::SignableTransaction,
    network::TransactionBuilder,
    primitives::{Address, B256, Bytes, Signature, TxKind, U64, U256, address, b256},
    providers::{Provider, ProviderBuilder, mock::Asserter},
    rpc::{json_rpc::ErrorPayload, types::TransactionRequest},
    sol_types::{Revert, SolError, SolValue},
};
use limit_order_sdk::{
    builder::LimitOrderBuilder,
    connector::{PrivateKeyProviderConnector, RpcProviderConnector, sign_typed_data_params},
    error::{ConnectorError, LopError},
    facade::LimitOrderProtocolFacade,
    types,
};

const CONTRACT: Address = address!("0xe3456f4ee65e745a44ec3bcb83d0f2529d1b84eb");
const PRIVATE_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
const TX_HASH: B256 = b256!("0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060");

fn mocked() -> (impl Provider, Asserter) {
    let asserter = Asserter::new();
    (ProviderBuilder::new().connect_mocked_client(asserter.clone()), asserter)
}

fn revert(reason: &str) -> Bytes { Revert { reason: reason.to_string() }.abi_encode().into() }

/// Node error as returned for a reverted `eth_call`.
fn reverted_call(reason: &str) -> ErrorPayload {
    serde_json::from_value(serde_json::json!({
        "code": 3,
        "message": "execution reverted",
        "data": revert(reason),
    }))
    .unwrap()
}

fn rfq_order() -> types::RfqOrder {
    LimitOrderBuilder::new(CONTRACT, 56, ()).build_rfq_order(types::RfqOrderData {
        id: 7,
        expires_in_timestamp: 1700000000,
        taker_asset_address: address!("0x111111111117dc0aa78b770fa6a738034120c302"),
        maker_asset_address: address!("0x6b175474e89094c44da98b954eedeac495271d0f"),
        taker_address: address!("0x00000000000000000000000000000000000000a1"),
        maker_address: None,
        taker_amount: U256::from(100),
        maker_amount: U256::from(250),
        fee_amount: U256::ZERO,
        fee_token_address: Address::ZERO,
        frontend_address: Address::ZERO,
    })
}

fn fill_request() -> TransactionRequest {
    TransactionRequest::default()
        .with_to(CONTRACT)
        .with_input(Bytes::from_static(&[0xd0, 0xa3, 0xb6, 0x65]))
        .with_value(U256::ZERO)
        .with_gas_limit(120_000)
        .with_gas_price(5_000_000_000)
        .with_chain_id(56)
}

/// Signed transaction is legacy, with the wallet nonce and caller gas.
#[tokio::test]
async fn test_sign_transaction() {
    let (provider, asserter) = mocked();
    let connector = PrivateKeyProviderConnector::new(PRIVATE_KEY, provider).unwrap();
    asserter.push_success(&U64::from(3));

    let envelope = connector.sign_transaction(fill_request()).await.unwrap();
    let signed = envelope.as_legacy().expect("legacy transaction");
    let tx = signed.tx();
    assert_eq!(tx.nonce, 3);
    assert_eq!(tx.gas_limit, 120_000);
    assert_eq!(tx.gas_price, 5_000_000_000);
    assert_eq!(tx.chain_id, Some(56));
    assert_eq!(tx.to, TxKind::Call(CONTRACT));
    assert_eq!(tx.value, U256::ZERO);
    assert_eq!(tx.input, Bytes::from_static(&[0xd0, 0xa3, 0xb6, 0x65]));

    let signer = signed
        .signature()
        .recover_address_from_prehash(&tx.signature_hash())
        .unwrap();
    assert_eq!(signer, connector.address());
}

#[tokio::test]
async fn test_send_transaction() {
    let (provider, asserter) = mocked();
    let connector = PrivateKeyProviderConnector::new(PRIVATE_KEY, provider).unwrap();

    asserter.push_success(&U64::from(0));
    asserter.push_success(&TX_HASH);
    assert_eq!(connector.send_transaction(fill_request()).await.unwrap(), TX_HASH);

    // Nonce lookup failure aborts before broadcasting.
    asserter.push_failure_msg("header not found");
    let err = connector.send_transaction(fill_request()).await.unwrap_err();
    assert!(matches!(err, ConnectorError::Rpc { ref message, .. } if message == "header not found"));
}

#[tokio::test]
async fn test_private_key_signature() {
    let (provider, _) = mocked();
    let connector = PrivateKeyProviderConnector::new(PRIVATE_KEY, provider).unwrap();
    let builder = LimitOrderBuilder::new(CONTRACT, 56, &connector);
    let typed_data = builder.build_rfq_order_typed_data(rfq_order());

    let signature = builder
        .build_order_signature(connector.address(), &typed_data)
        .await
        .unwrap();
    let signature = Signature::try_from(signature.as_ref()).unwrap();
    assert_eq!(
        signature
            .recover_address_from_prehash(&typed_data.signing_hash())
            .unwrap(),
        connector.address()
    );

    let err = builder
        .build_order_signature(Address::repeat_byte(1), &typed_data)
        .await
        .unwrap_err();
    assert!(matches!(err, LopError::Connector(ConnectorError::Signer(_))));
}

#[test]
fn test_invalid_private_key() {
    let (provider, _) = mocked();
    assert!(matches!(
        PrivateKeyProviderConnector::new("0xnot-a-key", provider),
        Err(ConnectorError::Signer(_))
    ));
}

#[tokio::test]
async fn test_node_signature() {
    let (provider, asserter) = mocked();
    let wallet = address!("0x00000000000000000000000000000000000000a1");
    let builder = LimitOrderBuilder::new(CONTRACT, 56, RpcProviderConnector::new(provider));
    let typed_data = builder.build_rfq_order_typed_data(rfq_order());

    let (params_wallet, payload) = sign_typed_data_params(wallet, &typed_data).unwrap();
    assert_eq!(params_wallet, wallet);
    assert_eq!(payload["primaryType"], "OrderRFQ");
    assert_eq!(payload["domain"]["name"], types::PROTOCOL_NAME);
    assert_eq!(payload["types"]["OrderRFQ"].as_array().unwrap().len(), 8);
    assert_eq!(payload["message"]["info"], "31359464925306237747200000007");

    let signature = Bytes::from(vec![0x11; 65]);
    asserter.push_success(&signature);
    assert_eq!(builder.build_order_signature(wallet, &typed_data).await.unwrap(), signature);
}

#[tokio::test]
async fn test_node_reads() {
    let (provider, asserter) = mocked();
    let facade = LimitOrderProtocolFacade::new(CONTRACT, RpcProviderConnector::new(provider));

    asserter.push_success(&Bytes::from(U256::from(9).abi_encode()));
    assert_eq!(facade.nonce(Address::ZERO).await.unwrap(), U256::from(9));

    asserter.push_failure(reverted_call("LOP: Unknown order"));
    let err = facade.remaining(B256::ZERO).await.unwrap_err();
    let LopError::Connector(err) = err else { panic!("unexpected error: {err:?}") };
    assert_eq!(err.revert_data(), Some(&revert("LOP: Unknown order")));
}

/// Simulation outcome is read from the revert data of the node error.
#[tokio::test]
async fn test_simulate_calls_node_revert() {
    let (provider, asserter) = mocked();
    let facade = LimitOrderProtocolFacade::new(CONTRACT, RpcProviderConnector::new(provider));
    let tokens = vec![address!("0x111111111117dc0aa78b770fa6a738034120c302"); 2];
    let data = vec![Bytes::new(); 2];

    asserter.push_failure(reverted_call("CALL_RESULTS_11"));
    assert!(facade.simulate_calls(tokens.clone(), data.clone()).await.unwrap());

    asserter.push_failure(reverted_call("CALL_RESULTS_10"));
    assert!(!facade.simulate_calls(tokens.clone(), data.clone()).await.unwrap());

    asserter.push_failure_msg("rate limited");
    assert!(matches!(
        facade.simulate_calls(tokens, data).await,
        Err(LopError::Connector(ConnectorError::Rpc { revert_data: None, .. }))
    ));
}
