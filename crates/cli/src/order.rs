use std::{
    io::{BufRead, Write},
    str::FromStr,
};

use alloy::{
    primitives::{Address, U256},
    providers::{Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use anyhow::Context;
use chrono::Utc;
use colored::Colorize;
use limit_order_sdk::{
    Chain, builder::LimitOrderBuilder, connector::PrivateKeyProviderConnector,
    facade::LimitOrderProtocolFacade, types,
};

use crate::{args::Cli, prompt::Prompter, tx};

pub(crate) struct CreatingParams {
    pub(crate) chain: Chain,
    pub(crate) private_key: String,
    pub(crate) order_id: U256,
    pub(crate) expires_in: u64,
    pub(crate) taker_asset_address: Address,
    pub(crate) maker_asset_address: Address,
    pub(crate) taker_amount: U256,
    pub(crate) maker_amount: U256,
    pub(crate) maker_address: Option<Address>,
    pub(crate) fee_amount: U256,
    pub(crate) fee_token_address: Address,
    pub(crate) frontend_address: Address,
}

pub(crate) struct FillingParams {
    pub(crate) chain: Chain,
    pub(crate) private_key: String,
    pub(crate) order: String,
    pub(crate) taker_amount: U256,
    pub(crate) maker_amount: U256,
    pub(crate) gas_price: String,
}

pub(crate) struct CancelingParams {
    pub(crate) chain: Chain,
    pub(crate) private_key: String,
    pub(crate) order_info: types::RfqOrderInfo,
    pub(crate) gas_price: String,
}

/// Chain preset for the chain ID, with `--contract`/`--rpc`/`--explorer`
/// overrides.
pub(crate) fn resolve_chain(cli: &Cli, chain_id: u64) -> anyhow::Result<Chain> {
    let mut chain = match Chain::from_chain_id(chain_id) {
        Some(chain) => chain,
        None => Chain::custom(
            chain_id,
            cli.contract.ok_or_else(|| {
                anyhow::anyhow!("no deployment known for chain {}, see `--contract`", chain_id)
            })?,
            cli.rpc
                .clone()
                .ok_or_else(|| anyhow::anyhow!("no RPC known for chain {}, see `--rpc`", chain_id))?,
            cli.explorer.clone().unwrap_or_default(),
        ),
    };
    if let Some(contract) = cli.contract {
        chain = chain.with_contract(contract);
    }
    if let Some(rpc) = &cli.rpc {
        chain = chain.with_rpc_url(rpc);
    }
    if let Some(explorer) = &cli.explorer {
        chain = chain.with_explorer_url(explorer.trim_end_matches('/'));
    }
    Ok(chain)
}

fn chain_and_key<R: BufRead, W: Write>(
    cli: &Cli,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<(Chain, String)> {
    let chain_id = prompter.value(cli.chain_id, "Chain id")?;
    let chain = resolve_chain(cli, chain_id)?;
    let private_key = prompter.secret(cli.private_key.clone(), "Private key")?;
    Ok((chain, private_key))
}

impl CreatingParams {
    pub(crate) fn resolve<R: BufRead, W: Write>(
        cli: &Cli,
        prompter: &mut Prompter<R, W>,
    ) -> anyhow::Result<Self> {
        let (chain, private_key) = chain_and_key(cli, prompter)?;
        Ok(Self {
            chain,
            private_key,
            order_id: prompter.value(cli.order_id, "Order id")?,
            expires_in: prompter.value(cli.expires_in, "Expires in (seconds)")?,
            taker_asset_address: prompter.value(cli.taker_asset_address, "Taker asset address")?,
            maker_asset_address: prompter.value(cli.maker_asset_address, "Maker asset address")?,
            taker_amount: prompter.value(cli.taker_amount, "Taker asset amount")?,
            maker_amount: prompter.value(cli.maker_amount, "Maker asset amount")?,
            maker_address: prompter.optional(cli.maker_address, "Maker address (empty for any)")?,
            fee_amount: prompter.value(cli.fee_amount, "Fee amount")?,
            fee_token_address: prompter.value(cli.fee_token_address, "Fee token address")?,
            frontend_address: prompter.value(cli.frontend_address, "Frontend address")?,
        })
    }
}

impl FillingParams {
    pub(crate) fn resolve<R: BufRead, W: Write>(
        cli: &Cli,
        prompter: &mut Prompter<R, W>,
    ) -> anyhow::Result<Self> {
        let (chain, private_key) = chain_and_key(cli, prompter)?;
        Ok(Self {
            chain,
            private_key,
            order: prompter.value(cli.order.clone(), "Order (JSON)")?,
            taker_amount: prompter.value(cli.taker_amount, "Taker amount to fill")?,
            maker_amount: prompter.value(cli.maker_amount, "Maker amount to fill")?,
            gas_price: prompter.value(cli.gas_price.clone(), "Gas price (Gwei)")?,
        })
    }
}

impl CancelingParams {
    pub(crate) fn resolve<R: BufRead, W: Write>(
        cli: &Cli,
        prompter: &mut Prompter<R, W>,
    ) -> anyhow::Result<Self> {
        let (chain, private_key) = chain_and_key(cli, prompter)?;
        Ok(Self {
            chain,
            private_key,
            order_info: prompter.value(cli.order_info, "Order info")?,
            gas_price: prompter.value(cli.gas_price.clone(), "Gas price (Gwei)")?,
        })
    }
}

fn connector(
    chain: &Chain,
    private_key: &str,
) -> anyhow::Result<PrivateKeyProviderConnector<impl Provider + use<>>> {
    let url = chain.rpc_url().parse().context("invalid RPC URL")?;
    let provider = ProviderBuilder::new().connect_http(url);
    Ok(PrivateKeyProviderConnector::new(private_key, provider)?)
}

/// Builds RFQ order expiring `expires_in` seconds after `now`, taken by the
/// private key wallet.
pub(crate) fn create_order(params: &CreatingParams, now: u64) -> anyhow::Result<types::RfqOrder> {
    let wallet = PrivateKeySigner::from_str(&params.private_key)
        .context("invalid private key")?
        .address();
    let expires_at = now
        .checked_add(params.expires_in)
        .context("expiration is out of range")?;
    let info = types::RfqOrderInfo::try_new(params.order_id, U256::from(expires_at))?;

    let builder = LimitOrderBuilder::new(params.chain.contract(), params.chain.chain_id(), ());
    Ok(builder.build_rfq_order(types::RfqOrderData {
        id: info.id(),
        expires_in_timestamp: info.expires_at(),
        taker_asset_address: params.taker_asset_address,
        maker_asset_address: params.maker_asset_address,
        taker_address: wallet,
        maker_address: params.maker_address,
        taker_amount: params.taker_amount,
        maker_amount: params.maker_amount,
        fee_amount: params.fee_amount,
        fee_token_address: params.fee_token_address,
        frontend_address: params.frontend_address,
    }))
}

pub(crate) fn render_created(order: &types::RfqOrder, raw: bool) -> anyhow::Result<String> {
    if raw {
        return Ok(serde_json::to_string(order)?);
    }
    Ok(format!(
        "{}\n{}",
        "New limit order RFQ: ".green().bold(),
        serde_json::to_string_pretty(order)?.white().underline()
    ))
}

/// Signs the order with the connector key and encodes the `fillOrderRFQ`
/// transaction.
pub(crate) async fn fill_request<P: Provider>(
    connector: &PrivateKeyProviderConnector<P>,
    params: &FillingParams,
    order: &types::RfqOrder,
) -> anyhow::Result<TransactionRequest> {
    let chain = &params.chain;
    let gas_price = tx::gwei_to_wei(&params.gas_price)?;

    let builder = LimitOrderBuilder::new(chain.contract(), chain.chain_id(), connector);
    let typed_data = builder.build_rfq_order_typed_data(order.clone());
    let signature = builder
        .build_order_signature(connector.address(), &typed_data)
        .await
        .context("signing order")?;

    let facade = LimitOrderProtocolFacade::new(chain.contract(), ());
    let call_data =
        facade.fill_rfq_order(order, &signature, params.taker_amount, params.maker_amount);
    tx::request(chain, call_data, tx::FILL_GAS_LIMIT, gas_price)
}

pub(crate) fn cancel_request(params: &CancelingParams) -> anyhow::Result<TransactionRequest> {
    let gas_price = tx::gwei_to_wei(&params.gas_price)?;
    let facade = LimitOrderProtocolFacade::new(params.chain.contract(), ());
    let call_data = facade.cancel_rfq_order(params.order_info);
    tx::request(&params.chain, call_data, tx::CANCEL_GAS_LIMIT, gas_price)
}

pub(crate) fn create<R: BufRead, W: Write>(
    cli: &Cli,
    prompter: &mut Prompter<R, W>,
    raw: bool,
) -> anyhow::Result<()> {
    let params = CreatingParams::resolve(cli, prompter)?;
    let now = (Utc::now().timestamp_millis().max(0) as u64).div_ceil(1000);
    let order = create_order(&params, now)?;
    println!("{}", render_created(&order, raw)?);
    Ok(())
}

pub(crate) async fn fill<R: BufRead, W: Write>(
    cli: &Cli,
    prompter: &mut Prompter<R, W>,
    raw: bool,
) -> anyhow::Result<()> {
    let params = FillingParams::resolve(cli, prompter)?;
    let order: types::RfqOrder =
        serde_json::from_str(&params.order).context("parsing order JSON")?;

    if !raw {
        println!("{}", "Order for filling: ".green().bold());
        println!("{}", serde_json::to_string_pretty(&order)?.white().underline());
    }

    let connector = connector(&params.chain, &params.private_key)?;
    let request = fill_request(&connector, &params, &order).await?;
    let tx_hash = tx::send(&connector, request).await?;
    println!("{}", tx::render(&params.chain, "Order filling transaction: ", tx_hash, raw));
    Ok(())
}

pub(crate) async fn cancel<R: BufRead, W: Write>(
    cli: &Cli,
    prompter: &mut Prompter<R, W>,
    raw: bool,
) -> anyhow::Result<()> {
    let params = CancelingParams::resolve(cli, prompter)?;
    let request = cancel_request(&params)?;
    let connector = connector(&params.chain, &params.private_key)?;
    let tx_hash = tx::send(&connector, request).await?;
    println!("{}", tx::render(&params.chain, "Order canceling transaction: ", tx_hash, raw));
    Ok(())
}
