use alloy::primitives::{Address, U256};
use clap::{Parser, ValueEnum};
use limit_order_sdk::types;

#[derive(Parser, Debug, Default)]
#[command(name = "limit-order-cli", version, about, long_about = None)]
pub struct Cli {
    /// Operation to run [default: prompted]
    #[arg(long)]
    pub operation: Option<Operation>,

    /// Chain ID of the limit order protocol deployment
    #[arg(long)]
    pub chain_id: Option<u64>,

    /// Private key of the wallet, hex-encoded
    #[arg(long, env = "LOP_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// RPC endpoint to connect to [default: chain preset]
    #[arg(long)]
    pub rpc: Option<String>,

    /// Limit order protocol contract address [default: chain preset]
    #[arg(long)]
    pub contract: Option<Address>,

    /// Block explorer for transaction links [default: chain preset]
    #[arg(long)]
    pub explorer: Option<String>,

    /// RFQ order ID (create)
    #[arg(long)]
    pub order_id: Option<U256>,

    /// Seconds the order is valid for (create)
    #[arg(long)]
    pub expires_in: Option<u64>,

    /// Asset the taker gives (create)
    #[arg(long)]
    pub taker_asset_address: Option<Address>,

    /// Asset the maker gives (create)
    #[arg(long)]
    pub maker_asset_address: Option<Address>,

    /// Taker amount, in asset base units (create, fill)
    #[arg(long)]
    pub taker_amount: Option<U256>,

    /// Maker amount, in asset base units (create, fill)
    #[arg(long)]
    pub maker_amount: Option<U256>,

    /// Maker address [default: anyone] (create)
    #[arg(long)]
    pub maker_address: Option<Address>,

    /// Protocol fee amount (create)
    #[arg(long)]
    pub fee_amount: Option<U256>,

    /// Token the fee is paid in (create)
    #[arg(long)]
    pub fee_token_address: Option<Address>,

    /// Frontend receiving the fee (create)
    #[arg(long)]
    pub frontend_address: Option<Address>,

    /// JSON-serialized RFQ order (fill)
    #[arg(long)]
    pub order: Option<String>,

    /// Packed RFQ order info (cancel)
    #[arg(long)]
    pub order_info: Option<types::RfqOrderInfo>,

    /// Gas price, in Gwei (fill, cancel)
    #[arg(long)]
    pub gas_price: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Create RFQ order
    Create,
    /// Fill RFQ order
    Fill,
    /// Cancel RFQ order
    Cancel,
    /// Show trading pair connection state from status events on stdin
    Pairs,
}

impl Operation {
    pub const ALL: [Operation; 4] =
        [Operation::Create, Operation::Fill, Operation::Cancel, Operation::Pairs];
}

impl std::str::FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Operation as ValueEnum>::from_str(s, true).map_err(|_| {
            format!(
                "expected one of: {}",
                Operation::ALL
                    .iter()
                    .filter_map(|op| op.to_possible_value())
                    .map(|value| value.get_name().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

impl Cli {
    /// Required flags of the operation that were not provided.
    pub fn missing_flags(&self, operation: Operation) -> Vec<&'static str> {
        let common = [("chain-id", self.chain_id.is_some()), ("private-key", self.private_key.is_some())];
        let specific = match operation {
            Operation::Create => vec![
                ("order-id", self.order_id.is_some()),
                ("expires-in", self.expires_in.is_some()),
                ("taker-asset-address", self.taker_asset_address.is_some()),
                ("maker-asset-address", self.maker_asset_address.is_some()),
                ("taker-amount", self.taker_amount.is_some()),
                ("maker-amount", self.maker_amount.is_some()),
                ("fee-amount", self.fee_amount.is_some()),
                ("fee-token-address", self.fee_token_address.is_some()),
                ("frontend-address", self.frontend_address.is_some()),
            ],
            Operation::Fill => vec![
                ("order", self.order.is_some()),
                ("taker-amount", self.taker_amount.is_some()),
                ("maker-amount", self.maker_amount.is_some()),
                ("gas-price", self.gas_price.is_some()),
            ],
            Operation::Cancel => vec![
                ("order-info", self.order_info.is_some()),
                ("gas-price", self.gas_price.is_some()),
            ],
            Operation::Pairs => return vec![],
        };
        common
            .into_iter()
            .chain(specific)
            .filter(|(_, present)| !present)
            .map(|(name, _)| name)
            .collect()
    }

    /// Whether the operation runs from flags only, printing raw output.
    pub fn is_running_with_argv(&self) -> bool {
        self.operation
            .is_some_and(|operation| self.missing_flags(operation).is_empty())
    }
}
