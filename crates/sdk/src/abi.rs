//! Limit order protocol and ERC20 contract bindings.
//!
//! Struct field order defines both the ABI encoding and the EIP-712 type
//! string, keep it identical to the deployed contract. JSON representation
//! of the order structs lives in [`crate::types::json`].

alloy::sol! {
    /// Limit order.
    #[derive(Debug, PartialEq, Eq)]
    struct Order {
        uint256 salt;
        address takerAsset;
        address makerAsset;
        bytes takerAssetData;
        bytes makerAssetData;
        bytes getTakerAmount;
        bytes getMakerAmount;
        bytes predicate;
        bytes permit;
        bytes interaction;
    }

    /// Request-for-quote order, `info` packs expiration and ID.
    #[derive(Debug, PartialEq, Eq)]
    struct OrderRFQ {
        uint256 info;
        uint256 feeAmount;
        address takerAsset;
        address makerAsset;
        address feeTokenAddress;
        address frontendAddress;
        bytes takerAssetData;
        bytes makerAssetData;
    }

    #[derive(Debug)]
    interface LimitOrderProtocol {
        function DOMAIN_SEPARATOR() external view returns (bytes32);

        function nonce(address maker) external view returns (uint256);
        function advanceNonce(uint8 amount) external;
        function increaseNonce() external;

        function remaining(bytes32 orderHash) external view returns (uint256);
        function checkPredicate(Order order) external view returns (bool);
        function simulateCalls(address[] targets, bytes[] data) external;

        function getTakerAmount(uint256 takerAmount, uint256 makerAmount, uint256 swapMakerAmount) external pure returns (uint256);
        function getMakerAmount(uint256 takerAmount, uint256 makerAmount, uint256 swapTakerAmount) external pure returns (uint256);

        function fillOrder(Order order, bytes signature, uint256 takerAmount, uint256 makerAmount, uint256 thresholdAmount) external returns (uint256, uint256);
        function fillOrderRFQ(OrderRFQ order, bytes signature, uint256 takerAmount, uint256 makerAmount) external;
        function cancelOrder(Order order) external;
        function cancelOrderRFQ(uint256 orderInfo) external;
    }

    #[derive(Debug)]
    interface IERC20 {
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
    }
}
