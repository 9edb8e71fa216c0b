//! Bindings for the two deployed contracts.

#![cfg(feature = "server")]

use alloy::sol;

sol! {
    /// The subset of ERC-20 the dashboard uses.
    #[sol(rpc)]
    interface IERC20 {
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    /// Custodial bank keeping a per-account ledger of deposited tokens.
    #[sol(rpc)]
    interface ITokenBank {
        function balances(address account) external view returns (uint256);
        function deposit(uint256 amount) external;
        function withdraw(uint256 amount) external;
    }
}
