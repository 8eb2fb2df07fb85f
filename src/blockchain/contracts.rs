//! Contract interface descriptors and the binding factory.
//!
//! Each contract kind is a closed set of typed calls generated by `sol!`; a
//! [`ContractRef`] pairs a deployed address with one of those descriptors and
//! binds it to whatever connection an operation is using.

use alloy::primitives::Address;
use alloy::providers::Provider;
use alloy::sol;
use std::marker::PhantomData;

sol! {
    /// Metered API key manager.
    #[sol(rpc)]
    interface IKeyManager {
        function erc20() external view returns (address);

        function numTiers() external view returns (uint256);
        function isTierActive(uint256 tierId) external view returns (bool);
        function tierPrice(uint256 tierId) external view returns (uint256);

        function isKeyActive(bytes32 keyHash) external view returns (bool);
        function keyExists(bytes32 keyHash) external view returns (bool);
        function remainingBalance(bytes32 keyHash) external view returns (uint256);
        function usedBalance(bytes32 keyHash) external view returns (uint256);
        function keyInfo(bytes32 keyHash) external view returns (
            uint256 startTime,
            uint256 expiryTime,
            uint256 realizationTime,
            address owner,
            uint256 tierId
        );
        function expiryOf(bytes32 keyHash) external view returns (uint256);
        function tierIdOf(bytes32 keyHash) external view returns (uint256);
        function ownerOf(bytes32 keyHash) external view returns (address);
        function getKeys(address owner) external view returns (bytes32[]);

        function activateKey(bytes32 keyHash, uint256 msDuration, uint256 tierId) external;
        function extendKey(bytes32 keyHash, uint256 msDuration) external;
        function deactivateKey(bytes32 keyHash) external;
        function transfer(bytes32 keyHash, address to) external;
    }
}

sol! {
    /// Payment token used by the key manager.
    #[sol(rpc)]
    interface IERC20 {
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

/// A contract kind with a typed binding.
pub trait ContractDescriptor {
    /// Name used in logs.
    const NAME: &'static str;

    /// Generated binding type over a connection `P`.
    type Instance<P: Provider>;

    fn bind<P: Provider>(address: Address, provider: P) -> Self::Instance<P>;
}

/// Primary key manager contract.
#[derive(Debug, Clone, Copy)]
pub struct KeyManagerContract;

impl ContractDescriptor for KeyManagerContract {
    const NAME: &'static str = "key-manager";
    type Instance<P: Provider> = IKeyManager::IKeyManagerInstance<P>;

    fn bind<P: Provider>(address: Address, provider: P) -> Self::Instance<P> {
        IKeyManager::new(address, provider)
    }
}

/// ERC20 payment token contract.
#[derive(Debug, Clone, Copy)]
pub struct TokenContract;

impl ContractDescriptor for TokenContract {
    const NAME: &'static str = "erc20";
    type Instance<P: Provider> = IERC20::IERC20Instance<P>;

    fn bind<P: Provider>(address: Address, provider: P) -> Self::Instance<P> {
        IERC20::new(address, provider)
    }
}

/// Immutable (address, descriptor) pair naming an on-chain callable.
pub struct ContractRef<D> {
    address: Address,
    _descriptor: PhantomData<D>,
}

impl<D: ContractDescriptor> ContractRef<D> {
    pub const fn new(address: Address) -> Self {
        Self {
            address,
            _descriptor: PhantomData,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Build a callable binding over the given connection.
    pub fn bind<P: Provider>(&self, provider: P) -> D::Instance<P> {
        D::bind(self.address, provider)
    }
}

impl<D> Clone for ContractRef<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for ContractRef<D> {}

impl<D: ContractDescriptor> std::fmt::Debug for ContractRef<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractRef")
            .field("kind", &D::NAME)
            .field("address", &self.address)
            .finish()
    }
}
