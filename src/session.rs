//! Key manager session: one method per contract function.
//!
//! A [`KeyManager`] owns everything an operation needs (endpoint pool,
//! contract reference, token metadata, executor settings) and is cheap to
//! clone and share across tasks. Several sessions can coexist in one process.

use alloy::network::Ethereum;
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder};
use alloy::rpc::types::TransactionReceipt;
use std::future::Future;
use std::sync::Arc;

use crate::blockchain::contracts::{
    ContractRef, IKeyManager::IKeyManagerInstance, IERC20::IERC20Instance, KeyManagerContract,
    TokenContract,
};
use crate::blockchain::pool::{Endpoint, ProviderPool};
use crate::blockchain::query::QueryExecutor;
use crate::blockchain::transaction::WriteExecutor;
use crate::blockchain::types::{ClientError, ClientResult, KeyInfo, PublicHash, TokenMetadata};
use crate::blockchain::wallet::SigningCapability;
use crate::config::{validate_config, ClientConfig};
use crate::identity::{resolve_token_metadata, to_display_units, to_raw_units};

type CallError = alloy::contract::Error;

/// Connected session against one deployed key manager contract.
#[derive(Clone, Debug)]
pub struct KeyManager {
    pool: ProviderPool,
    contract: ContractRef<KeyManagerContract>,
    token: Arc<TokenMetadata>,
    token_contract: ContractRef<TokenContract>,
    query: QueryExecutor,
    write: WriteExecutor,
}

impl KeyManager {
    /// Validate `config`, connect to every endpoint and resolve the payment
    /// token.
    pub async fn connect(config: &ClientConfig) -> ClientResult<Self> {
        validate_config(config).map_err(|errors| {
            let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
            ClientError::Configuration(joined.join(", "))
        })?;

        let address: Address = config.contract.address.trim().parse().map_err(|e| {
            ClientError::Configuration(format!(
                "Invalid contract address '{}': {}",
                config.contract.address, e
            ))
        })?;
        let pool = ProviderPool::connect(&config.rpc.urls)?;

        Self::from_parts(
            address,
            pool,
            QueryExecutor::from_config(config),
            WriteExecutor::from_config(config),
        )
        .await
    }

    /// Build a session from already constructed parts.
    pub async fn from_parts(
        contract_address: Address,
        pool: ProviderPool,
        query: QueryExecutor,
        write: WriteExecutor,
    ) -> ClientResult<Self> {
        if contract_address == Address::ZERO {
            return Err(ClientError::Configuration(
                "No valid contract address provided".to_string(),
            ));
        }

        let contract = ContractRef::new(contract_address);
        let token = resolve_token_metadata(&query, &pool, contract).await?;

        tracing::info!(
            contract = %contract_address,
            endpoints = pool.len(),
            token = %token.symbol,
            "Key manager session initialized"
        );

        Ok(Self {
            pool,
            contract,
            token_contract: ContractRef::new(token.address),
            token: Arc::new(token),
            query,
            write,
        })
    }

    /// Payment token metadata resolved at session start.
    pub fn token(&self) -> &TokenMetadata {
        &self.token
    }

    pub fn contract_address(&self) -> Address {
        self.contract.address()
    }

    pub fn pool(&self) -> &ProviderPool {
        &self.pool
    }

    async fn read_manager<T, F, Fut>(&self, method: &'static str, call: F) -> ClientResult<T>
    where
        F: Fn(IKeyManagerInstance<DynProvider>) -> Fut,
        Fut: Future<Output = Result<T, CallError>>,
    {
        self.query
            .execute(self.pool.endpoints(), method, |endpoint: &Endpoint| {
                call(self.contract.bind(endpoint.provider().clone()))
            })
            .await
    }

    async fn read_token<T, F, Fut>(
        &self,
        token: ContractRef<TokenContract>,
        method: &'static str,
        call: F,
    ) -> ClientResult<T>
    where
        F: Fn(IERC20Instance<DynProvider>) -> Fut,
        Fut: Future<Output = Result<T, CallError>>,
    {
        self.query
            .execute(self.pool.endpoints(), method, |endpoint: &Endpoint| {
                call(token.bind(endpoint.provider().clone()))
            })
            .await
    }

    async fn write_manager<S, F, Fut>(
        &self,
        signer: &S,
        method: &'static str,
        call: F,
    ) -> ClientResult<TransactionReceipt>
    where
        S: SigningCapability + ?Sized,
        F: FnOnce(IKeyManagerInstance<DynProvider>) -> Fut,
        Fut: Future<Output = Result<PendingTransactionBuilder<Ethereum>, CallError>>,
    {
        let contract = self.contract.bind(signer.connection().clone());
        tracing::debug!(method, signer = %signer.address(), "Submitting key manager write");
        self.write.execute(method, move || call(contract)).await
    }

    // ----- Tier reads -----

    pub async fn is_tier_active(&self, tier_id: U256) -> ClientResult<bool> {
        self.read_manager("isTierActive", |c| async move {
            c.isTierActive(tier_id).call().await
        })
        .await
    }

    /// Price per millisecond of a tier, in token base units.
    pub async fn tier_price(&self, tier_id: U256) -> ClientResult<U256> {
        self.read_manager("tierPrice", |c| async move { c.tierPrice(tier_id).call().await })
            .await
    }

    pub async fn tier_count(&self) -> ClientResult<U256> {
        self.read_manager("numTiers", |c| async move { c.numTiers().call().await })
            .await
    }

    // ----- Key reads -----

    pub async fn is_key_active(&self, hash: PublicHash) -> ClientResult<bool> {
        self.read_manager("isKeyActive", |c| async move { c.isKeyActive(hash).call().await })
            .await
    }

    pub async fn key_exists(&self, hash: PublicHash) -> ClientResult<bool> {
        self.read_manager("keyExists", |c| async move { c.keyExists(hash).call().await })
            .await
    }

    /// Unspent balance of a key, in token base units.
    pub async fn remaining_balance(&self, hash: PublicHash) -> ClientResult<U256> {
        self.read_manager("remainingBalance", |c| async move {
            c.remainingBalance(hash).call().await
        })
        .await
    }

    /// Unspent balance of a key, in token display units.
    pub async fn remaining_display_balance(&self, hash: PublicHash) -> ClientResult<String> {
        let raw = self.remaining_balance(hash).await?;
        to_display_units(raw, self.token.decimals)
    }

    /// Consumed balance of a key, in token base units.
    pub async fn used_balance(&self, hash: PublicHash) -> ClientResult<U256> {
        self.read_manager("usedBalance", |c| async move { c.usedBalance(hash).call().await })
            .await
    }

    pub async fn key_info(&self, hash: PublicHash) -> ClientResult<KeyInfo> {
        let info = self
            .read_manager("keyInfo", |c| async move { c.keyInfo(hash).call().await })
            .await?;

        Ok(KeyInfo {
            start: info.startTime,
            expiry: info.expiryTime,
            last_realization: info.realizationTime,
            owner: info.owner,
            tier_id: info.tierId,
        })
    }

    /// Expiry timestamp of a key.
    pub async fn expiry_of(&self, hash: PublicHash) -> ClientResult<U256> {
        self.read_manager("expiryOf", |c| async move { c.expiryOf(hash).call().await })
            .await
    }

    pub async fn tier_id_of(&self, hash: PublicHash) -> ClientResult<U256> {
        self.read_manager("tierIdOf", |c| async move { c.tierIdOf(hash).call().await })
            .await
    }

    pub async fn owner_of(&self, hash: PublicHash) -> ClientResult<Address> {
        self.read_manager("ownerOf", |c| async move { c.ownerOf(hash).call().await })
            .await
    }

    /// Public hashes of every key held by `owner`.
    pub async fn keys_of(&self, owner: Address) -> ClientResult<Vec<PublicHash>> {
        self.read_manager("getKeys", |c| async move { c.getKeys(owner).call().await })
            .await
    }

    // ----- Key mutations -----

    /// Activate a new key on `tier_id` for `duration` milliseconds.
    pub async fn activate<S>(
        &self,
        signer: &S,
        hash: PublicHash,
        duration: U256,
        tier_id: U256,
    ) -> ClientResult<TransactionReceipt>
    where
        S: SigningCapability + ?Sized,
    {
        self.write_manager(signer, "activateKey", |c| async move {
            c.activateKey(hash, duration, tier_id).send().await
        })
        .await
    }

    /// Extend an existing key by `duration` milliseconds.
    pub async fn extend<S>(
        &self,
        signer: &S,
        hash: PublicHash,
        duration: U256,
    ) -> ClientResult<TransactionReceipt>
    where
        S: SigningCapability + ?Sized,
    {
        self.write_manager(signer, "extendKey", |c| async move {
            c.extendKey(hash, duration).send().await
        })
        .await
    }

    pub async fn deactivate<S>(&self, signer: &S, hash: PublicHash) -> ClientResult<TransactionReceipt>
    where
        S: SigningCapability + ?Sized,
    {
        self.write_manager(signer, "deactivateKey", |c| async move {
            c.deactivateKey(hash).send().await
        })
        .await
    }

    /// Hand a key over to another owner.
    pub async fn transfer<S>(
        &self,
        signer: &S,
        hash: PublicHash,
        to: Address,
    ) -> ClientResult<TransactionReceipt>
    where
        S: SigningCapability + ?Sized,
    {
        self.write_manager(signer, "transfer", |c| async move {
            c.transfer(hash, to).send().await
        })
        .await
    }

    // ----- Token reads -----

    /// Session token balance of `account`, in base units.
    pub async fn balance_of(&self, account: Address) -> ClientResult<U256> {
        self.read_token(self.token_contract, "balanceOf", |c| async move {
            c.balanceOf(account).call().await
        })
        .await
    }

    /// Token balance of `wallet` in display units.
    ///
    /// Uses the session token when `token` is `None`. For any other token the
    /// decimals are only queried when the balance is non-zero.
    pub async fn token_balance(
        &self,
        wallet: Address,
        token: Option<Address>,
    ) -> ClientResult<String> {
        let Some(other) = token else {
            let raw = self.balance_of(wallet).await?;
            return to_display_units(raw, self.token.decimals);
        };

        let other = ContractRef::<TokenContract>::new(other);
        let raw = self
            .read_token(other, "balanceOf", |c| async move {
                c.balanceOf(wallet).call().await
            })
            .await?;
        if raw.is_zero() {
            return Ok("0".to_string());
        }
        let decimals = self
            .read_token(other, "decimals", |c| async move { c.decimals().call().await })
            .await?;
        to_display_units(raw, decimals)
    }

    /// Symbol of the session token, queried on chain.
    pub async fn symbol(&self) -> ClientResult<String> {
        self.read_token(self.token_contract, "symbol", |c| async move {
            c.symbol().call().await
        })
        .await
    }

    /// Decimals of the session token, queried on chain.
    ///
    /// Unit conversions always use the value cached in [`token`](Self::token).
    pub async fn decimals(&self) -> ClientResult<u8> {
        self.read_token(self.token_contract, "decimals", |c| async move {
            c.decimals().call().await
        })
        .await
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> ClientResult<U256> {
        self.read_token(self.token_contract, "allowance", |c| async move {
            c.allowance(owner, spender).call().await
        })
        .await
    }

    // ----- Token mutations -----

    /// Approve `spender` for `amount` base units of the session token.
    pub async fn approve<S>(
        &self,
        signer: &S,
        spender: Address,
        amount: U256,
    ) -> ClientResult<TransactionReceipt>
    where
        S: SigningCapability + ?Sized,
    {
        let contract = self.token_contract.bind(signer.connection().clone());
        tracing::debug!(signer = %signer.address(), spender = %spender, "Submitting token approval");
        self.write
            .execute("approve", move || async move {
                contract.approve(spender, amount).send().await
            })
            .await
    }

    /// Approve `spender` for a display-unit amount such as `"12.5"`.
    pub async fn approve_display<S>(
        &self,
        signer: &S,
        spender: Address,
        amount: &str,
    ) -> ClientResult<TransactionReceipt>
    where
        S: SigningCapability + ?Sized,
    {
        let raw = to_raw_units(amount, self.token.decimals)?;
        self.approve(signer, spender, raw).await
    }
}
