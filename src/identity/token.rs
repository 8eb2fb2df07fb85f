//! Resolution of the payment token's metadata.

use alloy::primitives::Address;

use crate::blockchain::contracts::{ContractRef, KeyManagerContract, TokenContract};
use crate::blockchain::pool::{Endpoint, ProviderPool};
use crate::blockchain::query::QueryExecutor;
use crate::blockchain::types::{ClientError, ClientResult, TokenMetadata};

/// Look up the key manager's ERC20 token, then its symbol and decimals.
///
/// Three dependent reads, each with the query executor's failover.
pub async fn resolve_token_metadata(
    query: &QueryExecutor,
    pool: &ProviderPool,
    manager: ContractRef<KeyManagerContract>,
) -> ClientResult<TokenMetadata> {
    let address: Address = query
        .execute(pool.endpoints(), "erc20", |endpoint: &Endpoint| {
            let contract = manager.bind(endpoint.provider().clone());
            async move { contract.erc20().call().await }
        })
        .await?;

    if address == Address::ZERO {
        return Err(ClientError::Configuration(format!(
            "key manager {} has no payment token configured",
            manager.address()
        )));
    }

    let token = ContractRef::<TokenContract>::new(address);
    let symbol = query
        .execute(pool.endpoints(), "symbol", |endpoint: &Endpoint| {
            let contract = token.bind(endpoint.provider().clone());
            async move { contract.symbol().call().await }
        })
        .await?;
    let decimals = query
        .execute(pool.endpoints(), "decimals", |endpoint: &Endpoint| {
            let contract = token.bind(endpoint.provider().clone());
            async move { contract.decimals().call().await }
        })
        .await?;

    tracing::info!(
        token = %address,
        symbol = %symbol,
        decimals,
        "Resolved payment token"
    );

    Ok(TokenMetadata {
        address,
        symbol,
        decimals,
    })
}
