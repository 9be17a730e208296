//! GraphQL reads for account balances, staked NFTs and tip attestations

use alloy_primitives::U256;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::amount::decimal_u256;
use crate::attestation::AttestationRecord;
use crate::config::IndexerEndpoints;
use crate::error::Error;

/// All accounts with their staked NFTs, most recently written first
pub const ACCOUNTS_QUERY: &str = r#"
{
    Account(order_by: {db_write_timestamp: desc_nulls_last}) {
        balance
        id
        stakedNFTs {
            active
            amount
            timestamp
            tokenId
        }
    }
}
"#;

/// Attestations of one schema, newest first
pub const TIP_ATTESTATIONS_QUERY: &str = r#"
query TipAttestations($schemaId: String!) {
    attestations(
        where: { schemaId: { equals: $schemaId } }
        orderBy: [{ timeCreated: desc }]
    ) {
        id
        attester
        recipient
        refUID
        revocable
        revoked
        time
        timeCreated
        expirationTime
        data
        decodedDataJson
        schemaId
    }
}
"#;

/// Token holder as tracked by the indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Token balance in base units
    #[serde(with = "decimal_u256")]
    pub balance: U256,
    /// Account address
    pub id: String,
    /// Membership NFTs, most recent first
    #[serde(rename = "stakedNFTs", default)]
    pub staked_nfts: Vec<StakedNft>,
}

/// A membership NFT minted by staking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakedNft {
    pub active: bool,
    /// Staked amount in base units
    #[serde(with = "decimal_u256")]
    pub amount: U256,
    /// Unix seconds, as a decimal string
    pub timestamp: String,
    pub token_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct AccountsData {
    #[serde(rename = "Account")]
    accounts: Vec<Account>,
}

#[derive(Debug, Deserialize)]
struct AttestationsData {
    attestations: Vec<AttestationRecord>,
}

pub(crate) fn into_data<T>(response: GraphQlResponse<T>) -> Result<T, Error> {
    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(Error::Indexer(messages.join("; ")));
    }
    response
        .data
        .ok_or_else(|| Error::Indexer("response has no data".to_string()))
}

/// Client for the GraphQL read endpoints
pub struct IndexerClient {
    /// HTTP client
    http: reqwest::Client,
    /// Endpoint configuration
    endpoints: IndexerEndpoints,
}

impl IndexerClient {
    pub fn new(endpoints: &IndexerEndpoints) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoints: endpoints.clone(),
        }
    }

    /// Get the endpoint configuration
    pub fn endpoints(&self) -> &IndexerEndpoints {
        &self.endpoints
    }

    /// Fetch every account with its balance and staked NFTs
    pub async fn fetch_accounts(&self) -> Result<Vec<Account>, Error> {
        let data: AccountsData = self
            .query(&self.endpoints.accounts_graphql, ACCOUNTS_QUERY, Value::Null)
            .await?;
        Ok(data.accounts)
    }

    /// Fetch attestations made with the configured tip schema
    pub async fn fetch_tip_attestations(&self) -> Result<Vec<AttestationRecord>, Error> {
        let variables = json!({ "schemaId": self.endpoints.tip_schema_uid });
        let data: AttestationsData = self
            .query(
                &self.endpoints.attestations_graphql,
                TIP_ATTESTATIONS_QUERY,
                variables,
            )
            .await?;
        Ok(data.attestations)
    }

    async fn query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &str,
        variables: Value,
    ) -> Result<T, Error> {
        let mut body = json!({ "query": query });
        if !variables.is_null() {
            body["variables"] = variables;
        }
        debug!("GraphQL request to {}", url);

        let response: GraphQlResponse<T> = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        into_data(response)
    }
}
