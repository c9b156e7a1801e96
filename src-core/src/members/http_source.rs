//! Member data fetched from the platform backend over HTTP.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::errors::{Error, Result};
use crate::members::members_model::{
    AccountSnapshot, DownlineTree, MemberProfile, MemberRecord, RawUserData,
};
use crate::members::withdrawal_model::WithdrawalRecord;
use crate::members::members_traits::MemberDataSource;

/// Client for `GET {base_url}/user_data/{id}`
pub struct HttpMemberSource {
    client: Client,
    base_url: String,
}

impl HttpMemberSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn user_data_url(&self, member_id: &str) -> String {
        format!("{}/user_data/{}", self.base_url, urlencoding::encode(member_id))
    }

    /// Fetch and decode the whole user-data document
    pub async fn fetch_user_data(&self, member_id: &str) -> Result<RawUserData> {
        let url = self.user_data_url(member_id);
        log::debug!("Fetching user data from {}", url);

        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => return Err(Error::MemberNotFound(member_id.to_string())),
            status if !status.is_success() => {
                log::warn!("User data request for {} failed with {}", member_id, status);
                return Err(Error::DataSource(format!(
                    "user data service responded with {}",
                    status
                )));
            }
            _ => {}
        }

        let body = response.text().await?;
        RawUserData::from_json(&body)
    }
}

#[async_trait]
impl MemberDataSource for HttpMemberSource {
    async fn fetch_account_snapshot(&self, member_id: &str) -> Result<AccountSnapshot> {
        self.fetch_user_data(member_id).await?.account_snapshot()
    }

    async fn fetch_downline(&self, member_id: &str) -> Result<DownlineTree> {
        Ok(self.fetch_user_data(member_id).await?.downline())
    }

    async fn fetch_profile(&self, member_id: &str) -> Result<MemberProfile> {
        Ok(self.fetch_user_data(member_id).await?.profile(member_id))
    }

    async fn fetch_withdrawals(&self, member_id: &str) -> Result<Vec<WithdrawalRecord>> {
        Ok(self.fetch_user_data(member_id).await?.withdrawals)
    }

    // One document carries every view, so read it once
    async fn fetch_member(&self, member_id: &str) -> Result<MemberRecord> {
        self.fetch_user_data(member_id).await?.into_record(member_id)
    }
}
