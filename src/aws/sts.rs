//! Cross-account role assumption via STS

use crate::config::AwsConfig;
use crate::error::{CostError, Result};
use crate::provider::{Authenticator, TemporaryCredentials};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_sts::error::DisplayErrorContext;
use aws_sdk_sts::Client as StsClient;
use chrono::{DateTime, Utc};
use std::time::SystemTime;
use tracing::info;

/// Assumes `arn:aws:iam::<account>:role/<role_name>` with the caller's own credentials
pub struct StsAuthenticator {
    client: StsClient,
    role_name: String,
    session_name: String,
}

impl StsAuthenticator {
    pub fn new(sdk_config: &SdkConfig, aws: &AwsConfig) -> Self {
        Self {
            client: StsClient::new(sdk_config),
            role_name: aws.role_name.clone(),
            session_name: aws.session_name.clone(),
        }
    }
}

pub fn role_arn(account_id: &str, role_name: &str) -> String {
    format!("arn:aws:iam::{}:role/{}", account_id, role_name)
}

#[async_trait]
impl Authenticator for StsAuthenticator {
    async fn assume_role(&self, account_id: &str) -> Result<TemporaryCredentials> {
        let role_arn = role_arn(account_id, &self.role_name);

        let response = self
            .client
            .assume_role()
            .role_arn(&role_arn)
            .role_session_name(&self.session_name)
            .send()
            .await
            .map_err(|e| CostError::Authorization {
                role_arn: role_arn.clone(),
                message: DisplayErrorContext(&e).to_string(),
                source: Some(Box::new(e.into_service_error())),
            })?;

        let credentials = response
            .credentials()
            .ok_or_else(|| CostError::Authorization {
                role_arn: role_arn.clone(),
                message: "STS response carried no credentials".to_string(),
                source: None,
            })?;

        let expiration = credentials.expiration();
        let expiration = DateTime::<Utc>::from_timestamp(expiration.secs(), expiration.subsec_nanos());

        info!(role_arn = %role_arn, expiration = ?expiration, "Assumed role");

        Ok(TemporaryCredentials {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().to_string(),
            expiration,
        })
    }
}

/// SDK config for the target account and region, signed with assumed-role credentials
pub async fn assumed_role_config(credentials: &TemporaryCredentials, region: &str) -> SdkConfig {
    let provider = aws_sdk_sts::config::Credentials::new(
        credentials.access_key_id.clone(),
        credentials.secret_access_key.clone(),
        Some(credentials.session_token.clone()),
        credentials.expiration.map(SystemTime::from),
        "aurora-cost-assume-role",
    );

    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .credentials_provider(provider)
        .load()
        .await
}
