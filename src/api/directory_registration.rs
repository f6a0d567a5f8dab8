//! Directory registration operations.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use super::model::{DirectoryRegistration, DirectoryRegistrationSummary, Tags};
use super::{Empty, HttpRequest, Operation, Shape, echo, encode, project, required};

#[derive(Debug, Clone, Default)]
pub struct CreateDirectoryRegistration {
    pub directory_id: Option<String>,
    pub client_token: Option<String>,
    pub tags: Tags,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateDirectoryRegistrationBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    client_token: Option<&'a str>,
    directory_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a Tags>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDirectoryRegistrationOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_registration_arn: Option<String>,
}

impl Shape for CreateDirectoryRegistrationOutput {
    fn primary(&self) -> Option<serde_json::Value> {
        project(&self.directory_registration_arn)
    }
}

impl Operation for CreateDirectoryRegistration {
    type Output = CreateDirectoryRegistrationOutput;
    const NAME: &'static str = "CreateDirectoryRegistration";
    const PARAMETERS: &'static [&'static str] = &["DirectoryId", "ClientToken", "Tags"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let directory_id = required(&self.directory_id, "DirectoryId")?;
        HttpRequest::new(Method::POST, "/directoryRegistrations").json(
            &CreateDirectoryRegistrationBody {
                client_token: self.client_token.as_deref(),
                directory_id,
                tags: (!self.tags.is_empty()).then_some(&self.tags),
            },
        )
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "DirectoryId" => echo(&self.directory_id),
            "ClientToken" => echo(&self.client_token),
            "Tags" => (!self.tags.is_empty()).then(|| serde_json::json!(self.tags)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetDirectoryRegistration {
    pub directory_registration_arn: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetDirectoryRegistrationOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_registration: Option<DirectoryRegistration>,
}

impl Shape for GetDirectoryRegistrationOutput {
    fn primary(&self) -> Option<serde_json::Value> {
        project(&self.directory_registration)
    }
}

impl Operation for GetDirectoryRegistration {
    type Output = GetDirectoryRegistrationOutput;
    const NAME: &'static str = "GetDirectoryRegistration";
    const PARAMETERS: &'static [&'static str] = &["DirectoryRegistrationArn"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let arn = required(&self.directory_registration_arn, "DirectoryRegistrationArn")?;
        Ok(HttpRequest::new(
            Method::GET,
            format!("/directoryRegistrations/{}", encode(arn)),
        ))
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "DirectoryRegistrationArn" => echo(&self.directory_registration_arn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListDirectoryRegistrations {
    pub max_results: Option<u32>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListDirectoryRegistrationsOutput {
    #[serde(default)]
    pub directory_registrations: Vec<DirectoryRegistrationSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl Shape for ListDirectoryRegistrationsOutput {
    fn primary(&self) -> Option<serde_json::Value> {
        project(&self.directory_registrations)
    }

    fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }
}

impl Operation for ListDirectoryRegistrations {
    type Output = ListDirectoryRegistrationsOutput;
    const NAME: &'static str = "ListDirectoryRegistrations";
    const PARAMETERS: &'static [&'static str] = &["MaxResults", "NextToken"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        Ok(HttpRequest::new(Method::GET, "/directoryRegistrations")
            .query("MaxResults", self.max_results)
            .query("NextToken", self.next_token.as_deref()))
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "MaxResults" => echo(&self.max_results),
            "NextToken" => echo(&self.next_token),
            _ => None,
        }
    }
}

/// Deleting a registration also tears down the connectors that depend on it.
#[derive(Debug, Clone, Default)]
pub struct DeleteDirectoryRegistration {
    pub directory_registration_arn: Option<String>,
}

impl Operation for DeleteDirectoryRegistration {
    type Output = Empty;
    const NAME: &'static str = "DeleteDirectoryRegistration";
    const PARAMETERS: &'static [&'static str] = &["DirectoryRegistrationArn"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let arn = required(&self.directory_registration_arn, "DirectoryRegistrationArn")?;
        Ok(HttpRequest::new(
            Method::DELETE,
            format!("/directoryRegistrations/{}", encode(arn)),
        ))
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "DirectoryRegistrationArn" => echo(&self.directory_registration_arn),
            _ => None,
        }
    }
}
