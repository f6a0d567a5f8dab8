//! Service principal name operations.
//!
//! An SPN is addressed by the pair (directory registration, connector); both
//! ARNs are path labels.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use super::model::{ServicePrincipalName, ServicePrincipalNameSummary};
use super::{Empty, HttpRequest, Operation, Shape, echo, encode, project, required};

fn spn_path(directory_registration_arn: &str, connector_arn: &str) -> String {
    format!(
        "/directoryRegistrations/{}/servicePrincipalNames/{}",
        encode(directory_registration_arn),
        encode(connector_arn)
    )
}

#[derive(Debug, Clone, Default)]
pub struct CreateServicePrincipalName {
    pub connector_arn: Option<String>,
    pub directory_registration_arn: Option<String>,
    pub client_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateServicePrincipalNameBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    client_token: Option<&'a str>,
}

impl Operation for CreateServicePrincipalName {
    type Output = Empty;
    const NAME: &'static str = "CreateServicePrincipalName";
    const PARAMETERS: &'static [&'static str] =
        &["ConnectorArn", "DirectoryRegistrationArn", "ClientToken"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let connector_arn = required(&self.connector_arn, "ConnectorArn")?;
        let registration_arn =
            required(&self.directory_registration_arn, "DirectoryRegistrationArn")?;
        HttpRequest::new(Method::POST, spn_path(registration_arn, connector_arn)).json(
            &CreateServicePrincipalNameBody {
                client_token: self.client_token.as_deref(),
            },
        )
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "ConnectorArn" => echo(&self.connector_arn),
            "DirectoryRegistrationArn" => echo(&self.directory_registration_arn),
            "ClientToken" => echo(&self.client_token),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetServicePrincipalName {
    pub connector_arn: Option<String>,
    pub directory_registration_arn: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetServicePrincipalNameOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_principal_name: Option<ServicePrincipalName>,
}

impl Shape for GetServicePrincipalNameOutput {
    fn primary(&self) -> Option<serde_json::Value> {
        project(&self.service_principal_name)
    }
}

impl Operation for GetServicePrincipalName {
    type Output = GetServicePrincipalNameOutput;
    const NAME: &'static str = "GetServicePrincipalName";
    const PARAMETERS: &'static [&'static str] = &["ConnectorArn", "DirectoryRegistrationArn"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let connector_arn = required(&self.connector_arn, "ConnectorArn")?;
        let registration_arn =
            required(&self.directory_registration_arn, "DirectoryRegistrationArn")?;
        Ok(HttpRequest::new(
            Method::GET,
            spn_path(registration_arn, connector_arn),
        ))
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "ConnectorArn" => echo(&self.connector_arn),
            "DirectoryRegistrationArn" => echo(&self.directory_registration_arn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListServicePrincipalNames {
    pub directory_registration_arn: Option<String>,
    pub max_results: Option<u32>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListServicePrincipalNamesOutput {
    #[serde(default)]
    pub service_principal_names: Vec<ServicePrincipalNameSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl Shape for ListServicePrincipalNamesOutput {
    fn primary(&self) -> Option<serde_json::Value> {
        project(&self.service_principal_names)
    }

    fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }
}

impl Operation for ListServicePrincipalNames {
    type Output = ListServicePrincipalNamesOutput;
    const NAME: &'static str = "ListServicePrincipalNames";
    const PARAMETERS: &'static [&'static str] =
        &["DirectoryRegistrationArn", "MaxResults", "NextToken"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let registration_arn =
            required(&self.directory_registration_arn, "DirectoryRegistrationArn")?;
        Ok(HttpRequest::new(
            Method::GET,
            format!(
                "/directoryRegistrations/{}/servicePrincipalNames",
                encode(registration_arn)
            ),
        )
        .query("MaxResults", self.max_results)
        .query("NextToken", self.next_token.as_deref()))
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "DirectoryRegistrationArn" => echo(&self.directory_registration_arn),
            "MaxResults" => echo(&self.max_results),
            "NextToken" => echo(&self.next_token),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeleteServicePrincipalName {
    pub connector_arn: Option<String>,
    pub directory_registration_arn: Option<String>,
}

impl Operation for DeleteServicePrincipalName {
    type Output = Empty;
    const NAME: &'static str = "DeleteServicePrincipalName";
    const PARAMETERS: &'static [&'static str] = &["ConnectorArn", "DirectoryRegistrationArn"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let connector_arn = required(&self.connector_arn, "ConnectorArn")?;
        let registration_arn =
            required(&self.directory_registration_arn, "DirectoryRegistrationArn")?;
        Ok(HttpRequest::new(
            Method::DELETE,
            spn_path(registration_arn, connector_arn),
        ))
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "ConnectorArn" => echo(&self.connector_arn),
            "DirectoryRegistrationArn" => echo(&self.directory_registration_arn),
            _ => None,
        }
    }
}
