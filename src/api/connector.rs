//! Connector operations.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use super::model::{Connector, ConnectorSummary, IpAddressType, Tags, VpcInformation};
use super::{
    Empty, HttpRequest, Operation, Shape, collapse, echo, echo_list, encode, non_empty, project,
    required, required_list,
};

/* ---- CreateConnector ---- */

#[derive(Debug, Clone, Default)]
pub struct CreateConnector {
    pub certificate_authority_arn: Option<String>,
    pub directory_id: Option<String>,
    pub security_group_ids: Vec<String>,
    pub ip_address_type: Option<IpAddressType>,
    pub client_token: Option<String>,
    pub tags: Tags,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateConnectorBody<'a> {
    certificate_authority_arn: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_token: Option<&'a str>,
    directory_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a Tags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vpc_information: Option<VpcInformation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateConnectorOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_arn: Option<String>,
}

impl Shape for CreateConnectorOutput {
    fn primary(&self) -> Option<serde_json::Value> {
        project(&self.connector_arn)
    }
}

impl Operation for CreateConnector {
    type Output = CreateConnectorOutput;
    const NAME: &'static str = "CreateConnector";
    const PARAMETERS: &'static [&'static str] = &[
        "CertificateAuthorityArn",
        "DirectoryId",
        "SecurityGroupIds",
        "IpAddressType",
        "ClientToken",
        "Tags",
    ];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let certificate_authority_arn =
            required(&self.certificate_authority_arn, "CertificateAuthorityArn")?;
        let directory_id = required(&self.directory_id, "DirectoryId")?;
        let security_group_ids =
            required_list(&self.security_group_ids, "VpcInformation.SecurityGroupIds")?;

        let vpc_information = collapse(VpcInformation {
            security_group_ids: non_empty(security_group_ids),
            ip_address_type: self.ip_address_type,
        });

        HttpRequest::new(Method::POST, "/connectors").json(&CreateConnectorBody {
            certificate_authority_arn,
            client_token: self.client_token.as_deref(),
            directory_id,
            tags: (!self.tags.is_empty()).then_some(&self.tags),
            vpc_information,
        })
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "CertificateAuthorityArn" => echo(&self.certificate_authority_arn),
            "DirectoryId" => echo(&self.directory_id),
            "SecurityGroupIds" => echo_list(&self.security_group_ids),
            "IpAddressType" => echo(&self.ip_address_type),
            "ClientToken" => echo(&self.client_token),
            "Tags" => (!self.tags.is_empty()).then(|| serde_json::json!(self.tags)),
            _ => None,
        }
    }
}

/* ---- GetConnector ---- */

#[derive(Debug, Clone, Default)]
pub struct GetConnector {
    pub connector_arn: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetConnectorOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector: Option<Connector>,
}

impl Shape for GetConnectorOutput {
    fn primary(&self) -> Option<serde_json::Value> {
        project(&self.connector)
    }
}

impl Operation for GetConnector {
    type Output = GetConnectorOutput;
    const NAME: &'static str = "GetConnector";
    const PARAMETERS: &'static [&'static str] = &["ConnectorArn"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let arn = required(&self.connector_arn, "ConnectorArn")?;
        Ok(HttpRequest::new(
            Method::GET,
            format!("/connectors/{}", encode(arn)),
        ))
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "ConnectorArn" => echo(&self.connector_arn),
            _ => None,
        }
    }
}

/* ---- ListConnectors ---- */

#[derive(Debug, Clone, Default)]
pub struct ListConnectors {
    pub max_results: Option<u32>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListConnectorsOutput {
    #[serde(default)]
    pub connectors: Vec<ConnectorSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl Shape for ListConnectorsOutput {
    fn primary(&self) -> Option<serde_json::Value> {
        project(&self.connectors)
    }

    fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }
}

impl Operation for ListConnectors {
    type Output = ListConnectorsOutput;
    const NAME: &'static str = "ListConnectors";
    const PARAMETERS: &'static [&'static str] = &["MaxResults", "NextToken"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        Ok(HttpRequest::new(Method::GET, "/connectors")
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

/* ---- DeleteConnector ---- */

#[derive(Debug, Clone, Default)]
pub struct DeleteConnector {
    pub connector_arn: Option<String>,
}

impl Operation for DeleteConnector {
    type Output = Empty;
    const NAME: &'static str = "DeleteConnector";
    const PARAMETERS: &'static [&'static str] = &["ConnectorArn"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let arn = required(&self.connector_arn, "ConnectorArn")?;
        Ok(HttpRequest::new(
            Method::DELETE,
            format!("/connectors/{}", encode(arn)),
        ))
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "ConnectorArn" => echo(&self.connector_arn),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use serde_json::json;

    const CA_ARN: &str = "arn:aws:acm-pca:us-east-1:111122223333:certificate-authority/ca-1";

    #[test]
    fn create_nests_security_group_without_token() {
        let op = CreateConnector {
            certificate_authority_arn: Some(CA_ARN.into()),
            directory_id: Some("d-1234567890".into()),
            security_group_ids: vec!["sg-0abc".into()],
            ..Default::default()
        };
        let req = op.to_request().unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "/connectors");
        assert_eq!(
            req.body.unwrap(),
            json!({
                "CertificateAuthorityArn": CA_ARN,
                "DirectoryId": "d-1234567890",
                "VpcInformation": { "SecurityGroupIds": ["sg-0abc"] }
            })
        );
    }

    #[test]
    fn blank_security_group_entries_are_not_sent() {
        let op = CreateConnector {
            certificate_authority_arn: Some(CA_ARN.into()),
            directory_id: Some("d-1234567890".into()),
            security_group_ids: vec!["sg-1".into(), "".into()],
            ..Default::default()
        };
        let body = op.to_request().unwrap().body.unwrap();
        assert_eq!(body["VpcInformation"], json!({ "SecurityGroupIds": ["sg-1"] }));
    }

    #[test]
    fn create_forwards_client_token_unchanged() {
        let op = CreateConnector {
            certificate_authority_arn: Some(CA_ARN.into()),
            directory_id: Some("d-1234567890".into()),
            security_group_ids: vec!["sg-0abc".into()],
            ip_address_type: Some(IpAddressType::Dualstack),
            client_token: Some("token-42".into()),
            tags: Tags::from([("env".to_string(), "prod".to_string())]),
        };
        let body = op.to_request().unwrap().body.unwrap();
        assert_eq!(body["ClientToken"], json!("token-42"));
        assert_eq!(body["Tags"], json!({ "env": "prod" }));
        assert_eq!(body["VpcInformation"]["IpAddressType"], json!("DUALSTACK"));
    }

    #[test]
    fn create_requires_each_parameter() {
        let op = CreateConnector::default();
        assert!(matches!(
            op.to_request(),
            Err(ApiError::MissingParameter("CertificateAuthorityArn"))
        ));

        let op = CreateConnector {
            certificate_authority_arn: Some(CA_ARN.into()),
            ..Default::default()
        };
        assert!(matches!(
            op.to_request(),
            Err(ApiError::MissingParameter("DirectoryId"))
        ));

        let op = CreateConnector {
            certificate_authority_arn: Some(CA_ARN.into()),
            directory_id: Some("d-1".into()),
            ip_address_type: Some(IpAddressType::Ipv4),
            ..Default::default()
        };
        let err = op.to_request().unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required parameter: VpcInformation.SecurityGroupIds"
        );
    }

    #[test]
    fn get_and_delete_encode_arn_label() {
        let arn = "arn:aws:pca-connector-ad:us-east-1:111122223333:connector/c-1";
        let get = GetConnector {
            connector_arn: Some(arn.into()),
        }
        .to_request()
        .unwrap();
        assert_eq!(
            get.path,
            "/connectors/arn%3Aaws%3Apca-connector-ad%3Aus-east-1%3A111122223333%3Aconnector%2Fc-1"
        );
        assert!(get.body.is_none());

        let delete = DeleteConnector {
            connector_arn: Some(arn.into()),
        }
        .to_request()
        .unwrap();
        assert_eq!(delete.method, Method::DELETE);
        assert_eq!(delete.path, get.path);
    }

    #[test]
    fn list_carries_pagination_inputs() {
        let req = ListConnectors {
            max_results: Some(5),
            next_token: Some("abc==".into()),
        }
        .to_request()
        .unwrap();
        assert_eq!(
            req.query,
            vec![("MaxResults", "5".to_string()), ("NextToken", "abc==".to_string())]
        );
    }

    #[test]
    fn list_output_primary_and_marker() {
        let out: ListConnectorsOutput = serde_json::from_value(json!({
            "Connectors": [{ "Arn": "a1" }, { "Arn": "a2" }],
            "NextToken": "t2"
        }))
        .unwrap();
        assert_eq!(out.primary().unwrap(), json!([{ "Arn": "a1" }, { "Arn": "a2" }]));
        assert_eq!(out.next_token(), Some("t2"));
    }

    #[test]
    fn echo_parameters() {
        let op = CreateConnector {
            directory_id: Some("d-1".into()),
            security_group_ids: vec!["sg-1".into(), "sg-2".into()],
            ..Default::default()
        };
        assert_eq!(op.parameter("DirectoryId"), Some(json!("d-1")));
        assert_eq!(op.parameter("SecurityGroupIds"), Some(json!(["sg-1", "sg-2"])));
        assert_eq!(op.parameter("ClientToken"), None);
    }
}
