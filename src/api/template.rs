//! Template operations.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::definition::TemplateDefinition;
use super::error::ApiResult;
use super::model::{Tags, Template, TemplateSummary};
use super::{Empty, HttpRequest, Operation, Shape, echo, encode, project, required, required_value};

fn template_path(template_arn: &str) -> String {
    format!("/templates/{}", encode(template_arn))
}

/* ---- CreateTemplate ---- */

#[derive(Debug, Clone, Default)]
pub struct CreateTemplate {
    pub connector_arn: Option<String>,
    pub name: Option<String>,
    pub definition: Option<TemplateDefinition>,
    pub client_token: Option<String>,
    pub tags: Tags,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateTemplateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    client_token: Option<&'a str>,
    connector_arn: &'a str,
    definition: &'a TemplateDefinition,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a Tags>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTemplateOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_arn: Option<String>,
}

impl Shape for CreateTemplateOutput {
    fn primary(&self) -> Option<serde_json::Value> {
        project(&self.template_arn)
    }
}

impl Operation for CreateTemplate {
    type Output = CreateTemplateOutput;
    const NAME: &'static str = "CreateTemplate";
    const PARAMETERS: &'static [&'static str] =
        &["ConnectorArn", "Name", "Definition", "ClientToken", "Tags"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let connector_arn = required(&self.connector_arn, "ConnectorArn")?;
        let definition = required_value(&self.definition, "Definition")?;
        let name = required(&self.name, "Name")?;
        HttpRequest::new(Method::POST, "/templates").json(&CreateTemplateBody {
            client_token: self.client_token.as_deref(),
            connector_arn,
            definition,
            name,
            tags: (!self.tags.is_empty()).then_some(&self.tags),
        })
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "ConnectorArn" => echo(&self.connector_arn),
            "Name" => echo(&self.name),
            "Definition" => echo(&self.definition),
            "ClientToken" => echo(&self.client_token),
            "Tags" => (!self.tags.is_empty()).then(|| serde_json::json!(self.tags)),
            _ => None,
        }
    }
}

/* ---- GetTemplate ---- */

#[derive(Debug, Clone, Default)]
pub struct GetTemplate {
    pub template_arn: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetTemplateOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
}

impl Shape for GetTemplateOutput {
    fn primary(&self) -> Option<serde_json::Value> {
        project(&self.template)
    }
}

impl Operation for GetTemplate {
    type Output = GetTemplateOutput;
    const NAME: &'static str = "GetTemplate";
    const PARAMETERS: &'static [&'static str] = &["TemplateArn"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let arn = required(&self.template_arn, "TemplateArn")?;
        Ok(HttpRequest::new(Method::GET, template_path(arn)))
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "TemplateArn" => echo(&self.template_arn),
            _ => None,
        }
    }
}

/* ---- ListTemplates ---- */

#[derive(Debug, Clone, Default)]
pub struct ListTemplates {
    pub connector_arn: Option<String>,
    pub max_results: Option<u32>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTemplatesOutput {
    #[serde(default)]
    pub templates: Vec<TemplateSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl Shape for ListTemplatesOutput {
    fn primary(&self) -> Option<serde_json::Value> {
        project(&self.templates)
    }

    fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }
}

impl Operation for ListTemplates {
    type Output = ListTemplatesOutput;
    const NAME: &'static str = "ListTemplates";
    const PARAMETERS: &'static [&'static str] = &["ConnectorArn", "MaxResults", "NextToken"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let connector_arn = required(&self.connector_arn, "ConnectorArn")?;
        Ok(HttpRequest::new(Method::GET, "/templates")
            .query("ConnectorArn", Some(connector_arn))
            .query("MaxResults", self.max_results)
            .query("NextToken", self.next_token.as_deref()))
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "ConnectorArn" => echo(&self.connector_arn),
            "MaxResults" => echo(&self.max_results),
            "NextToken" => echo(&self.next_token),
            _ => None,
        }
    }
}

/* ---- UpdateTemplate ---- */

/// Partial replacement of a template definition.
#[derive(Debug, Clone, Default)]
pub struct UpdateTemplate {
    pub template_arn: Option<String>,
    pub definition: Option<TemplateDefinition>,
    /// Ask every current certificate holder to re-enroll.
    pub reenroll_all_certificate_holders: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct UpdateTemplateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    definition: Option<&'a TemplateDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reenroll_all_certificate_holders: Option<bool>,
}

impl Operation for UpdateTemplate {
    type Output = Empty;
    const NAME: &'static str = "UpdateTemplate";
    const PARAMETERS: &'static [&'static str] =
        &["TemplateArn", "Definition", "ReenrollAllCertificateHolders"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let arn = required(&self.template_arn, "TemplateArn")?;
        HttpRequest::new(Method::PATCH, template_path(arn)).json(&UpdateTemplateBody {
            definition: self.definition.as_ref(),
            reenroll_all_certificate_holders: self.reenroll_all_certificate_holders,
        })
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "TemplateArn" => echo(&self.template_arn),
            "Definition" => echo(&self.definition),
            "ReenrollAllCertificateHolders" => echo(&self.reenroll_all_certificate_holders),
            _ => None,
        }
    }
}

/* ---- DeleteTemplate ---- */

#[derive(Debug, Clone, Default)]
pub struct DeleteTemplate {
    pub template_arn: Option<String>,
}

impl Operation for DeleteTemplate {
    type Output = Empty;
    const NAME: &'static str = "DeleteTemplate";
    const PARAMETERS: &'static [&'static str] = &["TemplateArn"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let arn = required(&self.template_arn, "TemplateArn")?;
        Ok(HttpRequest::new(Method::DELETE, template_path(arn)))
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "TemplateArn" => echo(&self.template_arn),
            _ => None,
        }
    }
}
