//! Template group access control entries.
//!
//! An entry is addressed by (template ARN, group SID) and grants or denies the
//! enroll / autoenroll rights on that template to one directory group.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use super::model::{AccessControlEntry, AccessControlEntrySummary, AccessRight, AccessRights};
use super::{
    Empty, HttpRequest, Operation, Shape, collapse, echo, encode, project, required, required_value,
};

fn entries_path(template_arn: &str) -> String {
    format!("/templates/{}/accessControlEntries", encode(template_arn))
}

fn entry_path(template_arn: &str, group_security_identifier: &str) -> String {
    format!(
        "{}/{}",
        entries_path(template_arn),
        encode(group_security_identifier)
    )
}

/* ---- Create ---- */

#[derive(Debug, Clone, Default)]
pub struct CreateTemplateGroupAccessControlEntry {
    pub template_arn: Option<String>,
    pub group_security_identifier: Option<String>,
    pub group_display_name: Option<String>,
    pub enroll: Option<AccessRight>,
    pub auto_enroll: Option<AccessRight>,
    pub client_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateEntryBody<'a> {
    access_rights: &'a AccessRights,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_token: Option<&'a str>,
    group_display_name: &'a str,
    group_security_identifier: &'a str,
}

impl Operation for CreateTemplateGroupAccessControlEntry {
    type Output = Empty;
    const NAME: &'static str = "CreateTemplateGroupAccessControlEntry";
    const PARAMETERS: &'static [&'static str] = &[
        "TemplateArn",
        "GroupSecurityIdentifier",
        "GroupDisplayName",
        "AccessRights.Enroll",
        "AccessRights.AutoEnroll",
        "ClientToken",
    ];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let access_rights = collapse(AccessRights {
            auto_enroll: self.auto_enroll,
            enroll: self.enroll,
        });
        let access_rights = required_value(&access_rights, "AccessRights")?;
        let group_display_name = required(&self.group_display_name, "GroupDisplayName")?;
        let group_security_identifier =
            required(&self.group_security_identifier, "GroupSecurityIdentifier")?;
        let template_arn = required(&self.template_arn, "TemplateArn")?;

        HttpRequest::new(Method::POST, entries_path(template_arn)).json(&CreateEntryBody {
            access_rights,
            client_token: self.client_token.as_deref(),
            group_display_name,
            group_security_identifier,
        })
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "TemplateArn" => echo(&self.template_arn),
            "GroupSecurityIdentifier" => echo(&self.group_security_identifier),
            "GroupDisplayName" => echo(&self.group_display_name),
            "AccessRights.Enroll" => echo(&self.enroll),
            "AccessRights.AutoEnroll" => echo(&self.auto_enroll),
            "ClientToken" => echo(&self.client_token),
            _ => None,
        }
    }
}

/* ---- Get ---- */

#[derive(Debug, Clone, Default)]
pub struct GetTemplateGroupAccessControlEntry {
    pub template_arn: Option<String>,
    pub group_security_identifier: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetTemplateGroupAccessControlEntryOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_control_entry: Option<AccessControlEntry>,
}

impl Shape for GetTemplateGroupAccessControlEntryOutput {
    fn primary(&self) -> Option<serde_json::Value> {
        project(&self.access_control_entry)
    }
}

impl Operation for GetTemplateGroupAccessControlEntry {
    type Output = GetTemplateGroupAccessControlEntryOutput;
    const NAME: &'static str = "GetTemplateGroupAccessControlEntry";
    const PARAMETERS: &'static [&'static str] = &["TemplateArn", "GroupSecurityIdentifier"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let group_security_identifier =
            required(&self.group_security_identifier, "GroupSecurityIdentifier")?;
        let template_arn = required(&self.template_arn, "TemplateArn")?;
        Ok(HttpRequest::new(
            Method::GET,
            entry_path(template_arn, group_security_identifier),
        ))
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "TemplateArn" => echo(&self.template_arn),
            "GroupSecurityIdentifier" => echo(&self.group_security_identifier),
            _ => None,
        }
    }
}

/* ---- List ---- */

#[derive(Debug, Clone, Default)]
pub struct ListTemplateGroupAccessControlEntries {
    pub template_arn: Option<String>,
    pub max_results: Option<u32>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTemplateGroupAccessControlEntriesOutput {
    #[serde(default)]
    pub access_control_entries: Vec<AccessControlEntrySummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl Shape for ListTemplateGroupAccessControlEntriesOutput {
    fn primary(&self) -> Option<serde_json::Value> {
        project(&self.access_control_entries)
    }

    fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }
}

impl Operation for ListTemplateGroupAccessControlEntries {
    type Output = ListTemplateGroupAccessControlEntriesOutput;
    const NAME: &'static str = "ListTemplateGroupAccessControlEntries";
    const PARAMETERS: &'static [&'static str] = &["TemplateArn", "MaxResults", "NextToken"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let template_arn = required(&self.template_arn, "TemplateArn")?;
        Ok(HttpRequest::new(Method::GET, entries_path(template_arn))
            .query("MaxResults", self.max_results)
            .query("NextToken", self.next_token.as_deref()))
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "TemplateArn" => echo(&self.template_arn),
            "MaxResults" => echo(&self.max_results),
            "NextToken" => echo(&self.next_token),
            _ => None,
        }
    }
}

/* ---- Update ---- */

#[derive(Debug, Clone, Default)]
pub struct UpdateTemplateGroupAccessControlEntry {
    pub template_arn: Option<String>,
    pub group_security_identifier: Option<String>,
    pub group_display_name: Option<String>,
    pub enroll: Option<AccessRight>,
    pub auto_enroll: Option<AccessRight>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct UpdateEntryBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    access_rights: Option<AccessRights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_display_name: Option<&'a str>,
}

impl Operation for UpdateTemplateGroupAccessControlEntry {
    type Output = Empty;
    const NAME: &'static str = "UpdateTemplateGroupAccessControlEntry";
    const PARAMETERS: &'static [&'static str] = &[
        "TemplateArn",
        "GroupSecurityIdentifier",
        "GroupDisplayName",
        "AccessRights.Enroll",
        "AccessRights.AutoEnroll",
    ];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let group_security_identifier =
            required(&self.group_security_identifier, "GroupSecurityIdentifier")?;
        let template_arn = required(&self.template_arn, "TemplateArn")?;
        HttpRequest::new(
            Method::PATCH,
            entry_path(template_arn, group_security_identifier),
        )
        .json(&UpdateEntryBody {
            access_rights: collapse(AccessRights {
                auto_enroll: self.auto_enroll,
                enroll: self.enroll,
            }),
            group_display_name: self.group_display_name.as_deref(),
        })
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "TemplateArn" => echo(&self.template_arn),
            "GroupSecurityIdentifier" => echo(&self.group_security_identifier),
            "GroupDisplayName" => echo(&self.group_display_name),
            "AccessRights.Enroll" => echo(&self.enroll),
            "AccessRights.AutoEnroll" => echo(&self.auto_enroll),
            _ => None,
        }
    }
}

/* ---- Delete ---- */

#[derive(Debug, Clone, Default)]
pub struct DeleteTemplateGroupAccessControlEntry {
    pub template_arn: Option<String>,
    pub group_security_identifier: Option<String>,
}

impl Operation for DeleteTemplateGroupAccessControlEntry {
    type Output = Empty;
    const NAME: &'static str = "DeleteTemplateGroupAccessControlEntry";
    const PARAMETERS: &'static [&'static str] = &["TemplateArn", "GroupSecurityIdentifier"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let group_security_identifier =
            required(&self.group_security_identifier, "GroupSecurityIdentifier")?;
        let template_arn = required(&self.template_arn, "TemplateArn")?;
        Ok(HttpRequest::new(
            Method::DELETE,
            entry_path(template_arn, group_security_identifier),
        ))
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "TemplateArn" => echo(&self.template_arn),
            "GroupSecurityIdentifier" => echo(&self.group_security_identifier),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use serde_json::json;

    const SID: &str = "S-1-5-21-1111111111-2222222222-3333333333-1001";

    #[test]
    fn update_with_only_enroll() {
        let req = UpdateTemplateGroupAccessControlEntry {
            template_arn: Some("tmpl".into()),
            group_security_identifier: Some(SID.into()),
            enroll: Some(AccessRight::Allow),
            ..Default::default()
        }
        .to_request()
        .unwrap();
        assert_eq!(req.method, Method::PATCH);
        assert_eq!(req.path, format!("/templates/tmpl/accessControlEntries/{SID}"));
        assert_eq!(
            req.body.unwrap(),
            json!({ "AccessRights": { "Enroll": "ALLOW" } })
        );
    }

    #[test]
    fn update_without_rights_omits_access_rights() {
        let req = UpdateTemplateGroupAccessControlEntry {
            template_arn: Some("tmpl".into()),
            group_security_identifier: Some(SID.into()),
            group_display_name: Some("Web Servers".into()),
            ..Default::default()
        }
        .to_request()
        .unwrap();
        assert_eq!(req.body.unwrap(), json!({ "GroupDisplayName": "Web Servers" }));
    }

    #[test]
    fn create_requires_access_rights() {
        let err = CreateTemplateGroupAccessControlEntry {
            template_arn: Some("tmpl".into()),
            group_security_identifier: Some(SID.into()),
            group_display_name: Some("Web Servers".into()),
            ..Default::default()
        }
        .to_request()
        .unwrap_err();
        assert!(matches!(err, ApiError::MissingParameter("AccessRights")));
    }

    #[test]
    fn create_full_body() {
        let req = CreateTemplateGroupAccessControlEntry {
            template_arn: Some("tmpl".into()),
            group_security_identifier: Some(SID.into()),
            group_display_name: Some("Web Servers".into()),
            enroll: Some(AccessRight::Allow),
            auto_enroll: Some(AccessRight::Deny),
            client_token: Some("ct".into()),
        }
        .to_request()
        .unwrap();
        assert_eq!(req.path, "/templates/tmpl/accessControlEntries");
        assert_eq!(
            req.body.unwrap(),
            json!({
                "AccessRights": { "AutoEnroll": "DENY", "Enroll": "ALLOW" },
                "ClientToken": "ct",
                "GroupDisplayName": "Web Servers",
                "GroupSecurityIdentifier": SID
            })
        );
    }

    #[test]
    fn echo_dotted_parameter() {
        let op = UpdateTemplateGroupAccessControlEntry {
            auto_enroll: Some(AccessRight::Deny),
            ..Default::default()
        };
        assert_eq!(op.parameter("AccessRights.AutoEnroll"), Some(json!("DENY")));
        assert_eq!(op.parameter("AccessRights.Enroll"), None);
    }
}
