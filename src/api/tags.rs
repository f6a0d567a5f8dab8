//! Resource tagging.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use super::model::Tags;
use super::{Empty, HttpRequest, Operation, Shape, echo, echo_list, encode, project, required, required_list};

fn tags_path(resource_arn: &str) -> String {
    format!("/tags/{}", encode(resource_arn))
}

#[derive(Debug, Clone, Default)]
pub struct ListTagsForResource {
    pub resource_arn: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTagsForResourceOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

impl Shape for ListTagsForResourceOutput {
    fn primary(&self) -> Option<serde_json::Value> {
        project(&self.tags)
    }
}

impl Operation for ListTagsForResource {
    type Output = ListTagsForResourceOutput;
    const NAME: &'static str = "ListTagsForResource";
    const PARAMETERS: &'static [&'static str] = &["ResourceArn"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let arn = required(&self.resource_arn, "ResourceArn")?;
        Ok(HttpRequest::new(Method::GET, tags_path(arn)))
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "ResourceArn" => echo(&self.resource_arn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TagResource {
    pub resource_arn: Option<String>,
    pub tags: Tags,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TagResourceBody<'a> {
    tags: &'a Tags,
}

impl Operation for TagResource {
    type Output = Empty;
    const NAME: &'static str = "TagResource";
    const PARAMETERS: &'static [&'static str] = &["ResourceArn", "Tags"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let arn = required(&self.resource_arn, "ResourceArn")?;
        if self.tags.is_empty() {
            return Err(super::ApiError::MissingParameter("Tags"));
        }
        HttpRequest::new(Method::POST, tags_path(arn)).json(&TagResourceBody { tags: &self.tags })
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "ResourceArn" => echo(&self.resource_arn),
            "Tags" => (!self.tags.is_empty()).then(|| serde_json::json!(self.tags)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UntagResource {
    pub resource_arn: Option<String>,
    pub tag_keys: Vec<String>,
}

impl Operation for UntagResource {
    type Output = Empty;
    const NAME: &'static str = "UntagResource";
    const PARAMETERS: &'static [&'static str] = &["ResourceArn", "TagKeys"];

    fn to_request(&self) -> ApiResult<HttpRequest> {
        let arn = required(&self.resource_arn, "ResourceArn")?;
        let keys = required_list(&self.tag_keys, "TagKeys")?;
        Ok(HttpRequest::new(Method::DELETE, tags_path(arn)).query_all("tagKeys", &keys))
    }

    fn parameter(&self, name: &str) -> Option<serde_json::Value> {
        match name {
            "ResourceArn" => echo(&self.resource_arn),
            "TagKeys" => echo_list(&self.tag_keys),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use serde_json::json;

    #[test]
    fn tag_resource_body() {
        let req = TagResource {
            resource_arn: Some("arn:r".into()),
            tags: Tags::from([("team".to_string(), "pki".to_string())]),
        }
        .to_request()
        .unwrap();
        assert_eq!(req.path, "/tags/arn%3Ar");
        assert_eq!(req.body.unwrap(), json!({ "Tags": { "team": "pki" } }));
    }

    #[test]
    fn tag_resource_requires_tags() {
        let err = TagResource {
            resource_arn: Some("arn:r".into()),
            tags: Tags::new(),
        }
        .to_request()
        .unwrap_err();
        assert!(matches!(err, ApiError::MissingParameter("Tags")));
    }

    #[test]
    fn untag_repeats_key_in_query() {
        let req = UntagResource {
            resource_arn: Some("arn:r".into()),
            tag_keys: vec!["a".into(), "b c".into()],
        }
        .to_request()
        .unwrap();
        assert_eq!(req.method, Method::DELETE);
        assert_eq!(req.encoded_query(), "tagKeys=a&tagKeys=b%20c");
        assert!(req.body.is_none());
    }

    #[test]
    fn untag_skips_blank_keys() {
        let req = UntagResource {
            resource_arn: Some("arn:r".into()),
            tag_keys: vec!["env".into(), " ".into()],
        }
        .to_request()
        .unwrap();
        assert_eq!(req.encoded_query(), "tagKeys=env");
    }
}
