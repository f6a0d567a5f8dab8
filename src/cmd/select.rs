/*!
Output selection for `--select`.

Forms:
  primary   (default) the operation's primary response field
  *         the whole response
  ^Name     echo the input parameter `Name` (case-insensitive)

A selection is parsed and checked against the operation before anything is
sent, so a bad `--select` never reaches the service.
*/

use serde::Serialize;

use crate::api::{ApiError, ApiResult, Operation, Shape};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Select {
    Primary,
    WholeResponse,
    EchoInput(String),
}

impl Select {
    pub fn parse(raw: Option<&str>) -> ApiResult<Self> {
        let Some(raw) = raw.map(str::trim) else {
            return Ok(Select::Primary);
        };
        match raw {
            "" => Ok(Select::Primary),
            "*" => Ok(Select::WholeResponse),
            s if s.eq_ignore_ascii_case("primary") => Ok(Select::Primary),
            s => match s.strip_prefix('^').map(str::trim) {
                Some(name) if !name.is_empty() => Ok(Select::EchoInput(name.to_string())),
                _ => Err(ApiError::InvalidSelect(raw.to_string())),
            },
        }
    }
}

/// A [`Select`] bound to one operation call.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Primary,
    WholeResponse,
    /// Input value captured before dispatch (`None` when the input was unset).
    Echo(Option<serde_json::Value>),
}

impl Selection {
    pub fn resolve<O: Operation>(op: &O, raw: Option<&str>) -> ApiResult<Self> {
        match Select::parse(raw)? {
            Select::Primary => Ok(Selection::Primary),
            Select::WholeResponse => Ok(Selection::WholeResponse),
            Select::EchoInput(name) => {
                let canonical = O::PARAMETERS
                    .iter()
                    .find(|p| p.eq_ignore_ascii_case(&name))
                    .ok_or_else(|| ApiError::InvalidSelect(format!("^{name}")))?;
                Ok(Selection::Echo(op.parameter(canonical)))
            }
        }
    }

    pub fn project<S: Serialize + Shape>(&self, output: &S) -> Option<serde_json::Value> {
        match self {
            Selection::Primary => output.primary(),
            Selection::WholeResponse => serde_json::to_value(output).ok(),
            Selection::Echo(value) => value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::connector::{CreateConnector, CreateConnectorOutput, GetConnector};
    use crate::api::model::IpAddressType;
    use serde_json::json;

    #[test]
    fn parse_forms() {
        assert_eq!(Select::parse(None).unwrap(), Select::Primary);
        assert_eq!(Select::parse(Some("PRIMARY")).unwrap(), Select::Primary);
        assert_eq!(Select::parse(Some("*")).unwrap(), Select::WholeResponse);
        assert_eq!(
            Select::parse(Some("^ConnectorArn")).unwrap(),
            Select::EchoInput("ConnectorArn".into())
        );
        assert!(matches!(Select::parse(Some("^")), Err(ApiError::InvalidSelect(_))));
        assert!(matches!(
            Select::parse(Some("Connector.Arn")),
            Err(ApiError::InvalidSelect(_))
        ));
    }

    #[test]
    fn echo_of_unknown_parameter_fails_before_dispatch() {
        let op = GetConnector {
            connector_arn: Some("arn".into()),
        };
        let err = Selection::resolve(&op, Some("^DirectoryId")).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn echo_is_case_insensitive_and_ignores_response() {
        let op = CreateConnector {
            ip_address_type: Some(IpAddressType::Dualstack),
            ..Default::default()
        };
        let selection = Selection::resolve(&op, Some("^ipaddresstype")).unwrap();
        let output = CreateConnectorOutput {
            connector_arn: Some("arn".into()),
        };
        assert_eq!(selection.project(&output), Some(json!("DUALSTACK")));
    }

    #[test]
    fn primary_and_whole() {
        let output = CreateConnectorOutput {
            connector_arn: Some("arn".into()),
        };
        let op = CreateConnector::default();
        assert_eq!(
            Selection::resolve(&op, None).unwrap().project(&output),
            Some(json!("arn"))
        );
        assert_eq!(
            Selection::resolve(&op, Some("*")).unwrap().project(&output),
            Some(json!({ "ConnectorArn": "arn" }))
        );
    }
}
