/*!
`pcaad connector <create|get|list|delete>`

A connector links a Private CA certificate authority to a directory. Create
takes the VPC security groups the connector's endpoint lives in.
*/

use anyhow::Result;
use clap::{Args, Subcommand};

use super::shared::{ConfirmArgs, OutputArgs, PageArgs, Prompt, Session, parse_tags, run};
use crate::api::connector::{CreateConnector, DeleteConnector, GetConnector, ListConnectors};
use crate::api::model::{IpAddressType, parse_wire};

#[derive(Subcommand, Debug)]
pub enum ConnectorCommand {
    /// Create a connector
    Create(CreateArgs),
    /// Describe one connector
    Get(ArnArgs),
    /// List connectors (one page)
    List(ListArgs),
    /// Delete a connector
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// ARN of the Private CA certificate authority
    #[arg(long, value_name = "ARN")]
    pub certificate_authority_arn: Option<String>,

    /// Directory Service directory id
    #[arg(long, value_name = "ID")]
    pub directory_id: Option<String>,

    /// VPC security group ids (repeatable or comma separated)
    #[arg(long, value_name = "ID", value_delimiter = ',')]
    pub security_group_ids: Vec<String>,

    /// Endpoint address family (ipv4, dualstack)
    #[arg(long, value_name = "TYPE", value_parser = parse_wire::<IpAddressType>)]
    pub ip_address_type: Option<IpAddressType>,

    /// Idempotency token
    #[arg(long, value_name = "TOKEN")]
    pub client_token: Option<String>,

    /// Tag to attach (repeatable KEY=VALUE)
    #[arg(long = "tag", value_name = "KEY=VALUE")]
    pub tags: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct ArnArgs {
    /// Connector ARN
    #[arg(long, value_name = "ARN")]
    pub connector_arn: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub page: PageArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Connector ARN
    #[arg(long, value_name = "ARN")]
    pub connector_arn: Option<String>,

    #[command(flatten)]
    pub confirm: ConfirmArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn execute_connector(command: ConnectorCommand, session: &Session) -> Result<()> {
    match command {
        ConnectorCommand::Create(args) => {
            let op = CreateConnector {
                certificate_authority_arn: args.certificate_authority_arn,
                directory_id: args.directory_id,
                security_group_ids: args.security_group_ids,
                ip_address_type: args.ip_address_type,
                client_token: args.client_token,
                tags: parse_tags(&args.tags)?,
            };
            run(session, &op, &args.output, None)
        }
        ConnectorCommand::Get(args) => {
            let op = GetConnector {
                connector_arn: args.connector_arn,
            };
            run(session, &op, &args.output, None)
        }
        ConnectorCommand::List(args) => {
            let op = ListConnectors {
                max_results: args.page.max_results,
                next_token: args.page.next_token,
            };
            run(session, &op, &args.output, None)
        }
        ConnectorCommand::Delete(args) => {
            let prompt = Prompt {
                message: format!(
                    "Delete connector {}?",
                    args.connector_arn.as_deref().unwrap_or_default()
                ),
                confirm: &args.confirm,
            };
            let op = DeleteConnector {
                connector_arn: args.connector_arn.clone(),
            };
            run(session, &op, &args.output, Some(prompt))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Harness {
        #[command(subcommand)]
        command: ConnectorCommand,
    }

    #[test]
    fn security_groups_accept_both_forms() {
        let cli = Harness::try_parse_from([
            "pcaad",
            "create",
            "--security-group-ids",
            "sg-1,sg-2",
            "--security-group-ids",
            "sg-3",
            "--ip-address-type",
            "dualstack",
        ])
        .unwrap();
        let ConnectorCommand::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.security_group_ids, ["sg-1", "sg-2", "sg-3"]);
        assert_eq!(args.ip_address_type, Some(IpAddressType::Dualstack));
    }

    #[test]
    fn unknown_ip_address_type_is_a_usage_error() {
        assert!(
            Harness::try_parse_from(["pcaad", "create", "--ip-address-type", "ipv6"]).is_err()
        );
    }

    #[test]
    fn missing_arn_fails_before_prompt() {
        let session = crate::cmd::shared::tests::offline_session();
        let err = execute_connector(
            ConnectorCommand::Delete(DeleteArgs {
                connector_arn: None,
                confirm: ConfirmArgs::default(),
                output: OutputArgs::default(),
            }),
            &session,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required parameter: ConnectorArn"
        );
    }
}
