//! `pcaad service-principal-name <create|get|list|delete>`
//!
//! An SPN is addressed by the pair (directory registration, connector).

use anyhow::Result;
use clap::{Args, Subcommand};

use super::shared::{ConfirmArgs, OutputArgs, PageArgs, Prompt, Session, run};
use crate::api::service_principal_name::{
    CreateServicePrincipalName, DeleteServicePrincipalName, GetServicePrincipalName,
    ListServicePrincipalNames,
};

#[derive(Subcommand, Debug)]
pub enum ServicePrincipalNameCommand {
    /// Create the SPN a connector uses in a registered directory
    Create(CreateArgs),
    /// Describe one SPN
    Get(PairArgs),
    /// List SPNs of a directory registration (one page)
    List(ListArgs),
    /// Delete an SPN
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct Pair {
    /// Connector ARN
    #[arg(long, value_name = "ARN")]
    pub connector_arn: Option<String>,

    /// Directory registration ARN
    #[arg(long, value_name = "ARN")]
    pub directory_registration_arn: Option<String>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub pair: Pair,

    /// Idempotency token
    #[arg(long, value_name = "TOKEN")]
    pub client_token: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct PairArgs {
    #[command(flatten)]
    pub pair: Pair,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Directory registration ARN
    #[arg(long, value_name = "ARN")]
    pub directory_registration_arn: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub pair: Pair,

    #[command(flatten)]
    pub confirm: ConfirmArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn execute_service_principal_name(
    command: ServicePrincipalNameCommand,
    session: &Session,
) -> Result<()> {
    match command {
        ServicePrincipalNameCommand::Create(args) => {
            let op = CreateServicePrincipalName {
                connector_arn: args.pair.connector_arn,
                directory_registration_arn: args.pair.directory_registration_arn,
                client_token: args.client_token,
            };
            run(session, &op, &args.output, None)
        }
        ServicePrincipalNameCommand::Get(args) => {
            let op = GetServicePrincipalName {
                connector_arn: args.pair.connector_arn,
                directory_registration_arn: args.pair.directory_registration_arn,
            };
            run(session, &op, &args.output, None)
        }
        ServicePrincipalNameCommand::List(args) => {
            let op = ListServicePrincipalNames {
                directory_registration_arn: args.directory_registration_arn,
                max_results: args.page.max_results,
                next_token: args.page.next_token,
            };
            run(session, &op, &args.output, None)
        }
        ServicePrincipalNameCommand::Delete(args) => {
            let op = DeleteServicePrincipalName {
                connector_arn: args.pair.connector_arn.clone(),
                directory_registration_arn: args.pair.directory_registration_arn.clone(),
            };
            let prompt = Prompt {
                message: format!(
                    "Delete the SPN of connector {} in {}?",
                    args.pair.connector_arn.as_deref().unwrap_or_default(),
                    args.pair.directory_registration_arn.as_deref().unwrap_or_default()
                ),
                confirm: &args.confirm,
            };
            run(session, &op, &args.output, Some(prompt))
        }
    }
}
