//! `pcaad directory-registration <create|get|list|delete>`

use anyhow::Result;
use clap::{Args, Subcommand};

use super::shared::{ConfirmArgs, OutputArgs, PageArgs, Prompt, Session, parse_tags, run};
use crate::api::directory_registration::{
    CreateDirectoryRegistration, DeleteDirectoryRegistration, GetDirectoryRegistration,
    ListDirectoryRegistrations,
};

#[derive(Subcommand, Debug)]
pub enum DirectoryRegistrationCommand {
    /// Register a directory with the service
    Create(CreateArgs),
    /// Describe one directory registration
    Get(ArnArgs),
    /// List directory registrations (one page)
    List(ListArgs),
    /// Delete a directory registration
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Directory Service directory id
    #[arg(long, value_name = "ID")]
    pub directory_id: Option<String>,

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
    /// Directory registration ARN
    #[arg(long, value_name = "ARN")]
    pub directory_registration_arn: Option<String>,

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
    /// Directory registration ARN
    #[arg(long, value_name = "ARN")]
    pub directory_registration_arn: Option<String>,

    #[command(flatten)]
    pub confirm: ConfirmArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn execute_directory_registration(
    command: DirectoryRegistrationCommand,
    session: &Session,
) -> Result<()> {
    match command {
        DirectoryRegistrationCommand::Create(args) => {
            let op = CreateDirectoryRegistration {
                directory_id: args.directory_id,
                client_token: args.client_token,
                tags: parse_tags(&args.tags)?,
            };
            run(session, &op, &args.output, None)
        }
        DirectoryRegistrationCommand::Get(args) => {
            let op = GetDirectoryRegistration {
                directory_registration_arn: args.directory_registration_arn,
            };
            run(session, &op, &args.output, None)
        }
        DirectoryRegistrationCommand::List(args) => {
            let op = ListDirectoryRegistrations {
                max_results: args.page.max_results,
                next_token: args.page.next_token,
            };
            run(session, &op, &args.output, None)
        }
        DirectoryRegistrationCommand::Delete(args) => {
            let op = DeleteDirectoryRegistration {
                directory_registration_arn: args.directory_registration_arn.clone(),
            };
            let prompt = Prompt {
                message: format!(
                    "Delete directory registration {}?",
                    args.directory_registration_arn.as_deref().unwrap_or_default()
                ),
                confirm: &args.confirm,
            };
            run(session, &op, &args.output, Some(prompt))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::cmd::shared::tests::offline_session;

    #[test]
    fn blank_directory_id_is_missing() {
        let err = execute_directory_registration(
            DirectoryRegistrationCommand::Create(CreateArgs {
                directory_id: Some("  ".into()),
                client_token: None,
                tags: Vec::new(),
                output: OutputArgs::default(),
            }),
            &offline_session(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::MissingParameter("DirectoryId"))
        ));
    }

    #[test]
    fn forced_delete_dispatches() {
        let err = execute_directory_registration(
            DirectoryRegistrationCommand::Delete(DeleteArgs {
                directory_registration_arn: Some("arn:reg".into()),
                confirm: ConfirmArgs { force: true },
                output: OutputArgs::default(),
            }),
            &offline_session(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Connectivity { .. })
        ));
    }
}
