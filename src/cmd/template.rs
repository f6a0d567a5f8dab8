/*!
`pcaad template <create|get|list|update|delete>`

Create and update take a definition either from `--definition-file` or from
the flat `--v2-*`/`--v3-*`/`--v4-*` flags (see `definition.rs`).
*/

use anyhow::Result;
use clap::{Args, Subcommand};

use super::definition::DefinitionArgs;
use super::shared::{ConfirmArgs, OutputArgs, PageArgs, Prompt, Session, parse_tags, run};
use crate::api::template::{
    CreateTemplate, DeleteTemplate, GetTemplate, ListTemplates, UpdateTemplate,
};

#[derive(Subcommand, Debug)]
pub enum TemplateCommand {
    /// Create a template under a connector
    Create(Box<CreateArgs>),
    /// Describe one template
    Get(ArnArgs),
    /// List templates of a connector (one page)
    List(ListArgs),
    /// Update a template definition
    Update(Box<UpdateArgs>),
    /// Delete a template
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Connector ARN
    #[arg(long, value_name = "ARN")]
    pub connector_arn: Option<String>,

    /// Template name
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    #[command(flatten)]
    pub definition: DefinitionArgs,

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
    /// Template ARN
    #[arg(long, value_name = "ARN")]
    pub template_arn: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Connector ARN
    #[arg(long, value_name = "ARN")]
    pub connector_arn: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Template ARN
    #[arg(long, value_name = "ARN")]
    pub template_arn: Option<String>,

    #[command(flatten)]
    pub definition: DefinitionArgs,

    /// Ask every current holder to re-enroll
    #[arg(long, value_name = "BOOL")]
    pub reenroll_all_certificate_holders: Option<bool>,

    #[command(flatten)]
    pub confirm: ConfirmArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Template ARN
    #[arg(long, value_name = "ARN")]
    pub template_arn: Option<String>,

    #[command(flatten)]
    pub confirm: ConfirmArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn execute_template(command: TemplateCommand, session: &Session) -> Result<()> {
    match command {
        TemplateCommand::Create(args) => {
            let op = CreateTemplate {
                connector_arn: args.connector_arn,
                name: args.name,
                definition: args.definition.build()?,
                client_token: args.client_token,
                tags: parse_tags(&args.tags)?,
            };
            run(session, &op, &args.output, None)
        }
        TemplateCommand::Get(args) => {
            let op = GetTemplate {
                template_arn: args.template_arn,
            };
            run(session, &op, &args.output, None)
        }
        TemplateCommand::List(args) => {
            let op = ListTemplates {
                connector_arn: args.connector_arn,
                max_results: args.page.max_results,
                next_token: args.page.next_token,
            };
            run(session, &op, &args.output, None)
        }
        TemplateCommand::Update(args) => {
            let op = UpdateTemplate {
                template_arn: args.template_arn.clone(),
                definition: args.definition.build()?,
                reenroll_all_certificate_holders: args.reenroll_all_certificate_holders,
            };
            let prompt = Prompt {
                message: format!(
                    "Update template {}?",
                    args.template_arn.as_deref().unwrap_or_default()
                ),
                confirm: &args.confirm,
            };
            run(session, &op, &args.output, Some(prompt))
        }
        TemplateCommand::Delete(args) => {
            let op = DeleteTemplate {
                template_arn: args.template_arn.clone(),
            };
            let prompt = Prompt {
                message: format!(
                    "Delete template {}?",
                    args.template_arn.as_deref().unwrap_or_default()
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
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Harness {
        #[command(subcommand)]
        command: TemplateCommand,
    }

    fn execute(argv: &[&str]) -> Result<()> {
        let argv = std::iter::once("pcaad").chain(argv.iter().copied());
        let cli = Harness::try_parse_from(argv).unwrap();
        execute_template(cli.command, &offline_session())
    }

    #[test]
    fn create_without_definition_is_missing() {
        let err = execute(&["create", "--connector-arn", "arn:c", "--name", "t"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::MissingParameter("Definition"))
        ));
    }

    #[test]
    fn create_with_mixed_versions_is_invalid() {
        let err = execute(&[
            "create",
            "--connector-arn",
            "arn:c",
            "--name",
            "t",
            "--v2-auto-enrollment",
            "true",
            "--v4-auto-enrollment",
            "true",
        ])
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::InvalidParameter { name: "Definition", .. })
        ));
    }

    #[test]
    fn forced_update_reaches_transport() {
        let err = execute(&[
            "update",
            "--template-arn",
            "arn:t",
            "--reenroll-all-certificate-holders",
            "true",
            "--force",
        ])
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Connectivity { .. })
        ));
    }
}
