//! `pcaad access-control-entry <create|get|list|update|delete>`
//!
//! Group permissions on a template. A group is identified by its security
//! identifier (SID); `--enroll` and `--auto-enroll` take `allow` or `deny`.

use anyhow::Result;
use clap::{Args, Subcommand};

use super::shared::{ConfirmArgs, OutputArgs, PageArgs, Prompt, Session, run};
use crate::api::access_control_entry::{
    CreateTemplateGroupAccessControlEntry, DeleteTemplateGroupAccessControlEntry,
    GetTemplateGroupAccessControlEntry, ListTemplateGroupAccessControlEntries,
    UpdateTemplateGroupAccessControlEntry,
};
use crate::api::model::{AccessRight, parse_wire};

#[derive(Subcommand, Debug)]
pub enum AccessControlEntryCommand {
    /// Grant a group rights on a template
    Create(CreateArgs),
    /// Describe one entry
    Get(EntryArgs),
    /// List entries of a template (one page)
    List(ListArgs),
    /// Change a group's rights or display name
    Update(UpdateArgs),
    /// Remove a group's entry
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct Entry {
    /// Template ARN
    #[arg(long, value_name = "ARN")]
    pub template_arn: Option<String>,

    /// Group security identifier (SID)
    #[arg(long, value_name = "SID")]
    pub group_security_identifier: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct Rights {
    /// Enroll right (allow, deny)
    #[arg(long, value_name = "RIGHT", value_parser = parse_wire::<AccessRight>)]
    pub enroll: Option<AccessRight>,

    /// Autoenroll right (allow, deny)
    #[arg(long, value_name = "RIGHT", value_parser = parse_wire::<AccessRight>)]
    pub auto_enroll: Option<AccessRight>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub entry: Entry,

    /// Group name as shown in the directory
    #[arg(long, value_name = "NAME")]
    pub group_display_name: Option<String>,

    #[command(flatten)]
    pub rights: Rights,

    /// Idempotency token
    #[arg(long, value_name = "TOKEN")]
    pub client_token: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct EntryArgs {
    #[command(flatten)]
    pub entry: Entry,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Template ARN
    #[arg(long, value_name = "ARN")]
    pub template_arn: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub entry: Entry,

    /// Group name as shown in the directory
    #[arg(long, value_name = "NAME")]
    pub group_display_name: Option<String>,

    #[command(flatten)]
    pub rights: Rights,

    #[command(flatten)]
    pub confirm: ConfirmArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub entry: Entry,

    #[command(flatten)]
    pub confirm: ConfirmArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

fn describe(entry: &Entry) -> String {
    format!(
        "group {} on template {}",
        entry.group_security_identifier.as_deref().unwrap_or_default(),
        entry.template_arn.as_deref().unwrap_or_default()
    )
}

pub fn execute_access_control_entry(
    command: AccessControlEntryCommand,
    session: &Session,
) -> Result<()> {
    match command {
        AccessControlEntryCommand::Create(args) => {
            let op = CreateTemplateGroupAccessControlEntry {
                template_arn: args.entry.template_arn,
                group_security_identifier: args.entry.group_security_identifier,
                group_display_name: args.group_display_name,
                enroll: args.rights.enroll,
                auto_enroll: args.rights.auto_enroll,
                client_token: args.client_token,
            };
            run(session, &op, &args.output, None)
        }
        AccessControlEntryCommand::Get(args) => {
            let op = GetTemplateGroupAccessControlEntry {
                template_arn: args.entry.template_arn,
                group_security_identifier: args.entry.group_security_identifier,
            };
            run(session, &op, &args.output, None)
        }
        AccessControlEntryCommand::List(args) => {
            let op = ListTemplateGroupAccessControlEntries {
                template_arn: args.template_arn,
                max_results: args.page.max_results,
                next_token: args.page.next_token,
            };
            run(session, &op, &args.output, None)
        }
        AccessControlEntryCommand::Update(args) => {
            let op = UpdateTemplateGroupAccessControlEntry {
                template_arn: args.entry.template_arn.clone(),
                group_security_identifier: args.entry.group_security_identifier.clone(),
                group_display_name: args.group_display_name,
                enroll: args.rights.enroll,
                auto_enroll: args.rights.auto_enroll,
            };
            let prompt = Prompt {
                message: format!("Update access for {}?", describe(&args.entry)),
                confirm: &args.confirm,
            };
            run(session, &op, &args.output, Some(prompt))
        }
        AccessControlEntryCommand::Delete(args) => {
            let op = DeleteTemplateGroupAccessControlEntry {
                template_arn: args.entry.template_arn.clone(),
                group_security_identifier: args.entry.group_security_identifier.clone(),
            };
            let prompt = Prompt {
                message: format!("Remove access for {}?", describe(&args.entry)),
                confirm: &args.confirm,
            };
            run(session, &op, &args.output, Some(prompt))
        }
    }
}
