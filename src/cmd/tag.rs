//! `pcaad tag <list|add|remove>` for any taggable resource ARN.

use anyhow::Result;
use clap::{Args, Subcommand};

use super::shared::{ConfirmArgs, OutputArgs, Prompt, Session, parse_tags, run};
use crate::api::tags::{ListTagsForResource, TagResource, UntagResource};

#[derive(Subcommand, Debug)]
pub enum TagCommand {
    /// Show the tags of a resource
    List(ListArgs),
    /// Add or overwrite tags
    Add(AddArgs),
    /// Remove tags by key
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Resource ARN
    #[arg(long, value_name = "ARN")]
    pub resource_arn: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Resource ARN
    #[arg(long, value_name = "ARN")]
    pub resource_arn: Option<String>,

    /// Tag to set (repeatable KEY=VALUE)
    #[arg(long = "tag", value_name = "KEY=VALUE")]
    pub tags: Vec<String>,

    #[command(flatten)]
    pub confirm: ConfirmArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Resource ARN
    #[arg(long, value_name = "ARN")]
    pub resource_arn: Option<String>,

    /// Tag key to remove (repeatable or comma separated)
    #[arg(long, value_name = "KEY", value_delimiter = ',')]
    pub tag_keys: Vec<String>,

    #[command(flatten)]
    pub confirm: ConfirmArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn execute_tag(command: TagCommand, session: &Session) -> Result<()> {
    match command {
        TagCommand::List(args) => {
            let op = ListTagsForResource {
                resource_arn: args.resource_arn,
            };
            run(session, &op, &args.output, None)
        }
        TagCommand::Add(args) => {
            let op = TagResource {
                resource_arn: args.resource_arn.clone(),
                tags: parse_tags(&args.tags)?,
            };
            let keys = op.tags.keys().cloned().collect::<Vec<_>>().join(", ");
            let prompt = Prompt {
                message: format!(
                    "Set tags [{keys}] on {}?",
                    args.resource_arn.as_deref().unwrap_or_default()
                ),
                confirm: &args.confirm,
            };
            run(session, &op, &args.output, Some(prompt))
        }
        TagCommand::Remove(args) => {
            let op = UntagResource {
                resource_arn: args.resource_arn.clone(),
                tag_keys: args.tag_keys.clone(),
            };
            let prompt = Prompt {
                message: format!(
                    "Remove tags [{}] from {}?",
                    args.tag_keys.join(", "),
                    args.resource_arn.as_deref().unwrap_or_default()
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
    fn add_without_tags_is_missing() {
        let err = execute_tag(
            TagCommand::Add(AddArgs {
                resource_arn: Some("arn:r".into()),
                tags: Vec::new(),
                confirm: ConfirmArgs::default(),
                output: OutputArgs::default(),
            }),
            &offline_session(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::MissingParameter("Tags"))
        ));
    }

    #[test]
    fn remove_without_keys_is_missing() {
        let err = execute_tag(
            TagCommand::Remove(RemoveArgs {
                resource_arn: Some("arn:r".into()),
                tag_keys: Vec::new(),
                confirm: ConfirmArgs::default(),
                output: OutputArgs::default(),
            }),
            &offline_session(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::MissingParameter("TagKeys"))
        ));
    }
}
