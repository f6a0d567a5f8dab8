use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod api;
mod cmd;
mod config;
mod utils;

use api::ApiError;
use cmd::format::{Role, StyleOptions, color};
use cmd::{
    AccessControlEntryCommand, ConnectorCommand, DirectoryRegistrationCommand,
    ServicePrincipalNameCommand, Session, TagCommand, TemplateCommand,
};
use config::Overrides;

/// pcaad - Private CA Connector for Active Directory client
///
/// Layout:
///   pcaad [GLOBAL] <group> <verb> [FLAGS]
///
/// Groups:
///   connector, directory-registration, service-principal-name,
///   template, access-control-entry, tag
///
/// Global flags / env:
///   -v / -vv          Increase verbosity (RUST_LOG overrides)
///   -q / --quiet      Errors only
///   --endpoint-url    Service endpoint (or PCAAD_ENDPOINT_URL)
///   --region          Region (or AWS_REGION / AWS_DEFAULT_REGION)
///   --config          YAML config file (or PCAAD_CONFIG)
///   -H / --header     Extra request header KEY=VALUE (repeatable)
///   --json            Print JSON instead of tables
///
/// Examples:
///   pcaad connector list --max-results 10
///   pcaad template create --connector-arn ARN --name Web \
///       --v4-hash-algorithm sha256 --v4-validity-period 1 --v4-validity-period-type years
///   pcaad template create --connector-arn ARN --name Web --definition-file web.yaml
///   pcaad access-control-entry create --template-arn ARN \
///       --group-security-identifier S-1-5-21-... --group-display-name Admins --enroll allow
///   pcaad tag remove --resource-arn ARN --tag-keys team,env --force
///
/// Exit codes:
///   0 ok, 1 general, 2 auth, 3 connectivity, 4 validation / 4xx, 5 5xx, 130 interrupted
#[derive(Parser, Debug)]
#[command(
    name = "pcaad",
    version,
    author,
    about = "pcaad - command-line client for the Private CA Connector for Active Directory",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Service endpoint URL
    #[arg(long, global = true, value_name = "URL")]
    endpoint_url: Option<String>,

    /// Region used for the default endpoint and for signing
    #[arg(long, global = true, value_name = "REGION")]
    region: Option<String>,

    /// YAML config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Extra request header(s) (repeatable KEY=VALUE)
    #[arg(short = 'H', long = "header", global = true, value_name = "KEY=VALUE")]
    headers: Vec<String>,

    /// Output JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connectors between a CA and a directory
    #[command(subcommand)]
    Connector(ConnectorCommand),

    /// Directories registered with the service
    #[command(subcommand)]
    DirectoryRegistration(DirectoryRegistrationCommand),

    /// Service principal names of connectors
    #[command(subcommand)]
    ServicePrincipalName(ServicePrincipalNameCommand),

    /// Certificate templates
    #[command(subcommand)]
    Template(TemplateCommand),

    /// Group permissions on templates
    #[command(subcommand)]
    AccessControlEntry(AccessControlEntryCommand),

    /// Resource tags
    #[command(subcommand)]
    Tag(TagCommand),
}

fn main() {
    let cli = Cli::parse();

    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    if let Err(err) = execute(cli) {
        let prefix = color(Role::Error, "error:", &StyleOptions::detect());
        match err.downcast_ref::<ApiError>() {
            Some(api) => eprintln!("{prefix} {api}"),
            None => eprintln!("{prefix} {err:#}"),
        }
        std::process::exit(exit_code(&err));
    }
}

fn execute(cli: Cli) -> Result<()> {
    let session = Session {
        overrides: Overrides {
            endpoint_url: cli.endpoint_url,
            region: cli.region,
            config: cli.config,
            headers: cli.headers,
        },
        json: cli.json,
    };

    match cli.command {
        Commands::Connector(c) => cmd::execute_connector(c, &session),
        Commands::DirectoryRegistration(c) => cmd::execute_directory_registration(c, &session),
        Commands::ServicePrincipalName(c) => cmd::execute_service_principal_name(c, &session),
        Commands::Template(c) => cmd::execute_template(c, &session),
        Commands::AccessControlEntry(c) => cmd::execute_access_control_entry(c, &session),
        Commands::Tag(c) => cmd::execute_tag(c, &session),
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ApiError>()
        .map(ApiError::exit_code)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn globals_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pcaad",
            "connector",
            "list",
            "--json",
            "--region",
            "eu-west-1",
            "-H",
            "x-a=1",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.region.as_deref(), Some("eu-west-1"));
        assert_eq!(cli.headers, ["x-a=1"]);
    }

    #[test]
    fn missing_parameter_wins_over_missing_configuration() {
        let cli = Cli::try_parse_from([
            "pcaad",
            "--config",
            "/nonexistent/pcaad/config.yaml",
            "connector",
            "delete",
            "--force",
        ])
        .unwrap();
        let err = execute(cli).unwrap_err();
        assert_eq!(err.to_string(), "missing required parameter: ConnectorArn");
        assert_eq!(exit_code(&err), 4);
    }

    #[test]
    fn exit_code_falls_back_to_general() {
        assert_eq!(exit_code(&anyhow::anyhow!("boom")), 1);
        assert_eq!(exit_code(&ApiError::MissingParameter("X").into()), 4);
    }
}
