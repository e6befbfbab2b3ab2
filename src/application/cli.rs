#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;
use std::process;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use yansi::Paint;

use crate::configuration::Resolution;
use crate::configuration::Settings;
use crate::configuration::DEFAULT_CONFIG_FILE;
use crate::domain::services::actions::help_text;
use crate::domain::services::Dispatcher;
use crate::domain::services::Session;
use crate::infrastructure::transport::HttpTransport;

const ARG_CONFIG_FILE: &str = "config-file";

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    process::exit(0);
}

fn print_warnings(resolution: &Resolution) {
    for warning in resolution.warnings.iter() {
        eprintln!("{}", Paint::yellow(format!("warning: {warning}")));
    }
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout."),
        )
        .subcommand(
            Command::new("path").about("Returns the path of the configuration file in use."),
        )
        .subcommand(Command::new("show").about(
            "Outputs the settings after applying the config file and environment, with the API key masked.",
        ));
}

fn subcommand_ask() -> Command {
    return Command::new("ask")
        .about("Sends a single message to the agent and prints the reply.")
        .arg(
            Arg::new("prompt")
                .short('p')
                .long("prompt")
                .help("Message to send.")
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new("attach")
                .short('a')
                .long("attach")
                .help("File to send along with the message. Can be repeated.")
                .action(ArgAction::Append)
                .num_args(1),
        );
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("HOTKEYS:") {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("agent-portal")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Start the chat console. This is the default."))
        .subcommand(subcommand_ask())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .arg(
            Arg::new(ARG_CONFIG_FILE)
                .short('c')
                .long(ARG_CONFIG_FILE)
                .env("AGENT_PORTAL_CONFIG_FILE")
                .num_args(1)
                .default_value(DEFAULT_CONFIG_FILE)
                .help("Path to the JSON configuration file.")
                .global(true),
        );
}

fn config_path(matches: &ArgMatches) -> path::PathBuf {
    let config_file = matches
        .get_one::<String>(ARG_CONFIG_FILE)
        .map(|e| return e.to_string())
        .unwrap_or_else(|| return DEFAULT_CONFIG_FILE.to_string());

    return path::PathBuf::from(config_file);
}

/// Runs one turn outside the console. Returns the reply text, or an error
/// carrying the error-flagged reply.
pub async fn ask(resolution: Resolution, prompt: &str, attachments: &[String]) -> Result<String> {
    let mut session = Session::new(resolution.settings);
    for attachment in attachments.iter() {
        session.attach_path(path::Path::new(attachment)).await?;
    }

    let dispatcher = Dispatcher::new(Box::<HttpTransport>::default());
    let reply = session.run_turn(prompt, &dispatcher).await?;
    if reply.is_error() {
        bail!(reply.content);
    }

    return Ok(reply.content);
}

/// Parses the command line. Returns the resolved settings when the chat
/// console should start, and `None` when the command already ran.
pub async fn parse() -> Result<Option<Resolution>> {
    let matches = build().get_matches();
    let config_file = config_path(&matches);

    match matches.subcommand() {
        Some(("ask", subcmd_matches)) => {
            let resolution = Settings::resolve(&config_file).await;
            print_warnings(&resolution);

            let prompt = subcmd_matches
                .get_one::<String>("prompt")
                .map(|e| return e.to_string())
                .unwrap_or_default();
            let attachments: Vec<String> = subcmd_matches
                .get_many::<String>("attach")
                .map(|values| return values.map(|e| return e.to_string()).collect())
                .unwrap_or_else(Vec::new);

            match ask(resolution, &prompt, &attachments).await {
                Ok(content) => println!("{content}"),
                Err(err) => {
                    eprintln!("{}", Paint::red(err.to_string()));
                    process::exit(1);
                }
            }
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("default", _)) => {
                println!("{}", Settings::serialize_default()?);
            }
            Some(("path", _)) => {
                println!("{}", config_file.to_string_lossy());
            }
            Some(("show", _)) => {
                let resolution = Settings::resolve(&config_file).await;
                print_warnings(&resolution);
                println!("{}", resolution.settings.redacted().to_pretty_json()?);
            }
            _ => {
                subcommand_config().print_long_help()?;
            }
        },
        _ => {
            return Ok(Some(Settings::resolve(&config_file).await));
        }
    }

    return Ok(None);
}
