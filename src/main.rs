//! cmdtree - runs, explains and completes command lines against the demo
//! command tree.

use std::{error::Error, path::PathBuf, process, sync::Arc};

use clap::{Parser, Subcommand};
use cmdtree::{
    command::{CommandDispatcher, CommandOutput, CommandSender, DispatchOutcome},
    config::{self, Config, ConfigPaths},
    confirm::ConfirmationQueue,
    console::{
        ConsoleSender,
        formatting::{
            format_command, format_description, format_error, format_header, format_prompt,
            format_usage, indent,
        },
        register_demo_commands,
    },
    reader::ReaderRegistry,
    tracing_config,
};
use tracing::{Level, info, span};

#[derive(Parser)]
#[command(name = "cmdtree")]
#[command(about = "Dispatch, explain and complete commands")]
struct Cli {
    /// Configuration file (defaults to the XDG config location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write logs to a daily rolling file
    #[arg(long)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command line as the console
    Exec {
        /// The command line, e.g. `give stone 5 -f`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        line: Vec<String>,

        /// Confirm the action right away if the command asks for it
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the usage of the command a line resolves to
    Usage {
        /// The command line
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        line: Vec<String>,
    },
    /// Print completions for the last token of a line
    Complete {
        /// The command line; end it with an empty argument to complete a new token
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        line: Vec<String>,
    },
    /// List every registered command
    List,
    /// Print the JSON schema of the configuration file
    Schema,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = Config::load(&config_path(cli.config)?)?;

    let _log_guard = tracing_config::init(&config.general, cli.log_file)?;
    let _span = span!(Level::INFO, "cmdtree").entered();

    let dispatcher = build_dispatcher(&config)?;
    info!(commands = dispatcher.tree().len() - 1, "Command tree ready");

    let console = ConsoleSender::new(config.commands.locale());

    match cli.command {
        Commands::Exec { line, yes } => {
            let line = line.join(" ");
            match dispatcher.dispatch(&console, &line) {
                DispatchOutcome::Completed(CommandOutput::Message(message)) => {
                    if !message.trim().is_empty() {
                        println!("{message}");
                    }
                }
                DispatchOutcome::Completed(CommandOutput::Confirmation(action)) => {
                    println!("{}", format_prompt(action.prompt()));
                    let (queue, _expired) = ConfirmationQueue::new(config.confirm.timeout());
                    queue.register(console.name(), action).await?;
                    if yes {
                        if let Some(action) = queue.take_next(console.name()).await? {
                            match action.run() {
                                Ok(output) => println!("{}", output.text()),
                                Err(error) => fail(&error.localize(&console), None),
                            }
                        }
                    } else {
                        let pending = queue.clear(console.name()).await?;
                        println!(
                            "{}",
                            format_description(&format!(
                                "{pending} action(s) left unconfirmed; rerun with --yes"
                            ))
                        );
                    }
                }
                DispatchOutcome::Rejected { message, usage } => fail(&message, usage),
            }
        }
        Commands::Usage { line } => match dispatcher.usage(&console, &line.join(" ")) {
            Some(usage) => println!("{}", format_usage(&usage)),
            None => fail(&format!("Command not found: {}", line.join(" ")), None),
        },
        Commands::Complete { line } => {
            let mut joined = line.join(" ");
            if line.last().is_some_and(String::is_empty) {
                joined.push(' ');
            }
            for suggestion in dispatcher.complete(&console, &joined) {
                println!("{suggestion}");
            }
        }
        Commands::List => {
            println!("{}", format_header("Commands"));
            for (depth, id) in dispatcher.tree().walk() {
                let Some(node) = dispatcher.tree().node(id) else {
                    continue;
                };
                let mut names = node.name().to_string();
                for alias in node.alias_names() {
                    names.push('|');
                    names.push_str(alias);
                }
                println!(
                    "{}{}  {}",
                    indent(depth + 1),
                    format_command(&names),
                    format_description(node.description())
                );
                println!(
                    "{}{}",
                    indent(depth + 2),
                    format_usage(&dispatcher.usage_of(id, Some(&console)))
                );
            }
        }
        Commands::Schema => println!("{}", config::schema_json()?),
    }

    Ok(())
}

fn config_path(explicit: Option<PathBuf>) -> cmdtree::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(ConfigPaths::main_config()?),
    }
}

fn build_dispatcher(config: &Config) -> cmdtree::Result<CommandDispatcher> {
    let readers = Arc::new(ReaderRegistry::with_defaults());
    let mut dispatcher = CommandDispatcher::with_settings(readers, config.commands.clone());
    register_demo_commands(&mut dispatcher)?;
    dispatcher.register_aliases(&config.aliases)?;
    Ok(dispatcher)
}

fn fail(message: &str, usage: Option<String>) -> ! {
    eprintln!("{}", format_error(message));
    if let Some(usage) = usage {
        eprintln!("{}", format_usage(&usage));
    }
    process::exit(1);
}
