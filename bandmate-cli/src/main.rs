use bandmate_lib::Repository;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod account;
mod discover;
mod session;
mod swipe;

#[derive(Parser, Debug)]
#[command(name = "bandmate")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Operate on your account
    #[command(subcommand)]
    Account(account::Command),
    /// Swipe on profiles and see what came of it
    #[command(subcommand)]
    Swipe(swipe::Command),
    /// Browse candidate profiles to swipe on
    Discover(discover::Args),
}

fn main() {
    human_panic::setup_panic!();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let repo = Repository::new();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Account(cmd) => account::handle(&repo, cmd),
        Command::Swipe(cmd) => swipe::handle(&repo, cmd),
        Command::Discover(args) => discover::handle(&repo, args),
    };

    if let Err(err) = result {
        eprintln!("{} {err}", "error:".red().bold());
        std::process::exit(1);
    }
}
