use bandmate_lib::{Outcome, Repository, Result, Uid, Verdict};
use clap::Subcommand;
use colored::Colorize;

use crate::{discover::print_profile, session};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Like a profile by id
    Like { target: u64 },
    /// Pass on a profile by id
    Pass { target: u64 },
    /// List your matches, most recently seen first
    Matches {
        /// Print raw JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// List profiles waiting on your response
    Pending {
        /// Print raw JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

pub fn handle(repo: &Repository, cmd: &Command) -> Result<()> {
    let token = session::load()?;

    match cmd {
        Command::Like { target } => {
            let outcome = repo.decide(&token, Uid::from(*target), Verdict::Like)?;
            report(&outcome);
        }
        Command::Pass { target } => {
            repo.decide(&token, Uid::from(*target), Verdict::Pass)?;

            println!("Passed.");
        }
        Command::Matches { json } => {
            let matches = repo.matches(&token)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&matches).unwrap());
            } else if matches.is_empty() {
                println!("No matches yet. Keep swiping!");
            } else {
                for profile in &matches {
                    print_profile(profile);
                }
            }
        }
        Command::Pending { json } => {
            let (pending, count) = repo.pending_likes(&token)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&pending).unwrap());
            } else {
                println!("{count} musician(s) liked you:");
                for profile in &pending {
                    print_profile(profile);
                }
            }
        }
    }

    Ok(())
}

fn report(outcome: &Outcome) {
    if outcome.is_match {
        let matched = outcome
            .matched
            .as_ref()
            .expect("a match outcome carries a summary");

        println!(
            "{} It's a match! Say hi to {} ({}).",
            "<3".red().bold(),
            matched.name.bold(),
            matched.id
        );
    } else {
        println!("Liked. They'll see you in their pending likes.");
    }
}
