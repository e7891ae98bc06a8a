use bandmate_lib::{Filters, PublicProfile, Repository, Result, repository::SkillName};
use clap::Args as ClapArgs;
use colored::Colorize;

use crate::session;

#[derive(ClapArgs, Debug, Clone)]
pub struct Args {
    /// Only candidates offering at least one of these skills
    #[arg(long = "skill")]
    skills: Vec<SkillName>,
    /// Only candidates in your city and state
    #[arg(long)]
    local: bool,
    /// Print raw JSON instead of a summary
    #[arg(long)]
    json: bool,
}

pub fn handle(repo: &Repository, args: &Args) -> Result<()> {
    let token = session::load()?;
    let filters = Filters {
        required_skills: args.skills.clone(),
        local_only: args.local,
    };

    let candidates = repo.discover(&token, &filters)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&candidates).unwrap());
        return Ok(());
    }

    if candidates.is_empty() {
        println!("No candidates right now. Check back later!");
    }
    for profile in &candidates {
        print_profile(profile);
    }

    Ok(())
}

pub fn print_profile(profile: &PublicProfile) {
    let skills: Vec<String> = profile
        .skills
        .iter()
        .map(|skill| skill.name.to_string())
        .collect();

    println!(
        "{} {} ({}) - {}, {} [{}]",
        format!("#{}", profile.id).dimmed(),
        profile.name.bold(),
        profile.age,
        profile.location.city,
        profile.location.state,
        skills.join(", ")
    );
}
