use bandmate_lib::{
    ProfileDraft, ProfileUpdate, Repository, Result,
    repository::{Genre, Location, LookingFor, Skill},
};
use clap::Subcommand;
use colored::Colorize;

use crate::session;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        age: u8,
        #[arg(long, default_value = "")]
        bio: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        country: String,
        /// Skill entries as name:level:years, e.g. "Guitarist:Advanced:3"
        #[arg(long = "skill", required = true)]
        skills: Vec<Skill>,
        #[arg(long = "genre")]
        genres: Vec<Genre>,
        #[arg(long = "looking-for")]
        looking_for: Vec<LookingFor>,
    },
    /// Sign in with an existing account
    Login { email: String, password: String },
    /// Drop the current session
    Logout,
    /// Update fields on your profile; omitted fields keep their values
    Edit {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<u8>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long = "skill")]
        skills: Vec<Skill>,
        #[arg(long = "genre")]
        genres: Vec<Genre>,
        #[arg(long = "looking-for")]
        looking_for: Vec<LookingFor>,
        #[arg(long = "picture")]
        pictures: Vec<String>,
    },
    /// Hide your profile from discovery
    Deactivate,
}

pub fn handle(repo: &Repository, cmd: &Command) -> Result<()> {
    match cmd {
        Command::Register {
            name,
            email,
            password,
            age,
            bio,
            city,
            state,
            country,
            skills,
            genres,
            looking_for,
        } => {
            let draft = ProfileDraft {
                name: name.clone(),
                email: email.clone(),
                password: password.clone(),
                age: *age,
                bio: bio.clone(),
                location: Location {
                    city: city.clone(),
                    state: state.clone(),
                    country: country.clone(),
                },
                skills: skills.clone(),
                genres: genres.clone(),
                looking_for: looking_for.clone(),
            };

            let (profile, session) = repo.register(&draft)?;
            session::store(session.token());

            println!(
                "Welcome, {}! Your profile id is {}.",
                profile.name()?.bold(),
                profile.uid()
            );
        }
        Command::Login { email, password } => {
            let (profile, session) = repo.login(email, password)?;
            session::store(session.token());

            println!("Signed in as {} ({}).", profile.name()?.bold(), profile.uid());
        }
        Command::Logout => {
            if let Ok(token) = session::load() {
                repo.logout(&token)?;
            }
            session::clear();

            println!("Signed out.");
        }
        Command::Edit {
            name,
            age,
            bio,
            skills,
            genres,
            looking_for,
            pictures,
        } => {
            let token = session::load()?;
            let update = ProfileUpdate {
                name: name.clone(),
                age: *age,
                bio: bio.clone(),
                skills: (!skills.is_empty()).then(|| skills.clone()),
                genres: (!genres.is_empty()).then(|| genres.clone()),
                looking_for: (!looking_for.is_empty()).then(|| looking_for.clone()),
                pictures: (!pictures.is_empty()).then(|| pictures.clone()),
                ..Default::default()
            };

            repo.update_profile(&token, &update)?;

            println!("Profile updated.");
        }
        Command::Deactivate => {
            repo.deactivate(&session::load()?)?;

            println!("Profile deactivated. You won't show up in discovery anymore.");
        }
    }

    Ok(())
}
