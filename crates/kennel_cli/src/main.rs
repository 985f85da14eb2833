//! Command-line front end for the kennel record mapper.
//!
//! # Responsibility
//! - Open one database handle, run one mapper command, close the handle.
//! - Print dogs as `id<TAB>name<TAB>breed`, `-` for absent values.
//!
//! Exit codes: 0 success, 1 storage error, 2 usage error.

use clap::{Parser, Subcommand};
use kennel_core::{
    close_db, core_version, default_log_level, init_logging, open_db, open_db_in_memory, Dog,
    DogId, DogRepository, SqliteDogRepository,
};
use log::error;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Create, query and update dog records in a SQLite table
#[derive(Parser, Debug)]
#[command(name = "kennel", version = core_version())]
struct Cli {
    /// SQLite database file; an in-memory database is used when omitted
    #[arg(long, value_name = "PATH", global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, value_name = "DIR", env = "KENNEL_LOG_DIR", global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Create the dogs table
    Init,
    /// Drop the dogs table and every row in it
    Drop,
    /// Insert a new dog
    Add { name: String, breed: String },
    /// Print every dog
    List,
    /// Print the first dog with NAME
    FindName { name: String },
    /// Print the dog with ID
    FindId { id: DogId },
    /// Print the matching dog, inserting it if absent
    FindOrCreate { name: String, breed: String },
    /// Overwrite name and breed of dog ID
    Rename {
        id: DogId,
        name: String,
        breed: String,
    },
    /// Run a short walkthrough against the database
    Demo,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(message) = init_logging(default_log_level(), log_dir) {
            eprintln!("warning: logging disabled: {message}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let conn = match cli.db.as_deref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let result = {
        let repo = SqliteDogRepository::new(&conn);
        execute(&repo, cli.command)
    };
    command_outcome(result, close_db(conn))
}

/// The command's own error wins over a close error; `close_db` logs the
/// latter itself.
fn command_outcome<E: Error + 'static>(
    result: Result<(), Box<dyn Error>>,
    closed: Result<(), E>,
) -> Result<(), Box<dyn Error>> {
    result?;
    closed?;
    Ok(())
}

fn execute(repo: &impl DogRepository, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Init => repo.ensure_schema()?,
        Command::Drop => repo.drop_schema()?,
        Command::Add { name, breed } => {
            print_dog(&repo.create(Some(name.as_str()), Some(breed.as_str()))?)
        }
        Command::List => repo.get_all()?.iter().for_each(print_dog),
        Command::FindName { name } => print_lookup(repo.find_by_name(&name)?),
        Command::FindId { id } => print_lookup(repo.find_by_id(id)?),
        Command::FindOrCreate { name, breed } => {
            print_dog(&repo.find_or_create_by(Some(name.as_str()), Some(breed.as_str()))?)
        }
        Command::Rename { id, name, breed } => {
            let dog = Dog::from_parts(Some(id), Some(name), Some(breed));
            repo.update(&dog)?;
            print_dog(&dog);
        }
        Command::Demo => run_demo(repo)?,
    }
    Ok(())
}

fn run_demo(repo: &impl DogRepository) -> Result<(), Box<dyn Error>> {
    repo.ensure_schema()?;
    repo.create(Some("Princess"), Some("Lab"))?;
    repo.create(Some("Pooh"), Some("Poodle"))?;

    println!("# all");
    repo.get_all()?.iter().for_each(print_dog);
    println!("# find-name Pooh");
    print_lookup(repo.find_by_name("Pooh")?);
    println!("# find-or-create Pooh Poodle");
    print_dog(&repo.find_or_create_by(Some("Pooh"), Some("Poodle"))?);
    println!("# find-or-create Rex Beagle");
    print_dog(&repo.find_or_create_by(Some("Rex"), Some("Beagle"))?);
    println!("# count={}", repo.count()?);
    Ok(())
}

fn print_lookup(dog: Option<Dog>) {
    match dog {
        Some(dog) => print_dog(&dog),
        None => println!("not found"),
    }
}

fn print_dog(dog: &Dog) {
    println!("{}", format_dog(dog));
}

fn format_dog(dog: &Dog) -> String {
    format!(
        "{}\t{}\t{}",
        dog.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
        dog.name.as_deref().unwrap_or("-"),
        dog.breed.as_deref().unwrap_or("-")
    )
}
