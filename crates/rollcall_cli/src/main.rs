//! Command-line front end for the rollcall student record store.
//!
//! # Responsibility
//! - Map subcommands 1:1 onto the five record service operations.
//! - Convert recoverable service errors into one-line messages and a
//!   non-zero exit, without a backtrace.
//!
//! A store that cannot be opened or migrated is fatal and aborts startup.

use clap::{Parser, Subcommand};
use log::info;
use rollcall_core::{
    default_log_level, init_logging, open_store, RepoError, SqliteStudentRepository, StoreConfig,
    Student, StudentForm, StudentListQuery, StudentService,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "rollcall", version, about = "Student record manager")]
struct Cli {
    /// SQLite database file; created and seeded on first use.
    #[arg(long, default_value = "students.db", global = true)]
    db: PathBuf,

    /// Directory for rolling log files. Logging is disabled when unset.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List students, optionally filtered by roll, name, or department.
    List {
        /// Substring to match (case-insensitive).
        query: Option<String>,
    },
    /// Add a student.
    Add {
        #[arg(long)]
        roll: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        department: String,
        /// Year of study (1-4 by convention).
        #[arg(long)]
        year: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Show one student by id.
    Show { id: i64 },
    /// Replace all fields of a student.
    Edit {
        id: i64,
        #[arg(long)]
        roll: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        department: String,
        #[arg(long)]
        year: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a student by id.
    Remove { id: i64 },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        let log_dir = absolutize(log_dir);
        if let Err(message) = init_logging(level, &log_dir.to_string_lossy()) {
            eprintln!("error: {message}");
            return ExitCode::FAILURE;
        }
    }

    let conn = match open_store(&StoreConfig::file(&cli.db)) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("error: cannot open student store `{}`: {err}", cli.db.display());
            return ExitCode::FAILURE;
        }
    };
    let repo = match SqliteStudentRepository::try_new(conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("error: student store is not usable: {err}");
            return ExitCode::FAILURE;
        }
    };
    let service = StudentService::new(repo);

    match run(&service, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(
    service: &StudentService<SqliteStudentRepository>,
    command: Commands,
) -> Result<(), RepoError> {
    match command {
        Commands::List { query } => {
            let list_query = match query {
                Some(text) => StudentListQuery::with_filter(text),
                None => StudentListQuery::default(),
            };
            let students = service.list_students(&list_query)?;
            info!(
                "event=cli_list module=cli status=ok rows={}",
                students.len()
            );
            print_table(&students);
            Ok(())
        }
        Commands::Add {
            roll,
            name,
            department,
            year,
            email,
        } => {
            let student = service.create_student(&StudentForm {
                roll,
                name,
                department,
                year,
                email,
            })?;
            info!("event=cli_add module=cli status=ok id={}", student.id);
            println!("added student #{}", student.id);
            print_detail(&student);
            Ok(())
        }
        Commands::Show { id } => {
            let student = service.get_student(id)?;
            print_detail(&student);
            Ok(())
        }
        Commands::Edit {
            id,
            roll,
            name,
            department,
            year,
            email,
        } => {
            let student = service.update_student(
                id,
                &StudentForm {
                    roll,
                    name,
                    department,
                    year,
                    email,
                },
            )?;
            info!("event=cli_edit module=cli status=ok id={}", student.id);
            println!("updated student #{}", student.id);
            print_detail(&student);
            Ok(())
        }
        Commands::Remove { id } => match service.delete_student(id) {
            Ok(()) => {
                info!("event=cli_remove module=cli status=ok id={id}");
                println!("deleted student #{id}");
                Ok(())
            }
            // Deleting an absent id is harmless from the caller's side;
            // say so instead of failing.
            Err(RepoError::NotFound(_)) => {
                println!("no student with id {id}; nothing deleted");
                Ok(())
            }
            Err(err) => Err(err),
        },
    }
}

fn print_table(students: &[Student]) {
    if students.is_empty() {
        println!("no students found");
        return;
    }

    println!(
        "{:<6} {:<10} {:<24} {:<12} {:<4} EMAIL",
        "ID", "ROLL", "NAME", "DEPARTMENT", "YEAR"
    );
    for student in students {
        println!(
            "{:<6} {:<10} {:<24} {:<12} {:<4} {}",
            student.id, student.roll, student.name, student.department, student.year, student.email
        );
    }
}

fn print_detail(student: &Student) {
    println!("id:         {}", student.id);
    println!("roll:       {}", student.roll);
    println!("name:       {}", student.name);
    println!("department: {}", student.department);
    println!("year:       {}", student.year);
    println!("email:      {}", student.email);
}

fn absolutize(path: &PathBuf) -> PathBuf {
    if path.is_absolute() {
        path.clone()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.clone())
    }
}
