use iokit_core::{
    CliArgs, Command as CoreCommand, CoreError, FindReport, IokitArgs, OperationMode,
    ProcessReport, find_files, process_files,
};

use anyhow::Result;
use clap::{CommandFactory, Parser};
use console::style;
use dialoguer::Confirm;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

fn print_completions_cli(shell: clap_complete::Shell) {
    let mut cmd = CliArgs::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
}

fn setup_logging(verbose: u8) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn,ignore=warn,globset=warn"),
            1 => tracing_subscriber::EnvFilter::new("info,ignore=warn,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn print_matches(files: &[PathBuf], all: bool) {
    println!("Found {} files:", files.len());
    let shown = if all { files.len() } else { 10 };
    for file in files.iter().take(shown) {
        println!("  {}", style(file.display()).dim());
    }
    if files.len() > shown {
        println!("  ... and {} more.", files.len() - shown);
    }
}

fn print_skipped(report: &FindReport) {
    if let Some(skipped) = &report.skipped {
        eprintln!(
            "{} {} unreadable {} skipped:",
            style("⚠️").yellow(),
            skipped.len(),
            if skipped.len() == 1 { "entry" } else { "entries" }
        );
        for e in skipped.iter() {
            eprintln!("  {}", style(&e.source).dim());
        }
    }
}

fn confirm_deletion(files: &[PathBuf], no_confirm: bool) -> Result<bool> {
    if no_confirm {
        return Ok(true);
    }
    let confirmed = Confirm::new()
        .with_prompt(format!(
            "Permanently delete {} {}?",
            style(files.len()).red(),
            if files.len() == 1 { "file" } else { "files" }
        ))
        .default(false)
        .interact()?;
    if !confirmed {
        println!("Nothing deleted.");
    }
    Ok(confirmed)
}

fn print_outcome(report: &ProcessReport) {
    match report.mode {
        OperationMode::List => {}
        OperationMode::Count => println!(
            "Total: {} bytes in {} {}.",
            style(report.total_bytes).cyan(),
            report.files,
            if report.files == 1 { "file" } else { "files" }
        ),
        OperationMode::Delete => println!(
            "Result: {} {} deleted.",
            style(report.deleted).green(),
            if report.deleted == 1 { "file" } else { "files" }
        ),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli: CliArgs = CliArgs::parse();

    if let Some(command_enum_val) = cli.command {
        match command_enum_val {
            CoreCommand::Completion(args) => {
                print_completions_cli(args.shell);
                return Ok(ExitCode::SUCCESS);
            }
        }
    }

    let main_app_args: IokitArgs = cli.main_opts;
    setup_logging(main_app_args.verbose);

    let search_args = main_app_args.clone();
    let found = match tokio::task::spawn_blocking(move || find_files(&search_args)).await? {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", style(format!("Error finding files: {:#}", e)).red());
            return Ok(ExitCode::FAILURE);
        }
    };
    print_skipped(&found);

    let files = found.files;
    if files.is_empty() {
        println!("No files found matching the criteria.");
        return Ok(ExitCode::SUCCESS);
    }
    print_matches(&files, main_app_args.all_matches);

    let operation_mode = OperationMode::from_args(&main_app_args);
    if operation_mode == OperationMode::Delete {
        match confirm_deletion(&files, main_app_args.no_confirm) {
            Ok(true) => {}
            Ok(false) => return Ok(ExitCode::SUCCESS),
            Err(e) => {
                eprintln!(
                    "{}",
                    style(format!("Error during confirmation: {}", e)).red()
                );
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    let total = files.len();
    tracing::debug!(mode = ?operation_mode, files = total, "processing");
    let outcome = tokio::task::spawn_blocking(move || process_files(&files, operation_mode)).await?;
    match outcome {
        Ok(report) => {
            print_outcome(&report);
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            for e in errors.iter() {
                eprintln!(
                    "  {} Failed: {}",
                    style("⚠️").yellow(),
                    style(&e.source).red()
                );
            }
            let summary = CoreError::partial(total, errors);
            eprintln!("{}", style(summary).red());
            Ok(ExitCode::FAILURE)
        }
    }
}
