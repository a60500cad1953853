use anyhow::{Context, Result};
use colored::Colorize;
use langtrans::cli::{self, Args, TranslateArgs};
use langtrans::config::{self, Config};
use langtrans::diff_formatter::DiffFormatter;
use langtrans::loader::SyntaxLocator;
use langtrans::{Translator, files, logger};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = cli::parse_args()?;

    match args {
        Args::Usage => {
            println!("{}", cli::USAGE);
            println!("{}", cli::USAGE_NOTE);
        }
        Args::Insufficient => {
            eprintln!("{} Insufficient number of arguments", "Error:".red().bold());
            eprintln!("{}", cli::USAGE);
            return Ok(ExitCode::from(2));
        }
        Args::Translate(translate_args) => {
            execute_translation(&translate_args)?;
        }
        Args::Config { show, path } => {
            show_config(show, path)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn execute_translation(args: &TranslateArgs) -> Result<()> {
    let config = config::load_config().unwrap_or_else(|err| {
        eprintln!("Warning: {:#}; using default configuration", err);
        Config::default()
    });
    config::validate_config(&config)?;

    let log_path = logger::init_debug_logging(config.logging.debug, args.verbose)?;

    let locator = SyntaxLocator::from_config(&config.syntax);
    let source = locator.load_source(&args.source_syntax)?;
    let target = locator.load_target(&args.target_syntax)?;

    let input = files::read_input(&args.input)?;

    let translator = Translator::new(&source, &target)?;
    let policy = translator
        .policy()
        .with_overrides(args.loop_override, args.loop_limit);
    let translator = translator.with_policy(policy);

    tracing::info!(
        input = %args.input.display(),
        output = %args.output.display(),
        source = %args.source_syntax,
        target = %args.target_syntax,
        "translating"
    );

    let translation = translator.translate(&input);

    if !args.dry_run {
        files::write_output(&args.output, &translation.output)
            .with_context(|| format!("Translation of {} not saved", args.input.display()))?;
    }

    if args.diff || config.output.diff {
        let label = args.input.display().to_string();
        print!(
            "{}",
            DiffFormatter::format_diff(&label, &input, &translation.output, config.output.context_lines)
        );
    }

    if config.output.echo && !args.quiet {
        println!("{}", translation.output);
    }

    if args.verbose {
        eprintln!("{}", DiffFormatter::format_summary(&translation));
        if let Some(path) = log_path {
            eprintln!("Debug log: {}", path.display());
        }
    }

    Ok(())
}

fn show_config(show: bool, path: bool) -> Result<()> {
    if path {
        println!("Config file: {}", config::config_file_path()?.display());
        println!("Log file: {}", logger::get_current_log_path().display());
        if !show {
            return Ok(());
        }
    }

    let config = config::load_config()?;
    config::validate_config(&config)?;
    print!("{}", config::config_to_toml(&config)?);

    Ok(())
}
