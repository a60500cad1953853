use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// One-line usage printed for `langtrans` and `langtrans -h`
pub const USAGE: &str = "Usage: langtrans <INPUT> <OUTPUT> <SOURCE_SYNTAX> <TARGET_SYNTAX>";

/// Printed below [`USAGE`]
pub const USAGE_NOTE: &str = "SOURCE_SYNTAX, TARGET_SYNTAX: syntax file names without extension (.yaml)";

#[derive(Parser, Debug)]
#[command(name = "langtrans")]
#[command(about = "Rewrite text from one surface syntax into another using YAML syntax descriptions")]
#[command(long_about = "LangTrans rewrites a file written in a custom surface syntax into a target syntax.

Both syntaxes are described declaratively in YAML. The source syntax lists parts:
a regex per construct, the names of the tokens its capture groups produce, and
optional per-token post-processing. The target syntax gives, per part, a template
with <token> placeholders.

SOURCE SYNTAX:
  settings:
    loop: true                  # keep rewriting until nothing matches
    looplimit: 7                # but never more than this many passes
    variables:
      ident: '[A-Za-z_]\\w*'     # <ident> is expanded inside every regex
  function:
    regex: 'fn (<ident>)\\((.*)\\)'
    tokens: [name, args]
    args:
      replace:
        - [',\\s*', ', ']
  _lambda:                      # alias: borrows the tokens and template of 'function'
    regex: 'lambda (<ident>)\\((.*)\\)'

TARGET SYNTAX:
  function: 'def <name>(<args>):'

EXAMPLES:
  langtrans main.pseudo main.py pseudo python      Translate and write main.py
  langtrans -n main.pseudo main.py pseudo python   Preview without writing
  langtrans --diff in.txt out.txt src dst          Show what changed
  langtrans --loop --loop-limit 3 in out src dst   Force up to 3 passes
  langtrans config --show                          Show configuration")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(disable_help_flag = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// File written in the source syntax
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// File to write the translation to
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Source syntax name (without extension)
    #[arg(value_name = "SOURCE_SYNTAX")]
    source_syntax: Option<String>,

    /// Target syntax name (without extension)
    #[arg(value_name = "TARGET_SYNTAX")]
    target_syntax: Option<String>,

    /// Translate and print without writing OUTPUT
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Do not print the translated text
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Print a line diff of INPUT against the translation
    #[arg(long)]
    diff: bool,

    /// Write a debug log and print a run summary
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Keep rewriting until nothing matches (overrides settings.loop)
    #[arg(long = "loop", conflicts_with = "no_loop")]
    enable_loop: bool,

    /// Run exactly one rewrite pass (overrides settings.loop)
    #[arg(long = "no-loop")]
    no_loop: bool,

    /// Maximum number of passes when looping (overrides settings.looplimit)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    loop_limit: Option<u32>,

    /// Print the one-line usage
    #[arg(short = 'h', action = ArgAction::SetTrue)]
    short_help: bool,

    /// Print detailed help
    #[arg(long = "help", action = ArgAction::Help)]
    help: Option<bool>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show or create the configuration file
    #[command(long_about = "Show the LangTrans configuration.

The configuration lives in ~/.langtrans/config.toml and is created with
commented defaults on first use.

CONFIGURATION OPTIONS:
  [logging]
    debug = false               # Write ~/.langtrans/langtrans.log
  [output]
    echo = true                 # Print the translation
    diff = false                # Print a diff of input and output
    context_lines = 2           # Diff context (max 10)
  [syntax]
    extension = \"yaml\"          # Appended to syntax names
    search_dirs = []            # Extra directories holding syntax files

EXAMPLES:
  langtrans config --show       Print the effective configuration
  langtrans config --path       Print where the file lives")]
    Config {
        /// Print the effective configuration
        #[arg(long = "show")]
        show: bool,

        /// Print the configuration and log file paths
        #[arg(long = "path")]
        path: bool,
    },
}

/// Everything needed to run one translation
#[derive(Debug, Clone, PartialEq)]
pub struct TranslateArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub source_syntax: String,
    pub target_syntax: String,
    pub dry_run: bool,
    pub quiet: bool,
    pub diff: bool,
    pub verbose: bool,
    /// `Some` when --loop or --no-loop was given
    pub loop_override: Option<bool>,
    pub loop_limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Args {
    /// No arguments, or only -h
    Usage,
    /// Some but not all four positional arguments
    Insufficient,
    Translate(TranslateArgs),
    Config { show: bool, path: bool },
}

pub fn parse_args() -> Result<Args> {
    Ok(Args::from_cli(Cli::parse()))
}

impl Args {
    pub fn from_cli(cli: Cli) -> Self {
        if let Some(Commands::Config { show, path }) = cli.command {
            return Args::Config { show, path };
        }

        if cli.short_help {
            return Args::Usage;
        }

        match (cli.input, cli.output, cli.source_syntax, cli.target_syntax) {
            (None, None, None, None) => Args::Usage,
            (Some(input), Some(output), Some(source_syntax), Some(target_syntax)) => {
                let loop_override = if cli.enable_loop {
                    Some(true)
                } else if cli.no_loop {
                    Some(false)
                } else {
                    None
                };

                Args::Translate(TranslateArgs {
                    input,
                    output,
                    source_syntax,
                    target_syntax,
                    dry_run: cli.dry_run,
                    quiet: cli.quiet,
                    diff: cli.diff,
                    verbose: cli.verbose,
                    loop_override,
                    loop_limit: cli.loop_limit.map(|n| n as usize),
                })
            }
            _ => Args::Insufficient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        let mut full = vec!["langtrans"];
        full.extend_from_slice(argv);
        Args::from_cli(Cli::try_parse_from(full).unwrap())
    }

    #[test]
    fn test_no_arguments_is_usage() {
        assert_eq!(parse(&[]), Args::Usage);
    }

    #[test]
    fn test_short_help_is_usage() {
        assert_eq!(parse(&["-h"]), Args::Usage);
    }

    #[test]
    fn test_insufficient_arguments() {
        assert_eq!(parse(&["in.txt"]), Args::Insufficient);
        assert_eq!(parse(&["in.txt", "out.txt", "src"]), Args::Insufficient);
    }

    #[test]
    fn test_translate_arguments() {
        let args = parse(&["in.txt", "out.txt", "src", "dst"]);
        assert_eq!(
            args,
            Args::Translate(TranslateArgs {
                input: PathBuf::from("in.txt"),
                output: PathBuf::from("out.txt"),
                source_syntax: "src".to_string(),
                target_syntax: "dst".to_string(),
                dry_run: false,
                quiet: false,
                diff: false,
                verbose: false,
                loop_override: None,
                loop_limit: None,
            })
        );
    }

    #[test]
    fn test_flags() {
        let Args::Translate(args) = parse(&[
            "-n", "-q", "--diff", "-v", "--loop", "--loop-limit", "3", "in", "out", "src", "dst",
        ]) else {
            panic!("expected translate args");
        };
        assert!(args.dry_run);
        assert!(args.quiet);
        assert!(args.diff);
        assert!(args.verbose);
        assert_eq!(args.loop_override, Some(true));
        assert_eq!(args.loop_limit, Some(3));

        let Args::Translate(args) = parse(&["--no-loop", "in", "out", "src", "dst"]) else {
            panic!("expected translate args");
        };
        assert_eq!(args.loop_override, Some(false));
    }

    #[test]
    fn test_loop_flags_conflict() {
        assert!(Cli::try_parse_from(["langtrans", "--loop", "--no-loop", "a", "b", "c", "d"]).is_err());
    }

    #[test]
    fn test_zero_loop_limit_is_rejected() {
        assert!(Cli::try_parse_from(["langtrans", "--loop-limit", "0", "a", "b", "c", "d"]).is_err());
    }

    #[test]
    fn test_config_subcommand() {
        assert_eq!(
            parse(&["config", "--show"]),
            Args::Config {
                show: true,
                path: false
            }
        );
    }
}
