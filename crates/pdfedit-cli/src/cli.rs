use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pdfedit::BBox;

use crate::shared::parse_rect;

/// Replace text in PDF documents without disturbing their layout.
#[derive(Debug, Parser)]
#[command(name = "pdfedit", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON file overriding the default edit options
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replace every occurrence of a phrase
    Replace {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Phrase to find
        #[arg(long, value_name = "PHRASE")]
        find: String,

        /// Replacement text
        #[arg(long = "with", value_name = "TEXT")]
        replacement: String,

        /// Match without regard to case
        #[arg(short, long)]
        ignore_case: bool,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Where to write the edited document
        #[arg(short, long, value_name = "OUT")]
        output: PathBuf,

        /// Stop starting new pages after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Output format for the report
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Rewrite the text inside a rectangle, pushing later content down
    Rephrase {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page number (1-based)
        #[arg(long)]
        page: usize,

        /// Selection as 'x0,top,x1,bottom' in points from the top-left corner
        #[arg(long, value_parser = parse_rect, allow_hyphen_values = true)]
        rect: BBox,

        /// Replacement text
        #[arg(long = "with", value_name = "TEXT")]
        replacement: String,

        /// Where to write the edited document
        #[arg(short, long, value_name = "OUT")]
        output: PathBuf,

        /// Output format for the report
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List reconstructed lines with alignment and font
    Lines {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show where a phrase appears
    Search {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Phrase to look for
        phrase: String,

        /// Match without regard to case
        #[arg(short, long)]
        ignore_case: bool,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print page text rebuilt from lines
    Text {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Report whether the document has selectable text
    Check {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_replace() {
        let cli = Cli::parse_from([
            "pdfedit", "replace", "in.pdf", "--find", "Hello", "--with", "Hi", "-o", "out.pdf",
        ]);
        match cli.command {
            Commands::Replace {
                ref find,
                ref replacement,
                ignore_case,
                ref output,
                timeout,
                format,
                ..
            } => {
                assert_eq!(find, "Hello");
                assert_eq!(replacement, "Hi");
                assert!(!ignore_case);
                assert_eq!(output, &PathBuf::from("out.pdf"));
                assert_eq!(timeout, None);
                assert_eq!(format, OutputFormat::Text);
            }
            _ => panic!("expected Replace subcommand"),
        }
    }

    #[test]
    fn replace_requires_output() {
        let result =
            Cli::try_parse_from(["pdfedit", "replace", "in.pdf", "--find", "a", "--with", "b"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_rephrase_rect() {
        let cli = Cli::parse_from([
            "pdfedit", "rephrase", "in.pdf", "--page", "2", "--rect", "50,100,200,114", "--with",
            "New", "-o", "out.pdf",
        ]);
        match cli.command {
            Commands::Rephrase { page, rect, .. } => {
                assert_eq!(page, 2);
                assert_eq!(rect, BBox::new(50.0, 100.0, 200.0, 114.0));
            }
            _ => panic!("expected Rephrase subcommand"),
        }
    }

    #[test]
    fn malformed_rect_is_rejected() {
        let result = Cli::try_parse_from([
            "pdfedit", "rephrase", "in.pdf", "--page", "1", "--rect", "1,2,3", "--with", "x",
            "-o", "out.pdf",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["pdfedit", "text", "in.pdf", "-vv", "--config", "opts.json"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("opts.json")));
    }

    #[test]
    fn search_with_json_format() {
        let cli = Cli::parse_from(["pdfedit", "search", "in.pdf", "Hello", "-i", "--format", "json"]);
        match cli.command {
            Commands::Search {
                ref phrase,
                ignore_case,
                format,
                ..
            } => {
                assert_eq!(phrase, "Hello");
                assert!(ignore_case);
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected Search subcommand"),
        }
    }
}
