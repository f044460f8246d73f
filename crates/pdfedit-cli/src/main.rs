mod check_cmd;
mod cli;
mod lines_cmd;
mod rephrase_cmd;
mod replace_cmd;
mod search_cmd;
mod shared;
mod text_cmd;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    shared::init_logging(cli.verbose);

    let result = shared::load_options(cli.config.as_deref()).and_then(|options| match cli.command {
        Commands::Replace {
            ref file,
            ref find,
            ref replacement,
            ignore_case,
            ref pages,
            ref output,
            timeout,
            format,
        } => replace_cmd::run(
            &replace_cmd::ReplaceArgs {
                file,
                find,
                replacement,
                ignore_case,
                pages: pages.as_deref(),
                output,
                timeout,
            },
            options,
            format,
        ),
        Commands::Rephrase {
            ref file,
            page,
            ref rect,
            ref replacement,
            ref output,
            format,
        } => rephrase_cmd::run(file, page, rect, replacement, output, options, format),
        Commands::Lines {
            ref file,
            ref pages,
            format,
        } => lines_cmd::run(file, pages.as_deref(), options, format),
        Commands::Search {
            ref file,
            ref phrase,
            ignore_case,
            ref pages,
            format,
        } => search_cmd::run(file, phrase, ignore_case, pages.as_deref(), options, format),
        Commands::Text {
            ref file,
            ref pages,
            format,
        } => text_cmd::run(file, pages.as_deref(), options, format),
        Commands::Check { ref file, format } => check_cmd::run(file, options, format),
    });

    if let Err(code) = result {
        std::process::exit(code);
    }
}
