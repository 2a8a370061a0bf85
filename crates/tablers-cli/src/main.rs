mod chars_cmd;
mod cli;
mod info_cmd;
mod page_range;
mod shared;
mod tables_cmd;
mod text_cmd;
mod words_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        cli::Commands::Text {
            ref file,
            ref pages,
            ref format,
            layout,
            ref unicode_norm,
            ref password,
        } => text_cmd::run(
            file,
            pages.as_deref(),
            format,
            layout,
            unicode_norm.as_ref().map(|n| n.to_unicode_norm()),
            password.as_deref(),
        ),
        cli::Commands::Chars {
            ref file,
            ref pages,
            ref format,
            ref unicode_norm,
            ref password,
        } => chars_cmd::run(
            file,
            pages.as_deref(),
            format,
            unicode_norm.as_ref().map(|n| n.to_unicode_norm()),
            password.as_deref(),
        ),
        cli::Commands::Words {
            ref file,
            ref pages,
            ref format,
            x_tolerance,
            y_tolerance,
            ref unicode_norm,
            ref password,
        } => words_cmd::run(
            file,
            pages.as_deref(),
            format,
            x_tolerance,
            y_tolerance,
            unicode_norm.as_ref().map(|n| n.to_unicode_norm()),
            password.as_deref(),
        ),
        cli::Commands::Tables {
            ref file,
            ref pages,
            ref format,
            ref strategy,
            snap_tolerance,
            join_tolerance,
            text_tolerance,
            ref password,
        } => tables_cmd::run(
            file,
            pages.as_deref(),
            format,
            strategy,
            snap_tolerance,
            join_tolerance,
            text_tolerance,
            password.as_deref(),
        ),
        cli::Commands::Info {
            ref file,
            ref pages,
            ref format,
            ref password,
        } => info_cmd::run(file, pages.as_deref(), format, password.as_deref()),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
