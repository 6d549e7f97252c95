use clap::Parser;
use std::process::ExitCode;
use tsn_cli::{CliArgs, compile, reporter, trace};

fn main() -> ExitCode {
    trace::init();
    let args = CliArgs::parse();

    let summary = match compile(&args) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("tsn: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    if args.list_files {
        for path in &summary.order {
            println!("{path}");
        }
        return ExitCode::SUCCESS;
    }

    for diagnostic in summary
        .diagnostics
        .iter()
        .chain(summary.results.iter().flat_map(|r| r.diagnostics.iter()))
    {
        eprintln!(
            "{}",
            reporter::render(
                diagnostic,
                summary.line_map(&diagnostic.file),
                args.pretty
            )
        );
    }

    if summary.has_fatal() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
