use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the tsn binary.
#[derive(Parser, Debug, Clone)]
#[command(name = "tsn", version, about = "Typed-TypeScript-subset to C# transpiler")]
pub struct CliArgs {
    /// Input `.ir.json` module files, or directories to scan for them.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory the emitted `.cs` tree is written to.
    #[arg(short = 'o', long = "out-dir", default_value = "out")]
    pub out_dir: PathBuf,

    /// Additional external binding table (JSON), layered over the built-ins.
    #[arg(long)]
    pub bindings: Option<PathBuf>,

    /// Run the full pipeline without writing any files.
    #[arg(long)]
    pub check: bool,

    /// Print the emission order and stop.
    #[arg(long = "list-files", alias = "listFiles")]
    pub list_files: bool,

    /// Colored diagnostic output.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub pretty: bool,

    /// Wrap numeric update expressions in checked contexts.
    #[arg(long = "checked-numeric", alias = "checkedNumeric")]
    pub checked_numeric: bool,
}
