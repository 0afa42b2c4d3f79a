use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "drug-indices",
    about = "Topological indices of drug molecules retrieved from PubChem",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Retrieve structures, compute indices, write edge JSON and index table
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Retrieve structures and write the edge JSON only
    #[command(visible_alias = "f")]
    Fetch(FetchArgs),

    /// Compute the index table from a previously written edge JSON
    #[command(visible_alias = "c")]
    Compute(ComputeArgs),

    /// Render the molecular graph of one compound as Graphviz DOT
    #[command(visible_alias = "d")]
    Draw(DrawArgs),
}

/// Where compound names and structures come from.
#[derive(Args)]
#[command(next_help_heading = "Compound Source")]
pub struct SourceOptions {
    /// Compound names (default: the configured list)
    #[arg(value_name = "NAME")]
    pub compounds: Vec<String>,

    /// Batch configuration (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Offline structures, one `name<TAB>smiles` per line, instead of PubChem
    #[arg(long, value_name = "FILE")]
    pub smiles_file: Option<PathBuf>,

    /// PubChem PUG-REST base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Process compounds in alphabetical order
    #[arg(long)]
    pub sort: bool,
}

#[derive(Args)]
#[command(next_help_heading = "Output")]
pub struct TableOptions {
    /// Index table output (CSV)
    #[arg(long, value_name = "FILE")]
    pub table: Option<PathBuf>,

    /// Decimal places kept in the index table
    #[arg(long, value_name = "N")]
    pub decimals: Option<u32>,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceOptions,

    /// Edge relations output (JSON)
    #[arg(long, value_name = "FILE")]
    pub edges: Option<PathBuf>,

    #[command(flatten)]
    pub table: TableOptions,
}

#[derive(Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub source: SourceOptions,

    /// Edge relations output (JSON)
    #[arg(long, value_name = "FILE")]
    pub edges: Option<PathBuf>,
}

#[derive(Args)]
pub struct ComputeArgs {
    /// Edge relations input (JSON)
    #[arg(value_name = "EDGES")]
    pub edges: PathBuf,

    /// Batch configuration (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub table: TableOptions,
}

#[derive(Args)]
pub struct DrawArgs {
    /// Compound name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// DOT output (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Offline structures, one `name<TAB>smiles` per line, instead of PubChem
    #[arg(long, value_name = "FILE")]
    pub smiles_file: Option<PathBuf>,

    /// PubChem PUG-REST base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_with_names_and_outputs() {
        let cli = Cli::try_parse_from([
            "drug-indices",
            "run",
            "afatinib",
            "mitomycin c",
            "--table",
            "out.csv",
            "--decimals",
            "4",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.source.compounds, ["afatinib", "mitomycin c"]);
        assert_eq!(args.table.table, Some(PathBuf::from("out.csv")));
        assert_eq!(args.table.decimals, Some(4));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["drug-indices", "-q", "-v", "fetch"]).is_err());
    }
}
