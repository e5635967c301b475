use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use ruleset_convert::singbox::DEFAULT_RULE_SET_VERSION;
use ruleset_tree::Format;

#[derive(Parser, Debug)]
#[command(name = "ruleset-convert")]
#[command(about = "Convert and merge traffic rule lists between YAML, JSON and KEY,VALUE lists")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Merge two YAML/JSON documents without overwriting conflicting values.
    Merge(MergeArgs),
    /// Overlay a KEY,VALUE list onto a JSON document.
    ListMerge(ListMergeArgs),
    /// Convert rule lists to JSON rule-sets.
    ToJson(ToJsonArgs),
    /// Convert rule lists to YAML payloads.
    ToYaml(ToYamlArgs),
    /// Combine JSON rule-sets into one.
    Aggregate(AggregateArgs),
    /// Merge DOMAIN/DOMAIN-SUFFIX rules into a plain domain list.
    OptimizeDomains(OptimizeArgs),
    /// Sanity-check rule lists.
    Check(CheckArgs),
    /// Re-serialize a document between YAML and JSON.
    Convert(ConvertArgs),
    /// Show the parsed structure of a document.
    Inspect(InspectArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum DocFormat {
    Json,
    Yaml,
}

impl From<DocFormat> for Format {
    fn from(value: DocFormat) -> Self {
        match value {
            DocFormat::Json => Format::Json,
            DocFormat::Yaml => Format::Yaml,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Rule lists given directly or through a sources file.
#[derive(Args, Debug)]
pub struct ListInputs {
    /// Rule list files.
    pub inputs: Vec<PathBuf>,
    /// File naming one list path per line (relative to the file itself).
    #[arg(long)]
    pub sources: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct MergeArgs {
    pub base: PathBuf,
    pub overlay: PathBuf,
    #[arg(short, long)]
    pub output: PathBuf,
    /// Override the format inferred from the base file extension.
    #[arg(long, value_enum)]
    pub base_format: Option<DocFormat>,
    /// Override the format inferred from the overlay file extension.
    #[arg(long, value_enum)]
    pub overlay_format: Option<DocFormat>,
    /// Output format; defaults to the output file extension.
    #[arg(long, value_enum)]
    pub to: Option<DocFormat>,
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Parser, Debug)]
pub struct ListMergeArgs {
    /// KEY,VALUE list.
    pub list: PathBuf,
    /// JSON document to update.
    pub json: PathBuf,
    #[arg(short, long)]
    pub output: PathBuf,
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Parser, Debug)]
pub struct ToJsonArgs {
    #[command(flatten)]
    pub lists: ListInputs,
    #[arg(long)]
    pub output_dir: PathBuf,
    #[arg(long, default_value_t = DEFAULT_RULE_SET_VERSION)]
    pub rule_set_version: i64,
    /// File name of the aggregated rule-set inside the output directory.
    #[arg(long, default_value = "NeedProxydns.json")]
    pub merged_name: String,
    /// Skip the aggregated rule-set.
    #[arg(long)]
    pub no_merge: bool,
    /// Optional rule types TOML file. Defaults to the embedded table.
    #[arg(long)]
    pub rule_types: Option<PathBuf>,
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Parser, Debug)]
pub struct ToYamlArgs {
    #[command(flatten)]
    pub lists: ListInputs,
    #[arg(long)]
    pub output_dir: PathBuf,
    /// File name of the merged payload inside the output directory.
    #[arg(long, default_value = "need-proxy-dns.yaml")]
    pub merged_name: String,
    /// Skip the merged payload.
    #[arg(long)]
    pub no_merge: bool,
    /// Optional rule types TOML file. Defaults to the embedded table.
    #[arg(long)]
    pub rule_types: Option<PathBuf>,
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Parser, Debug)]
pub struct AggregateArgs {
    /// JSON rule-set files.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
    #[arg(short, long)]
    pub output: PathBuf,
    /// Also write a variant without `ip_cidr` rules.
    #[arg(long)]
    pub without_ip_output: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_RULE_SET_VERSION)]
    pub rule_set_version: i64,
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Parser, Debug)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub lists: ListInputs,
    /// Existing plain domain list; a missing file counts as empty.
    #[arg(long)]
    pub existing: Option<PathBuf>,
    #[arg(short, long)]
    pub output: PathBuf,
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub lists: ListInputs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Optional rule types TOML file. Defaults to the embedded table.
    #[arg(long)]
    pub rule_types: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    pub input: PathBuf,
    #[arg(short, long)]
    pub output: PathBuf,
    /// Input format; defaults to the input file extension.
    #[arg(long, value_enum)]
    pub from: Option<DocFormat>,
    /// Output format; defaults to the output file extension.
    #[arg(long, value_enum)]
    pub to: Option<DocFormat>,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    pub file: PathBuf,
    /// Only show the value under this top-level key.
    #[arg(long)]
    pub key: Option<String>,
    #[arg(long, default_value_t = 3)]
    pub depth: usize,
    #[arg(long, value_enum)]
    pub format: Option<DocFormat>,
}
