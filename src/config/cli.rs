use crate::config::{ConvertSettings, EnrichSettings};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "dict-prep")]
#[command(about = "Prepare word dictionary JSON files")]
pub struct CliConfig {
    /// Optional TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Convert a JSON array file into JSON Lines
    Convert(ConvertArgs),
    /// Fill missing word fields from the reference dataset
    Enrich(EnrichArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ConvertArgs {
    /// Input .json file whose root is an array [default: coca20000.json]
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output .jsonl file [default: coca20000.jsonl]
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct EnrichArgs {
    /// Directory scanned for .json files [default: .]
    #[arg(short, long)]
    pub dir: Option<String>,

    /// Reference file name inside the directory [default: KEYBR.officialwordlibraries.json]
    #[arg(short, long)]
    pub reference: Option<String>,

    /// Fields to fill, comma separated [default: usphone,ukphone,sentences,detailed_translations]
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Report what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,
}

impl ConvertArgs {
    /// Flags given on the command line win over `base`.
    pub fn apply(&self, mut base: ConvertSettings) -> ConvertSettings {
        if let Some(input) = &self.input {
            base.input = input.clone();
        }
        if let Some(output) = &self.output {
            base.output = output.clone();
        }
        base
    }
}

impl EnrichArgs {
    pub fn apply(&self, mut base: EnrichSettings) -> EnrichSettings {
        if let Some(dir) = &self.dir {
            base.dir = dir.clone();
        }
        if let Some(reference) = &self.reference {
            base.reference_file = reference.clone();
        }
        if !self.fields.is_empty() {
            base.tracked_fields = self.fields.clone();
        }
        if self.dry_run {
            base.dry_run = true;
        }
        base
    }
}
