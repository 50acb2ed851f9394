//! CLI argument definitions for wcmeta.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `read` | Fetch bib records by OCLC number |
//! | `create` | Create bib records from MARCXML, then set holdings |
//! | `update` | Replace bib records from MARCXML, then set holdings |
//! | `validate` | Validate MARCXML records |
//! | `set` / `unset` | Set or remove holdings by OCLC number |
//! | `check` | Check whether control numbers are current |
//! | `codes` | Print the institution's holding library codes |
//! | `config` | Set or show stored credentials |
//! | `auth` | Login URL and access token requests |
//!
//! # Examples
//!
//! ```bash
//! wcmeta config set key=... secret=... instSymbol=OCWMS
//! wcmeta read numbers.txt --verbose
//! wcmeta create records.xml --prefix batch1 --csv
//! wcmeta check 12345 67890
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use wcmeta_domain::BatchOperation;
use wcmeta_infra::ValidationMode;

/// Batch client for the OCLC WorldCat Metadata API
#[derive(Debug, Parser)]
#[command(name = "wcmeta", author, version, about = "Batch client for the OCLC WorldCat Metadata API")]
pub struct Cli {
    /// Prefix for output file names
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Echo per-item status lines and log at info level
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Include request traces in the status log
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    /// Write the status log as CSV
    #[arg(long, global = true, default_value_t = false)]
    pub csv: bool,

    /// Emit diagnostics as JSON lines on stderr
    #[arg(long, global = true, default_value_t = false)]
    pub log_json: bool,

    /// Timeout of a single HTTP attempt, in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Directory report files are written to
    #[arg(long, global = true, env = "WCMETA_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Origin of the metadata service
    #[arg(long, global = true, env = "WCMETA_BASE_URL", hide = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read bib records
    Read(NumbersArgs),
    /// Create bib records and set holdings on them
    Create(RecordsArgs),
    /// Update bib records and set holdings on them
    Update(RecordsArgs),
    /// Validate bib records
    Validate(ValidateArgs),
    /// Set holdings
    Set(NumbersArgs),
    /// Remove holdings
    Unset(NumbersArgs),
    /// Check control numbers
    Check(NumbersArgs),
    /// Print holding library codes
    Codes,
    /// Manage stored credentials
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Authorization server flows
    #[command(subcommand)]
    Auth(AuthCommand),
}

impl Command {
    /// Batch operation and raw input, for batch commands
    pub fn batch(&self) -> Option<(BatchOperation, String)> {
        match self {
            Self::Read(args) => Some((BatchOperation::Read, args.joined())),
            Self::Set(args) => Some((BatchOperation::SetHoldings, args.joined())),
            Self::Unset(args) => Some((BatchOperation::UnsetHoldings, args.joined())),
            Self::Check(args) => Some((BatchOperation::Check, args.joined())),
            Self::Create(args) => Some((BatchOperation::Create, args.file.clone())),
            Self::Update(args) => Some((BatchOperation::Update, args.file.clone())),
            Self::Validate(args) => Some((BatchOperation::Validate, args.file.clone())),
            Self::Codes | Self::Config(_) | Self::Auth(_) => None,
        }
    }

    /// Validation endpoint requested on the command line
    pub fn validation_mode(&self) -> ValidationMode {
        match self {
            Self::Validate(args) => args.mode.into(),
            _ => ValidationMode::Full,
        }
    }
}

#[derive(Debug, Args)]
pub struct NumbersArgs {
    /// A file of OCLC numbers, or the numbers themselves
    #[arg(required = true)]
    pub input: Vec<String>,
}

impl NumbersArgs {
    fn joined(&self) -> String {
        self.input.join(" ")
    }
}

#[derive(Debug, Args)]
pub struct RecordsArgs {
    /// MARCXML file
    pub file: String,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// MARCXML file
    pub file: String,

    /// Validation level
    #[arg(long, value_enum, default_value_t = ValidateLevel::Full)]
    pub mode: ValidateLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValidateLevel {
    Full,
    Add,
    Replace,
}

impl From<ValidateLevel> for ValidationMode {
    fn from(level: ValidateLevel) -> Self {
        match level {
            ValidateLevel::Full => Self::Full,
            ValidateLevel::Add => Self::Add,
            ValidateLevel::Replace => Self::Replace,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Store `<name>=<value>` pairs, merged into existing credentials
    Set {
        #[arg(required = true)]
        pairs: Vec<String>,
    },
    /// Print stored credentials
    Show,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Print the browser login URL
    LoginUrl(AuthArgs),
    /// Exchange an authorization code for a token
    Token {
        /// Code returned to the redirect URI
        #[arg(long)]
        code: String,
        #[command(flatten)]
        auth: AuthArgs,
    },
    /// Request a token with the client credentials grant
    ClientToken(AuthArgs),
}

#[derive(Debug, Args)]
pub struct AuthArgs {
    /// Services the token is scoped to
    #[arg(long, value_delimiter = ',', default_value = "WorldCatMetadataAPI")]
    pub services: Vec<String>,

    /// Redirect URI registered with the key
    #[arg(long)]
    pub redirect_uri: Option<String>,

    /// Registry id of the authenticating institution
    #[arg(long)]
    pub auth_inst: String,

    /// Registry id of the context institution; defaults to `--auth-inst`
    #[arg(long)]
    pub context_inst: Option<String>,
}
