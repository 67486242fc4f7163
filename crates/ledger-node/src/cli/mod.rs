//! # Command Line
//!
//! One ledger operation per invocation. Results are printed as JSON on
//! stdout; failures as a sanitized error response.

mod execute;

pub use execute::execute;

use clap::{Args, Parser, Subcommand};
use gl_01_spending_contract::{DocumentStatus, LinkDirection};
use std::path::PathBuf;

/// Gov-Ledger node command line.
#[derive(Debug, Parser)]
#[command(name = "gl-node")]
#[command(about = "Government spending ledger across union, state and municipal channels")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "GL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Data directory (overrides config file and GL_DATA_DIR)
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Keep world state in memory for this invocation only
    #[arg(long)]
    pub in_memory: bool,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show configured channels
    Channels,
    /// Document type registry
    #[command(subcommand)]
    Types(TypeCommand),
    /// Documents on one channel
    #[command(subcommand)]
    Docs(DocCommand),
    /// Cross-channel transfers
    #[command(subcommand)]
    Transfer(TransferCommand),
    /// Anchor verification
    #[command(subcommand)]
    Anchor(AnchorCommand),
}

/// Channel selector shared by per-channel commands.
#[derive(Debug, Clone, Args)]
pub struct ChannelArg {
    /// Channel key (union, state, municipal)
    #[arg(short = 'C', long)]
    pub channel: String,
}

/// Document type commands.
#[derive(Debug, Subcommand)]
pub enum TypeCommand {
    /// Register a document type owned by this node's organization
    Register {
        #[command(flatten)]
        channel: ChannelArg,
        /// Type id
        #[arg(long)]
        id: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// Free text
        #[arg(long, default_value = "")]
        description: String,
        /// Required payload keys, comma separated
        #[arg(long, value_delimiter = ',')]
        required: Vec<String>,
        /// Optional payload keys, comma separated
        #[arg(long, value_delimiter = ',')]
        optional: Vec<String>,
    },
    /// Show a document type
    Get {
        #[command(flatten)]
        channel: ChannelArg,
        /// Type id
        #[arg(long)]
        id: String,
    },
    /// List document types
    List {
        #[command(flatten)]
        channel: ChannelArg,
        /// Only types owned by this organization
        #[arg(long)]
        org: Option<String>,
    },
    /// Stop accepting new documents of a type
    Deactivate {
        #[command(flatten)]
        channel: ChannelArg,
        /// Type id
        #[arg(long)]
        id: String,
    },
}

/// Document commands.
#[derive(Debug, Subcommand)]
pub enum DocCommand {
    /// Create an unlinked document
    Create {
        #[command(flatten)]
        channel: ChannelArg,
        /// Document id (generated when absent)
        #[arg(long)]
        id: Option<String>,
        /// Document type id
        #[arg(long = "type")]
        document_type_id: String,
        /// Title
        #[arg(long)]
        title: String,
        /// Free text
        #[arg(long, default_value = "")]
        description: String,
        /// Amount
        #[arg(long)]
        amount: f64,
        /// Currency (configured default when absent)
        #[arg(long)]
        currency: Option<String>,
        /// Payload as a JSON object
        #[arg(long)]
        data: Option<String>,
    },
    /// Show a document
    Get {
        #[command(flatten)]
        channel: ChannelArg,
        /// Document id
        #[arg(long)]
        id: String,
    },
    /// Every committed version of a document
    History {
        #[command(flatten)]
        channel: ChannelArg,
        /// Document id
        #[arg(long)]
        id: String,
    },
    /// A document and its counterpart on another channel
    Linked {
        #[command(flatten)]
        channel: ChannelArg,
        /// Document id
        #[arg(long)]
        id: String,
    },
    /// Mark a document invalid
    Invalidate {
        #[command(flatten)]
        channel: ChannelArg,
        /// Document id
        #[arg(long)]
        id: String,
        /// Why the document is invalid
        #[arg(long)]
        reason: String,
        /// Document that corrects this one
        #[arg(long)]
        correction: Option<String>,
    },
    /// Filtered, paginated search
    Query {
        #[command(flatten)]
        channel: ChannelArg,
        #[command(flatten)]
        filter: QueryArgs,
    },
}

/// Query filter flags.
#[derive(Debug, Clone, Default, Args)]
pub struct QueryArgs {
    /// Creating organization
    #[arg(long)]
    pub org: Option<String>,
    /// Document type id
    #[arg(long = "type")]
    pub document_type_id: Option<String>,
    /// ACTIVE or INVALIDATED
    #[arg(long)]
    pub status: Option<DocumentStatus>,
    /// Earliest createdAt (RFC 3339)
    #[arg(long)]
    pub from_date: Option<String>,
    /// Latest createdAt (RFC 3339)
    #[arg(long)]
    pub to_date: Option<String>,
    /// Minimum amount
    #[arg(long)]
    pub min_amount: Option<f64>,
    /// Maximum amount
    #[arg(long)]
    pub max_amount: Option<f64>,
    /// Only linked (true) or unlinked (false) documents
    #[arg(long)]
    pub has_link: Option<bool>,
    /// OUTGOING or INCOMING
    #[arg(long)]
    pub direction: Option<LinkDirection>,
    /// Documents per page
    #[arg(long)]
    pub page_size: Option<i64>,
    /// Cursor from a previous page
    #[arg(long)]
    pub bookmark: Option<String>,
}

/// Transfer commands.
#[derive(Debug, Subcommand)]
pub enum TransferCommand {
    /// Record the sending half on the source channel
    Initiate {
        /// Sending channel key
        #[arg(long)]
        from: String,
        /// Receiving channel key
        #[arg(long)]
        to: String,
        /// Receiving organization
        #[arg(long)]
        to_org: String,
        /// Document type id
        #[arg(long = "type")]
        document_type_id: String,
        /// Title
        #[arg(long)]
        title: String,
        /// Free text
        #[arg(long, default_value = "")]
        description: String,
        /// Transferred amount
        #[arg(long)]
        amount: f64,
        /// Currency (configured default when absent)
        #[arg(long)]
        currency: Option<String>,
        /// Payload as a JSON object
        #[arg(long)]
        data: Option<String>,
    },
    /// Record the receiving half and link the source back
    Acknowledge {
        #[command(flatten)]
        channel: ChannelArg,
        /// Sending channel key
        #[arg(long)]
        source_channel: String,
        /// Id of the sending document
        #[arg(long)]
        source_doc: String,
        /// Document type id
        #[arg(long = "type")]
        document_type_id: String,
        /// Title
        #[arg(long)]
        title: String,
        /// Free text
        #[arg(long, default_value = "")]
        description: String,
        /// Payload as a JSON object
        #[arg(long)]
        data: Option<String>,
    },
}

/// Anchor commands.
#[derive(Debug, Subcommand)]
pub enum AnchorCommand {
    /// Compare both halves of a transfer
    Verify {
        /// Sending channel key
        #[arg(long)]
        source_channel: String,
        /// Sending document id
        #[arg(long)]
        source_doc: String,
        /// Receiving channel key
        #[arg(long)]
        target_channel: String,
        /// Receiving document id
        #[arg(long)]
        target_doc: String,
    },
}

impl Command {
    /// Operation name reported in error context.
    pub fn operation(&self) -> &'static str {
        match self {
            Command::Channels => "GetConfig",
            Command::Types(TypeCommand::Register { .. }) => "RegisterDocumentType",
            Command::Types(TypeCommand::Get { .. }) => "GetDocumentType",
            Command::Types(TypeCommand::List { .. }) => "ListDocumentTypes",
            Command::Types(TypeCommand::Deactivate { .. }) => "DeactivateDocumentType",
            Command::Docs(DocCommand::Create { .. }) => "CreateDocument",
            Command::Docs(DocCommand::Get { .. }) => "GetDocument",
            Command::Docs(DocCommand::History { .. }) => "GetDocumentHistory",
            Command::Docs(DocCommand::Linked { .. }) => "GetLinkedDocuments",
            Command::Docs(DocCommand::Invalidate { .. }) => "InvalidateDocument",
            Command::Docs(DocCommand::Query { .. }) => "QueryDocuments",
            Command::Transfer(TransferCommand::Initiate { .. }) => "InitiateTransfer",
            Command::Transfer(TransferCommand::Acknowledge { .. }) => "AcknowledgeTransfer",
            Command::Anchor(AnchorCommand::Verify { .. }) => "VerifyAnchor",
        }
    }
}
