use std::fmt;
use std::path::PathBuf;

use exam_core::model::DocumentId;

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFlag { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDocumentId { raw: String },
    InvalidTopicIndex { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFlag { flag } => write!(f, "{flag} is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDocumentId { raw } => write!(f, "invalid --doc value: {raw:?}"),
            ArgsError::InvalidTopicIndex { raw } => write!(f, "invalid --topic value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_document_id(raw: String) -> Result<DocumentId, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidDocumentId { raw })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Documents,
    Topics { document: DocumentId },
    Toggle { document: DocumentId, topic: usize, save: bool },
    Playlists { document: DocumentId },
    Quiz { document: DocumentId },
    Analyze { name: String, papers: Vec<PathBuf>, syllabus: Vec<PathBuf> },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub api_url: Option<String>,
    pub token: Option<String>,
}

/// Flags shared by every subcommand, collected while parsing.
#[derive(Default)]
struct Flags {
    api_url: Option<String>,
    token: Option<String>,
    document: Option<DocumentId>,
    topic: Option<usize>,
    save: bool,
    name: Option<String>,
    papers: Vec<PathBuf>,
    syllabus: Vec<PathBuf>,
}

impl Flags {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut flags = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => flags.api_url = Some(require_value(args, "--api-url")?),
                "--token" => flags.token = Some(require_value(args, "--token")?),
                "--doc" => {
                    flags.document = Some(parse_document_id(require_value(args, "--doc")?)?);
                }
                "--topic" => {
                    let value = require_value(args, "--topic")?;
                    let parsed = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidTopicIndex { raw: value.clone() })?;
                    flags.topic = Some(parsed);
                }
                "--save" => flags.save = true,
                "--name" => flags.name = Some(require_value(args, "--name")?),
                "--paper" => flags.papers.push(require_value(args, "--paper")?.into()),
                "--syllabus" => flags.syllabus.push(require_value(args, "--syllabus")?.into()),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(flags)
    }

    fn document(&mut self) -> Result<DocumentId, ArgsError> {
        self.document
            .take()
            .ok_or(ArgsError::MissingFlag { flag: "--doc" })
    }
}

impl Args {
    /// Parse the arguments after the program name.
    pub fn parse(argv: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut iter = argv.into_iter();
        let Some(first) = iter.next() else {
            return Ok(Self::help());
        };
        if matches!(first.as_str(), "--help" | "-h" | "help") {
            return Ok(Self::help());
        }

        let mut flags = Flags::parse(&mut iter)?;
        let command = match first.as_str() {
            "documents" => Command::Documents,
            "topics" => Command::Topics {
                document: flags.document()?,
            },
            "toggle" => Command::Toggle {
                document: flags.document()?,
                topic: flags.topic.ok_or(ArgsError::MissingFlag { flag: "--topic" })?,
                save: flags.save,
            },
            "playlists" => Command::Playlists {
                document: flags.document()?,
            },
            "quiz" => Command::Quiz {
                document: flags.document()?,
            },
            "analyze" => Command::Analyze {
                // Blank names are reported by the analysis service.
                name: flags.name.take().unwrap_or_default(),
                papers: std::mem::take(&mut flags.papers),
                syllabus: std::mem::take(&mut flags.syllabus),
            },
            _ => return Err(ArgsError::UnknownCommand(first)),
        };

        Ok(Self {
            command,
            api_url: flags.api_url,
            token: flags.token,
        })
    }

    fn help() -> Self {
        Self {
            command: Command::Help,
            api_url: None,
            token: None,
        }
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  examprep documents");
    eprintln!("  examprep topics    --doc <id>");
    eprintln!("  examprep toggle    --doc <id> --topic <index> [--save]");
    eprintln!("  examprep playlists --doc <id>");
    eprintln!("  examprep quiz      --doc <id>");
    eprintln!("  examprep analyze   --name <name> --paper <file>... [--syllabus <file>...]");
    eprintln!();
    eprintln!("Every subcommand accepts --api-url <url> and --token <token>.");
    eprintln!();
    eprintln!("Environment (a .env file is read if present):");
    eprintln!("  EXAMPREP_API_URL, EXAMPREP_TOKEN, EXAMPREP_USER_NAME, EXAMPREP_TIMEOUT_SECS, RUST_LOG");
}
