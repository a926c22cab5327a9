//! lumina-rs CLI application
//!
//! Command-line interface for the lumina-rs library.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use lumina_rs::api::{
    CommentaryRequest, DefinitionRequest, PassageRequest, Request, SearchRequest, StudyService, TextRequest,
    TopicsRequest, VerseRequest,
};
use lumina_rs::canon::VerseIndex;
use lumina_rs::decoder::ReferenceDecoder;
use lumina_rs::search::Scope;
use lumina_rs::storage::{Dataset, DefinitionKind, setup};
use lumina_rs::Config;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lumina-rs")]
#[command(about = "Scripture text, study aids and full-text search over federated SQLite datasets")]
#[command(version)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding core.db and the optional datasets (overrides the config file)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one chapter
    Text {
        book: String,
        chapter: u16,

        #[arg(short, long, default_value = "KJV")]
        version: String,

        /// Rebuild verses from tagged interlinear words
        #[arg(short, long)]
        interlinear: bool,
    },

    /// Print a verse or a verse range
    Passage {
        book: String,
        chapter: u16,
        verse: u16,

        /// Last verse of the range
        #[arg(short, long)]
        end_verse: Option<u16>,

        #[arg(short, long, default_value = "KJV")]
        version: String,
    },

    /// Print a commentary entry
    Commentary {
        book: String,
        chapter: u16,
        verse: u16,

        /// Commentary abbreviation (defaults to the configured module)
        #[arg(short, long)]
        module: Option<String>,
    },

    /// List cross references of a verse
    Xrefs { book: String, chapter: u16, verse: u16 },

    /// Look up a dictionary or lexicon entry
    Define {
        term: String,

        /// dictionary, strong_hebrew or strong_greek
        #[arg(short = 't', long = "type", default_value = "dictionary")]
        kind: String,

        /// Dictionary module (defaults to the configured dictionary)
        #[arg(short, long)]
        module: Option<String>,
    },

    /// List topics of a dictionary module, or HEBREW / GREEK lexicon ids
    Topics {
        #[arg(short, long)]
        module: Option<String>,
    },

    /// List installed versions
    Versions,

    /// List commentary modules
    Commentaries,

    /// Full-text search
    Search {
        query: String,

        #[arg(short, long, default_value = "KJV")]
        version: String,

        /// ALL, OT, NT or a book name
        #[arg(short, long, default_value = "ALL")]
        scope: String,

        #[arg(short, long, default_value = "0")]
        offset: usize,
    },

    /// Dispatch a raw JSON request, e.g. '{"action":"text","book":"John","chapter":1}'
    Request { json: String },

    /// Decode embedded references in a string
    Decode {
        text: String,

        /// Also decode undelimited hex runs
        #[arg(long)]
        bare: bool,
    },

    /// Convert between a verse id and a reference
    Verse {
        /// A verse id, or a book name followed by chapter and verse
        #[arg(required = true, num_args = 1..=3)]
        args: Vec<String>,
    },

    /// Create empty dataset files with their schema
    Init {
        /// Datasets to create (default: all)
        datasets: Vec<String>,
    },

    /// Rebuild the full-text index of a text dataset
    Reindex {
        #[arg(default_value = "core")]
        dataset: String,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref(), cli.data_dir.clone())?;

    match cli.command {
        Commands::Decode { text, bare } => decode_command(&text, bare),
        Commands::Verse { args } => verse_command(&args),
        Commands::Init { datasets } => init_command(&config, &datasets),
        Commands::Reindex { dataset } => reindex_command(&config, &dataset),
        command => {
            let request = build_request(command)?;
            request_command(config, &request)
        }
    }
}

fn load_config(path: Option<&PathBuf>, data_dir: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(dir) = data_dir {
        config.data.data_dir = dir;
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn build_request(command: Commands) -> anyhow::Result<Request> {
    let request = match command {
        Commands::Text {
            book,
            chapter,
            version,
            interlinear,
        } => Request::Text(TextRequest {
            book,
            chapter,
            version,
            interlinear,
        }),
        Commands::Passage {
            book,
            chapter,
            verse,
            end_verse,
            version,
        } => Request::Passage(PassageRequest {
            book,
            chapter,
            verse,
            end_verse,
            version,
        }),
        Commands::Commentary {
            book,
            chapter,
            verse,
            module,
        } => Request::Commentary(CommentaryRequest {
            book,
            chapter,
            verse,
            module,
        }),
        Commands::Xrefs { book, chapter, verse } => Request::Xrefs(VerseRequest { book, chapter, verse }),
        Commands::Define { term, kind, module } => {
            let kind: DefinitionKind = serde_json::from_value(serde_json::Value::String(kind.clone()))
                .with_context(|| format!("Unknown definition type '{}'", kind))?;
            Request::Definition(DefinitionRequest {
                term,
                kind,
                module,
            })
        }
        Commands::Topics { module } => Request::Topics(TopicsRequest {
            module,
        }),
        Commands::Versions => Request::VersionList,
        Commands::Commentaries => Request::CommentaryList,
        Commands::Search {
            query,
            version,
            scope,
            offset,
        } => {
            let Ok(scope) = scope.parse::<Scope>();
            Request::Search(SearchRequest {
                q: query,
                version,
                scope,
                offset,
            })
        }
        Commands::Request { json } => Request::from_json(&json)?,
        Commands::Decode { .. } | Commands::Verse { .. } | Commands::Init { .. } | Commands::Reindex { .. } => {
            bail!("command does not map to a request")
        }
    };
    request.validate()?;
    Ok(request)
}

fn request_command(config: Config, request: &Request) -> anyhow::Result<()> {
    let service = StudyService::open(config).context("Failed to open datasets")?;
    let response = service.respond(request);
    print_json(&response)
}

fn decode_command(text: &str, bare: bool) -> anyhow::Result<()> {
    let decoder = ReferenceDecoder::canonical();
    let decoded = if bare {
        decoder.decode_bare(text)
    } else {
        decoder.decode(text)
    };
    println!("{}", decoded);
    Ok(())
}

fn verse_command(args: &[String]) -> anyhow::Result<()> {
    let index = VerseIndex::global();
    match args {
        [id] => {
            let raw: i64 = id.parse().with_context(|| format!("'{}' is not a verse id", id))?;
            let verse_ref = index.from_raw(raw)?;
            print_json(&serde_json::json!({ "id": raw, "reference": verse_ref.to_string() }))
        }
        [book, chapter, verse] => {
            let chapter: u16 = chapter.parse().context("chapter must be a number")?;
            let verse: u16 = verse.parse().context("verse must be a number")?;
            let id = index.to_id(book, chapter, verse)?;
            print_json(&serde_json::json!({ "id": id.get(), "reference": format!("{} {}:{}", book, chapter, verse) }))
        }
        _ => bail!("expected a verse id, or a book, chapter and verse"),
    }
}

fn parse_datasets(names: &[String]) -> anyhow::Result<Vec<Dataset>> {
    if names.is_empty() {
        return Ok(Dataset::ALL.to_vec());
    }
    names
        .iter()
        .map(|n| n.parse::<Dataset>().map_err(anyhow::Error::from))
        .collect()
}

fn init_command(config: &Config, names: &[String]) -> anyhow::Result<()> {
    let dir = &config.data.data_dir;
    for dataset in parse_datasets(names)? {
        setup::create_dataset(dir, dataset)
            .with_context(|| format!("Failed to create {} in {}", dataset, dir.display()))?;
        eprintln!("✅ {} ready at {}", dataset, dir.join(dataset.file_name()).display());
    }
    Ok(())
}

fn reindex_command(config: &Config, name: &str) -> anyhow::Result<()> {
    let dataset: Dataset = name.parse()?;
    let indexed = setup::reindex(&config.data.data_dir, dataset)?;
    eprintln!("✅ Indexed {} verses in {}", indexed, dataset);
    Ok(())
}
