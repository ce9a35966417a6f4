//! Bookshelf CLI
//!
//! Runs one catalog operation per invocation and prints the response body
//! as JSON. Non-2xx responses exit with status 1.

use anyhow::{Context, Result};
use bookshelf_api::{ApiRequest, ApiResponse, BookApi};
use bookshelf_core::{core_version, init_logging, Database};
use clap::{Args, Parser, Subcommand};
use log::info;
use serde_json::{Map, Value};
use std::process::ExitCode;

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(about = "Bookshelf - a small book catalog over SQLite")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Liveness probe
    Health,
    /// Print the core library version
    Version,
    /// Add a book
    #[command(alias = "add")]
    Create(BookArgs),
    /// Show one book
    Get {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// List books page by page
    #[command(alias = "ls")]
    List {
        /// Rows to skip (default 0)
        #[arg(long, alias = "skip", allow_negative_numbers = true)]
        offset: Option<i64>,
        /// Page size (default 10)
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },
    /// Search by title, author and/or year
    Search {
        /// Case-insensitive title substring
        #[arg(long)]
        title: Option<String>,
        /// Case-insensitive author substring
        #[arg(long)]
        author: Option<String>,
        /// Exact publication year
        #[arg(long, allow_negative_numbers = true)]
        year: Option<i32>,
    },
    /// Replace title, author and year of a book
    Update {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        #[command(flatten)]
        book: BookArgs,
    },
    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
}

/// Book payload given either field by field or as raw JSON.
#[derive(Args)]
struct BookArgs {
    /// Raw JSON payload, e.g. '{"title":"Dune","author":"Herbert"}'
    #[arg(long, conflicts_with_all = ["title", "author", "year"])]
    json: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    author: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    year: Option<i32>,
}

impl BookArgs {
    /// Builds the wire payload. Missing fields are left out so the handler
    /// reports them like any other malformed request.
    fn into_payload(self) -> Result<Value> {
        if let Some(raw) = self.json {
            return serde_json::from_str(&raw).context("--json is not valid JSON");
        }

        let mut payload = Map::new();
        if let Some(title) = self.title {
            payload.insert("title".to_string(), Value::from(title));
        }
        if let Some(author) = self.author {
            payload.insert("author".to_string(), Value::from(author));
        }
        if let Some(year) = self.year {
            payload.insert("year".to_string(), Value::from(year));
        }
        Ok(Value::Object(payload))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let Cli { config, command } = cli;

    init_logging(config.effective_log_level(), config.log_dir.as_deref())
        .context("failed to initialize logging")?;

    let request = match command {
        Commands::Version => {
            println!("bookshelf_core version={}", core_version());
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Health => ApiRequest::Healthcheck,
        Commands::Create(book) => ApiRequest::CreateBook {
            payload: book.into_payload()?,
        },
        Commands::Get { id } => ApiRequest::GetBook { id },
        Commands::List { offset, limit } => ApiRequest::ListBooks { offset, limit },
        Commands::Search {
            title,
            author,
            year,
        } => ApiRequest::SearchBooks {
            title,
            author,
            year,
        },
        Commands::Update { id, book } => ApiRequest::UpdateBook {
            id,
            payload: book.into_payload()?,
        },
        Commands::Delete { id } => ApiRequest::DeleteBook { id },
    };

    let db = Database::open(&config.db)
        .with_context(|| format!("failed to open database `{}`", config.db.display()))?;
    info!("event=cli_start module=cli status=ok op={}", request.operation());

    let api = BookApi::new(db);
    let response = api.handle(request);
    print_response(&response)?;

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_response(response: &ApiResponse) -> Result<()> {
    let body = serde_json::to_string_pretty(&response.body).context("failed to encode response")?;
    println!("{body}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{BookArgs, Cli, Commands};
    use clap::{CommandFactory, Parser};
    use serde_json::json;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn field_flags_build_payload_without_missing_fields() {
        let args = BookArgs {
            json: None,
            title: Some("Dune".to_string()),
            author: None,
            year: Some(1965),
        };
        assert_eq!(
            args.into_payload().unwrap(),
            json!({ "title": "Dune", "year": 1965 })
        );
    }

    #[test]
    fn raw_json_payload_is_passed_through() {
        let args = BookArgs {
            json: Some(r#"{"title":"Dune","author":"Herbert"}"#.to_string()),
            title: None,
            author: None,
            year: None,
        };
        assert_eq!(
            args.into_payload().unwrap(),
            json!({ "title": "Dune", "author": "Herbert" })
        );
    }

    #[test]
    fn list_accepts_skip_alias_and_global_db_flag() {
        let cli = Cli::try_parse_from([
            "bookshelf", "list", "--skip", "5", "--limit", "2", "--db", "/tmp/x.db",
        ])
        .unwrap();
        assert_eq!(cli.config.db.to_str(), Some("/tmp/x.db"));
        match cli.command {
            Commands::List { offset, limit } => {
                assert_eq!(offset, Some(5));
                assert_eq!(limit, Some(2));
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn json_conflicts_with_field_flags() {
        let result = Cli::try_parse_from([
            "bookshelf", "create", "--json", "{}", "--title", "Dune",
        ]);
        assert!(result.is_err());
    }
}
