// ============================================================================
// engram — store and find semantic memories from the command line
// ============================================================================
// Usage:
//   engram store "the sky is blue" --metadata '{"topic":"color"}'
//   engram find "sky color"
//
// Configuration comes from the environment (or a .env file):
//   OPENAI_API_KEY (required), OPENAI_BASE_URL, OPENAI_EMBEDDING_MODEL,
//   QDRANT_URL, QDRANT_API_KEY, QDRANT_COLLECTION_NAME, QDRANT_SEARCH_LIMIT
// ============================================================================

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use engram_core::{
    create_embedding_provider, MemoryService, Metadata, QdrantConnector, Settings,
};
use tracing_subscriber::EnvFilter;

/// Semantic memory over a Qdrant vector index
#[derive(Parser)]
#[command(name = "engram", version, about = "Store free-text notes and find them again by meaning")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a note, optionally with structured metadata
    Store {
        /// The text to remember
        information: String,

        /// Metadata to keep alongside the note, as a JSON object
        #[arg(long)]
        metadata: Option<String>,
    },

    /// Find notes semantically related to a query
    Find {
        /// Free-text query
        query: String,
    },
}

fn parse_metadata(raw: &str) -> Result<Metadata> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context("metadata is not valid JSON")?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => bail!("metadata must be a JSON object"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    let provider = create_embedding_provider(&settings.openai)?;
    let connector = QdrantConnector::new(&settings.qdrant, provider)?;
    let service = MemoryService::new(connector, settings.qdrant.search_limit);

    match cli.command {
        Commands::Store {
            information,
            metadata,
        } => {
            // Malformed metadata is rejected here, before the connector runs
            let metadata = metadata.as_deref().map(parse_metadata).transpose()?;
            let confirmation = service.store_memory(&information, metadata).await?;
            println!("{confirmation}");
        }
        Commands::Find { query } => match service.find_memories(&query).await? {
            Some(lines) => {
                for line in lines {
                    println!("{line}");
                }
            }
            None => println!("No memories found for the query '{query}'"),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_metadata_parses() {
        let metadata = parse_metadata(r#"{"topic":"color","rank":1}"#).unwrap();
        assert_eq!(metadata["topic"], "color");
        assert_eq!(metadata["rank"], 1);
    }

    #[test]
    fn non_object_metadata_is_rejected() {
        assert!(parse_metadata(r#"["a","b"]"#).is_err());
        assert!(parse_metadata("42").is_err());
        assert!(parse_metadata("not json").is_err());
    }
}
