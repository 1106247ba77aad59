use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use morphtier_backend::corpus::{builtin, CorpusConfig, CorpusProfile, BUILTIN_NAMES};
use morphtier_backend::logger;
use morphtier_backend::parser::SessionParser;

#[derive(Parser, Debug)]
#[command(name = "morphtier", about = "Morphology-tier engine for CHAT transcripts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a CHAT transcript into utterance records, one JSON value each
    #[command(arg_required_else_help = true)]
    Parse {
        /// Path to the transcript file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Built-in corpus profile name, or a path to a profile JSON file
        #[arg(long, value_name = "NAME", default_value = "chat_default")]
        corpus: String,

        /// Pretty-print one JSON array instead of JSON lines
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },

    /// List the built-in corpus profiles
    Corpora,
}

fn load_config(corpus: &str) -> Result<CorpusConfig> {
    let profile = match builtin(corpus) {
        Some(profile) => profile,
        None => {
            let path = PathBuf::from(corpus);
            if !path.exists() {
                anyhow::bail!("Unknown corpus profile: {}", corpus);
            }
            CorpusProfile::load_file(&path)?
        }
    };

    let config = profile.build()?;
    Ok(config)
}

/// Split a transcript into raw record blocks.
///
/// A block starts at a main line (`*`) and extends over the dependent
/// tiers (`%`) and continuation lines (leading tab) that follow it.
/// Metadata lines (`@`) end the current block and are skipped.
fn record_blocks(transcript: &str) -> Vec<String> {
    let mut blocks: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    for line in transcript.lines() {
        if line.starts_with('*') {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            current = Some(line.to_string());
        } else if line.starts_with('@') {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
        } else if let Some(block) = current.as_mut() {
            block.push('\n');
            block.push_str(line);
        }
    }

    if let Some(block) = current {
        blocks.push(block);
    }

    blocks
}

fn parse_file(file: &PathBuf, corpus: &str, pretty: bool) -> Result<()> {
    let config = load_config(corpus)?;

    let transcript = std::fs::read_to_string(file)
        .with_context(|| format!("Can't read transcript {}", file.display()))?;

    let session_stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut parser = SessionParser::new(&config, &session_stem);

    let utterances: Vec<_> = record_blocks(&transcript)
        .iter()
        .filter_map(|block| parser.parse_block(block))
        .collect();

    logger::info(&format!(
        "{}: {} utterances ({})",
        session_stem,
        utterances.len(),
        config.name
    ));

    if pretty {
        println!("{}", serde_json::to_string_pretty(&utterances)?);
    } else {
        for utt in &utterances {
            println!("{}", serde_json::to_string(utt)?);
        }
    }

    Ok(())
}

fn main() {
    dotenv().ok();

    if let Err(e) = logger::init_tracing() {
        eprintln!("Can't initialize logging: {}", e);
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { file, corpus, pretty } => parse_file(&file, &corpus, pretty),
        Commands::Corpora => {
            for name in BUILTIN_NAMES {
                println!("{}", name);
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        logger::error(&format!("{:#}", e));
        exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_blocks() {
        let transcript = "@Begin\n@Participants:\tCHI Child\n*CHI:\tda .\n%eng:\tthere\n*MOT:\tja\n\tne .\n@End\n";
        let blocks = record_blocks(transcript);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], "*CHI:\tda .\n%eng:\tthere");
        assert_eq!(blocks[1], "*MOT:\tja\n\tne .");
    }

    #[test]
    fn test_builtin_corpora_load() {
        for name in BUILTIN_NAMES {
            assert!(load_config(name).is_ok());
        }
    }
}
