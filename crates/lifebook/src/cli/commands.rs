//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Lifebook - turn first-person answers into a life story
#[derive(Parser, Debug)]
#[command(name = "lifebook")]
#[command(about = "Turn first-person answers into chapter narratives and a compiled life story", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to the standard search locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding generated chapters and books
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate (or regenerate) one chapter from a facts file
    Chapter {
        /// Person the chapter belongs to
        #[arg(long)]
        person: String,

        /// Chapter identifier
        #[arg(long)]
        chapter_id: String,

        /// Chapter title
        #[arg(long)]
        title: String,

        /// Position of the chapter in the book
        #[arg(long)]
        order: i32,

        /// JSON file with an array of facts
        #[arg(long)]
        facts: PathBuf,

        /// Style guide file
        #[arg(long)]
        style_guide: Option<PathBuf>,

        /// Context text replacing the summaries of earlier chapters
        #[arg(long)]
        context: Option<String>,

        /// Fail instead of generating from an empty facts file
        #[arg(long)]
        require_facts: bool,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Compile every generated chapter for a person into a book
    Compile {
        /// Person whose book to compile
        #[arg(long)]
        person: String,

        /// Style guide file
        #[arg(long)]
        style_guide: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Print the most recently compiled book
    ShowBook {
        /// Person whose book to show
        #[arg(long)]
        person: String,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Print a generated chapter
    ShowChapter {
        /// Person the chapter belongs to
        #[arg(long)]
        person: String,

        /// Chapter identifier
        #[arg(long)]
        chapter_id: String,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Human,
    /// Full JSON record
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chapter_command() {
        let cli = Cli::try_parse_from([
            "lifebook",
            "chapter",
            "--person",
            "p-1",
            "--chapter-id",
            "2",
            "--title",
            "Youth",
            "--order",
            "2",
            "--facts",
            "facts.json",
            "--store",
            "/tmp/store",
        ])
        .unwrap();

        assert_eq!(cli.store, Some(PathBuf::from("/tmp/store")));
        match cli.command {
            Commands::Chapter {
                person,
                order,
                require_facts,
                format,
                ..
            } => {
                assert_eq!(person, "p-1");
                assert_eq!(order, 2);
                assert!(!require_facts);
                assert_eq!(format, OutputFormat::Human);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parses_compile_with_json_output() {
        let cli = Cli::try_parse_from([
            "lifebook", "-v", "compile", "--person", "p-1", "--format", "json",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Compile {
                format: OutputFormat::Json,
                ..
            }
        ));
    }

    #[test]
    fn chapter_requires_facts_file() {
        let result = Cli::try_parse_from([
            "lifebook", "chapter", "--person", "p", "--chapter-id", "1", "--title", "t", "--order",
            "1",
        ]);
        assert!(result.is_err());
    }
}
