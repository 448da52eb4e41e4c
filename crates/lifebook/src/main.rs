//! Lifebook CLI binary.
//!
//! This binary provides command-line access to Lifebook:
//! - Generate chapters from facts files
//! - Compile generated chapters into a book
//! - Inspect stored chapters and books

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        ChapterArgs, Cli, Commands, compile_book, generate_chapter, load_config, show_book,
        show_chapter,
    };

    // API keys may live in a local .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    lifebook::init_console_telemetry(cli.verbose)?;

    let store = cli.store.unwrap_or_else(lifebook::default_store_dir);

    match cli.command {
        Commands::Chapter {
            person,
            chapter_id,
            title,
            order,
            facts,
            style_guide,
            context,
            require_facts,
            format,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let args = ChapterArgs {
                person,
                chapter_id,
                title,
                order,
                facts,
                style_guide,
                context,
                require_facts,
            };
            generate_chapter(&config, &store, args, format).await?;
        }

        Commands::Compile {
            person,
            style_guide,
            format,
        } => {
            let config = load_config(cli.config.as_deref())?;
            compile_book(&config, &store, &person, style_guide, format).await?;
        }

        Commands::ShowBook { person, format } => {
            show_book(&store, &person, format).await?;
        }

        Commands::ShowChapter {
            person,
            chapter_id,
            format,
        } => {
            show_chapter(&store, &person, &chapter_id, format).await?;
        }
    }

    Ok(())
}
