//! Scenic Serenity Arts - assemble and inspect site pages.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use media::AutoplayPolicy;
use site::{Page, PageTable, SiteConfig};

/// Assemble a Scenic Serenity Arts page
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Page id to assemble
    #[arg(default_value = "home")]
    page: String,

    /// Emulate a touch device
    #[arg(long)]
    touch: bool,

    /// Reject every autoplay request
    #[arg(long)]
    block_autoplay: bool,

    /// Dump DOM tree
    #[arg(long)]
    dump_dom: bool,

    /// List available pages and exit
    #[arg(long)]
    list: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Scenic Serenity Arts site v{}", site::VERSION);

    let table = PageTable::builtin()?;

    if args.list {
        for page in table.iter() {
            println!("{:<16} {:<22} {}", page.id, page.href, page.page_title);
        }
        return Ok(());
    }

    let mut config = if args.touch {
        SiteConfig::mobile()
    } else {
        SiteConfig::default()
    };
    if args.block_autoplay {
        config.autoplay_policy = AutoplayPolicy::Blocked;
    }

    let page = Page::assemble(&config, &table, &args.page)?;
    info!(
        "Assembled '{}': {} cards, {} videos",
        page.title(),
        page.cards().len(),
        page.videos().len()
    );

    if args.dump_dom {
        println!("{}", page.render_html());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default() {
        let args = Args::parse_from(["scenic-site"]);
        assert_eq!(args.page, "home");
        assert!(!args.touch);
        assert!(!args.dump_dom);
    }

    #[test]
    fn test_args_with_page() {
        let args = Args::parse_from(["scenic-site", "lifestyle", "--touch", "--block-autoplay"]);
        assert_eq!(args.page, "lifestyle");
        assert!(args.touch);
        assert!(args.block_autoplay);
    }

    #[test]
    fn test_args_verbose() {
        let args = Args::parse_from(["scenic-site", "-v", "--list"]);
        assert!(args.verbose);
        assert!(args.list);
    }
}
