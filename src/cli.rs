use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prerender")]
#[command(
    version,
    about = "Prerender - Serve headless-rendered HTML to crawlers",
    long_about = "Prerender\n\nModes:\n- render: render one URL in a headless browser and print the HTML.\n- detect: classify a User-Agent against the configured bot signatures.\n- serve: run a demo listener that prerenders an origin site for bots and redirects everyone else.\n\nConfiguration is read from prerender.toml next to the executable unless --config is given; a missing file is an error."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose (debug) logging")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Config file (TOML); defaults to prerender.toml beside the executable"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value = "text", help = "Output format")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a URL and print the resulting HTML
    Render {
        #[arg(help = "Absolute URL to render (including scheme)")]
        url: String,

        #[arg(long, short, help = "Write the HTML to this file instead of stdout")]
        output: Option<PathBuf>,
    },

    /// Check whether a User-Agent belongs to a known bot
    Detect {
        #[arg(help = "User-Agent string to classify")]
        user_agent: String,
    },

    /// Run the demo prerender listener
    Serve {
        #[arg(long, value_name = "ADDR", help = "Listen address (overrides server.listen)")]
        listen: Option<SocketAddr>,

        #[arg(long, value_name = "URL", help = "Origin site to prerender (overrides server.origin)")]
        origin: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_flags_parse() {
        let cli = Cli::try_parse_from([
            "prerender",
            "serve",
            "--listen",
            "0.0.0.0:8080",
            "--origin",
            "https://example.com",
        ])
        .unwrap();
        match cli.command {
            Commands::Serve { listen, origin } => {
                assert_eq!(listen.map(|a| a.port()), Some(8080));
                assert_eq!(origin.as_deref(), Some("https://example.com"));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "prerender",
            "detect",
            "Googlebot",
            "--format",
            "json",
            "--config",
            "p.toml",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("p.toml")));
    }
}
