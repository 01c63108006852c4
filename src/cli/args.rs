//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use pismo::Script;
use std::path::PathBuf;

/// Pismo dual-script (Cyrillic/Latin) toolkit CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: pismo.toml)
    #[arg(short = 'C', long, global = true, default_value = "pismo.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Transliterate text, stdin or files
    #[command(visible_alias = "c")]
    Convert {
        #[command(flatten)]
        args: ConvertArgs,
    },

    /// Print the cut-Latin slug of a text
    Slug {
        /// Text to slugify
        text: String,
    },

    /// Print the address of a URL in the given script
    #[command(visible_alias = "u")]
    Url {
        /// Target script (cir, lat)
        #[arg(short, long, value_parser = parse_script)]
        to: Script,

        /// Absolute or root-relative URL
        url: String,
    },

    /// Resolve the script of a request and print the result as JSON
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },

    /// Serve a directory through the dual-script pipeline
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        args: ServeArgs,
    },
}

/// Convert command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Text to convert. Reads stdin when omitted and no files are given.
    pub text: Option<String>,

    /// Target script (cir, lat)
    #[arg(short, long, value_parser = parse_script)]
    pub to: Script,

    /// Drop diacritics from Latin output (č → c, đ → dj)
    #[arg(long)]
    pub cut: bool,

    /// Files to convert; output is written next to each as `<stem>.<slug>.<ext>`
    #[arg(short, long = "file", value_name = "PATH", value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
}

/// Resolve command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Request URI (path and query)
    #[arg(short, long)]
    pub uri: String,

    /// Value of the script preference cookie
    #[arg(long)]
    pub cookie: Option<String>,

    /// Request kind; derived from the URI when omitted
    #[arg(short, long, value_enum)]
    pub kind: Option<KindArg>,

    /// AJAX action (with `--kind ajax`)
    #[arg(short, long)]
    pub action: Option<String>,
}

/// Serve command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Directory to serve (overrides `serve.root`)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long)]
    pub interface: Option<std::net::IpAddr>,

    /// Port number to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Frontend,
    Admin,
    Rest,
    Ajax,
}

fn parse_script(value: &str) -> Result<Script, String> {
    Script::parse(value).ok_or_else(|| format!("unknown script '{value}', expected 'cir' or 'lat'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::parse_from(["pismo", "convert", "--to", "lat", "--cut", "Ђорђе"]);
        let Commands::Convert { args } = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.to, Script::Latin);
        assert!(args.cut);
        assert_eq!(args.text.as_deref(), Some("Ђорђе"));
        assert_eq!(cli.config, PathBuf::from("pismo.toml"));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["pismo", "slug", "Вести", "-v", "-C", "site.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
    }

    #[test]
    fn test_rejects_unknown_script() {
        assert!(Cli::try_parse_from(["pismo", "url", "--to", "xyz", "/"]).is_err());
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::parse_from([
            "pismo", "resolve", "--uri", "/lat/", "--kind", "ajax", "--action", "load_more",
        ]);
        let Commands::Resolve { args } = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.kind, Some(KindArg::Ajax));
        assert_eq!(args.action.as_deref(), Some("load_more"));
    }
}
