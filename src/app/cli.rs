use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Fingerprint the file layout of directory trees without reading file contents"
)]
pub struct Cli {
    /// Folders to scan recursively, or input-list files
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory every relative path is resolved against (default: current directory)
    #[arg(long, short = 'b')]
    pub base: Option<PathBuf>,

    /// Extensions to include (e.g. '-e .rs -e .toml' or '-e .rs,.toml'; '_' for files without one)
    #[arg(long = "ext", short = 'e', action = ArgAction::Append, value_delimiter = ',')]
    pub exts: Option<Vec<String>>,

    /// File names or base-relative paths to ignore (repeatable)
    #[arg(long = "ignore", short = 'i', action = ArgAction::Append)]
    pub ignores: Option<Vec<String>>,

    /// Scanner backend: 'portable' or 'accelerated'
    #[arg(long, short = 's', default_value = "portable")]
    pub scanner: String,

    /// Follow symbolic links while scanning
    #[arg(long, short = 'L')]
    pub follow_symlinks: bool,

    /// Echo accepted and rejected paths
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Print the elapsed time to stderr
    #[arg(long, short = 't')]
    pub time: bool,

    /// Use a predefined set of filters from presets.toml
    #[arg(long)]
    pub preset: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("treehash").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn filter_flags_do_not_swallow_inputs() {
        let cli = parse(&["-e", ".rs", "src"]);
        assert_eq!(cli.exts, Some(vec![".rs".to_string()]));
        assert_eq!(cli.inputs, vec![PathBuf::from("src")]);

        let cli = parse(&["-e", ".rs", "-i", "target", "src", "layout.txt"]);
        assert_eq!(cli.ignores, Some(vec!["target".to_string()]));
        assert_eq!(
            cli.inputs,
            vec![PathBuf::from("src"), PathBuf::from("layout.txt")]
        );
    }

    #[test]
    fn repeated_and_comma_separated_extensions() {
        let cli = parse(&["--ext", ".rs,.toml", "-e", "_", "-i", "My Documents", "-i", "build", "."]);
        assert_eq!(
            cli.exts,
            Some(vec![".rs".to_string(), ".toml".to_string(), "_".to_string()])
        );
        assert_eq!(
            cli.ignores,
            Some(vec!["My Documents".to_string(), "build".to_string()])
        );
        assert_eq!(cli.scanner, "portable");
    }

    #[test]
    fn inputs_are_required() {
        let err = Cli::try_parse_from(["treehash", "-e", ".rs"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
