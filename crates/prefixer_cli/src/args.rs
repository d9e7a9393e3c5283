//! Command line parsing and option assembly.

use anyhow::{Context as _, Result, anyhow, bail};
use css_prefixer::{FlexboxMode, GridMode, Options};
use std::fs;
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: css-prefixer [OPTIONS] [INPUT]

Reads CSS from INPUT (or stdin when INPUT is missing or `-`) and writes the
prefixed stylesheet to stdout.

Options:
  -b, --browsers <QUERY>   Browser query, may be repeated
  -c, --config <FILE>      JSON file with processing options
  -o, --output <FILE>      Write the result to FILE
      --grid <MODE>        off, no-autoplace or autoplace
      --flexbox <MODE>     on, off or no-2009
      --no-supports        Leave @supports conditions alone
      --no-cascade         Do not align prefixed declarations
      --no-add             Only remove outdated prefixes
      --no-remove          Keep outdated prefixes
      --info               Print what the selected browsers need
      --json               With --info, print the report as JSON
  -h, --help               Print this help";

/// Parsed command line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub browsers: Vec<String>,
    pub grid: Option<GridMode>,
    pub flexbox: Option<FlexboxMode>,
    pub supports: Option<bool>,
    pub cascade: Option<bool>,
    pub add: Option<bool>,
    pub remove: Option<bool>,
    pub info: bool,
    pub json: bool,
    pub help: bool,
}

fn flexbox_mode(keyword: &str) -> Result<FlexboxMode> {
    match keyword {
        "on" | "true" => Ok(FlexboxMode::All),
        "off" | "false" => Ok(FlexboxMode::Off),
        "no-2009" => Ok(FlexboxMode::No2009),
        _ => bail!("unknown flexbox mode `{keyword}`"),
    }
}

fn grid_mode(keyword: &str) -> Result<GridMode> {
    GridMode::from_keyword(keyword).ok_or_else(|| anyhow!("unknown grid mode `{keyword}`"))
}

impl Args {
    /// Parse arguments, without the program name.
    ///
    /// # Errors
    /// Returns an error for unknown flags, missing flag values or a second
    /// input file.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| args.next().ok_or_else(|| anyhow!("{flag} needs a value"));
            match arg.as_str() {
                "-b" | "--browsers" => parsed.browsers.push(value(&arg)?),
                "-c" | "--config" => parsed.config = Some(PathBuf::from(value(&arg)?)),
                "-o" | "--output" => parsed.output = Some(PathBuf::from(value(&arg)?)),
                "--grid" => parsed.grid = Some(grid_mode(&value(&arg)?)?),
                "--flexbox" => parsed.flexbox = Some(flexbox_mode(&value(&arg)?)?),
                "--no-supports" => parsed.supports = Some(false),
                "--no-cascade" => parsed.cascade = Some(false),
                "--no-add" => parsed.add = Some(false),
                "--no-remove" => parsed.remove = Some(false),
                "--info" => parsed.info = true,
                "--json" => parsed.json = true,
                "-h" | "--help" => parsed.help = true,
                flag if flag.starts_with('-') && flag != "-" => bail!("unknown option `{flag}`"),
                _ => {
                    if parsed.input.is_some() {
                        bail!("only one input file can be given");
                    }
                    parsed.input = Some(PathBuf::from(&arg));
                }
            }
        }
        Ok(parsed)
    }

    /// Build processing options: the config file first, then flags, then
    /// `env_grid` (the `AUTOPREFIXER_GRID` value) when nothing set `grid`.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or parsed.
    pub fn options(&self, env_grid: Option<&str>) -> Result<Options> {
        let (mut options, config_grid) = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                let raw: serde_json::Value = serde_json::from_str(&text)
                    .with_context(|| format!("failed to parse config {}", path.display()))?;
                let has_grid = raw.get("grid").is_some();
                let options: Options = serde_json::from_value(raw)
                    .with_context(|| format!("invalid options in {}", path.display()))?;
                (options, has_grid)
            }
            None => (Options::default(), false),
        };
        if !self.browsers.is_empty() {
            options.browsers.clone_from(&self.browsers);
        }
        if let Some(flexbox) = self.flexbox {
            options.flexbox = flexbox;
        }
        if let Some(supports) = self.supports {
            options.supports = supports;
        }
        if let Some(cascade) = self.cascade {
            options.cascade = cascade;
        }
        if let Some(add) = self.add {
            options.add = add;
        }
        if let Some(remove) = self.remove {
            options.remove = remove;
        }
        match (self.grid, env_grid) {
            (Some(grid), _) => options.grid = grid,
            (None, Some(keyword)) if !config_grid => {
                if let Some(grid) = GridMode::from_keyword(keyword).filter(|grid| grid.is_enabled()) {
                    options.grid = grid;
                }
            }
            _ => {}
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn parse(args: &[&str]) -> Result<Args> {
        Args::parse(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn flags_and_input_are_read() {
        let args = parse(&["-b", "ie 11", "--browsers", "chrome 30", "--grid", "autoplace", "in.css"]).unwrap();
        assert_eq!(args.browsers, ["ie 11", "chrome 30"]);
        assert_eq!(args.grid, Some(GridMode::Autoplace));
        assert_eq!(args.input, Some(PathBuf::from("in.css")));
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse(&["--browsers"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
        assert!(parse(&["--flexbox", "sometimes"]).is_err());
        assert!(parse(&["a.css", "b.css"]).is_err());
    }

    #[test]
    fn environment_grid_only_fills_gaps() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.options(Some("autoplace")).unwrap().grid, GridMode::Autoplace);
        assert_eq!(args.options(Some("off")).unwrap().grid, GridMode::Off);
        let flagged = parse(&["--grid", "off"]).unwrap();
        assert_eq!(flagged.options(Some("autoplace")).unwrap().grid, GridMode::Off);
    }

    #[test]
    fn config_file_comes_before_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"browsers": ["ie 10"], "grid": false, "cascade": false}}"#).unwrap();
        let path = file.path().to_string_lossy().into_owned();
        let args = parse(&["--config", &path, "--browsers", "chrome 20"]).unwrap();
        let options = args.options(Some("autoplace")).unwrap();
        assert_eq!(options.browsers, ["chrome 20"]);
        assert_eq!(options.grid, GridMode::Off);
        assert!(!options.cascade);
    }
}
