use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub const USAGE: &str = "usage: filehash [--config PATH] [--pretty] [--] FILE...";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub pretty: bool,
    pub files: Vec<PathBuf>,
}

/// Parses arguments following the program name. Everything after `--` is a
/// file, even if it looks like a flag.
pub fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config requires a path argument")?;
                if parsed.config.replace(PathBuf::from(path)).is_some() {
                    bail!("--config given more than once");
                }
            }
            "--pretty" => parsed.pretty = true,
            "--" => parsed.files.extend(args.by_ref().map(PathBuf::from)),
            flag if flag.starts_with('-') && flag != "-" => {
                bail!("unknown option {flag}\n{USAGE}");
            }
            file => parsed.files.push(PathBuf::from(file)),
        }
    }

    if parsed.files.is_empty() {
        bail!("no files given\n{USAGE}");
    }
    Ok(parsed)
}
