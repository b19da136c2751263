use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use clap::error::{ContextKind, ContextValue, ErrorKind};

/// On-screen keyboard for touchscreens without a physical keyboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(name = "touchkeysd", version)]
pub struct Cli {
    /// Path to the touch input device (default: first device with absolute axes)
    #[arg(short = 'd', long, value_name = "PATH")]
    pub device: Option<PathBuf>,

    /// Path to the font file
    #[arg(short = 'f', long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Parses `args`, dropping unrecognized options instead of failing.
    ///
    /// Returns the dropped options so they can be reported once logging is up.
    /// Help, version and malformed values still exit through clap.
    pub fn parse_lenient<I, T>(args: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let mut dropped = Vec::new();
        loop {
            let err = match Self::try_parse_from(&args) {
                Ok(cli) => return (cli, dropped),
                Err(err) => err,
            };
            let removed = match (err.kind(), err.get(ContextKind::InvalidArg)) {
                (ErrorKind::UnknownArgument, Some(ContextValue::String(flag))) => {
                    remove_flag(&mut args, flag)
                }
                _ => None,
            };
            match removed {
                Some(flag) => dropped.push(flag),
                None => err.exit(),
            }
        }
    }
}

/// Takes the argument clap rejected out of `args` and returns it.
///
/// A short option packed with others, like `x` in `-vx`, is cut out of its
/// cluster and the rest of the cluster is kept.
fn remove_flag(args: &mut Vec<OsString>, flag: &str) -> Option<String> {
    if let Some(index) = find_flag(args, flag) {
        return Some(args.remove(index).to_string_lossy().into_owned());
    }
    let letter = short_letter(flag)?;
    let index = args
        .iter()
        .skip(1)
        .position(|arg| {
            let arg = arg.to_string_lossy();
            arg.starts_with('-') && !arg.starts_with("--") && arg[1..].contains(letter)
        })?
        + 1;
    let rest: String = args[index]
        .to_string_lossy()
        .chars()
        .skip(1)
        .filter(|ch| *ch != letter)
        .collect();
    if rest.is_empty() {
        args.remove(index);
    } else {
        args[index] = format!("-{rest}").into();
    }
    Some(flag.to_string())
}

fn short_letter(flag: &str) -> Option<char> {
    let mut chars = flag.strip_prefix('-')?.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter != '-' => Some(letter),
        _ => None,
    }
}

/// Index of the argument clap rejected, skipping the program name.
fn find_flag(args: &[OsString], flag: &str) -> Option<usize> {
    args.iter().skip(1).position(|arg| {
        let arg = arg.to_string_lossy();
        arg == flag
            || arg
                .strip_prefix(flag)
                .is_some_and(|rest| rest.starts_with('='))
    })
    .map(|index| index + 1)
}
