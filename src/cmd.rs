use crate::error::Error;
use crate::key::KeyRecord;
use crate::signer::{SignRequest, Signer};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const USAGE: &str = "
Usage: stpm-sign [ -hV ] -k <keyfile> -f <data>
    -h, --help             Show this help text.
    -V, --version          Show version information.
    -k, --keyfile <file>   Key description file.
    -f, --file <file>      File with the data to sign.
";

pub trait Cmd {
    const NAME: &'static str;

    fn cmd() -> Command;

    fn run<O: Write, E: Write>(&self, m: &ArgMatches, out: &mut O, err: &mut E)
        -> Result<u8, Error>;
}

/// `backend` is only called once the arguments and both files are accepted.
pub struct SignCmd<F> {
    backend: F,
}

impl<F, S> SignCmd<F>
where
    F: Fn() -> Result<S, Error>,
    S: Signer,
{
    pub fn new(backend: F) -> Self {
        Self { backend }
    }

    /// Usage problems are reported to `out`/`err` and give `Ok(1)`. Unreadable
    /// files, malformed keyfiles and backend setup failures are returned as
    /// errors before anything is written.
    pub fn exec<I, T, O, E>(&self, args: I, out: &mut O, err: &mut E) -> Result<u8, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
        O: Write,
        E: Write,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        match Self::cmd().try_get_matches_from(args.iter()) {
            Ok(m) => self.run(&m, out, err),
            Err(_) if Self::wants_help(&args) => Self::help(out),
            Err(e) => {
                let reason = e.to_string();
                let reason = reason
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim_start_matches("error: ");
                Self::usage_error(out, err, reason)
            }
        }
    }

    fn path(m: &ArgMatches, id: &str) -> Option<PathBuf> {
        m.get_one::<String>(id)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }

    fn wants_help(args: &[OsString]) -> bool {
        args.iter().skip(1).any(|a| a == "-h" || a == "--help")
    }

    fn help<O: Write>(out: &mut O) -> Result<u8, Error> {
        out.write_all(USAGE.as_bytes())?;
        out.flush()?;
        Ok(0)
    }

    fn usage_error<O: Write, E: Write>(out: &mut O, err: &mut E, reason: &str) -> Result<u8, Error> {
        out.write_all(USAGE.as_bytes())?;
        out.flush()?;
        writeln!(err, "{}: {reason}", Self::NAME)?;
        err.flush()?;
        Ok(1)
    }
}

impl<F, S> Cmd for SignCmd<F>
where
    F: Fn() -> Result<S, Error>,
    S: Signer,
{
    const NAME: &'static str = "stpm-sign";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true)
            .arg(
                Arg::new("help")
                    .short('h')
                    .long("help")
                    .action(ArgAction::SetTrue)
                    .required(false),
            )
            .arg(
                Arg::new("version")
                    .short('V')
                    .long("version")
                    .action(ArgAction::SetTrue)
                    .required(false),
            )
            .arg(
                Arg::new("keyfile")
                    .short('k')
                    .long("keyfile")
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(String))
                    .required(false),
            )
            .arg(
                Arg::new("file")
                    .short('f')
                    .long("file")
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(String))
                    .required(false),
            )
    }

    fn run<O: Write, E: Write>(&self, m: &ArgMatches, out: &mut O, err: &mut E) -> Result<u8, Error> {
        if m.get_flag("help") {
            return Self::help(out);
        }

        if m.get_flag("version") {
            writeln!(out, "{} {}", Self::NAME, env!("STPM_VERSION_INFO"))?;
            return Ok(0);
        }

        let (Some(keyfile), Some(datafile)) = (Self::path(m, "keyfile"), Self::path(m, "file"))
        else {
            return Self::usage_error(out, err, "Need to specify keyfile and data file");
        };

        let key = KeyRecord::parse(read_file(&keyfile)?.as_slice())?;
        log::debug!("loaded key from `{}`: {key:?}", keyfile.display());

        let data = read_file(&datafile)?;
        log::debug!("read {} bytes from `{}`", data.len(), datafile.display());

        let signer = (self.backend)()?;

        writeln!(out, "Loaded key: {key}")?;
        let sig = signer.sign(&SignRequest::new(&key, data.as_slice()))?;
        write!(out, "--- Signature ---\n{sig}\n")?;
        out.flush()?;

        Ok(0)
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|source| Error::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}
