use log::LevelFilter;
use std::process::ExitCode;
use stpm_sign::config::SignConfig;
use stpm_sign::{signer, Error, SignCmd};

fn run() -> Result<u8, Error> {
    let cmd = SignCmd::new(|| -> Result<_, Error> {
        let config = SignConfig::load(SignConfig::default_file())?;
        Ok(signer::backend(&config))
    });

    cmd.exec(
        std::env::args_os(),
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )
}

fn main() -> ExitCode {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            log::error!("{e}");
            ExitCode::from(2)
        }
    }
}
