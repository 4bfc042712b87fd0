use anyhow::Context;
use config::AppConfig;
use error::exit_code;
use logging::{init_logging, LoggingConfig};
use program::Program;

mod config;
mod context;
mod error;
mod frame;
mod lifecycle;
mod logging;
mod mesh;
mod pipeline;
mod program;
mod surface;
mod texture;

fn start() -> anyhow::Result<Program> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    let program = pollster::block_on(Program::new(config)).context("startup failed")?;
    Ok(program)
}

fn main() {
    init_logging(LoggingConfig::default());

    let startup = start();
    match startup {
        Ok(program) => program.run(),
        Err(ref err) => {
            log::error!("{err:#}");
            std::process::exit(exit_code(&startup));
        }
    }
}
