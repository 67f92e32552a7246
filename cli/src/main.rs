mod app;
mod args;

use crate::{
    app::App,
    args::{Cli, Command},
};
use color_eyre::Result;
use std::io::stdout;

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args = Cli::parse_and_validate();

    let mut app = match args.command {
        Command::New(args) => App::new(args)?,
        Command::Load(args) => App::load(args)?,
    };

    app.run(&mut stdout().lock())
}
