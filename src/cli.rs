mod period;
mod report;
mod window;

use clap::{Parser, Subcommand};

use crate::{
    cli::{report::ReportArgs, window::WindowArgs},
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub async fn run(self) -> Result {
        match self.command {
            Command::Report(args) => args.run().await,
            Command::Window(args) => {
                args.run();
                Ok(())
            }
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Main command: fetch the month's consumption and print the bill estimate.
    #[clap(name = "report")]
    Report(Box<ReportArgs>),

    /// Print the consumption query window of the month.
    #[clap(name = "window")]
    Window(WindowArgs),
}
