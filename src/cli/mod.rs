mod commands;

#[derive(clap::Parser)]
#[command(
    name = "pagebound",
    version,
    about = "View a grouped catalog as an animated book",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Open a catalog in the interactive book viewer
    View(commands::view::ViewArgs),

    /// Print catalog structure and the assembled page plan
    Info(commands::info::InfoArgs),

    /// Generate CLI completions
    Complete(commands::complete::CompleteArgs),
}

pub fn app() -> miette::Result<()> {
    let argv = <Cli as clap::Parser>::parse();

    match argv.command {
        Commands::View(args) => commands::view::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Complete(args) => commands::complete::execute(args),
    }
}
