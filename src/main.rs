//! pagebound - a paginated, animated viewer for grouped content catalogs.

mod cli;

fn main() {
    env_logger::init();

    miette::set_hook(Box::new(|_| {
        Box::new(miette::MietteHandlerOpts::new().color(true).build())
    }))
    .ok();

    if let Err(err) = cli::app() {
        eprintln!("{:?}", err);
        std::process::exit(1);
    }
}
