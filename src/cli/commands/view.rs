mod draw;
mod surface;
mod tui;

use {
    clap::Args,
    miette::{Context, IntoDiagnostic},
    pagebound::{Book, Catalog, DEFAULT_PAGE_CAPACITY},
    std::path::PathBuf,
    surface::{Easing, FlipTiming},
    tui::TuiApp,
};

#[derive(Args)]
pub struct ViewArgs {
    /// Catalog file (TOML) to open
    input: PathBuf,

    /// Entries per content page
    #[arg(long, default_value_t = DEFAULT_PAGE_CAPACITY)]
    capacity: usize,

    /// Page-turn duration in milliseconds
    #[arg(long, default_value_t = 800)]
    flip_ms: u64,

    /// Page-turn easing curve
    #[arg(long, value_enum, default_value = "smooth")]
    easing: Easing,
}

pub fn execute(args: ViewArgs) -> miette::Result<()> {
    let catalog = Catalog::load(&args.input)
        .into_diagnostic()
        .with_context(|| format!("Failed to open catalog: {}", args.input.display()))?;

    let book = Book::assemble(&catalog, args.capacity);

    let timing = FlipTiming {
        duration_ms: args.flip_ms,
        easing: args.easing,
    };

    TuiApp::new(catalog, book, timing)
        .run()
        .into_diagnostic()
        .context("Error while running viewer")?;

    Ok(())
}
