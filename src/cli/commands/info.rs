use {
    clap::Args,
    miette::{Context, IntoDiagnostic},
    pagebound::{Book, Catalog, DEFAULT_PAGE_CAPACITY, PageKind},
    std::path::PathBuf,
};

#[derive(Args)]
pub struct InfoArgs {
    /// Catalog file (TOML) to inspect
    input: PathBuf,

    /// Entries per content page
    #[arg(long, default_value_t = DEFAULT_PAGE_CAPACITY)]
    capacity: usize,
}

#[allow(clippy::arithmetic_side_effects)]
pub fn execute(args: InfoArgs) -> miette::Result<()> {
    let catalog = Catalog::load(&args.input)
        .into_diagnostic()
        .with_context(|| format!("Failed to open catalog: {}", args.input.display()))?;

    let book = Book::assemble(&catalog, args.capacity);

    println!("--- Catalog Info");
    println!("--- File: {}", args.input.display());
    if !catalog.title.is_empty() {
        println!("--- Title: {}", catalog.title);
    }
    println!("--- Entries: {}", catalog.entry_count());
    println!("--- Groups: {}", catalog.groups.len());
    println!(
        "--- Pages: {} ({} numbered)",
        book.total_pages(),
        book.logical_pages()
    );

    if !catalog.groups.is_empty() {
        println!();
        for (i, group) in catalog.groups.iter().enumerate() {
            let prefix = if i == catalog.groups.len() - 1 {
                "└"
            } else {
                "├"
            };
            let start = book
                .first_page_of_group(&group.name)
                .map_or("-".to_string(), |index| index.to_string());
            println!(
                "  {} {:<24} {:>3} entries (opens at page index {})",
                prefix,
                group.name,
                group.entries.len(),
                start
            );
        }
    }

    println!();
    println!("--- Page plan:");
    for (i, page) in book.pages().iter().enumerate() {
        let prefix = if i == book.total_pages() - 1 {
            "└"
        } else {
            "├"
        };
        let label = match &page.kind {
            PageKind::CoverFront => "front cover".to_string(),
            PageKind::CoverBack => "back cover".to_string(),
            PageKind::TableOfContents => "table of contents".to_string(),
            PageKind::GroupHeader { group, entries } => {
                format!("{} (header, {} entries)", group, entries.len())
            }
            PageKind::ContentPage { group, entries } => {
                format!("{} ({} entries)", group, entries.len())
            }
        };
        let number = page
            .page_number
            .map_or(String::new(), |n| format!("  p.{}", n));
        println!("  {} {:>3}. {}{}", prefix, page.index, label, number);
    }

    Ok(())
}
