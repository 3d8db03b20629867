//! Maps a selected entry or group to the page index that shows it.

use crate::assembler::Book;

/// Resolves search selections against an assembled book.
///
/// `resolve_entry` is a linear scan of the immutable page sequence for the
/// first page containing the entry; the catalog is small and static, so
/// correctness rests entirely on the assembler's determinism rather than on
/// any index structure.
#[derive(Debug, Clone, Copy)]
pub struct SearchResolver<'a> {
    book: &'a Book,
}

impl<'a> SearchResolver<'a> {
    pub const fn new(book: &'a Book) -> Self {
        Self { book }
    }

    /// Page index of the first page showing the entry with this id.
    pub fn resolve_entry(&self, entry_id: &str) -> Option<usize> {
        self.book
            .pages()
            .iter()
            .find(|page| page.entries().iter().any(|entry| entry.id == entry_id))
            .map(|page| page.index)
    }

    /// Page index of the group's first page, via the group page map.
    pub fn resolve_group(&self, group: &str) -> Option<usize> {
        self.book.first_page_of_group(group)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::catalog::{Catalog, Entry, Group},
        assert2::check as assert,
    };

    fn entry(id: &str) -> Entry {
        Entry {
            id: id.to_string(),
            name: id.to_uppercase(),
            summary: String::new(),
            detail: String::new(),
        }
    }

    fn book() -> Book {
        let catalog = Catalog {
            title: String::new(),
            groups: vec![
                Group {
                    name: "Fire".to_string(),
                    color: String::new(),
                    entries: vec![entry("fireball"), entry("ember"), entry("flare")],
                },
                Group {
                    name: "Ice".to_string(),
                    color: String::new(),
                    entries: vec![entry("frost")],
                },
            ],
        };
        Book::assemble(&catalog, 2)
    }

    #[test]
    fn test_resolve_entry_on_header_page() {
        let book = book();
        let resolver = SearchResolver::new(&book);
        // "frost" sits on the Ice header page at index 4.
        assert!(resolver.resolve_entry("frost") == Some(4));
    }

    #[test]
    fn test_resolve_entry_on_overflow_page() {
        let book = book();
        let resolver = SearchResolver::new(&book);
        assert!(resolver.resolve_entry("flare") == Some(3));
    }

    #[test]
    fn test_resolve_unknown_entry_is_not_found() {
        let book = book();
        let resolver = SearchResolver::new(&book);
        assert!(resolver.resolve_entry("meteor").is_none());
    }

    #[test]
    fn test_resolve_group_uses_the_map() {
        let book = book();
        let resolver = SearchResolver::new(&book);
        assert!(resolver.resolve_group("Fire") == Some(2));
        assert!(resolver.resolve_group("Ice") == Some(4));
        assert!(resolver.resolve_group("Storm").is_none());
    }
}
