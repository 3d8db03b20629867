//! Flattens a grouped catalog into the fixed page sequence the render
//! surface binds to.
//!
//! Assembly happens exactly once per session; the resulting [`Book`] is
//! immutable and every page `index` stays stable until teardown. Jump targets
//! (table of contents, search) rely on that stability.

use {
    crate::catalog::{Catalog, Entry},
    hashbrown::HashMap,
};

/// Default number of entries per page.
pub const DEFAULT_PAGE_CAPACITY: usize = 2;

/// What a single physical page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    /// Front cover, always at index 0.
    CoverFront,
    /// Back cover, always the last page.
    CoverBack,
    /// Table of contents, always immediately after the front cover.
    TableOfContents,
    /// First page of a group: group banner plus its first chunk of entries.
    GroupHeader { group: String, entries: Vec<Entry> },
    /// Subsequent chunk of a group's entries, no banner.
    ContentPage { group: String, entries: Vec<Entry> },
}

/// One renderable page.
///
/// `index` is the 0-based position in the full sequence including covers --
/// the value the render surface understands. `page_number` is the logical
/// 1-based number shown to the reader; covers carry none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    pub index: usize,
    pub page_number: Option<u32>,
    pub kind: PageKind,
}

impl PageDescriptor {
    /// Entries shown on this page, if any.
    pub fn entries(&self) -> &[Entry] {
        match &self.kind {
            PageKind::GroupHeader { entries, .. } | PageKind::ContentPage { entries, .. } => {
                entries
            }
            _ => &[],
        }
    }

    /// Group this page belongs to, if any.
    pub fn group(&self) -> Option<&str> {
        match &self.kind {
            PageKind::GroupHeader { group, .. } | PageKind::ContentPage { group, .. } => {
                Some(group)
            }
            _ => None,
        }
    }
}

/// The assembled page sequence plus the group jump map.
///
/// Built once from a catalog, then handed by reference to everything that
/// needs it. Assembly is fully deterministic: same catalog and capacity in,
/// structurally identical book out.
#[derive(Debug, Clone)]
pub struct Book {
    pages: Vec<PageDescriptor>,
    group_page_map: HashMap<String, usize>,
    logical_pages: u32,
}

impl Book {
    /// Flatten `catalog` into pages of at most `capacity` entries each.
    ///
    /// Always emits a front cover at index 0, a table of contents at index 1,
    /// and a back cover last. Groups without entries contribute no pages and
    /// are absent from the jump map. An empty catalog still yields the two
    /// covers and the table of contents.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn assemble(catalog: &Catalog, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut pages = Vec::new();

        pages.push(PageDescriptor {
            index: 0,
            page_number: None,
            kind: PageKind::CoverFront,
        });

        let mut page_number: u32 = 1;
        pages.push(PageDescriptor {
            index: 1,
            page_number: Some(page_number),
            kind: PageKind::TableOfContents,
        });
        page_number += 1;

        for group in &catalog.groups {
            for (chunk_index, chunk) in group.entries.chunks(capacity).enumerate() {
                let entries = chunk.to_vec();
                let kind = if chunk_index == 0 {
                    PageKind::GroupHeader {
                        group: group.name.clone(),
                        entries,
                    }
                } else {
                    PageKind::ContentPage {
                        group: group.name.clone(),
                        entries,
                    }
                };

                pages.push(PageDescriptor {
                    index: pages.len(),
                    page_number: Some(page_number),
                    kind,
                });
                page_number += 1;
            }
        }

        pages.push(PageDescriptor {
            index: pages.len(),
            page_number: None,
            kind: PageKind::CoverBack,
        });

        let mut group_page_map = HashMap::new();
        for page in &pages {
            if let PageKind::GroupHeader { group, .. } = &page.kind {
                group_page_map.entry(group.clone()).or_insert(page.index);
            }
        }

        Self {
            pages,
            group_page_map,
            logical_pages: page_number - 1,
        }
    }

    pub fn pages(&self) -> &[PageDescriptor] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&PageDescriptor> {
        self.pages.get(index)
    }

    /// Total page count including covers; the range the surface navigates.
    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    /// Count of logical (numbered) pages, covers excluded.
    pub const fn logical_pages(&self) -> u32 {
        self.logical_pages
    }

    /// Group name -> index of the group's first page.
    pub const fn group_page_map(&self) -> &HashMap<String, usize> {
        &self.group_page_map
    }

    pub fn first_page_of_group(&self, group: &str) -> Option<usize> {
        self.group_page_map.get(group).copied()
    }
}
