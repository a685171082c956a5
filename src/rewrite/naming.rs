//! Generated function names

use rustc_hash::FxHashSet;

use crate::parser::ScannedSource;

/// Hands out `<prefix><n>` names that collide with nothing in the source
#[derive(Debug, Clone)]
pub struct NameAllocator {
    prefix: String,
    taken: FxHashSet<String>,
    next: usize,
}

impl NameAllocator {
    /// Allocator avoiding every identifier in `scanned`
    pub fn for_source(prefix: &str, scanned: &ScannedSource<'_>) -> Self {
        let taken = scanned
            .tokens
            .iter()
            .filter_map(|t| t.value.as_name())
            .filter(|name| name.starts_with(prefix))
            .map(str::to_string)
            .collect();
        Self {
            prefix: prefix.to_string(),
            taken,
            next: 1,
        }
    }

    /// Next free name
    pub fn allocate(&mut self) -> String {
        loop {
            let candidate = format!("{}{}", self.prefix, self.next);
            self.next += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
