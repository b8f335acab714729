use leptos::*;

/// Rows that can be matched against the free-text search box.
pub trait Searchable {
    fn row_id(&self) -> &str;
    /// Concatenated searchable text; matching is case-insensitive substring.
    fn haystack(&self) -> String;
}

pub fn matches_search(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Shared client-side list state: one source of rows, a search signal and a
/// derived filtered view. Every table page reuses this instead of keeping
/// its own copy of the filter plumbing, and `patch_row` guarantees a row
/// updated after an action (approve, finalize, ...) changes in both the
/// full and the filtered view at once.
pub struct ListStore<T: Searchable + Clone + PartialEq + 'static> {
    pub rows: RwSignal<Vec<T>>,
    pub search: RwSignal<String>,
    pub filtered: Memo<Vec<T>>,
}

// Manual impls: the signal handles are `Copy` for any `T`, but a derive
// would require `T: Copy`.
impl<T: Searchable + Clone + PartialEq + 'static> Clone for ListStore<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Searchable + Clone + PartialEq + 'static> Copy for ListStore<T> {}

impl<T: Searchable + Clone + PartialEq + 'static> ListStore<T> {
    pub fn new() -> Self {
        let rows = create_rw_signal(Vec::new());
        let search = create_rw_signal(String::new());
        let filtered = create_memo(move |_| {
            let needle = search.get();
            rows.get()
                .into_iter()
                .filter(|row: &T| matches_search(&row.haystack(), &needle))
                .collect::<Vec<_>>()
        });
        Self {
            rows,
            search,
            filtered,
        }
    }

    pub fn set_rows(&self, new_rows: Vec<T>) {
        self.rows.set(new_rows);
    }

    pub fn patch_row(&self, id: &str, patch: impl Fn(&mut T)) {
        self.rows.update(|rows| {
            if let Some(row) = rows.iter_mut().find(|row| row.row_id() == id) {
                patch(row);
            }
        });
    }

    pub fn replace_row(&self, updated: T) {
        self.rows.update(|rows| {
            if let Some(row) = rows.iter_mut().find(|row| row.row_id() == updated.row_id()) {
                *row = updated;
            }
        });
    }

    pub fn remove_row(&self, id: &str) {
        self.rows.update(|rows| rows.retain(|row| row.row_id() != id));
    }
}

impl<T: Searchable + Clone + PartialEq + 'static> Default for ListStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
