//! Item repository over a persisted document.
//!
//! # Responsibility
//! - Assign per-category sequential ids.
//! - Apply add/edit/toggle/remove and write the full document afterwards.
//! - Offer a batch handle that writes once for several mutations.
//!
//! # Invariants
//! - `next_ids[c] > document.max_id(c)` for every category `c`; `None` marks
//!   a category whose id range is exhausted.
//! - Load failures never propagate; the repository keeps the error for callers.
//! - Blank text (after trimming) never reaches storage.
//! - Lookups that miss are silent no-ops, not errors.

use crate::clock::{Clock, SystemClock};
use crate::model::document::Document;
use crate::model::item::{format_timestamp, Category, Item, ItemId, MAX_ITEM_ID};
use crate::store::{load_with_fallback, DocumentStore, StoreError, StoreResult};
use log::{debug, error, info, warn};

/// Sole owner and mutator of the document.
///
/// Every mutating method performs a synchronous full rewrite through the
/// store when it changes state. Use [`ItemRepository::batch`] to group
/// mutations behind one write.
pub struct ItemRepository<S: DocumentStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    document: Document,
    next_ids: [Option<ItemId>; 3],
    dirty: bool,
    load_error: Option<StoreError>,
}

impl<S: DocumentStore> ItemRepository<S> {
    /// Loads state from `store` and stamps items with local time.
    pub fn open(store: S) -> Self {
        Self::open_with_clock(store, SystemClock)
    }
}

impl<S: DocumentStore, C: Clock> ItemRepository<S, C> {
    /// Loads state from `store`, falling back to an empty document.
    pub fn open_with_clock(store: S, clock: C) -> Self {
        let (document, load_error) = load_with_fallback(&store);
        let mut repo = Self::from_document(store, clock, document);
        repo.load_error = load_error;
        repo
    }

    /// Wraps an already loaded document without touching the store.
    pub fn from_document(store: S, clock: C, document: Document) -> Self {
        let next_ids = Category::ALL.map(|category| id_after(document.max_id(category)));
        Self {
            store,
            clock,
            document,
            next_ids,
            dirty: false,
            load_error: None,
        }
    }

    /// Appends a new item and saves.
    ///
    /// Returns `None` without any change when `text` is blank after trimming
    /// or the category has no assignable id left.
    pub fn add(&mut self, category: Category, text: &str) -> Option<Item> {
        let item = self.apply_add(category, text)?;
        self.persist("add");
        Some(item)
    }

    /// Sets the completion flag of one item and saves.
    ///
    /// The flag is stored for any category but only notes display it.
    /// Returns `false` when no item has `id`.
    pub fn set_completed(&mut self, category: Category, id: ItemId, value: bool) -> bool {
        let changed = self.apply_set_completed(category, id, value);
        if changed {
            self.persist("set_completed");
        }
        changed
    }

    /// Replaces the text of one item and saves.
    ///
    /// Returns `false` when no item has `id` or the trimmed text is blank.
    pub fn set_text(&mut self, category: Category, id: ItemId, new_text: &str) -> bool {
        let changed = self.apply_set_text(category, id, new_text);
        if changed {
            self.persist("set_text");
        }
        changed
    }

    /// Removes one item, keeping the order of the rest, and saves.
    ///
    /// Returns `false` when no item has `id`; a miss leaves the file untouched.
    pub fn remove(&mut self, category: Category, id: ItemId) -> bool {
        let changed = self.apply_remove(category, id);
        if changed {
            self.persist("remove");
        }
        changed
    }

    /// Items of `category` in insertion order.
    pub fn list(&self, category: Category) -> &[Item] {
        self.document.collection(category)
    }

    pub fn get(&self, category: Category, id: ItemId) -> Option<&Item> {
        self.list(category).iter().find(|item| item.id == id)
    }

    pub fn len(&self, category: Category) -> usize {
        self.list(category).len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    /// Id the next `add` in `category` will assign, or `None` once the id
    /// range is exhausted.
    pub fn next_id(&self, category: Category) -> Option<ItemId> {
        self.next_ids[category.index()]
    }

    /// Why the store's content was replaced by an empty document on open.
    ///
    /// The next save overwrites that content, so front ends should surface
    /// this before mutating.
    pub fn load_error(&self) -> Option<&StoreError> {
        self.load_error.as_ref()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether in-memory state holds changes the last save did not write.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes the full document now, returning any store error.
    pub fn flush(&mut self) -> StoreResult<()> {
        self.dirty = true;
        self.store.save(&self.document)?;
        self.dirty = false;
        Ok(())
    }

    /// Runs several mutations and saves once if any of them changed state.
    pub fn batch<T>(&mut self, apply: impl FnOnce(&mut Batch<'_, S, C>) -> T) -> T {
        let mut batch = Batch {
            repo: self,
            changed: false,
        };
        let output = apply(&mut batch);
        if batch.changed {
            batch.repo.persist("batch");
        }
        output
    }

    fn persist(&mut self, operation: &'static str) {
        if let Err(err) = self.flush() {
            error!(
                "event=repo_persist module=repo status=error op={} unsaved=true error={}",
                operation, err
            );
        }
    }

    fn now(&self) -> String {
        format_timestamp(self.clock.now())
    }

    fn find_mut(&mut self, category: Category, id: ItemId) -> Option<&mut Item> {
        self.document
            .collection_mut(category)
            .iter_mut()
            .find(|item| item.id == id)
    }

    fn apply_add(&mut self, category: Category, text: &str) -> Option<Item> {
        let text = text.trim();
        if text.is_empty() {
            debug!(
                "event=item_add module=repo status=skip reason=blank_text category={}",
                category
            );
            return None;
        }

        let Some(id) = self.next_ids[category.index()] else {
            warn!(
                "event=item_add module=repo status=skip reason=ids_exhausted category={}",
                category
            );
            return None;
        };
        let now = self.now();
        let item = Item::new(category, id, text, &now);
        self.document.collection_mut(category).push(item.clone());
        self.next_ids[category.index()] = id_after(id);

        info!(
            "event=item_add module=repo status=ok category={} id={}",
            category, id
        );
        Some(item)
    }

    fn apply_set_completed(&mut self, category: Category, id: ItemId, value: bool) -> bool {
        let now = self.now();
        let Some(item) = self.find_mut(category, id) else {
            debug!(
                "event=item_set_completed module=repo status=skip reason=not_found category={} id={}",
                category, id
            );
            return false;
        };
        item.completed = Some(value);
        item.touch(&now);

        info!(
            "event=item_set_completed module=repo status=ok category={} id={} completed={}",
            category, id, value
        );
        true
    }

    fn apply_set_text(&mut self, category: Category, id: ItemId, new_text: &str) -> bool {
        let text = new_text.trim();
        if text.is_empty() {
            debug!(
                "event=item_set_text module=repo status=skip reason=blank_text category={} id={}",
                category, id
            );
            return false;
        }

        let now = self.now();
        let Some(item) = self.find_mut(category, id) else {
            debug!(
                "event=item_set_text module=repo status=skip reason=not_found category={} id={}",
                category, id
            );
            return false;
        };
        item.text = text.to_string();
        item.touch(&now);

        info!(
            "event=item_set_text module=repo status=ok category={} id={}",
            category, id
        );
        true
    }

    fn apply_remove(&mut self, category: Category, id: ItemId) -> bool {
        let items = self.document.collection_mut(category);
        let before = items.len();
        items.retain(|item| item.id != id);
        let removed = items.len() != before;

        if removed {
            info!(
                "event=item_remove module=repo status=ok category={} id={}",
                category, id
            );
        } else {
            debug!(
                "event=item_remove module=repo status=skip reason=not_found category={} id={}",
                category, id
            );
        }
        removed
    }
}

/// Next assignable id after `id`, or `None` past [`MAX_ITEM_ID`].
fn id_after(id: ItemId) -> Option<ItemId> {
    id.checked_add(1).filter(|next| *next <= MAX_ITEM_ID)
}

/// Mutation handle that defers saving until the batch closure returns.
pub struct Batch<'r, S: DocumentStore, C: Clock> {
    repo: &'r mut ItemRepository<S, C>,
    changed: bool,
}

impl<S: DocumentStore, C: Clock> Batch<'_, S, C> {
    pub fn add(&mut self, category: Category, text: &str) -> Option<Item> {
        let item = self.repo.apply_add(category, text)?;
        self.changed = true;
        Some(item)
    }

    pub fn set_completed(&mut self, category: Category, id: ItemId, value: bool) -> bool {
        let changed = self.repo.apply_set_completed(category, id, value);
        self.changed |= changed;
        changed
    }

    pub fn set_text(&mut self, category: Category, id: ItemId, new_text: &str) -> bool {
        let changed = self.repo.apply_set_text(category, id, new_text);
        self.changed |= changed;
        changed
    }

    pub fn remove(&mut self, category: Category, id: ItemId) -> bool {
        let changed = self.repo.apply_remove(category, id);
        self.changed |= changed;
        changed
    }

    pub fn list(&self, category: Category) -> &[Item] {
        self.repo.list(category)
    }
}
