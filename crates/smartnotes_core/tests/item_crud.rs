use chrono::{Duration, NaiveDate};
use smartnotes_core::{Category, ItemRepository, MemoryStore, SteppingClock};

fn repo() -> ItemRepository<MemoryStore, SteppingClock> {
    let start = NaiveDate::from_ymd_opt(2024, 2, 10)
        .unwrap()
        .and_hms_opt(18, 30, 0)
        .unwrap();
    ItemRepository::open_with_clock(
        MemoryStore::new(),
        SteppingClock::new(start, Duration::seconds(1)),
    )
}

#[test]
fn add_trims_text_and_assigns_next_id() {
    for category in Category::ALL {
        let mut repo = repo();
        let first = repo.add(category, "  x  ").unwrap();
        assert_eq!(first.text, "x");
        assert_eq!(first.id, 1);

        let second = repo.add(category, "\ty\n").unwrap();
        assert_eq!(second.text, "y");
        assert_eq!(second.id, 2);
        assert_eq!(repo.list(category), &[first, second]);
    }
}

#[test]
fn add_sets_timestamps_and_completion_by_category() {
    let mut repo = repo();
    let note = repo.add(Category::Note, "Buy milk").unwrap();
    assert_eq!(note.created_at, "2024-02-10 18:30:00");
    assert_eq!(note.created_at, note.updated_at);
    assert_eq!(note.completed, Some(false));

    let contact = repo.add(Category::Contact, "Марія 555-01-02").unwrap();
    assert_eq!(contact.completed, None);
}

#[test]
fn blank_add_leaves_collection_unchanged() {
    let mut repo = repo();
    repo.add(Category::Quote, "keep").unwrap();

    assert!(repo.add(Category::Quote, "").is_none());
    assert!(repo.add(Category::Quote, "   ").is_none());
    assert_eq!(repo.len(Category::Quote), 1);
    assert_eq!(repo.next_id(Category::Quote), Some(2));
    assert_eq!(repo.store().save_count(), 1);
}

#[test]
fn remove_missing_id_changes_nothing() {
    let mut repo = repo();
    repo.add(Category::Note, "a").unwrap();
    let before = repo.list(Category::Note).to_vec();

    assert!(!repo.remove(Category::Note, 42));
    assert_eq!(repo.list(Category::Note), before.as_slice());
    assert_eq!(repo.store().save_count(), 1);
}

#[test]
fn remove_preserves_relative_order() {
    let mut repo = repo();
    for text in ["a", "b", "c", "d"] {
        repo.add(Category::Contact, text).unwrap();
    }

    assert!(repo.remove(Category::Contact, 2));
    let texts: Vec<&str> = repo
        .list(Category::Contact)
        .iter()
        .map(|item| item.text.as_str())
        .collect();
    assert_eq!(texts, vec!["a", "c", "d"]);
}

#[test]
fn set_completed_updates_flag_and_advances_updated_at() {
    let mut repo = repo();
    let note = repo.add(Category::Note, "Call mom").unwrap();

    assert!(repo.set_completed(Category::Note, note.id, true));
    let stored = &repo.list(Category::Note)[0];
    assert_eq!(stored.completed, Some(true));
    assert!(stored.updated_at > note.updated_at);
    assert_eq!(stored.created_at, note.created_at);

    assert!(repo.set_completed(Category::Note, note.id, false));
    assert!(!repo.list(Category::Note)[0].is_completed());
}

#[test]
fn set_completed_stores_flag_for_other_categories() {
    let mut repo = repo();
    let quote = repo.add(Category::Quote, "Знання — сила").unwrap();

    assert!(repo.set_completed(Category::Quote, quote.id, true));
    assert_eq!(repo.get(Category::Quote, quote.id).unwrap().completed, Some(true));
}

#[test]
fn set_text_trims_and_refreshes_updated_at() {
    let mut repo = repo();
    let item = repo.add(Category::Contact, "Іван").unwrap();

    assert!(repo.set_text(Category::Contact, item.id, "  Іван Франко  "));
    let stored = repo.get(Category::Contact, item.id).unwrap();
    assert_eq!(stored.text, "Іван Франко");
    assert!(stored.updated_at > stored.created_at);

    assert!(!repo.set_text(Category::Contact, 99, "nobody"));
}

#[test]
fn scenario_add_add_remove_first() {
    let mut repo = repo();
    assert_eq!(repo.add(Category::Note, "Buy milk").unwrap().id, 1);
    assert_eq!(repo.add(Category::Note, "Call mom").unwrap().id, 2);
    assert!(repo.remove(Category::Note, 1));

    let notes = repo.list(Category::Note);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, 2);
    assert_eq!(notes[0].text, "Call mom");
}

#[test]
fn every_mutation_writes_the_full_document() {
    let mut repo = repo();
    let note = repo.add(Category::Note, "n").unwrap();
    repo.add(Category::Quote, "q").unwrap();
    repo.set_completed(Category::Note, note.id, true);
    repo.set_text(Category::Note, note.id, "n2");
    repo.remove(Category::Quote, 1);

    assert_eq!(repo.store().save_count(), 5);
    assert_eq!(repo.store().saved().as_ref(), Some(repo.document()));
}

#[test]
fn batch_saves_once_and_only_when_changed() {
    let mut repo = repo();
    let ids = repo.batch(|batch| {
        let a = batch.add(Category::Note, "a").unwrap().id;
        let b = batch.add(Category::Note, "b").unwrap().id;
        batch.set_completed(Category::Note, a, true);
        batch.remove(Category::Note, b);
        assert_eq!(batch.list(Category::Note).len(), 1);
        (a, b)
    });
    assert_eq!(ids, (1, 2));
    assert_eq!(repo.store().save_count(), 1);

    repo.batch(|batch| {
        batch.add(Category::Note, "  ");
        batch.remove(Category::Note, 77);
    });
    assert_eq!(repo.store().save_count(), 1);
}

#[test]
fn failed_save_keeps_changes_in_memory_until_flush() {
    let mut repo = repo();
    repo.store().set_fail_saves(true);

    let item = repo.add(Category::Note, "offline").unwrap();
    assert!(repo.is_dirty());
    assert_eq!(repo.get(Category::Note, item.id).unwrap().text, "offline");
    assert!(repo.store().saved().is_none());
    assert!(repo.flush().is_err());

    repo.store().set_fail_saves(false);
    repo.flush().unwrap();
    assert!(!repo.is_dirty());
    assert_eq!(repo.store().saved().unwrap().notes.len(), 1);
}
