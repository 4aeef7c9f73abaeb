use contacts_core::{
    build_sections, section_index_titles, Contact, ContactSelection, ContactSelectionObserver,
    ContactService, MemoryContactStore, RowPath, SelectionError, SelectionState,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Default)]
struct RecordingObserver {
    picked: RefCell<Vec<Contact>>,
}

impl ContactSelectionObserver for RecordingObserver {
    fn contact_selected(&self, contact: &Contact) {
        self.picked.borrow_mut().push(contact.clone());
    }
}

fn contact(name: &str, email: &str) -> Contact {
    Contact::new(name, email).unwrap()
}

fn sample_contacts() -> Vec<Contact> {
    vec![
        contact("Bob", "bob@x.com"),
        contact("alice", "alice@x.com"),
        contact("Amy", "amy@x.com"),
    ]
}

fn member_names(section: &contacts_core::Section) -> Vec<&str> {
    section.members.iter().map(|item| item.name.as_str()).collect()
}

#[test]
fn groups_by_uppercased_initial_with_ordinal_member_order() {
    let sections = build_sections(&sample_contacts());

    assert_eq!(section_index_titles(&sections), vec!["A", "B"]);
    assert_eq!(member_names(&sections[0]), vec!["Amy", "alice"]);
    assert_eq!(member_names(&sections[1]), vec!["Bob"]);
}

#[test]
fn sections_and_members_are_sorted_and_nothing_is_lost() {
    let contacts = vec![
        contact("zoe", "zoe@x.com"),
        contact("Zed", "zed@x.com"),
        contact("émile", "emile@x.com"),
        contact("Émile", "emile2@x.com"),
        contact("carl", "carl@x.com"),
        contact("Carl", "carl2@x.com"),
        contact("carl", "carl3@x.com"),
        contact("1st", "first@x.com"),
    ];

    let sections = build_sections(&contacts);

    let keys = section_index_titles(&sections);
    let mut sorted_keys = keys.clone();
    sorted_keys.sort();
    sorted_keys.dedup();
    assert_eq!(keys, sorted_keys);

    for section in &sections {
        assert!(section
            .members
            .windows(2)
            .all(|pair| pair[0].name <= pair[1].name));
        assert!(section
            .members
            .iter()
            .all(|member| member.section_index == section.key));
    }

    let mut counts: HashMap<_, i32> = HashMap::new();
    for item in &contacts {
        *counts.entry(item.uuid).or_default() += 1;
    }
    for member in sections.iter().flat_map(|section| &section.members) {
        *counts.entry(member.uuid).or_default() -= 1;
    }
    assert!(counts.values().all(|count| *count == 0));
}

#[test]
fn build_is_deterministic_and_leaves_input_untouched() {
    let contacts = sample_contacts();
    let before = contacts.clone();

    assert_eq!(build_sections(&contacts), build_sections(&contacts));
    assert_eq!(contacts, before);
}

#[test]
fn pick_notifies_observer_once_and_returns_to_idle() {
    let observer = Rc::new(RecordingObserver::default());
    let mut selection = ContactSelection::new();
    selection.set_observer(&observer);

    selection.present(&sample_contacts(), None);
    assert_eq!(selection.state(), SelectionState::Presenting);

    let picked = selection.pick(RowPath::new(0, 1)).unwrap();
    assert_eq!(picked.name, "alice");
    assert_eq!(selection.state(), SelectionState::Idle);
    assert_eq!(observer.picked.borrow().as_slice(), &[picked]);

    let err = selection.pick(RowPath::new(0, 0)).unwrap_err();
    assert_eq!(err, SelectionError::NotPresenting);
    assert_eq!(observer.picked.borrow().len(), 1);
}

#[test]
fn cancel_returns_to_idle_without_notifying() {
    let observer = Rc::new(RecordingObserver::default());
    let mut selection = ContactSelection::new();
    selection.set_observer(&observer);

    selection.present(&sample_contacts(), None);
    selection.cancel();

    assert_eq!(selection.state(), SelectionState::Idle);
    assert!(selection.sections().is_empty());
    assert!(observer.picked.borrow().is_empty());
}

#[test]
fn out_of_range_pick_is_rejected_and_keeps_presenting() {
    let observer = Rc::new(RecordingObserver::default());
    let mut selection = ContactSelection::new();
    selection.set_observer(&observer);
    selection.present(&sample_contacts(), None);

    let path = RowPath::new(1, 5);
    assert_eq!(
        selection.pick(path).unwrap_err(),
        SelectionError::RowOutOfRange(path)
    );
    assert_eq!(selection.state(), SelectionState::Presenting);
    assert!(observer.picked.borrow().is_empty());
}

#[test]
fn current_selection_marks_row_without_changing_order() {
    let contacts = sample_contacts();
    let bob = contacts[0].clone();
    let mut selection = ContactSelection::new();

    selection.present(&contacts, Some(&bob));

    assert_eq!(selection.sections(), build_sections(&contacts).as_slice());
    assert!(selection.is_current_selection(RowPath::new(1, 0)));
    assert!(!selection.is_current_selection(RowPath::new(0, 0)));
    assert!(!selection.is_current_selection(RowPath::new(9, 9)));
}

#[test]
fn dropped_observer_is_not_kept_alive() {
    let observer = Rc::new(RecordingObserver::default());
    let mut selection = ContactSelection::new();
    selection.set_observer(&observer);
    assert_eq!(Rc::strong_count(&observer), 1);
    drop(observer);

    selection.present(&sample_contacts(), None);
    let picked = selection.pick(RowPath::new(1, 0)).unwrap();
    assert_eq!(picked.name, "Bob");
}

#[test]
fn replacing_observer_notifies_only_the_latest() {
    let first = Rc::new(RecordingObserver::default());
    let second = Rc::new(RecordingObserver::default());
    let mut selection = ContactSelection::new();
    selection.set_observer(&first);
    selection.set_observer(&second);

    selection.present(&sample_contacts(), None);
    selection.pick(RowPath::new(0, 0)).unwrap();

    assert!(first.picked.borrow().is_empty());
    assert_eq!(second.picked.borrow().len(), 1);
}

#[test]
fn service_sections_follow_store_and_degrade_to_empty() {
    let service = ContactService::new(MemoryContactStore::new());
    service.add_contact("Bob", "bob@x.com").unwrap();
    service.add_contact("alice", "alice@x.com").unwrap();
    service.add_contact("Amy", "amy@x.com").unwrap();

    let sections = service.sections();
    assert_eq!(section_index_titles(&sections), vec!["A", "B"]);
    assert_eq!(member_names(&sections[0]), vec!["Amy", "alice"]);

    service.store().set_simulate_query_error(true);
    assert!(service.sections().is_empty());

    let mut selection = ContactSelection::new();
    service.present_selection(&mut selection, None);
    assert_eq!(selection.state(), SelectionState::Presenting);
    assert!(selection.sections().is_empty());
}

#[test]
fn sections_are_rebuilt_after_store_changes() {
    let service = ContactService::new(MemoryContactStore::new());
    let bob = service.add_contact("Bob", "bob@x.com").unwrap();
    service.add_contact("Amy", "amy@x.com").unwrap();
    assert_eq!(section_index_titles(&service.sections()), vec!["A", "B"]);

    service.delete_contact(bob.uuid).unwrap();
    assert_eq!(section_index_titles(&service.sections()), vec!["A"]);
}
