use contacts_core::db::open_db_in_memory;
use contacts_core::{
    suggest, Contact, ContactService, MemoryContactStore, SqliteContactStore, TokenField,
    TokenResolution,
};

fn contacts() -> Vec<Contact> {
    vec![
        Contact::new("Bob", "bob@x.com").unwrap(),
        Contact::new("alice", "alice@x.com").unwrap(),
        Contact::new("Amy", "amy@y.org").unwrap(),
        Contact::new("Bobby", "bobby@y.org").unwrap(),
    ]
}

fn tokens(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn suggest_matches_name_or_email_sorted_ordinally() {
    let found = suggest("Bob", &contacts(), &[]);
    assert_eq!(found, vec!["bob@x.com", "bobby@y.org"]);

    let by_email = suggest("y.org", &contacts(), &[]);
    assert_eq!(by_email, vec!["amy@y.org", "bobby@y.org"]);
}

#[test]
fn suggest_never_returns_existing_tokens() {
    let existing = tokens(&["bob@x.com", "amy@y.org"]);
    let found = suggest("@", &contacts(), &existing);

    assert_eq!(found, vec!["alice@x.com", "bobby@y.org"]);
    assert!(found.iter().all(|email| !existing.contains(email)));
}

#[test]
fn suggest_is_idempotent() {
    let all = contacts();
    let existing = tokens(&["alice@x.com"]);

    let first = suggest("o", &all, &existing);
    let second = suggest("o", &all, &existing);
    assert_eq!(first, second);
}

#[test]
fn suggest_keeps_case_sensitive_containment() {
    assert!(suggest("ALICE", &contacts(), &[]).is_empty());
    assert!(suggest("bob@X.com", &contacts(), &[]).is_empty());
}

#[test]
fn service_suggest_matches_pure_suggest_on_sqlite() {
    let conn = open_db_in_memory().unwrap();
    let service = ContactService::new(SqliteContactStore::new(&conn));
    for item in contacts() {
        service.add_contact(item.name, item.email).unwrap();
    }
    let existing = tokens(&["bob@x.com"]);

    for query in ["Bob", "y.org", "@", "a", "zzz"] {
        assert_eq!(
            service.suggest(query, &existing),
            suggest(query, &contacts(), &existing),
            "mismatch for query {query}"
        );
    }
}

#[test]
fn service_suggest_degrades_to_empty_on_store_failure() {
    let service = ContactService::new(MemoryContactStore::new());
    service.add_contact("Bob", "bob@x.com").unwrap();
    assert_eq!(service.suggest("Bob", &[]), vec!["bob@x.com"]);

    service.store().set_simulate_query_error(true);
    assert!(service.suggest("Bob", &[]).is_empty());
    assert_eq!(service.resolve_token("Bob"), TokenResolution::Invalid);
}

#[test]
fn service_suggest_for_field_uses_text_and_tokens() {
    let service = ContactService::new(MemoryContactStore::new());
    for item in contacts() {
        service.add_contact(item.name, item.email).unwrap();
    }

    let mut field = TokenField::new(None);
    field.handle_suggestion_selected("bob@x.com");
    field.handle_text_change("Bob");
    let summary = field.apply_pending();
    assert!(summary.text_changed);

    assert_eq!(service.suggest_for(&field), vec!["bobby@y.org"]);
}

#[test]
fn service_resolves_tokens_by_exact_name_or_email() {
    let service = ContactService::new(MemoryContactStore::new());
    service.add_contact("Bob", "bob@x.com").unwrap();

    assert_eq!(
        service.resolve_token("Bob"),
        TokenResolution::Contact {
            email: "bob@x.com".to_string()
        }
    );
    assert_eq!(service.resolve_token("bob@x.com").email(), Some("bob@x.com"));
    assert_eq!(service.resolve_token("Bo"), TokenResolution::Invalid);
}
