use bookshelf_core::db::open_db_in_memory;
use bookshelf_core::{
    BookDraft, BookSearch, BookService, ListBooksQuery, ServiceError, SqliteBookRepository,
};
use std::collections::HashSet;

#[test]
fn dune_lifecycle_create_update_delete_get() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());

    let created = service
        .create_book(&BookDraft::new("Dune", "Herbert", Some(1965)))
        .unwrap();
    assert_eq!(created.id, 1);

    let updated = service
        .update_book(1, &BookDraft::new("Dune", "Herbert", Some(1966)))
        .unwrap();
    assert_eq!(updated.id, 1);
    assert_eq!(updated.year, Some(1966));

    let deleted = service.delete_book(1).unwrap();
    assert_eq!(deleted, updated);

    let err = service.get_book(1).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(1)));
}

#[test]
fn created_ids_are_fresh() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());

    let mut seen = HashSet::new();
    for index in 0..5 {
        let book = service
            .create_book(&BookDraft::new(format!("t{index}"), "a", None))
            .unwrap();
        assert!(seen.insert(book.id), "id {} reused", book.id);
        if index % 2 == 0 {
            service.delete_book(book.id).unwrap();
        }
    }
}

#[test]
fn update_then_get_returns_exactly_supplied_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());

    let created = service
        .create_book(&BookDraft::new("Old", "Someone", Some(1900)))
        .unwrap();
    let replacement = BookDraft::new("New", "Someone Else", None);
    service.update_book(created.id, &replacement).unwrap();

    let loaded = service.get_book(created.id).unwrap();
    assert_eq!(loaded.to_draft(), replacement);
}

#[test]
fn create_boundaries_follow_year_range() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());

    let err = service
        .create_book(&BookDraft::new("Future", "Writer", Some(2101)))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(err.field(), Some("year"));

    let at_bound = service
        .create_book(&BookDraft::new("Future", "Writer", Some(2100)))
        .unwrap();
    assert_eq!(at_bound.year, Some(2100));

    let unknown = service
        .create_book(&BookDraft::new("Undated", "Writer", None))
        .unwrap();
    assert_eq!(unknown.year, None);

    let all = service.search_books(&BookSearch::default()).unwrap();
    assert_eq!(all.len(), 2);
}

#[test]
fn update_and_delete_missing_ids_are_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());

    let err = service
        .update_book(7, &BookDraft::new("t", "a", None))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(7)));

    let err = service.delete_book(7).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(7)));
}

#[test]
fn invalid_update_payload_is_rejected_before_lookup() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());

    let err = service
        .update_book(7, &BookDraft::new("", "a", None))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn non_positive_ids_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());

    for id in [0, -3] {
        let err = service.delete_book(id).unwrap_err();
        assert_eq!(err.field(), Some("id"));
        assert_eq!(err.code(), "validation_failed");
    }
}

#[test]
fn list_pages_cover_full_set_in_stable_order() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());
    for index in 0..5 {
        service
            .create_book(&BookDraft::new(format!("Book {index}"), "Author", None))
            .unwrap();
    }

    let first = service
        .list_books(&ListBooksQuery {
            offset: Some(0),
            limit: Some(3),
        })
        .unwrap();
    let second = service
        .list_books(&ListBooksQuery {
            offset: Some(3),
            limit: Some(3),
        })
        .unwrap();

    assert_eq!(first.items.len(), 3);
    assert_eq!(second.items.len(), 2);
    let ids: Vec<i64> = first
        .items
        .iter()
        .chain(second.items.iter())
        .map(|book| book.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[test]
fn list_uses_defaults_and_rejects_bad_bounds() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());
    for index in 0..12 {
        service
            .create_book(&BookDraft::new(format!("Book {index}"), "Author", None))
            .unwrap();
    }

    let page = service.list_books(&ListBooksQuery::default()).unwrap();
    assert_eq!(page.offset, 0);
    assert_eq!(page.limit, 10);
    assert_eq!(page.items.len(), 10);

    let err = service
        .list_books(&ListBooksQuery {
            offset: None,
            limit: Some(0),
        })
        .unwrap_err();
    assert_eq!(err.field(), Some("limit"));
}

#[test]
fn search_ignores_empty_filters() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());
    service
        .create_book(&BookDraft::new("Alice Johnson", "Mary Ann", Some(1999)))
        .unwrap();
    service
        .create_book(&BookDraft::new("Dune", "Herbert", Some(1965)))
        .unwrap();

    let hits = service
        .search_books(&BookSearch {
            title: Some(String::new()),
            author: Some(String::new()),
            year: None,
        })
        .unwrap();
    assert_eq!(hits.len(), 2);

    let hits = service
        .search_books(&BookSearch {
            title: Some("alice".to_string()),
            ..BookSearch::default()
        })
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Alice Johnson");
}

#[test]
fn whitespace_fields_are_stored_and_padded_filters_match_literally() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());

    let spaced = service
        .create_book(&BookDraft::new(" ", "a", None))
        .unwrap();
    assert_eq!(spaced.title, " ");
    service
        .create_book(&BookDraft::new("Dune", "Herbert", Some(1965)))
        .unwrap();

    let padded = service
        .search_books(&BookSearch {
            title: Some("Dune ".to_string()),
            ..BookSearch::default()
        })
        .unwrap();
    assert!(padded.is_empty());

    let spaces = service
        .search_books(&BookSearch {
            title: Some(" ".to_string()),
            ..BookSearch::default()
        })
        .unwrap();
    assert_eq!(spaces.len(), 1);
    assert_eq!(spaces[0].id, spaced.id);
}
