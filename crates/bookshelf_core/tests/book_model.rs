use bookshelf_core::{Book, BookDraft, BookValidationError, YEAR_MAX};

#[test]
fn draft_accepts_boundary_year_and_missing_year() {
    assert!(BookDraft::new("Dune", "Herbert", Some(YEAR_MAX)).validate().is_ok());
    assert!(BookDraft::new("Dune", "Herbert", None).validate().is_ok());
}

#[test]
fn draft_rejects_year_past_upper_bound() {
    let err = BookDraft::new("Dune", "Herbert", Some(2101))
        .validate()
        .unwrap_err();
    assert_eq!(err, BookValidationError::YearOutOfRange(2101));
    assert_eq!(err.field(), "year");
}

#[test]
fn draft_rejects_empty_author() {
    let err = BookDraft::new("Dune", "", Some(1965)).validate().unwrap_err();
    assert_eq!(err, BookValidationError::EmptyAuthor);
}

#[test]
fn draft_decodes_without_year_as_null() {
    let draft: BookDraft =
        serde_json::from_str(r#"{"title": "Dune", "author": "Herbert"}"#).unwrap();
    assert_eq!(draft.year, None);
}

#[test]
fn draft_decoding_rejects_unknown_fields() {
    let result: Result<BookDraft, _> =
        serde_json::from_str(r#"{"title": "Dune", "author": "Herbert", "id": 7}"#);
    assert!(result.is_err());
}

#[test]
fn book_serialization_uses_expected_wire_fields() {
    let book = BookDraft::new("Dune", "Herbert", None).into_book(1);

    let json = serde_json::to_value(&book).unwrap();
    assert_eq!(json["id"], 1);
    assert_eq!(json["title"], "Dune");
    assert_eq!(json["author"], "Herbert");
    assert!(json["year"].is_null());

    let decoded: Book = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, book);
    assert_eq!(decoded.to_draft(), BookDraft::new("Dune", "Herbert", None));
}
