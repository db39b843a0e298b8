use super::*;

fn doc(id: &str, name: &str) -> Document {
    Document { id: id.into(), name: name.into(), size: 1024, modified: "2024-01-01 10:00".into(), kind: "pdf".into() }
}

fn loaded(documents: Vec<Document>) -> DocumentsState {
    DocumentsState::default().reduce(DocumentsEvent::FetchSucceeded(documents))
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn default_starts_loading_with_idle_upload() {
    let state = DocumentsState::default();
    assert!(state.loading);
    assert!(state.documents.is_empty());
    assert_eq!(state.error, None);
    assert_eq!(state.upload, UploadLifecycle { in_progress: false, progress: 0 });
}

// =============================================================
// Fetch
// =============================================================

#[test]
fn fetch_started_sets_loading_and_clears_error() {
    let state = loaded(vec![])
        .reduce(DocumentsEvent::FetchFailed("down".into()))
        .reduce(DocumentsEvent::FetchStarted);
    assert!(state.loading);
    assert_eq!(state.error, None);
}

#[test]
fn fetch_succeeded_replaces_collection_without_merging() {
    let state = loaded(vec![doc("1", "a.pdf"), doc("2", "b.pdf")])
        .reduce(DocumentsEvent::FetchStarted)
        .reduce(DocumentsEvent::FetchSucceeded(vec![doc("3", "c.pdf")]));
    assert_eq!(state.documents, vec![doc("3", "c.pdf")]);
    assert!(!state.loading);
}

#[test]
fn fetch_failed_keeps_stale_collection() {
    let state = loaded(vec![doc("1", "a.pdf")])
        .reduce(DocumentsEvent::FetchStarted)
        .reduce(DocumentsEvent::FetchFailed("request failed: 503".into()));
    assert_eq!(state.documents, vec![doc("1", "a.pdf")]);
    assert_eq!(state.error.as_deref(), Some("request failed: 503"));
    assert!(!state.loading);
}

// =============================================================
// Upload lifecycle
// =============================================================

#[test]
fn upload_started_resets_progress_and_error() {
    let state = loaded(vec![])
        .reduce(DocumentsEvent::RemoveFailed("old".into()))
        .reduce(DocumentsEvent::UploadStarted);
    assert_eq!(state.upload, UploadLifecycle { in_progress: true, progress: 0 });
    assert_eq!(state.error, None);
}

#[test]
fn upload_tick_advances_by_step_and_caps() {
    let mut state = loaded(vec![]).reduce(DocumentsEvent::UploadStarted);
    let mut seen = Vec::new();
    for _ in 0..12 {
        state = state.reduce(DocumentsEvent::UploadTick);
        seen.push(state.upload.progress);
    }
    assert_eq!(seen, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 90, 90, 90]);
}

#[test]
fn upload_tick_is_ignored_when_idle() {
    let state = loaded(vec![]).reduce(DocumentsEvent::UploadTick);
    assert_eq!(state.upload, UploadLifecycle::default());
}

#[test]
fn upload_succeeded_holds_at_complete_then_settles() {
    let state = loaded(vec![])
        .reduce(DocumentsEvent::UploadStarted)
        .reduce(DocumentsEvent::UploadTick)
        .reduce(DocumentsEvent::UploadSucceeded);
    assert_eq!(state.upload, UploadLifecycle { in_progress: true, progress: UPLOAD_PROGRESS_COMPLETE });
    assert!(state.is_uploading());

    let state = state.reduce(DocumentsEvent::UploadSettled);
    assert_eq!(state.upload, UploadLifecycle { in_progress: false, progress: 0 });
}

#[test]
fn upload_failed_resets_immediately_and_sets_error() {
    let state = loaded(vec![doc("1", "a.pdf")])
        .reduce(DocumentsEvent::UploadStarted)
        .reduce(DocumentsEvent::UploadTick)
        .reduce(DocumentsEvent::UploadTick)
        .reduce(DocumentsEvent::UploadFailed("File type .exe not allowed".into()));
    assert_eq!(state.upload, UploadLifecycle::default());
    assert_eq!(state.error.as_deref(), Some("File type .exe not allowed"));
    assert_eq!(state.count(), 1);
}

// =============================================================
// Remove
// =============================================================

#[test]
fn remove_started_clears_error_without_touching_documents() {
    let state = loaded(vec![doc("1", "a.pdf")])
        .reduce(DocumentsEvent::FetchFailed("x".into()))
        .reduce(DocumentsEvent::RemoveStarted);
    assert_eq!(state.error, None);
    assert_eq!(state.count(), 1);
}

#[test]
fn remove_failed_records_error() {
    let state = loaded(vec![]).reduce(DocumentsEvent::RemoveFailed("Document not found".into()));
    assert_eq!(state.error.as_deref(), Some("Document not found"));
}

// =============================================================
// Derived views
// =============================================================

#[test]
fn matching_filters_by_name_case_insensitively() {
    let state = loaded(vec![doc("1", "Annual Report.pdf"), doc("2", "notes.txt"), doc("3", "report-draft.docx")]);
    let names: Vec<&str> = state
        .matching("REPORT")
        .into_iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(names, vec!["Annual Report.pdf", "report-draft.docx"]);
}

#[test]
fn matching_blank_query_returns_everything() {
    let state = loaded(vec![doc("1", "a.pdf"), doc("2", "b.pdf")]);
    assert_eq!(state.matching("   ").len(), 2);
}

#[test]
fn format_size_picks_unit() {
    assert_eq!(format_size(0), "0 B");
    assert_eq!(format_size(1023), "1023 B");
    assert_eq!(format_size(1536), "1.5 KB");
    assert_eq!(format_size(2 * 1024 * 1024), "2.0 MB");
    assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.0 GB");
}
