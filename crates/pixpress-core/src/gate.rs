use crate::store::RecordStore;

/// Which bulk actions are currently permitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BulkActions {
    pub apply_to_all: bool,
    pub download_all: bool,
    pub clear_all: bool,
}

/// Derive the bulk-action permissions from store state.
///
/// `batch_in_progress` is the coordinator-level flag, separate from record
/// status: a batch that has started but settled nothing yet still reports
/// busy. Download-all is allowed on a purely pending set because it
/// triggers processing first when no results exist yet.
pub fn bulk_actions(store: &RecordStore, batch_in_progress: bool) -> BulkActions {
    let busy = batch_in_progress || store.any_processing();
    let has_records = !store.is_empty();
    let downloadable = store.any_done() || store.pending_count() > 0;

    BulkActions {
        apply_to_all: has_records && !busy,
        download_all: downloadable && !busy,
        clear_all: has_records && !busy,
    }
}
