use crate::record::{ImageRecord, RecordId, SourceInfo};
use crate::settings::SharedSettings;

/// Ordered collection of image records plus the single selection.
///
/// The store is the one piece of shared mutable state in the system. It is
/// mutated only through the settings propagator and the batch coordinator;
/// on a multi-threaded runtime it lives behind a mutex so those mutations
/// stay serialized.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<ImageRecord>,
    selected: Option<RecordId>,
    next_id: u64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record for an accepted upload. The first record inserted while
    /// nothing is selected becomes the selection.
    pub fn insert(&mut self, source: SourceInfo, defaults: &SharedSettings) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        self.records.push(ImageRecord::new(id, source, defaults));
        if self.selected.is_none() {
            self.selected = Some(id);
        }
        id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut ImageRecord> {
        self.records.iter_mut()
    }

    pub fn get(&self, id: RecordId) -> Option<&ImageRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: RecordId) -> Option<&mut ImageRecord> {
        self.records.iter_mut().find(|r| r.id() == id)
    }

    pub fn selected_id(&self) -> Option<RecordId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&ImageRecord> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Select a record. Unknown ids leave the selection unchanged.
    pub fn select(&mut self, id: RecordId) -> bool {
        if self.get(id).is_some() {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Settings template shown when a record is selected, or the defaults
    /// when nothing is.
    pub fn settings_template(&self) -> SharedSettings {
        match self.selected() {
            Some(record) => SharedSettings::for_record(record),
            None => SharedSettings::default(),
        }
    }

    /// Discard every record and the selection atomically.
    pub fn clear(&mut self) {
        self.records.clear();
        self.selected = None;
    }

    pub fn any_processing(&self) -> bool {
        self.records.iter().any(|r| r.is_processing())
    }

    pub fn any_done(&self) -> bool {
        self.records.iter().any(|r| r.is_done())
    }

    pub fn pending_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_pending()).count()
    }

    /// Ids of all records currently pending, in store order.
    pub fn pending_ids(&self) -> Vec<RecordId> {
        self.records
            .iter()
            .filter(|r| r.is_pending())
            .map(|r| r.id())
            .collect()
    }

    /// Processed filenames of all records currently done, in store order.
    pub fn done_outputs(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.is_done())
            .filter_map(|r| r.output().map(|o| o.filename.clone()))
            .collect()
    }
}
