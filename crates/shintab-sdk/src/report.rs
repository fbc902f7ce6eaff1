use shintab_types::ImageId;

/// Outcome of a multi-file upload.
///
/// Uploads are attempted independently; one bad file never aborts the
/// batch. The report carries what landed and how many did not.
#[derive(Clone, Debug, Default)]
pub struct UploadReport {
    /// Ids of the images stored, in upload order.
    pub stored: Vec<ImageId>,
    /// Number of files that failed to store.
    pub failed: usize,
}

impl UploadReport {
    /// Returns `true` when every file landed.
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Outcome of an index/blob reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Index entries dropped because their blob no longer exists.
    pub stale_entries_dropped: usize,
    /// Blobs deleted because no index entry references them (only when
    /// orphan sweeping is enabled).
    pub orphan_blobs_dropped: usize,
}

impl ReconcileReport {
    /// Returns `true` when the two stores were already consistent.
    pub fn is_clean(&self) -> bool {
        self.stale_entries_dropped == 0 && self.orphan_blobs_dropped == 0
    }
}
