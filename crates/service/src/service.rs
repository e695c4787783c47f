use async_trait::async_trait;
use registro_core::{NationalId, RecordUpdate, Result, UpdateOutcome};
use registro_storage::RecordRepository;

/// Transport-agnostic update operations.
///
/// Implementations report "not found" as `matched == 0` and pass store
/// failures through unchanged. They never speak in HTTP terms.
#[async_trait]
pub trait UpdateService: Send + Sync {
    /// Overwrite the mutable fields of the record keyed by `national_id`.
    async fn update_by_national_id(
        &self,
        national_id: &NationalId,
        update: RecordUpdate,
    ) -> Result<UpdateOutcome>;
}

/// [`UpdateService`] backed by a [`RecordRepository`].
#[derive(Debug, Clone)]
pub struct RecordService {
    repository: RecordRepository,
}

impl RecordService {
    /// Create a service over `repository`.
    pub fn new(repository: RecordRepository) -> Self {
        Self { repository }
    }

    /// Underlying repository.
    pub fn repository(&self) -> &RecordRepository {
        &self.repository
    }
}

#[async_trait]
impl UpdateService for RecordService {
    async fn update_by_national_id(
        &self,
        national_id: &NationalId,
        update: RecordUpdate,
    ) -> Result<UpdateOutcome> {
        self.repository
            .update_by_national_id(national_id, &update)
            .await
    }
}
