use std::sync::Arc;

use chrono::Utc;

use dancu_core::{Actor, ChangeRecordId, DomainError, DomainResult};
use dancu_population::{ChangeRecord, ChangeRecordDraft};

use crate::repository::ChangeRecordRepository;

/// Population-change records (BienDong). These are audited but do not
/// affect fees, so no change events are published for them.
#[derive(Clone)]
pub struct ChangeRecordService {
    records: Arc<dyn ChangeRecordRepository>,
}

impl ChangeRecordService {
    pub fn new(records: Arc<dyn ChangeRecordRepository>) -> Self {
        Self { records }
    }

    /// Every record, ascending id.
    pub fn list(&self) -> DomainResult<Vec<ChangeRecord>> {
        self.records.list()
    }

    pub fn get(&self, id: ChangeRecordId) -> DomainResult<ChangeRecord> {
        self.records.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn create(&self, draft: ChangeRecordDraft, actor: &Actor) -> DomainResult<ChangeRecord> {
        let draft = draft.validate()?;
        let record = self.records.insert(draft, actor, Utc::now())?;
        tracing::info!(
            change_record_id = %record.id,
            kind = ?record.kind,
            actor = %actor.username,
            "change record created"
        );
        Ok(record)
    }

    pub fn update(&self, id: ChangeRecordId, draft: ChangeRecordDraft, actor: &Actor) -> DomainResult<ChangeRecord> {
        let mut record = self.get(id)?;
        let draft = draft.validate()?;

        record.apply_update(draft, actor, Utc::now());
        self.records.save(record.clone())?;
        tracing::info!(change_record_id = %id, actor = %actor.username, "change record updated");
        Ok(record)
    }

    pub fn delete(&self, id: ChangeRecordId, actor: &Actor) -> DomainResult<()> {
        self.records.remove(id)?.ok_or(DomainError::NotFound)?;
        tracing::info!(change_record_id = %id, actor = %actor.username, "change record deleted");
        Ok(())
    }
}
