//! Cached medication list and detail state.

use medtrack_entity::medication::{IntakeLog, Medication};

use crate::services::MedicationPage;
use crate::state::Pagination;

/// Last fetched medication data.
#[derive(Debug, Default)]
pub struct MedicationsState {
    medications: Vec<Medication>,
    selected: Option<Medication>,
    logs: Vec<IntakeLog>,
    pagination: Pagination,
}

impl MedicationsState {
    /// Replace the cached list with a freshly fetched page.
    pub fn apply_page(&mut self, page: MedicationPage) {
        self.pagination = Pagination {
            current_page: page.current_page,
            total_pages: page.total_pages,
            total_items: page.total,
        };
        self.medications = page.medications;
    }

    /// Cache a fetched medication as the selected one.
    pub fn select(&mut self, medication: Medication) {
        self.selected = Some(medication);
    }

    /// Reconcile a created medication into the cached list.
    pub fn apply_created(&mut self, medication: Medication) {
        self.medications.insert(0, medication);
        self.pagination.total_items += 1;
    }

    /// Reconcile an updated medication into both the list and the
    /// selection.
    pub fn apply_updated(&mut self, medication: Medication) {
        if let Some(cached) = self.medications.iter_mut().find(|m| m.id == medication.id) {
            *cached = medication.clone();
        }
        if self
            .selected
            .as_ref()
            .is_some_and(|selected| selected.id == medication.id)
        {
            self.selected = Some(medication);
        }
    }

    /// Drop a deleted medication from the cache.
    pub fn apply_deleted(&mut self, id: &str) {
        self.medications.retain(|m| m.id != id);
        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.selected = None;
        }
        self.pagination.total_items = self.pagination.total_items.saturating_sub(1);
    }

    /// Replace the cached intake history of the selected medication.
    pub fn set_logs(&mut self, logs: Vec<IntakeLog>) {
        self.logs = logs;
    }

    /// Prepend a freshly recorded intake to the cached history.
    pub fn apply_logged(&mut self, log: IntakeLog) {
        self.logs.insert(0, log);
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn selected(&self) -> Option<&Medication> {
        self.selected.as_ref()
    }

    pub fn logs(&self) -> &[IntakeLog] {
        &self.logs
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn med(id: &str, name: &str) -> Medication {
        Medication {
            id: id.to_string(),
            name: name.to_string(),
            dosage: "200mg".to_string(),
            frequency: "daily".to_string(),
            instructions: None,
            start_date: Utc::now(),
            end_date: None,
            patient: "p1".to_string(),
            prescribed_by: None,
            is_active: true,
        }
    }

    #[test]
    fn update_reconciles_list_and_selection() {
        let mut state = MedicationsState::default();
        state.apply_page(MedicationPage {
            medications: vec![med("m1", "Ibuprofen"), med("m2", "Aspirin")],
            current_page: 1,
            total_pages: 1,
            total: 2,
        });
        state.select(med("m2", "Aspirin"));

        let mut updated = med("m2", "Aspirin");
        updated.dosage = "400mg".to_string();
        state.apply_updated(updated);

        assert_eq!(state.medications()[1].dosage, "400mg");
        assert_eq!(state.selected().map(|m| m.dosage.as_str()), Some("400mg"));
    }

    #[test]
    fn delete_clears_matching_selection() {
        let mut state = MedicationsState::default();
        state.apply_page(MedicationPage {
            medications: vec![med("m1", "Ibuprofen")],
            current_page: 1,
            total_pages: 1,
            total: 1,
        });
        state.select(med("m1", "Ibuprofen"));

        state.apply_deleted("m1");

        assert!(state.medications().is_empty());
        assert!(state.selected().is_none());
        assert_eq!(state.pagination().total_items, 0);
    }
}
