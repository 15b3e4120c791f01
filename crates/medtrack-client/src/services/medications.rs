//! Medication endpoints.

use std::sync::Arc;

use serde::Deserialize;

use medtrack_core::AppResult;
use medtrack_entity::medication::{
    CreateMedication, IntakeLog, LogIntake, Medication, UpdateMedication,
};

use crate::pipeline::ApiClient;
use crate::transport::ApiRequest;

/// Query filters for the medication list endpoint.
#[derive(Debug, Clone, Default)]
pub struct MedicationFilter {
    /// Restrict to a single patient.
    pub patient: Option<String>,
    /// Restrict by active flag.
    pub active: Option<bool>,
    /// Page to fetch (1-based).
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

/// One page of the medication list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationPage {
    /// The medications on this page.
    pub medications: Vec<Medication>,
    /// 1-based index of this page.
    #[serde(default = "first_page")]
    pub current_page: u32,
    /// Total number of pages.
    #[serde(default = "first_page")]
    pub total_pages: u32,
    /// Total matching medications across all pages.
    #[serde(default)]
    pub total: u64,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct MedicationEnvelope {
    medication: Medication,
}

#[derive(Debug, Deserialize)]
struct LogsEnvelope {
    logs: Vec<IntakeLog>,
}

/// Medication endpoints over the request pipeline.
pub struct MedicationApi {
    client: Arc<ApiClient>,
}

impl MedicationApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// List medications, paged and filtered server-side.
    pub async fn list(&self, filter: &MedicationFilter) -> AppResult<MedicationPage> {
        let mut request = ApiRequest::get("/medications");
        if let Some(patient) = &filter.patient {
            request = request.with_query("patient", patient);
        }
        if let Some(active) = filter.active {
            request = request.with_query("isActive", active.to_string());
        }
        if let Some(page) = filter.page {
            request = request.with_query("page", page.to_string());
        }
        if let Some(limit) = filter.limit {
            request = request.with_query("limit", limit.to_string());
        }
        self.client.send(request).await?.json()
    }

    /// Fetch a single medication.
    pub async fn get(&self, id: &str) -> AppResult<Medication> {
        let envelope: MedicationEnvelope = self
            .client
            .send(ApiRequest::get(format!("/medications/{id}")))
            .await?
            .json()?;
        Ok(envelope.medication)
    }

    /// Create a medication.
    pub async fn create(&self, medication: &CreateMedication) -> AppResult<Medication> {
        let body = serde_json::to_value(medication)?;
        let envelope: MedicationEnvelope = self
            .client
            .send(ApiRequest::post("/medications", body))
            .await?
            .json()?;
        Ok(envelope.medication)
    }

    /// Apply a partial update to a medication.
    pub async fn update(&self, id: &str, changes: &UpdateMedication) -> AppResult<Medication> {
        let body = serde_json::to_value(changes)?;
        let envelope: MedicationEnvelope = self
            .client
            .send(ApiRequest::put(format!("/medications/{id}"), body))
            .await?
            .json()?;
        Ok(envelope.medication)
    }

    /// Delete a medication.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.client
            .send(ApiRequest::delete(format!("/medications/{id}")))
            .await?;
        Ok(())
    }

    /// Record an intake event for a medication.
    pub async fn log_intake(&self, id: &str, entry: &LogIntake) -> AppResult<IntakeLog> {
        let body = serde_json::to_value(entry)?;
        self.client
            .send(ApiRequest::post(format!("/medications/{id}/log"), body))
            .await?
            .json()
    }

    /// Fetch the intake history of a medication.
    pub async fn logs(&self, id: &str) -> AppResult<Vec<IntakeLog>> {
        let envelope: LogsEnvelope = self
            .client
            .send(ApiRequest::get(format!("/medications/{id}/logs")))
            .await?
            .json()?;
        Ok(envelope.logs)
    }
}
