//! Backend-to-database persistence check
//!
//! Check 6: a record created through the API must come back in the listing.

use serde_json::json;
use tracing::{debug, info};

use super::{
    conclude, expect_status, CheckFailure, CreateStatusCheck, Verdict, STATUS_PATH,
};
use crate::http::HttpClient;
use crate::models::{record_id, status_list, CheckCase, CheckResult};
use crate::utils::Timer;

/// Check 6: create, then find the new `id` in `GET /api/status`
#[derive(Clone, Debug, Default)]
pub struct PersistenceCheck {
    create: CreateStatusCheck,
}

impl PersistenceCheck {
    pub fn new() -> Self {
        Self {
            create: CreateStatusCheck::new(),
        }
    }

    pub async fn run(&self, client: &HttpClient) -> CheckResult {
        info!("Running Database Persistence check");
        let timer = Timer::start("persistence");
        conclude(CheckCase::Persistence, timer, self.verify(client).await)
    }

    async fn verify(&self, client: &HttpClient) -> Result<Verdict, CheckFailure> {
        let record = self
            .create
            .create(client)
            .await
            .map_err(|e| CheckFailure::CreateFailed(Box::new(e)))?;
        debug!("Created record {}, looking it up", record.id);

        let resp = client.get(STATUS_PATH).await?;
        expect_status(&resp, &[200], "200")?;

        let body = resp.json()?;
        let records = status_list(&body)?;

        let found = records.iter().any(|item| {
            item.get("id").and_then(record_id).as_deref() == Some(record.id.as_str())
        });
        if !found {
            return Err(CheckFailure::NotPersisted {
                id: record.id,
                listed: records.len(),
            });
        }

        Ok(Verdict::new("data persisted correctly").with_details(Some(json!({
            "id": record.id,
            "listed": records.len(),
        }))))
    }
}
