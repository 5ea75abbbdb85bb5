//! Review/edit session: one draft, saved as a create or an update

use super::{ApiClient, ClientError, InvoiceDraft};
use crate::entities::Invoice;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

/// Holds the draft under review and knows how to persist it
pub struct ReviewSession {
    client: ApiClient,
    draft: InvoiceDraft,
    invoice_id: Option<Uuid>,
    file_name: String,
}

impl ReviewSession {
    /// Start reviewing freshly extracted data for an uploaded file
    pub fn from_extraction(
        client: ApiClient,
        file_name: impl Into<String>,
        extracted: &Value,
    ) -> Self {
        Self {
            client,
            draft: InvoiceDraft::reconcile(extracted),
            invoice_id: None,
            file_name: file_name.into(),
        }
    }

    /// Upload a PDF, extract it and start reviewing the result
    pub async fn upload(
        client: ApiClient,
        file_name: impl Into<String>,
        pdf: Vec<u8>,
    ) -> Result<Self, ClientError> {
        let file_name = file_name.into();
        let extracted = client.extract(&file_name, pdf).await?;
        Ok(Self::from_extraction(client, file_name, &extracted))
    }

    /// Start editing an invoice that is already stored
    pub async fn open(client: ApiClient, id: Uuid) -> Result<Self, ClientError> {
        let invoice = client.get(id).await?;
        Ok(Self {
            draft: InvoiceDraft::from_invoice(&invoice),
            invoice_id: Some(invoice.id),
            file_name: invoice.content.file_name,
            client,
        })
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    /// Id of the stored invoice, once there is one
    pub fn invoice_id(&self) -> Option<Uuid> {
        self.invoice_id
    }

    /// Replace the draft with an edited copy
    pub fn edit(&mut self, edit: impl FnOnce(&InvoiceDraft) -> InvoiceDraft) {
        self.draft = edit(&self.draft);
    }

    /// Persist the draft
    ///
    /// Creates the invoice the first time and updates it afterwards. On any
    /// failure the draft is left as it was so the user can retry.
    pub async fn save(&mut self) -> Result<Invoice, ClientError> {
        self.draft.validate()?;
        let mut payload = self.draft.to_payload();

        let saved = match self.invoice_id {
            Some(id) => self.client.update(id, &payload).await,
            None => {
                payload["fileId"] = Value::String(file_id(&self.file_name));
                payload["fileName"] = Value::String(self.file_name.clone());
                self.client.create(&payload).await
            }
        };

        match saved {
            Ok(invoice) => {
                tracing::info!(id = %invoice.id, "Invoice saved");
                self.invoice_id = Some(invoice.id);
                Ok(invoice)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save invoice");
                Err(e)
            }
        }
    }
}

/// `{unix_millis}-{file_name}`
fn file_id(file_name: &str) -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), file_name)
}
