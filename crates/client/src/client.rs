//! HTTP client for the practice-management backend.

use std::time::Duration;

use async_trait::async_trait;
use lexbill_core::{InvoiceSnapshot, TimesheetEdit};
use lexbill_shared::{BackendConfig, InvoiceId, TimesheetId};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::dto::{self, Envelope, InvoiceDetailsDto, InvoiceDto, PaymentDto, SplitDto};
use crate::error::ClientError;
use crate::source::InvoiceSource;

/// Client for the backend's invoice endpoints.
///
/// Ids are appended to the base URL as percent-encoded path segments, so an
/// id can never change which endpoint is called.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl BackendClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot have paths appended to it or the
    /// underlying HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .ok()
            .filter(|url| !url.cannot_be_a_base() && url.query().is_none())
            .ok_or_else(|| ClientError::InvalidBaseUrl(config.base_url.clone()))?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_token: config.api_token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `GET /invoices/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or bad JSON.
    pub async fn invoice(&self, invoice_id: &InvoiceId) -> Result<InvoiceDto, ClientError> {
        self.get_json(&["invoices", invoice_id.as_str()]).await
    }

    /// `GET /invoices/{id}/details`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or bad JSON.
    pub async fn invoice_details(
        &self,
        invoice_id: &InvoiceId,
    ) -> Result<InvoiceDetailsDto, ClientError> {
        self.get_json(&["invoices", invoice_id.as_str(), "details"])
            .await
    }

    /// `GET /invoices/{id}/payments`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or bad JSON.
    pub async fn payments(&self, invoice_id: &InvoiceId) -> Result<Vec<PaymentDto>, ClientError> {
        self.get_json(&["invoices", invoice_id.as_str(), "payments"])
            .await
    }

    /// `GET /invoices/{id}/splits`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or bad JSON.
    pub async fn splits(&self, invoice_id: &InvoiceId) -> Result<Vec<SplitDto>, ClientError> {
        self.get_json(&["invoices", invoice_id.as_str(), "splits"])
            .await
    }

    /// `PUT /invoices/{id}/timesheets/{timesheet_id}`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    pub async fn update_timesheet(
        &self,
        invoice_id: &InvoiceId,
        timesheet_id: &TimesheetId,
        edit: &TimesheetEdit,
    ) -> Result<(), ClientError> {
        let url = self.url(&[
            "invoices",
            invoice_id.as_str(),
            "timesheets",
            timesheet_id.as_str(),
        ])?;
        debug!(%url, ?edit, "PUT timesheet edit");

        let response = self
            .authorized(self.http.put(url.clone()))
            .json(edit)
            .send()
            .await
            .map_err(|e| {
                error!(%url, error = %e, "Failed to send timesheet update");
                ClientError::Http(e)
            })?;
        Self::read_body(url.as_str(), response).await?;

        info!(
            invoice_id = %invoice_id,
            timesheet_id = %timesheet_id,
            "Timesheet updated"
        );
        Ok(())
    }

    /// Fetch invoice, details, payments and splits concurrently.
    ///
    /// # Errors
    ///
    /// Fails as soon as any of the four requests fails.
    pub async fn snapshot(&self, invoice_id: &InvoiceId) -> Result<InvoiceSnapshot, ClientError> {
        let (invoice, details, payments, splits) = tokio::try_join!(
            self.invoice(invoice_id),
            self.invoice_details(invoice_id),
            self.payments(invoice_id),
            self.splits(invoice_id),
        )?;
        debug!(
            invoice_id = %invoice_id,
            timesheets = details.timesheet_entries.len(),
            expenses = details.expense_entries.len(),
            payments = payments.len(),
            splits = splits.len(),
            "Fetched invoice snapshot"
        );
        Ok(dto::assemble(invoice, details, payments, splits))
    }

    /// Base URL extended by `segments`, each percent-encoded as one segment.
    ///
    /// Empty and dot segments are rejected since URL normalization would drop them.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| matches!(s.trim(), "" | "." | ".."))
        {
            warn!(segment = %bad, "Refusing to build backend URL from dot or empty id");
            return Err(ClientError::InvalidPathSegment((*bad).to_string()));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let url = self.url(segments)?;
        debug!(%url, "GET");

        let response = self
            .authorized(self.http.get(url.clone()))
            .send()
            .await
            .map_err(|e| {
                error!(%url, error = %e, "Failed to send GET request");
                ClientError::Http(e)
            })?;
        let body = Self::read_body(url.as_str(), response).await?;

        serde_json::from_str::<Envelope<T>>(&body)
            .map(Envelope::into_inner)
            .map_err(|source| {
                warn!(%url, error = %source, "Failed to decode backend response");
                ClientError::Decode {
                    url: url.to_string(),
                    source,
                }
            })
    }

    async fn read_body(url: &str, response: Response) -> Result<String, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(body);
        }
        warn!(%url, status = status.as_u16(), "Backend returned an error status");
        Err(ClientError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl InvoiceSource for BackendClient {
    async fn snapshot(&self, invoice_id: &InvoiceId) -> Result<InvoiceSnapshot, ClientError> {
        Self::snapshot(self, invoice_id).await
    }

    async fn update_timesheet(
        &self,
        invoice_id: &InvoiceId,
        timesheet_id: &TimesheetId,
        edit: &TimesheetEdit,
    ) -> Result<(), ClientError> {
        Self::update_timesheet(self, invoice_id, timesheet_id, edit).await
    }
}
