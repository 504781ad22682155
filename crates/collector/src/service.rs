use std::sync::Arc;
use std::time::Duration;

use normalizer::{enrich, fill_from_detail, normalize_ticket, EnrichedTicket};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{info, warn};

use common::config::{Account, AccountsConfig, AppConfig};

use crate::client::{TicketApi, TicketApiError};

/// Sequences authenticated fetches and turns raw payloads into enriched
/// rows. Network failures degrade to "no data" here; nothing from the
/// client propagates past this service.
pub struct Collector<C: TicketApi + 'static> {
    client: Arc<C>,
    accounts: AccountsConfig,
    request_delay: Duration,
    fetch_details: bool,
}

impl<C: TicketApi + 'static> Collector<C> {
    pub fn new(config: &AppConfig, client: Arc<C>) -> Self {
        Self {
            client,
            accounts: config.accounts.clone(),
            request_delay: Duration::from_millis(config.api.request_delay_ms),
            fetch_details: config.report.fetch_details,
        }
    }

    /// One account's ticket list, or an empty list on any failure. The
    /// fixed inter-request pause follows the call either way.
    pub async fn fetch_account_tickets(&self, account: &Account) -> Vec<Value> {
        let result = self.client.list_tickets(account).await;
        self.pause().await;
        match result {
            Ok(tickets) => tickets,
            Err(err) => {
                warn!(
                    login = %account.login,
                    error = ?err,
                    "ticket list fetch failed, continuing with no data"
                );
                Vec::new()
            }
        }
    }

    /// Category list fetched with the analyst account; empty on failure.
    pub async fn fetch_categories(&self) -> Vec<Value> {
        match self.client.list_categories(&self.accounts.analyst).await {
            Ok(categories) => categories,
            Err(err) => {
                warn!(error = ?err, "category fetch failed, continuing with no data");
                Vec::new()
            }
        }
    }

    /// Every manager account's tickets, concatenated in configuration
    /// order. Duplicates across accounts are kept: per-account ticket sets
    /// are assumed disjoint (pending product-owner confirmation).
    pub async fn collect(&self) -> Vec<Value> {
        let mut all_tickets = Vec::new();
        for account in &self.accounts.managers {
            info!(login = %account.login, "fetching tickets");
            let tickets = self.fetch_account_tickets(account).await;
            info!(login = %account.login, count = tickets.len(), "tickets received");
            all_tickets.extend(tickets);
        }
        all_tickets
    }

    /// Normalizes raw records in input order and enriches every row. When
    /// detail fetches are enabled, a ticket still missing its category or
    /// close time after list resolution gets one detail lookup with the
    /// analyst account; only still-missing fields are filled from it.
    pub async fn build_records(&self, raw_tickets: &[Value]) -> Vec<EnrichedTicket> {
        let mut records = Vec::with_capacity(raw_tickets.len());
        for raw in raw_tickets {
            let mut ticket = normalize_ticket(raw);
            if self.fetch_details && ticket.wants_detail() {
                if let Some(ticket_id) = ticket.ticket_id.clone() {
                    let result = self
                        .client
                        .ticket_detail(&ticket_id, &self.accounts.analyst)
                        .await;
                    self.pause().await;
                    match result {
                        Ok(detail) => fill_from_detail(&mut ticket, &detail),
                        Err(err) => {
                            if let Some(api_err) = err.downcast_ref::<TicketApiError>() {
                                warn!(
                                    ticket_id = %ticket_id,
                                    status = %api_err.status_code(),
                                    endpoint = api_err.endpoint(),
                                    "detail fetch rejected, keeping partial row"
                                );
                            } else {
                                warn!(
                                    ticket_id = %ticket_id,
                                    error = ?err,
                                    "detail fetch failed, keeping partial row"
                                );
                            }
                        }
                    }
                }
            }
            records.push(enrich(ticket));
        }
        records
    }

    async fn pause(&self) {
        sleep(self.request_delay).await;
    }
}
