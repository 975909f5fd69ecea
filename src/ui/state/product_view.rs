use tracing::debug;

use crate::domain::entities::query::{Page, QueryState};
use crate::domain::pagination::PageInfo;
use crate::ui::state::app_state::{failure_status, ViewStatus};
use crate::usecase::ports::source::FetchError;
use crate::usecase::services::query_service::QueryService;
use crate::usecase::services::request_tracker::{RequestToken, RequestTracker};

#[derive(Debug, Default)]
pub struct ProductView {
    query: QueryState,
    tracker: RequestTracker,
    page: Option<Page>,
    status: ViewStatus,
}

impl ProductView {
    pub fn new(query: QueryState) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn total(&self) -> u64 {
        self.page.as_ref().map_or(0, |page| page.total)
    }

    pub fn page_info(&self) -> PageInfo {
        match &self.page {
            Some(page) => page.info(),
            None => self.query.page_info(0),
        }
    }

    pub fn set_filter(&mut self, name: &str, value: &str) {
        self.query.set_filter(name, value);
    }

    pub fn clear_filters(&mut self) {
        self.query.clear_filters();
    }

    pub fn set_limit(&mut self, limit: u64) {
        self.query.set_limit(limit);
    }

    pub fn next_page(&mut self) -> bool {
        let total = self.total();
        self.query.next_page(total)
    }

    pub fn previous_page(&mut self) -> bool {
        self.query.previous_page()
    }

    pub fn begin_load(&mut self) -> (RequestToken, QueryState) {
        self.status = ViewStatus::Loading;
        (self.tracker.issue(), self.query.clone())
    }

    pub fn finish_load(&mut self, token: RequestToken, result: Result<Page, FetchError>) -> bool {
        if !self.tracker.is_current(token) {
            debug!(?token, "dropping superseded products response");
            return false;
        }

        match result {
            Ok(page) => {
                self.page = Some(page);
                self.status = ViewStatus::Ready;
            }
            Err(err) => self.status = failure_status("campaign products", &err),
        }
        true
    }

    pub async fn load(&mut self, service: &QueryService) -> bool {
        let (token, query) = self.begin_load();
        let result = service.product_page(&query).await;
        self.finish_load(token, result)
    }

    pub async fn retry(&mut self, service: &QueryService) -> bool {
        self.load(service).await
    }
}
