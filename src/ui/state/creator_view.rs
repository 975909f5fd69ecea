use tracing::debug;

use crate::domain::entities::query::{QueryState, SortSpec};
use crate::domain::entities::record::Record;
use crate::domain::entities::resource::{ResourceKind, CREATOR_SEARCH_FILTER};
use crate::domain::filter::{filter_records, sort_records};
use crate::domain::pagination::{slice_for_page, PageInfo};
use crate::ui::state::app_state::{failure_status, ViewStatus};
use crate::usecase::ports::source::FetchError;
use crate::usecase::services::query_service::QueryService;
use crate::usecase::services::request_tracker::{RequestToken, RequestTracker};

#[derive(Debug, Default)]
pub struct CreatorView {
    query: QueryState,
    tracker: RequestTracker,
    creators: Vec<Record>,
    reported_total: u64,
    status: ViewStatus,
}

impl CreatorView {
    pub fn new(query: QueryState) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn reported_total(&self) -> u64 {
        self.reported_total
    }

    pub fn set_search(&mut self, text: &str) {
        self.query.set_filter(CREATOR_SEARCH_FILTER, text);
    }

    pub fn set_filter(&mut self, name: &str, value: &str) {
        self.query.set_filter(name, value);
    }

    pub fn clear_search(&mut self) {
        self.query.clear_filters();
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.query.set_sort(sort);
    }

    pub fn toggle_sort(&mut self, field: &str) {
        self.query.toggle_sort(field);
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

    pub fn skip_to(&mut self, offset: u64) {
        self.query.skip_to(offset);
    }

    pub fn filtered(&self) -> Vec<Record> {
        let matching = filter_records(
            &self.creators,
            self.query.filters(),
            ResourceKind::Creators.filters(),
        );
        sort_records(&matching, self.query.sort())
    }

    pub fn total(&self) -> u64 {
        if self.query.has_active_filters() {
            self.filtered().len() as u64
        } else {
            self.creators.len() as u64
        }
    }

    pub fn visible(&self) -> Vec<Record> {
        let rows = self.filtered();
        slice_for_page(&rows, self.query.limit(), self.query.offset()).to_vec()
    }

    pub fn page_info(&self) -> PageInfo {
        self.query.page_info(self.total())
    }

    pub fn begin_load(&mut self) -> RequestToken {
        self.status = ViewStatus::Loading;
        self.tracker.issue()
    }

    pub fn finish_load(
        &mut self,
        token: RequestToken,
        result: Result<(Vec<Record>, u64), FetchError>,
    ) -> bool {
        if !self.tracker.is_current(token) {
            debug!(?token, "dropping superseded creators response");
            return false;
        }

        match result {
            Ok((creators, reported_total)) => {
                self.creators = creators;
                self.reported_total = reported_total;
                self.status = ViewStatus::Ready;
            }
            Err(err) => self.status = failure_status("creators", &err),
        }
        true
    }

    pub async fn load(&mut self, service: &QueryService) -> bool {
        let token = self.begin_load();
        let result = service.all_creators().await;
        self.finish_load(token, result)
    }

    pub async fn retry(&mut self, service: &QueryService) -> bool {
        self.load(service).await
    }

    /// Refresh clears the search before reloading.
    pub async fn refresh(&mut self, service: &QueryService) -> bool {
        self.clear_search();
        self.load(service).await
    }
}
