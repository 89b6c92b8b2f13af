use std::collections::HashSet;
use std::time::Duration;

use time::format_description::well_known::Rfc3339;
use time::{Date, Month, OffsetDateTime, UtcOffset};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, warn};

use crate::app::calendar::{day_bounds, month_bounds};
use crate::app::posts::PostSource;
use crate::domain::post::{OpenTarget, PostData, PostListQuery, PostPage, RawPost, ViewMode};
use crate::infra::api::ApiError;

/// Page size for calendar fetches.
pub const CALENDAR_PAGE_SIZE: u32 = 100;

/// Upper bound on pages fetched for one calendar month.
pub const MAX_CALENDAR_PAGES: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleFilters {
    pub channel_id: Option<i64>,
    pub status: Option<i32>,
    /// Search text already past the debounce.
    pub search: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub month: Month,
    pub year: i32,
}

impl ScheduleFilters {
    pub fn for_month(year: i32, month: Month) -> Self {
        Self {
            channel_id: None,
            status: None,
            search: String::new(),
            start_date: None,
            end_date: None,
            month,
            year,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Channel(Option<i64>),
    Status(Option<i32>),
    Search(String),
    DateRange {
        start: Option<Date>,
        end: Option<Date>,
    },
    MonthYear {
        month: Month,
        year: i32,
    },
    ViewMode(ViewMode),
}

/// Builds the listing query. Calendar mode takes its range from month/year,
/// list and grid modes from the explicit start/end dates.
pub fn build_query(
    filters: &ScheduleFilters,
    view: ViewMode,
    page: u32,
    page_size: u32,
    offset: UtcOffset,
) -> PostListQuery {
    let (start, end, limit) = match view {
        ViewMode::Calendar => match month_bounds(filters.year, filters.month, offset) {
            Ok((start, end)) => (Some(start), Some(end), CALENDAR_PAGE_SIZE),
            Err(err) => {
                warn!(error = %err, year = filters.year, "invalid calendar month");
                (None, None, CALENDAR_PAGE_SIZE)
            }
        },
        ViewMode::List | ViewMode::Grid => {
            let start = filters
                .start_date
                .and_then(|date| day_bounds(date, date, offset).ok())
                .map(|(start, _)| start);
            let end = filters
                .end_date
                .and_then(|date| day_bounds(date, date, offset).ok())
                .map(|(_, end)| end);
            (start, end, page_size)
        }
    };

    let search = filters.search.trim();

    PostListQuery {
        page,
        limit,
        channel_id: filters.channel_id,
        status: filters.status,
        search: (!search.is_empty()).then(|| search.to_string()),
        start_date: start.and_then(format_instant),
        end_date: end.and_then(format_instant),
    }
}

fn format_instant(at: OffsetDateTime) -> Option<String> {
    at.format(&Rfc3339).ok()
}

/// Server `hasNext` wins, then `total`, then the page-size heuristic.
pub fn compute_has_more(page: &PostPage, requested_page: u32, limit: u32) -> bool {
    if let Some(has_next) = page.has_next {
        return has_next;
    }

    let rows = page.items.len() as u64;
    if let Some(total) = page.total {
        let loaded = u64::from(requested_page.saturating_sub(1)) * u64::from(limit) + rows;
        return loaded < total;
    }

    // A final page of exactly `limit` rows still reports more, which costs
    // one extra fetch that comes back empty.
    rows >= u64::from(limit)
}

/// Pages through a calendar month starting at page 1 and merges the rows.
///
/// The merged page carries `hasNext: true` only when `MAX_CALENDAR_PAGES`
/// was reached with more rows still reported.
pub async fn fetch_month<S>(source: &S, query: &PostListQuery) -> Result<PostPage, ApiError>
where
    S: PostSource + ?Sized,
{
    let mut query = query.clone();
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    let mut page = 1;

    loop {
        query.page = page;
        let result = source.fetch_page(&query).await?;
        let more = !result.items.is_empty() && compute_has_more(&result, page, query.limit);
        items.extend(result.items.into_iter().filter(|raw| seen.insert(raw.id)));

        if !more {
            return Ok(merged(items, false));
        }
        if page >= MAX_CALENDAR_PAGES {
            warn!(pages = page, posts = items.len(), "calendar month truncated");
            return Ok(merged(items, true));
        }
        page += 1;
    }
}

fn merged(items: Vec<RawPost>, truncated: bool) -> PostPage {
    PostPage {
        items,
        total: None,
        has_next: Some(truncated),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Loading,
}

/// A fetch issued by the listing. Only the most recent ticket may land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub page: u32,
    pub view: ViewMode,
    pub query: PostListQuery,
}

/// View state of the schedule screen.
#[derive(Debug, Clone)]
pub struct ListingState {
    filters: ScheduleFilters,
    view_mode: ViewMode,
    page: u32,
    page_size: u32,
    offset: UtcOffset,
    posts: Vec<PostData>,
    has_more: bool,
    /// Calendar only: the month had more posts than were fetched.
    truncated: bool,
    phase: FetchPhase,
    error: Option<String>,
    seq: u64,
}

impl ListingState {
    pub fn new(page_size: u32, offset: UtcOffset, today: Date) -> Self {
        Self {
            filters: ScheduleFilters::for_month(today.year(), today.month()),
            view_mode: ViewMode::List,
            page: 1,
            page_size: page_size.max(1),
            offset,
            posts: Vec::new(),
            has_more: false,
            truncated: false,
            phase: FetchPhase::Idle,
            error: None,
            seq: 0,
        }
    }

    pub fn filters(&self) -> &ScheduleFilters {
        &self.filters
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn posts(&self) -> &[PostData] {
        &self.posts
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn latest_seq(&self) -> u64 {
        self.seq
    }

    /// Applies a filter change. Returns the fetch to run, or `None` when the
    /// value did not change.
    pub fn apply_change(&mut self, change: FilterChange) -> Option<FetchTicket> {
        let changed = match change {
            FilterChange::Channel(channel_id) => set(&mut self.filters.channel_id, channel_id),
            FilterChange::Status(status) => set(&mut self.filters.status, status),
            FilterChange::Search(text) => set(&mut self.filters.search, text.trim().to_string()),
            FilterChange::DateRange { start, end } => {
                let start_changed = set(&mut self.filters.start_date, start);
                let end_changed = set(&mut self.filters.end_date, end);
                start_changed || end_changed
            }
            FilterChange::MonthYear { month, year } => {
                let month_changed = set(&mut self.filters.month, month);
                let year_changed = set(&mut self.filters.year, year);
                month_changed || year_changed
            }
            FilterChange::ViewMode(mode) => set(&mut self.view_mode, mode),
        };

        if !changed {
            return None;
        }
        self.page = 1;
        Some(self.begin_fetch())
    }

    /// Issues a fetch for the current page.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.seq += 1;
        self.phase = FetchPhase::Loading;
        let query = build_query(
            &self.filters,
            self.view_mode,
            self.page,
            self.page_size,
            self.offset,
        );
        FetchTicket {
            seq: self.seq,
            page: self.page,
            view: self.view_mode,
            query,
        }
    }

    /// Next page, list mode only.
    pub fn load_more(&mut self) -> Option<FetchTicket> {
        if self.view_mode != ViewMode::List || !self.has_more || self.is_loading() {
            return None;
        }
        self.page += 1;
        Some(self.begin_fetch())
    }

    pub fn refresh(&mut self) -> FetchTicket {
        self.page = 1;
        self.begin_fetch()
    }

    /// Lands a fetch result. Returns false when the ticket was superseded.
    pub fn complete(&mut self, ticket: &FetchTicket, result: Result<PostPage, String>) -> bool {
        if ticket.seq != self.seq {
            debug!(seq = ticket.seq, latest = self.seq, "discarding stale post page");
            return false;
        }
        self.phase = FetchPhase::Idle;

        match result {
            Ok(page) => {
                let more = compute_has_more(&page, ticket.page, ticket.query.limit);
                if ticket.view == ViewMode::Calendar {
                    self.has_more = false;
                    self.truncated = more;
                } else {
                    self.has_more = more;
                    self.truncated = false;
                }
                let offset = self.offset;
                let rows = page
                    .items
                    .into_iter()
                    .map(|raw| PostData::from_raw(raw, offset));

                if ticket.view == ViewMode::List && ticket.page > 1 {
                    for row in rows {
                        if !self.posts.iter().any(|post| post.id == row.id) {
                            self.posts.push(row);
                        }
                    }
                } else {
                    self.posts = rows.collect();
                }
                self.error = None;
            }
            Err(message) => {
                self.error = Some(message);
                self.posts.clear();
                self.has_more = false;
                self.truncated = false;
            }
        }
        true
    }

    /// Shows a freshly created post without re-fetching.
    pub fn insert_created(&mut self, raw: RawPost) {
        let post = PostData::from_raw(raw, self.offset);
        match self.posts.iter_mut().find(|existing| existing.id == post.id) {
            Some(existing) => *existing = post,
            None => self.posts.insert(0, post),
        }
    }

    pub fn remove(&mut self, post_id: i64) -> bool {
        let before = self.posts.len();
        self.posts.retain(|post| post.id != post_id);
        self.posts.len() != before
    }

    pub fn open_target(&self, post_id: i64) -> Option<OpenTarget> {
        self.posts
            .iter()
            .find(|post| post.id == post_id)
            .map(OpenTarget::for_post)
    }
}

fn set<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Holds the latest value until it has been quiet for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.delay));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn take_ready(&mut self, now: Instant) -> Option<T> {
        let ready = matches!(&self.pending, Some((_, deadline)) if *deadline <= now);
        if !ready {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }

    pub async fn settled(&mut self) -> Option<T> {
        loop {
            let deadline = self.deadline()?;
            sleep_until(deadline).await;
            if let Some(value) = self.take_ready(Instant::now()) {
                return Some(value);
            }
        }
    }
}

/// Schedule screen controller: listing state plus the source it fetches from.
pub struct ScheduleView<S> {
    source: S,
    state: ListingState,
    search: Debouncer<String>,
}

impl<S: PostSource> ScheduleView<S> {
    pub fn new(source: S, state: ListingState, search_debounce: Duration) -> Self {
        Self {
            source,
            state,
            search: Debouncer::new(search_debounce),
        }
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn open(&mut self) {
        let ticket = self.state.refresh();
        self.run(ticket).await;
    }

    pub async fn refresh(&mut self) {
        self.open().await;
    }

    /// Returns true when the change triggered a fetch.
    pub async fn set_filter(&mut self, change: FilterChange) -> bool {
        match self.state.apply_change(change) {
            Some(ticket) => {
                self.run(ticket).await;
                true
            }
            None => false,
        }
    }

    /// Records a keystroke; nothing is fetched until the input goes quiet.
    pub fn type_search(&mut self, text: impl Into<String>) {
        self.search.push(text.into());
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    /// Applies pending search text if the quiet period has elapsed.
    pub async fn poll_search(&mut self) -> bool {
        match self.search.take_ready(Instant::now()) {
            Some(text) => self.set_filter(FilterChange::Search(text)).await,
            None => false,
        }
    }

    /// Waits for the quiet period and applies the pending search text.
    pub async fn settle_search(&mut self) -> bool {
        match self.search.settled().await {
            Some(text) => self.set_filter(FilterChange::Search(text)).await,
            None => false,
        }
    }

    pub async fn load_more(&mut self) -> bool {
        match self.state.load_more() {
            Some(ticket) => {
                self.run(ticket).await;
                true
            }
            None => false,
        }
    }

    pub fn insert_created(&mut self, raw: RawPost) {
        self.state.insert_created(raw);
    }

    pub fn remove(&mut self, post_id: i64) -> bool {
        self.state.remove(post_id)
    }

    async fn run(&mut self, ticket: FetchTicket) {
        let result = match ticket.view {
            ViewMode::Calendar => fetch_month(&self.source, &ticket.query).await,
            ViewMode::List | ViewMode::Grid => self.source.fetch_page(&ticket.query).await,
        };
        let result = result.map_err(|err| {
            error!(error = ?err, page = ticket.page, "failed to load posts");
            err.to_string()
        });
        self.state.complete(&ticket, result);
    }
}
