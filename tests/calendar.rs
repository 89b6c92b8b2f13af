//! Calendar grid and post projection tests

use time::macros::{datetime, offset};
use time::{Month, UtcOffset};

use pagedeck::app::calendar::{month_bounds, CalendarGrid};
use pagedeck::domain::post::{ChannelRef, PostData, PostStatus, RawPost};

fn post(id: i64) -> RawPost {
    RawPost {
        id,
        title: None,
        content: None,
        thumbnail_url: None,
        media_urls: Vec::new(),
        channel: None,
        status: 2,
        scheduled_time: None,
        published_time: None,
        created_at: None,
    }
}

fn project(raws: Vec<RawPost>, offset: UtcOffset) -> Vec<PostData> {
    raws.into_iter()
        .map(|raw| PostData::from_raw(raw, offset))
        .collect()
}

#[test]
fn grid_places_posts_on_their_day() {
    let mut scheduled = post(1);
    scheduled.scheduled_time = Some(datetime!(2026-02-14 18:00 UTC));
    let mut published = post(2);
    published.status = 4;
    published.published_time = Some(datetime!(2026-02-14 08:00 UTC));
    let mut other_month = post(3);
    other_month.scheduled_time = Some(datetime!(2026-03-01 00:00 UTC));
    let undated = post(4);

    let posts = project(
        vec![scheduled, published, other_month, undated],
        UtcOffset::UTC,
    );
    let grid = CalendarGrid::build(2026, Month::February, &posts, UtcOffset::UTC).unwrap();

    assert_eq!(grid.days.len(), 28);
    // 2026-02-01 is a Sunday.
    assert_eq!(grid.leading_blanks, 6);
    assert_eq!(grid.post_count(), 2);

    let day = grid.day(14).unwrap();
    let ids: Vec<i64> = day.posts.iter().map(|post| post.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn scheduled_time_wins_over_published_time() {
    let mut raw = post(1);
    raw.scheduled_time = Some(datetime!(2026-05-20 10:00 UTC));
    raw.published_time = Some(datetime!(2026-05-02 10:00 UTC));

    let posts = project(vec![raw], UtcOffset::UTC);
    let grid = CalendarGrid::build(2026, Month::May, &posts, UtcOffset::UTC).unwrap();

    assert_eq!(grid.day(20).unwrap().posts.len(), 1);
    assert!(grid.day(2).unwrap().posts.is_empty());
}

#[test]
fn buckets_use_display_offset() {
    let mut raw = post(1);
    raw.scheduled_time = Some(datetime!(2026-01-31 20:00 UTC));

    let posts = project(vec![raw], offset!(+7));

    let january = CalendarGrid::build(2026, Month::January, &posts, offset!(+7)).unwrap();
    assert_eq!(january.post_count(), 0);

    let february = CalendarGrid::build(2026, Month::February, &posts, offset!(+7)).unwrap();
    assert_eq!(february.day(1).unwrap().posts.len(), 1);
    assert_eq!(posts[0].date, "01/02/2026");
    assert_eq!(posts[0].time, "03:00");
}

#[test]
fn leap_february_has_29_days() {
    let grid = CalendarGrid::build(2028, Month::February, &[], UtcOffset::UTC).unwrap();

    assert_eq!(grid.days.len(), 29);
    assert!(grid.day(30).is_none());
}

#[test]
fn month_bounds_cover_whole_month() {
    let (start, end) = month_bounds(2026, Month::December, UtcOffset::UTC).unwrap();

    assert_eq!(start, datetime!(2026-12-01 00:00 UTC));
    assert_eq!(end, datetime!(2026-12-31 23:59:59 UTC));
}

#[test]
fn projection_fills_display_fields() {
    let mut raw = post(9);
    raw.title = Some("Spring sale".to_string());
    raw.content = Some("Everything half price".to_string());
    raw.thumbnail_url = Some(String::new());
    raw.media_urls = vec!["https://cdn.example.com/a.jpg".to_string()];
    raw.channel = Some(ChannelRef {
        id: 5,
        name: Some("Shop".to_string()),
        icon: Some("shop.png".to_string()),
        color: None,
    });
    raw.status = 3;
    raw.created_at = Some(datetime!(2026-04-03 07:05 UTC));

    let data = PostData::from_raw(raw, UtcOffset::UTC);

    assert_eq!(data.title, "Spring sale");
    assert_eq!(data.description, "Everything half price");
    assert_eq!(
        data.thumbnail_url.as_deref(),
        Some("https://cdn.example.com/a.jpg")
    );
    assert_eq!(data.channel_icon.as_deref(), Some("shop.png"));
    assert_eq!(data.channel_color, "#1877f2");
    assert_eq!(data.status_label, "Failed");
    assert_eq!(data.status_class, "status-failed");
    assert_eq!(data.date, "03/04/2026");
    assert_eq!(data.time, "07:05");
    assert_eq!(data.post_status(), PostStatus::Failed);
}

#[test]
fn unknown_status_is_not_editable() {
    let status = PostStatus::from_code(42);

    assert_eq!(status.label(), "Unknown");
    assert_eq!(status.code(), 42);
    assert!(!status.is_editable());
    assert!(PostStatus::from_code(1).is_editable());
    assert!(!PostStatus::from_code(5).is_editable());
}
