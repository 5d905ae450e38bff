use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, HistogramVec,
    IntCounterVec, IntGauge,
};

lazy_static! {
    /// Total feed reads segmented by endpoint (all, recent, before, after, owner, one).
    pub static ref FEED_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_request_total",
        "Total feed requests segmented by endpoint",
        &["endpoint"]
    )
    .expect("failed to register feed_request_total");

    /// Number of entries returned per feed read.
    pub static ref FEED_PAGE_SIZE: HistogramVec = register_histogram_vec!(
        "feed_page_size",
        "Number of posts returned per feed request segmented by endpoint",
        &["endpoint"],
        vec![0.0, 1.0, 5.0, 10.0, 20.0, 50.0, 100.0]
    )
    .expect("failed to register feed_page_size");

    /// Reactions applied, segmented by kind (like, dislike, repost).
    pub static ref POST_REACTION_TOTAL: IntCounterVec = register_int_counter_vec!(
        "post_reaction_total",
        "Reactions applied to posts segmented by kind",
        &["kind"]
    )
    .expect("failed to register post_reaction_total");

    /// Posts currently held in the store.
    pub static ref POST_STORE_SIZE: IntGauge = register_int_gauge!(
        "post_store_size",
        "Number of posts held in the in-memory store"
    )
    .expect("failed to register post_store_size");

    /// HTTP request duration by method and status.
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration segmented by method and status",
        &["method", "status"]
    )
    .expect("failed to register http_request_duration_seconds");
}
