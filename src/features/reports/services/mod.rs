mod normalizer;
mod report_aggregator;
mod report_feed_cache;

pub use report_aggregator::ReportAggregator;
