//! End-to-end pipeline: URL → video id → comments → filter → scores → verdict.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::Instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::filter::{filter_comments, LanguageDetector};
use crate::ml::{analyze_sentiments, PolarityScorer, Sentiment, SentimentBreakdown};
use crate::video_id::extract_video_id;
use crate::youtube::{fetch_comments, CommentSource};

/// Example comments returned from the dominant bucket
pub const TOP_COMMENT_LIMIT: usize = 5;

/// Aggregate verdict for one video
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    #[schema(example = "dQw4w9WgXcQ")]
    pub video_id: String,
    pub sentiment: Sentiment,
    /// Up to five comments from the bucket matching `sentiment`
    pub top_comments: Vec<String>,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    /// Comments returned by the API before filtering
    pub fetched_count: usize,
    /// Comments that passed the relevance filter and were scored
    pub analyzed_count: usize,
    pub average_polarity: f64,
}

/// Folds a scored breakdown into the final verdict.
///
/// The verdict comes from the mean polarity, not from the largest bucket.
/// With nothing to score the verdict is neutral.
pub fn aggregate(video_id: &str, fetched_count: usize, breakdown: &SentimentBreakdown) -> AnalysisResult {
    let average_polarity = breakdown.average_polarity();
    let sentiment = Sentiment::from_score(average_polarity);

    AnalysisResult {
        video_id: video_id.to_string(),
        sentiment,
        top_comments: breakdown
            .bucket(sentiment)
            .iter()
            .take(TOP_COMMENT_LIMIT)
            .cloned()
            .collect(),
        positive_count: breakdown.positive.len(),
        negative_count: breakdown.negative.len(),
        neutral_count: breakdown.neutral.len(),
        fetched_count,
        analyzed_count: breakdown.total(),
        average_polarity,
    }
}

/// Runs the full pipeline against a comment source.
#[derive(Clone)]
pub struct Analyzer {
    source: Arc<dyn CommentSource>,
    detector: Arc<dyn LanguageDetector>,
    scorer: Arc<dyn PolarityScorer>,
}

impl Analyzer {
    pub fn new(
        source: Arc<dyn CommentSource>,
        detector: Arc<dyn LanguageDetector>,
        scorer: Arc<dyn PolarityScorer>,
    ) -> Self {
        Self {
            source,
            detector,
            scorer,
        }
    }

    pub async fn analyze(&self, video_url: &str, max_comments: usize) -> Result<AnalysisResult> {
        let span = tracing::info_span!("analysis", id = %Uuid::new_v4(), max_comments);
        self.run(video_url, max_comments).instrument(span).await
    }

    async fn run(&self, video_url: &str, max_comments: usize) -> Result<AnalysisResult> {
        let video_id = extract_video_id(video_url).ok_or(AppError::InvalidUrl)?;
        tracing::info!("🔎 Analyzing comments for video {}", video_id);

        let comments = fetch_comments(self.source.as_ref(), &video_id, max_comments).await?;
        let relevant = filter_comments(&comments, self.detector.as_ref());
        let breakdown = analyze_sentiments(&relevant, self.scorer.as_ref());
        let result = aggregate(&video_id, comments.len(), &breakdown);

        tracing::info!(
            "✅ {} → {} (avg {:.3}; {} positive, {} negative, {} neutral of {} fetched)",
            video_id,
            result.sentiment,
            result.average_polarity,
            result.positive_count,
            result.negative_count,
            result.neutral_count,
            result.fetched_count
        );
        Ok(result)
    }
}
