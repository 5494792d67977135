//! Runs the analysis pipeline once from the command line and prints every
//! intermediate stage. Usage: `debug_analyze <video-url> [comment-count]`

use anyhow::{bail, Context, Result};
use comment_sentiment::{
    analysis::aggregate,
    config::Settings,
    filter::{check_comment, WhatlangDetector},
    ml::{analyze_sentiments, score_comment, LexiconScorer},
    video_id::extract_video_id,
    youtube::{fetch_comments, YouTubeClient},
};
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let Some(url) = args.next() else {
        bail!("usage: debug_analyze <video-url> [comment-count]");
    };

    let settings = Settings::from_env()?;
    let max_comments = match args.next() {
        Some(raw) => raw.parse::<usize>().context("comment count must be a number")?,
        None => settings.default_comment_count,
    };

    let video_id = extract_video_id(&url).context("Invalid YouTube URL")?;
    println!("🎬 Video id: {}", video_id);

    let client = YouTubeClient::new(&settings)?;
    let comments = fetch_comments(&client, &video_id, max_comments).await?;
    println!("📥 Fetched {} comments", comments.len());

    let detector = WhatlangDetector;
    let scorer = LexiconScorer::new();
    let mut relevant = Vec::new();
    for comment in &comments {
        match check_comment(comment, &detector) {
            Ok(text) => {
                println!("  ✅ {:+.3}  {}", score_comment(&text, &scorer), text);
                relevant.push(text);
            }
            Err(reason) => println!("  ❌ {:?}  {}", reason, comment.replace('\n', " ")),
        }
    }

    let breakdown = analyze_sentiments(&relevant, &scorer);
    let result = aggregate(&video_id, comments.len(), &breakdown);
    println!("\n{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
