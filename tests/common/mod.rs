//! Test utilities shared by the subtitle search test suite

use std::sync::Arc;
use std::time::Duration;
use subtitle_search::{MemoryObjectStore, RetryConfig, SearchConfigBuilder, SearchConfig};

/// Render `lines` as an `.srt` document, one cue per line
#[allow(dead_code)]
pub fn srt_body(lines: &[&str]) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(i, text)| {
            format!(
                "{}\n00:00:{:02},000 --> 00:00:{:02},500\n{}\n\n",
                i + 1,
                i % 60,
                i % 60,
                text
            )
        })
        .collect()
}

/// Cue timing line produced by `srt_body` for cue `index`
#[allow(dead_code)]
pub fn cue_timing(index: usize) -> String {
    format!("00:00:{:02},000 --> 00:00:{:02},500", index % 60, index % 60)
}

/// `.srt` document with `matches` lines containing `word`
#[allow(dead_code)]
pub fn episode_with(word: &str, matches: usize) -> String {
    let lines: Vec<String> = (0..matches).map(|i| format!("line {i} says {word}")).collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    srt_body(&refs)
}

/// Store with `count` episodes under `show/`, each holding `matches` hits for `word`
#[allow(dead_code)]
pub fn store_with_episodes(count: usize, word: &str, matches: usize) -> Arc<MemoryObjectStore> {
    let store = Arc::new(MemoryObjectStore::new());
    for i in 0..count {
        store.put(format!("show/e{i:02}.srt"), episode_with(word, matches));
    }
    store
}

/// Retry settings that keep real-clock tests fast
#[allow(dead_code)]
pub fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(10),
    }
}

/// Builder preloaded with fast retries
#[allow(dead_code)]
pub fn fast_config() -> SearchConfigBuilder {
    SearchConfig::builder().retry(fast_retry())
}
