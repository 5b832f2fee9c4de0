use std::{
    path::Path,
    time::{Duration, Instant},
};

/// URL prefix under which the output root is served.
pub const OUTPUT_PREFIX: &str = "/output";

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lists the entries directly inside `output_dir` and maps each to
/// `/output/<job_id>/<name>`, sorted by name.
pub async fn collect_results(output_dir: &Path, job_id: &str) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(output_dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    Ok(names
        .into_iter()
        .map(|name| format!("{OUTPUT_PREFIX}/{job_id}/{name}"))
        .collect())
}

/// Polls until `dir` exists or `wait` has elapsed. Returns whether it exists.
pub async fn wait_for_dir(dir: &Path, wait: Duration) -> bool {
    let deadline = Instant::now() + wait;
    loop {
        if tokio::fs::metadata(dir).await.is_ok_and(|m| m.is_dir()) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
