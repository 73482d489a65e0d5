use crate::error::EventLogError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventType {
    Scan,
    Act,
    /// Anything written by a newer build; kept but not aggregated.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    #[serde(default)]
    pub payload: Value,
}

/// Append-only JSON Lines log. Appends are serialized so each record lands
/// as one whole line.
pub struct EventLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, event_type: EventType, payload: Value) -> Result<(), EventLogError> {
        let event = Event {
            timestamp: Utc::now(),
            event_type,
            payload,
        };
        let mut line = serde_json::to_vec(&event)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }

    /// The last `limit` parseable events, oldest first. Lines that are not
    /// UTF-8 or not valid events are skipped; a missing log reads as empty.
    pub async fn tail(&self, limit: usize) -> Result<Vec<Event>, EventLogError> {
        let tail = match read_tail(&self.path, limit).await {
            Ok(tail) => tail,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let lines: Vec<&[u8]> = tail
            .split(|&b| b == b'\n')
            .filter(|line| !is_blank(line))
            .collect();
        let start = lines.len().saturating_sub(limit);
        Ok(lines[start..]
            .iter()
            .filter_map(|line| std::str::from_utf8(line).ok())
            .filter_map(|line| serde_json::from_str::<Event>(line).ok())
            .collect())
    }
}

const TAIL_CHUNK: usize = 64 * 1024;

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

/// Whole non-blank lines in `buf`, not counting the leading fragment when the
/// buffer does not start at the beginning of the file.
fn whole_lines(buf: &[u8], at_file_start: bool) -> usize {
    let mut segments = buf.split(|&b| b == b'\n');
    if !at_file_start {
        segments.next();
    }
    segments.filter(|line| !is_blank(line)).count()
}

/// Read backwards from the end of `path` in chunks until `limit` whole lines
/// are buffered or the file start is reached. A leading partial line is
/// dropped.
async fn read_tail(path: &Path, limit: usize) -> std::io::Result<Vec<u8>> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut pos = file.metadata().await?.len();
    let mut buf: Vec<u8> = Vec::new();

    while pos > 0 && whole_lines(&buf, false) < limit {
        let take = usize::try_from(pos).map_or(TAIL_CHUNK, |p| p.min(TAIL_CHUNK));
        pos -= u64::try_from(take).unwrap_or(pos);
        file.seek(SeekFrom::Start(pos)).await?;
        let mut chunk = vec![0; take];
        file.read_exact(&mut chunk).await?;
        chunk.extend_from_slice(&buf);
        buf = chunk;
    }

    if pos > 0
        && let Some(first_newline) = buf.iter().position(|&b| b == b'\n')
    {
        buf.drain(..=first_newline);
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_log_is_empty() {
        let tmp = TempDir::new().unwrap();
        let log = EventLog::new(tmp.path().join("events.jsonl"));
        assert!(log.tail(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_then_tail_in_order() {
        let tmp = TempDir::new().unwrap();
        let log = EventLog::new(tmp.path().join("data").join("events.jsonl"));

        log.append(EventType::Scan, json!({"latency_ms": 12.0}))
            .await
            .unwrap();
        log.append(EventType::Act, json!({"status": "EXECUTED"}))
            .await
            .unwrap();

        let events = log.tail(10).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, EventType::Scan);
        assert_eq!(events[1].payload["status"], "EXECUTED");
    }

    #[tokio::test]
    async fn tail_is_bounded_to_latest() {
        let tmp = TempDir::new().unwrap();
        let log = EventLog::new(tmp.path().join("events.jsonl"));
        for i in 0..5 {
            log.append(EventType::Scan, json!({"n": i})).await.unwrap();
        }

        let events = log.tail(2).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].payload["n"], 3);
        assert_eq!(events[1].payload["n"], 4);
    }

    #[tokio::test]
    async fn malformed_lines_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("events.jsonl");
        let log = EventLog::new(&path);
        log.append(EventType::Scan, json!({})).await.unwrap();
        let mut raw = tokio::fs::read_to_string(&path).await.unwrap();
        raw.push_str("{truncated\n");
        tokio::fs::write(&path, raw).await.unwrap();
        log.append(EventType::Act, json!({})).await.unwrap();

        let events = log.tail(10).await.unwrap();

        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn torn_non_utf8_tail_keeps_intact_prefix() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("events.jsonl");
        let log = EventLog::new(&path);
        log.append(EventType::Scan, json!({"n": 1})).await.unwrap();
        log.append(EventType::Act, json!({"n": 2})).await.unwrap();
        let mut raw = tokio::fs::read(&path).await.unwrap();
        raw.extend_from_slice(b"{\"timestamp\":\"2025-01-01T00:00:00Z\",\"pay\xff\xfe");
        tokio::fs::write(&path, raw).await.unwrap();

        let events = log.tail(10).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[1].payload["n"], 2);
    }

    #[tokio::test]
    async fn tail_spans_chunk_boundaries() {
        let tmp = TempDir::new().unwrap();
        let log = EventLog::new(tmp.path().join("events.jsonl"));
        let filler = "x".repeat(1_000);
        for i in 0..200 {
            log.append(EventType::Scan, json!({"n": i, "filler": filler}))
                .await
                .unwrap();
        }

        let last = log.tail(3).await.unwrap();
        let many = log.tail(150).await.unwrap();
        let all = log.tail(1_000).await.unwrap();

        assert_eq!(
            last.iter().map(|e| e.payload["n"].as_i64().unwrap()).collect::<Vec<_>>(),
            vec![197, 198, 199]
        );
        assert_eq!(many.len(), 150);
        assert_eq!(many[0].payload["n"], 50);
        assert_eq!(all.len(), 200);
        assert_eq!(all[0].payload["n"], 0);
    }

    #[tokio::test]
    async fn concurrent_appends_stay_line_delimited() {
        let tmp = TempDir::new().unwrap();
        let log = Arc::new(EventLog::new(tmp.path().join("events.jsonl")));

        let mut handles = Vec::new();
        for i in 0..20 {
            let log = Arc::clone(&log);
            handles.push(tokio::spawn(async move {
                log.append(EventType::Scan, json!({"n": i})).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(log.tail(100).await.unwrap().len(), 20);
    }

    #[test]
    fn unknown_event_type_still_parses() {
        let event: Event = serde_json::from_str(
            r#"{"timestamp":"2025-01-01T00:00:00Z","event_type":"vision","payload":{}}"#,
        )
        .unwrap();
        assert_eq!(event.event_type, EventType::Unknown);
    }
}
