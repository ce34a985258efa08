use crate::PublishError;
use crate::browser::AutomationPage;
use crate::models::ScreenshotRecord;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::path::PathBuf;
use std::sync::Arc;

/// Structured sink for step progress. Consumers may substitute their own;
/// the default forwards to `tracing`.
pub trait StepLogger: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str, err: &PublishError);
}

pub struct TracingLogger;

impl StepLogger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn error(&self, message: &str, err: &PublishError) {
        tracing::error!(error = %err, "{}", message);
    }
}

/// Append-only visual audit trail of one session. Indices are assigned
/// 1..N with no gaps; file names are
/// `{session_id}_{index:03}_{normalized_step_name}.png`.
///
/// The trail is best-effort: a capture or persistence fault is logged and
/// swallowed, never failing the step it instruments.
pub struct ScreenshotRecorder {
    session_id: String,
    dir: PathBuf,
    logger: Arc<dyn StepLogger>,
    records: Vec<ScreenshotRecord>,
}

impl ScreenshotRecorder {
    pub fn new(
        session_id: impl Into<String>,
        dir: impl Into<PathBuf>,
        logger: Arc<dyn StepLogger>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            dir: dir.into(),
            logger,
            records: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn records(&self) -> &[ScreenshotRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ScreenshotRecord> {
        self.records
    }

    pub fn info(&self, message: &str) {
        self.logger.info(message);
    }

    pub fn error(&self, message: &str, err: &PublishError) {
        self.logger.error(message, err);
    }

    pub async fn checkpoint(&mut self, page: &dyn AutomationPage, step_name: &str) {
        match page.screenshot().await {
            Ok(bytes) => {
                let index = self.records.len() + 1;
                let file_name = format!(
                    "{}_{:03}_{}.png",
                    self.session_id,
                    index,
                    normalize_step_name(step_name)
                );

                if let Err(err) = self.persist(&file_name, &bytes) {
                    self.logger
                        .error(&format!("failed to persist screenshot {}", file_name), &err);
                }

                self.records.push(ScreenshotRecord {
                    sequence_index: index,
                    step_name: step_name.to_string(),
                    image: BASE64.encode(&bytes),
                });
                self.logger
                    .info(&format!("screenshot captured for step: {}", step_name));
            }
            Err(err) => {
                self.logger.error(
                    &format!("screenshot capture failed for step: {}", step_name),
                    &err,
                );
            }
        }
    }

    /// Records the extra `error_<message>` checkpoint of the failure hook.
    pub async fn record_failure(&mut self, page: &dyn AutomationPage, message: &str) {
        let step_name = format!("error_{}", normalize_step_name(message));
        self.checkpoint(page, &step_name).await;
    }

    fn persist(&self, file_name: &str, bytes: &[u8]) -> crate::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(file_name), bytes)?;
        Ok(())
    }
}

/// Collapses whitespace runs to `_` and lower-cases.
pub fn normalize_step_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}
