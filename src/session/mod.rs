use crate::browser::{self, AutomationPage, js};
use crate::config::{AutomationConfig, ScreenshotConfig};
use crate::flows::{self, login, wizard};
use crate::models::{
    AdData, AutomationOptions, Credentials, PageOptions, Publication, PublicationResult,
};
use crate::{Result, extract};
use std::path::PathBuf;
use std::sync::Arc;

pub mod recorder;

use recorder::{ScreenshotRecorder, StepLogger, TracingLogger};

/// Owns one end-to-end run: browser acquisition, page configuration,
/// authentication, submission, result extraction, and the single place
/// where any failure is folded into an `error` result. No state is shared
/// between sessions.
pub struct SessionController {
    screenshot_dir: PathBuf,
    automation: AutomationConfig,
    logger: Arc<dyn StepLogger>,
}

impl SessionController {
    pub fn new(
        screenshots: &ScreenshotConfig,
        automation: AutomationConfig,
        logger: Option<Arc<dyn StepLogger>>,
    ) -> Self {
        Self {
            screenshot_dir: screenshots.dir.clone(),
            automation,
            logger: logger.unwrap_or_else(|| Arc::new(TracingLogger)),
        }
    }

    /// The sole entry point of the core. Failures acquiring the browser or
    /// page propagate to the caller; every failure past that point is
    /// logged, screenshotted, and converted into a result with
    /// `status: error`. The browser is released on every exit path.
    pub async fn run(
        &self,
        credentials: &Credentials,
        ad: &AdData,
        options: &AutomationOptions,
    ) -> Result<PublicationResult> {
        let launched = match browser::launch(&options.browser).await {
            Ok(launched) => launched,
            Err(err) => {
                self.logger.error("failed to launch the browser", &err);
                return Err(err);
            }
        };

        let result = match launched.new_page(&options.browser).await {
            Ok(page) => self.run_on_page(&page, credentials, ad, &options.page).await,
            Err(err) => {
                self.logger.error("failed to open a page", &err);
                launched.close().await;
                return Err(err);
            }
        };

        launched.close().await;
        Ok(result)
    }

    /// The configure → login → submit → extract pipeline against any page
    /// implementation. Exposed separately so the whole session can be
    /// exercised with a scripted browser double.
    pub async fn run_on_page(
        &self,
        page: &dyn AutomationPage,
        credentials: &Credentials,
        ad: &AdData,
        page_options: &PageOptions,
    ) -> PublicationResult {
        let session_id = new_session_id();
        let mut recorder = ScreenshotRecorder::new(
            &session_id,
            &self.screenshot_dir,
            Arc::clone(&self.logger),
        );
        recorder.info(&format!("{} - session started", session_id));

        let outcome = match self
            .attempt(page, credentials, ad, page_options, &mut recorder)
            .await
        {
            Ok(publication) => Ok(publication),
            Err(err) => {
                flows::capture_failure(&mut recorder, page, "error publishing the listing", &err)
                    .await;
                Err(err)
            }
        };

        match outcome {
            Ok(publication) => {
                PublicationResult::published(publication, recorder.into_records(), session_id)
            }
            Err(_) => PublicationResult::error(recorder.into_records(), session_id),
        }
    }

    async fn attempt(
        &self,
        page: &dyn AutomationPage,
        credentials: &Credentials,
        ad: &AdData,
        page_options: &PageOptions,
        recorder: &mut ScreenshotRecorder,
    ) -> Result<Publication> {
        page.configure(page_options).await?;

        login::login(page, credentials, recorder).await?;
        wizard::submit_listing(page, ad, &self.automation, recorder).await?;

        recorder.info("publishing the listing");
        if let Err(err) = page.evaluate(js::HIDE_EDIT_OVERLAY).await {
            recorder.error("could not dismiss the edit overlay", &err);
        }
        recorder.checkpoint(page, "clicked_publish").await;
        recorder.checkpoint(page, "post_publish_navigation").await;

        let terminal = page.current_url().await?;
        let publication = extract::extract_publication(&terminal)?;
        recorder.info(&format!("published at {}", publication.url));
        recorder.checkpoint(page, "final_page").await;

        Ok(publication)
    }
}

/// Opaque, time-derived id that namespaces screenshot files and correlates
/// log lines for one run.
fn new_session_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}
