use crate::PublishError;
use crate::browser::AutomationPage;
use crate::session::recorder::ScreenshotRecorder;

pub mod login;
pub mod wizard;

pub const LOGIN_URL: &str = "https://admin.seminuevos.com/login";
pub const REDIRECT_URL: &str = "https://admin.seminuevos.com/redirect";
pub const HOME_URL: &str = "https://www.seminuevos.com/";
pub const WIZARD_URL: &str = "https://www.seminuevos.com/wizard";

/// Shared failure hook: logs the error and captures one extra screenshot
/// tagged `error_<message>`. The screenshot is best-effort and cannot fail;
/// the caller re-raises the original error unchanged so the session
/// controller stays the single place that folds failures into a result.
pub(crate) async fn capture_failure(
    recorder: &mut ScreenshotRecorder,
    page: &dyn AutomationPage,
    message: &str,
    err: &PublishError,
) {
    recorder.error(message, err);
    recorder.record_failure(page, message).await;
}
