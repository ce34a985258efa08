use crate::browser::AutomationPage;
use crate::models::Credentials;
use crate::session::recorder::ScreenshotRecorder;
use crate::{Result, flows};

const EMAIL_INPUT: &str = "#email";
const PASSWORD_INPUT: &str = "#password";
const SUBMIT_BUTTON: &str = "button[type=\"submit\"]";

/// Drives the login surface to the canonical home page.
///
/// Transitions: load login page, enter credentials, submit and await the
/// resulting navigation, then resolve the known intermediate redirect and
/// navigate home explicitly when the site did not land there on its own.
/// A failure at any transition aborts the session; there is no retry.
pub async fn login(
    page: &dyn AutomationPage,
    credentials: &Credentials,
    recorder: &mut ScreenshotRecorder,
) -> Result<()> {
    match drive(page, credentials, recorder).await {
        Ok(()) => Ok(()),
        Err(err) => {
            flows::capture_failure(recorder, page, "error during login", &err).await;
            Err(err)
        }
    }
}

async fn drive(
    page: &dyn AutomationPage,
    credentials: &Credentials,
    recorder: &mut ScreenshotRecorder,
) -> Result<()> {
    recorder.info("signing in");
    page.goto(flows::LOGIN_URL).await?;
    recorder.checkpoint(page, "goto_login_page").await;

    page.type_text(EMAIL_INPUT, &credentials.email).await?;
    recorder.info("email entered");
    page.type_text(PASSWORD_INPUT, &credentials.password).await?;
    recorder.info("password entered");

    page.click_and_await_navigation(SUBMIT_BUTTON).await?;
    recorder.checkpoint(page, "login_successful").await;
    recorder.info("login submitted");

    if page.current_url().await? == flows::REDIRECT_URL {
        recorder.info("resolving post-login redirect");
        page.wait_for_navigation().await?;
        recorder.checkpoint(page, "redirect_home").await;
    }

    if page.current_url().await? != flows::HOME_URL {
        recorder.info("navigating to the home page");
        page.goto(flows::HOME_URL).await?;
        recorder.checkpoint(page, "goto_home").await;
    }

    Ok(())
}
