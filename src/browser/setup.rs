use crate::browser::js;
use crate::models::PageOptions;
use crate::{PublishError, Result};
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::emulation::{
    SetDeviceMetricsOverrideParams, SetScriptExecutionDisabledParams, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;

/// Applies the page profile to a freshly created page, before any
/// navigation: user agent, viewport, script execution, and an override that
/// makes the automation signature read as a normal browser.
pub async fn apply(page: &Page, options: &PageOptions) -> Result<()> {
    if let Some(ref user_agent) = options.user_agent {
        let params = SetUserAgentOverrideParams::builder()
            .user_agent(user_agent.clone())
            .build()
            .map_err(PublishError::Browser)?;
        page.execute(params)
            .await
            .map_err(|e| PublishError::Browser(format!("failed to set user agent: {}", e)))?;
    }

    let metrics = SetDeviceMetricsOverrideParams::builder()
        .width(options.viewport.width as i64)
        .height(options.viewport.height as i64)
        .device_scale_factor(1.0)
        .mobile(false)
        .build()
        .map_err(PublishError::Browser)?;
    page.execute(metrics)
        .await
        .map_err(|e| PublishError::Browser(format!("failed to set viewport: {}", e)))?;

    page.execute(SetScriptExecutionDisabledParams::new(
        !options.javascript_enabled,
    ))
    .await
    .map_err(|e| PublishError::Browser(format!("failed to toggle script execution: {}", e)))?;

    page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
        js::MASK_WEBDRIVER,
    ))
    .await
    .map_err(|e| PublishError::Browser(format!("failed to install webdriver mask: {}", e)))?;

    Ok(())
}
