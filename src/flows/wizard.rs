use crate::browser::AutomationPage;
use crate::config::AutomationConfig;
use crate::models::AdData;
use crate::session::recorder::ScreenshotRecorder;
use crate::{PublishError, Result, flows};
use std::time::Duration;

const WIZARD_VIEWPORT: (u32, u32) = (1504, 794);

const MILEAGE_INPUT: &str = "#input_recorrido";
const PRICE_INPUT: &str = "#input_precio";
const DESCRIPTION_INPUT: &str = "#input_text_area_review";
const NEXT_BUTTON: &str = ".next-button";
const UPLOAD_NEXT_BUTTON: &str = ".next-button:nth-child(2)";
const FILE_INPUT: &str = "input[type=file]";
const UPLOADED_ITEMS: &str = ".uploaded-list li";

/// One level of the cascading vehicle menu: a toggle that opens it, the
/// selector of its rendered options, and the ad field naming the option to
/// pick. Options are matched by label at run time, never by position, so a
/// reordered menu fails loudly instead of selecting the wrong entry.
struct CascadeStep {
    field: &'static str,
    toggle: &'static str,
    items: &'static str,
    value: fn(&AdData) -> &str,
}

const CASCADE: [CascadeStep; 7] = [
    CascadeStep {
        field: "vehicle type",
        toggle: ".m-b-lg:nth-child(2) > [href=\"#\"]:nth-child(2)",
        items: ".active > .over-item-bg li > [href=\"#\"]",
        value: |ad| &ad.vehicle_type,
    },
    CascadeStep {
        field: "brand",
        toggle: ".l3:nth-child(2) [href=\"#\"]:nth-child(2)",
        items: ".active > .over-item-bg li > [href=\"#\"]",
        value: |ad| &ad.brand,
    },
    CascadeStep {
        field: "model",
        toggle: ".col:nth-child(3) > .invalid > [href=\"#\"]:nth-child(2)",
        items: ".active > .over-item-bg li > [href=\"#\"]",
        value: |ad| &ad.model,
    },
    CascadeStep {
        field: "subtype",
        toggle: ".col:nth-child(4) [href=\"#\"]:nth-child(2)",
        items: ".active li > [href=\"#\"]",
        value: |ad| &ad.subtype,
    },
    CascadeStep {
        field: "year",
        toggle: ".col:nth-child(5) [href=\"#\"]:nth-child(2)",
        items: ".active li > [href=\"#\"]",
        value: |ad| &ad.year,
    },
    CascadeStep {
        field: "province",
        toggle: ".col:nth-child(6) [href=\"#\"]:nth-child(2)",
        items: ".active li > [href=\"#\"]",
        value: |ad| &ad.province,
    },
    CascadeStep {
        field: "city",
        toggle: ".invalid > [href=\"#\"]:nth-child(2)",
        items: ".active li > [href=\"#\"]",
        value: |ad| &ad.city,
    },
];

/// Fills and advances the listing wizard: the dependent-selection cascade,
/// mileage/price entry, description, photo upload with its bounded
/// completion wait, and the two navigation-coupled "next" clicks.
pub async fn submit_listing(
    page: &dyn AutomationPage,
    ad: &AdData,
    automation: &AutomationConfig,
    recorder: &mut ScreenshotRecorder,
) -> Result<()> {
    match drive(page, ad, automation, recorder).await {
        Ok(()) => Ok(()),
        Err(err) => {
            flows::capture_failure(recorder, page, "error filling the listing form", &err).await;
            Err(err)
        }
    }
}

async fn drive(
    page: &dyn AutomationPage,
    ad: &AdData,
    automation: &AutomationConfig,
    recorder: &mut ScreenshotRecorder,
) -> Result<()> {
    recorder.info("navigating to the listing wizard");
    page.goto(flows::WIZARD_URL).await?;
    page.set_viewport(WIZARD_VIEWPORT.0, WIZARD_VIEWPORT.1).await?;
    recorder.checkpoint(page, "goto_new_ad_page").await;

    for step in &CASCADE {
        select_cascade_option(page, step, (step.value)(ad), recorder).await?;
    }

    recorder.info("entering mileage");
    page.wait_for_visible(MILEAGE_INPUT).await?;
    page.click(MILEAGE_INPUT).await?;
    page.type_text(MILEAGE_INPUT, &ad.mileage).await?;

    recorder.info(&format!("entering price {}", ad.price));
    page.wait_for_visible(PRICE_INPUT).await?;
    page.click(PRICE_INPUT).await?;
    page.type_text(PRICE_INPUT, &ad.price).await?;

    recorder.info("advancing past the vehicle details page");
    page.wait_for_visible(NEXT_BUTTON).await?;
    page.click_and_await_navigation(NEXT_BUTTON).await?;
    recorder.checkpoint(page, "clicked_next_after_negotiable").await;

    recorder.info("entering description");
    page.wait_for_enabled(DESCRIPTION_INPUT).await?;
    page.type_text(DESCRIPTION_INPUT, &ad.description).await?;

    recorder.info("uploading photos");
    page.set_input_files(FILE_INPUT, &ad.photo_paths).await?;
    wait_for_uploads(page, ad.photo_paths.len(), automation).await?;
    recorder.checkpoint(page, "photos_uploaded").await;
    recorder.info("photos uploaded");

    recorder.info("advancing past the photo upload page");
    page.wait_for_visible(UPLOAD_NEXT_BUTTON).await?;
    page.click_and_await_navigation(UPLOAD_NEXT_BUTTON).await?;
    recorder.checkpoint(page, "clicked_next_after_uploads").await;

    Ok(())
}

async fn select_cascade_option(
    page: &dyn AutomationPage,
    step: &CascadeStep,
    label: &str,
    recorder: &mut ScreenshotRecorder,
) -> Result<()> {
    recorder.info(&format!("selecting {}", step.field));
    page.wait_for_visible(step.toggle).await?;
    page.click(step.toggle).await?;

    page.wait_for_visible(step.items).await?;
    let labels = page.menu_labels(step.items).await?;
    let index = resolve_option(&labels, label).ok_or_else(|| PublishError::OptionNotFound {
        field: step.field.to_string(),
        label: label.to_string(),
    })?;

    page.click_nth(step.items, index).await?;
    recorder.info(&format!("{} selected: {}", step.field, label));
    Ok(())
}

/// Case-insensitive, whitespace-trimmed match against the rendered menu.
fn resolve_option(labels: &[String], wanted: &str) -> Option<usize> {
    let wanted = wanted.trim().to_lowercase();
    labels
        .iter()
        .position(|label| label.trim().to_lowercase() == wanted)
}

/// Blocks until the page shows at least `expected` uploaded-photo entries.
/// Exceeding the bound is a hard failure, never a partial success.
async fn wait_for_uploads(
    page: &dyn AutomationPage,
    expected: usize,
    automation: &AutomationConfig,
) -> Result<()> {
    let deadline =
        tokio::time::Instant::now() + Duration::from_secs(automation.upload_timeout_secs);

    loop {
        let seen = page.count_elements(UPLOADED_ITEMS).await?;
        if seen >= expected {
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(PublishError::UploadTimeout(automation.upload_timeout_secs));
        }
        tokio::time::sleep(Duration::from_millis(automation.upload_poll_ms)).await;
    }
}
