pub fn escape_selector(selector: &str) -> String {
    selector.replace('\\', "\\\\").replace('\'', "\\'")
}

pub fn is_visible(selector: &str) -> String {
    let escaped = escape_selector(selector);
    format!(
        r#"(function(){{const el=document.querySelector('{}');if(!el)return false;const style=window.getComputedStyle(el);const rect=el.getBoundingClientRect();return style.display!=='none'&&style.visibility!=='hidden'&&parseFloat(style.opacity||'1')>0&&rect.width>0&&rect.height>0}})()"#,
        escaped
    )
}

pub fn is_enabled(selector: &str) -> String {
    let escaped = escape_selector(selector);
    format!(
        r#"(function(){{const el=document.querySelector('{}');if(!el)return false;return !el.disabled&&!el.hasAttribute('disabled')}})()"#,
        escaped
    )
}

pub fn scroll_into_view(selector: &str) -> String {
    let escaped = escape_selector(selector);
    format!(
        r#"document.querySelector('{}')?.scrollIntoView({{block:'center',behavior:'instant'}})"#,
        escaped
    )
}

pub fn item_labels(selector: &str) -> String {
    let escaped = escape_selector(selector);
    format!(
        r#"Array.from(document.querySelectorAll('{}')).map(el=>(el.textContent||'').trim())"#,
        escaped
    )
}

pub fn count_matches(selector: &str) -> String {
    let escaped = escape_selector(selector);
    format!(r#"document.querySelectorAll('{}').length"#, escaped)
}

/// Hides the edit modal the wizard leaves over the publish confirmation.
pub const HIDE_EDIT_OVERLAY: &str = r#"(function(){const div=document.querySelector('.full-edit.edit-modal.transition-opacity');if(div){div.classList.add('hide')}})()"#;

/// Injected before any page script runs so the site sees a regular browser.
pub const MASK_WEBDRIVER: &str =
    r#"Object.defineProperty(navigator,'webdriver',{get:()=>false});"#;
