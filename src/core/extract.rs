//! Label-anchored lookups inside resolved dashboard fragments.
//!
//! The dashboard has no stable ids for individual values, so every field is
//! found by the caption rendered next to it. A [`FieldQuery`] declares where
//! the value lives relative to that caption.

use crate::utils::error::{Result, StatusError};
use scraper::{ElementRef, Selector};

pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| StatusError::SelectorError {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// 元素底下所有文字節點串接（等同 DOM 的 textContent）
pub fn text_content(el: ElementRef<'_>) -> String {
    el.text().collect()
}

pub fn previous_element_sibling<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.prev_siblings().find_map(ElementRef::wrap)
}

/// 依文件順序找出第一個符合 `selector` 且文字包含 `pattern`（不分大小寫）的後代元素。
///
/// `root` 為 None 時直接回傳 None，讓呼叫端可以串接查詢。
pub fn find_labeled_element<'a>(
    root: Option<ElementRef<'a>>,
    selector: &str,
    pattern: &str,
) -> Result<Option<ElementRef<'a>>> {
    let Some(root) = root else {
        return Ok(None);
    };

    let selector = parse_selector(selector)?;
    let pattern = pattern.to_lowercase();

    Ok(root
        .select(&selector)
        .find(|el| text_content(*el).to_lowercase().contains(&pattern)))
}

/// 標籤前一個兄弟元素的文字（數值顯示在說明文字之前）
pub fn sibling_before_text(label: ElementRef<'_>) -> Option<String> {
    previous_element_sibling(label).map(text_content)
}

/// 標籤內指定後代元素的文字，例如 "Balíček: <strong>5G Unlimited</strong>"
pub fn nested_text(label: ElementRef<'_>, selector: &str) -> Result<Option<String>> {
    let selector = parse_selector(selector)?;
    Ok(label.select(&selector).next().map(text_content))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueLocation {
    SelfText,
    SiblingBefore,
    NestedDescendant(&'static str),
}

/// 一個欄位的宣告式擷取規則
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldQuery {
    pub selector: &'static str,
    pub label: &'static str,
    pub location: ValueLocation,
}

impl FieldQuery {
    pub const fn new(selector: &'static str, label: &'static str, location: ValueLocation) -> Self {
        Self {
            selector,
            label,
            location,
        }
    }

    pub fn find<'a>(&self, root: Option<ElementRef<'a>>) -> Result<Option<ElementRef<'a>>> {
        find_labeled_element(root, self.selector, self.label)
    }

    pub fn value(&self, root: Option<ElementRef<'_>>) -> Result<Option<String>> {
        let Some(label) = self.find(root)? else {
            return Ok(None);
        };

        match self.location {
            ValueLocation::SelfText => Ok(Some(text_content(label))),
            ValueLocation::SiblingBefore => Ok(sibling_before_text(label)),
            ValueLocation::NestedDescendant(selector) => nested_text(label, selector),
        }
    }

    /// 找不到錨點時退回空字串，交給後續的數值/日期解析報錯
    pub fn value_or_empty(&self, root: Option<ElementRef<'_>>) -> Result<String> {
        Ok(self.value(root)?.unwrap_or_default())
    }
}
