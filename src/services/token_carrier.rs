//! 令牌携带 - 业务能力层
//!
//! 从页面中提取三个防篡改隐藏字段，并附加到下一次回发

use crate::models::FormData;
use crate::utils::markup;

pub const VIEW_STATE_FIELD: &str = "__VIEWSTATE";
pub const EVENT_VALIDATION_FIELD: &str = "__EVENTVALIDATION";
pub const VIEW_STATE_GENERATOR_FIELD: &str = "__VIEWSTATEGENERATOR";

/// 一次响应中的令牌集合
///
/// 只在紧接着的下一次回发中有效
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub view_state: String,
    pub event_validation: String,
    pub view_state_generator: String,
}

impl TokenSet {
    /// 从响应正文提取令牌
    ///
    /// 任一字段缺失（或 `__VIEWSTATE` 为空）时返回 `None`，不会返回部分结果
    pub fn extract(body: &str) -> Option<Self> {
        let view_state = markup::input_value(body, VIEW_STATE_FIELD)?;
        if view_state.is_empty() {
            return None;
        }
        let event_validation = markup::input_value(body, EVENT_VALIDATION_FIELD)?;
        let view_state_generator = markup::input_value(body, VIEW_STATE_GENERATOR_FIELD)?;

        Some(Self {
            view_state,
            event_validation,
            view_state_generator,
        })
    }

    /// 写入隐藏字段
    pub fn attach(&self, form: &mut FormData) {
        form.set(VIEW_STATE_FIELD, self.view_state.as_str())
            .set(EVENT_VALIDATION_FIELD, self.event_validation.as_str())
            .set(VIEW_STATE_GENERATOR_FIELD, self.view_state_generator.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <form method="post" action="./p1.aspx" id="aspnetForm">
        <input type="hidden" name="__VIEWSTATE" id="__VIEWSTATE" value="/wEPDwUKMTY1NDU2MTA1Mg==" />
        <input type="hidden" name="__VIEWSTATEGENERATOR" id="__VIEWSTATEGENERATOR" value="CA0B0334" />
        <input type="hidden" name="__EVENTVALIDATION" id="__EVENTVALIDATION" value="/wEdAAKk3Z" />
        </form>
    "#;

    #[test]
    fn test_extract_all_three() {
        let tokens = TokenSet::extract(PAGE).unwrap();
        assert_eq!(tokens.view_state, "/wEPDwUKMTY1NDU2MTA1Mg==");
        assert_eq!(tokens.view_state_generator, "CA0B0334");
        assert_eq!(tokens.event_validation, "/wEdAAKk3Z");
    }

    #[test]
    fn test_missing_any_token_is_absent() {
        for field in [VIEW_STATE_FIELD, EVENT_VALIDATION_FIELD, VIEW_STATE_GENERATOR_FIELD] {
            let page = PAGE.replace(&format!("name=\"{}\"", field), "name=\"other\"");
            assert_eq!(TokenSet::extract(&page), None, "{} removed", field);
        }
    }

    #[test]
    fn test_empty_view_state_is_absent() {
        let page = PAGE.replace("/wEPDwUKMTY1NDU2MTA1Mg==", "");
        assert_eq!(TokenSet::extract(&page), None);
    }

    #[test]
    fn test_attach_overwrites_previous_values() {
        let mut form = FormData::new();
        form.set(VIEW_STATE_FIELD, "stale").set("q1", "A");
        TokenSet::extract(PAGE).unwrap().attach(&mut form);

        assert_eq!(form.get(VIEW_STATE_FIELD), Some("/wEPDwUKMTY1NDU2MTA1Mg=="));
        assert_eq!(form.get(EVENT_VALIDATION_FIELD), Some("/wEdAAKk3Z"));
        assert_eq!(form.get(VIEW_STATE_GENERATOR_FIELD), Some("CA0B0334"));
        assert_eq!(form.len(), 4);
    }
}
