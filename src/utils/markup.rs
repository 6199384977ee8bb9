//! 页面解析工具
//!
//! 服务端渲染的表单页面结构固定，这里只用正则提取需要的标签与属性

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// 正则只编译一次；编译失败时各函数按"未找到"处理
static ATTRIBUTE_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.$]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).ok()
});
static INPUT_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?is)<input\b[^>]*>").ok());
static SELECT_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?is)<select\b([^>]*)>(.*?)</select\s*>").ok());
static OPTION_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?is)<option\b([^>]*)>(.*?)</option\s*>").ok());
static OPEN_TAG_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?is)<([a-z][a-z0-9]*)\b([^>]*)>").ok());
static ANY_TAG_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").ok());
static ENTITY_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z]+);").ok());

/// 读取标签中的属性值（属性名忽略大小写），并解码实体
pub fn attribute(tag: &str, name: &str) -> Option<String> {
    let re = ATTRIBUTE_RE.as_ref()?;
    let caps = re
        .captures_iter(tag)
        .find(|caps| caps[1].eq_ignore_ascii_case(name))?;
    let raw = caps
        .get(2)
        .or_else(|| caps.get(3))
        .or_else(|| caps.get(4))
        .map(|m| m.as_str())
        .unwrap_or_default();
    Some(decode_entities(raw))
}

/// 查找 `name` 属性等于 `name` 的 `<input>`，返回其 `value`
///
/// 标签存在但没有 `value` 属性时返回空字符串
pub fn input_value(html: &str, name: &str) -> Option<String> {
    let re = INPUT_RE.as_ref()?;
    let tag = re
        .find_iter(html)
        .map(|m| m.as_str())
        .find(|tag| attribute(tag, "name").as_deref() == Some(name))?;
    Some(attribute(tag, "value").unwrap_or_default())
}

/// 返回 `name` 属性等于 `name` 的 `<select>` 的内部 HTML
pub fn select_inner<'a>(html: &'a str, name: &str) -> Option<&'a str> {
    let re = SELECT_RE.as_ref()?;
    let caps = re
        .captures_iter(html)
        .find(|caps| attribute(&caps[1], "name").as_deref() == Some(name))?;
    caps.get(2).map(|m| m.as_str())
}

/// 解析 `<option>` 列表，按文档顺序返回 (value, label)
///
/// 没有 `value` 属性时使用标签文本
pub fn options(select_inner: &str) -> Vec<(String, String)> {
    let Some(re) = OPTION_RE.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(select_inner)
        .map(|caps| {
            let label = text_content(&caps[2]);
            let value = attribute(&caps[1], "value").unwrap_or_else(|| label.clone());
            (value, label)
        })
        .collect()
}

/// id 包含 `fragment` 的最后一个元素的文本
pub fn text_by_id_fragment(html: &str, fragment: &str) -> Option<String> {
    let re = OPEN_TAG_RE.as_ref()?;
    let lower = html.to_ascii_lowercase();
    let mut found = None;

    for caps in re.captures_iter(html) {
        let Some(id) = attribute(&caps[2], "id") else {
            continue;
        };
        if !id.contains(fragment) {
            continue;
        }
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let start = whole.end();
        let closing = format!("</{}", caps[1].to_ascii_lowercase());
        if let Some(offset) = lower[start..].find(&closing) {
            found = Some(text_content(&html[start..start + offset]));
        }
    }

    found
}

/// 去掉标签、解码实体并去除首尾空白
pub fn text_content(fragment: &str) -> String {
    let stripped = match ANY_TAG_RE.as_ref() {
        Some(re) => re.replace_all(fragment, "").into_owned(),
        None => fragment.to_string(),
    };
    decode_entities(&stripped).trim().to_string()
}

/// 解码常见的 HTML 实体
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let Some(re) = ENTITY_RE.as_ref() else {
        return text.to_string();
    };
    re.replace_all(text, |caps: &Captures| {
        let entity = &caps[1];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32)
            }
            _ if entity.starts_with('#') => entity[1..].parse().ok().and_then(char::from_u32),
            _ => None,
        };
        decoded
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}
