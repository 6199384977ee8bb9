//! 下拉选项扫描 - 业务能力层
//!
//! 只负责从页面中读取某个下拉框的可选项，不关心流程

use crate::models::OptionEntity;
use crate::utils::markup;
use tracing::debug;

/// 读取 `control` 下拉框的选项
///
/// 第一个选项总是占位项（如 "-- Select --"），始终被排除。
/// 控件不存在时返回空列表，表示该表单已无待提交项。
pub fn scan(body: &str, control: &str) -> Vec<OptionEntity> {
    let Some(inner) = markup::select_inner(body, control) else {
        debug!("页面中没有下拉框 {}", control);
        return Vec::new();
    };

    markup::options(inner)
        .into_iter()
        .skip(1)
        .map(|(value, label)| OptionEntity::new(value, label))
        .collect()
}

/// 读取 id 包含 `fragment` 的元素文本（取最后一个）
pub fn scrape_label(body: &str, fragment: &str) -> Option<String> {
    markup::text_by_id_fragment(body, fragment)
}
