use std::fmt::Display;

/// 下拉框中的一个可选项
///
/// `value` 是服务器分配的键，`label` 是唯一可用于跨表单匹配的名称
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntity {
    pub value: String,
    pub label: String,
}

impl OptionEntity {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl Display for OptionEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}
