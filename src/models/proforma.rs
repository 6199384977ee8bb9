//! 表单布局
//!
//! 三份评价表与登录页的控件名称、题目数量和固定文本

use crate::models::form::FormData;
use crate::models::option::OptionEntity;
use crate::models::rating::Rating;
use std::fmt;

/// 触发依赖字段刷新时使用的隐藏字段
pub const EVENT_TARGET_FIELD: &str = "__EVENTTARGET";

/// 讲师详情中课程标签的 id 片段
pub const COURSE_LABEL_ID: &str = "lblCourse";

/// 登录页布局
#[derive(Debug, Clone, Copy)]
pub struct LoginLayout {
    pub path: &'static str,
    pub campus_field: &'static str,
    pub user_type_field: &'static str,
    pub username_field: &'static str,
    pub password_field: &'static str,
    pub button_field: &'static str,
    pub button_value: &'static str,
}

pub const LOGIN: LoginLayout = LoginLayout {
    path: "login.aspx",
    campus_field: "ctl00$ContentPlaceHolder2$ddlcampus",
    user_type_field: "ctl00$ContentPlaceHolder2$ddlUserType",
    username_field: "ctl00$ContentPlaceHolder2$txt_regid",
    password_field: "ctl00$ContentPlaceHolder2$txt_password",
    button_field: "ctl00$ContentPlaceHolder2$btnAccountlogin",
    button_value: "Login",
};

/// 评价表类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProformaKind {
    /// 课程评价（p1）
    Subject,
    /// 讲师评价（p10）
    Instructor,
    /// 在线学习反馈（p10a）
    OnlineLearning,
}

impl ProformaKind {
    pub fn short_name(&self) -> &'static str {
        match self {
            ProformaKind::Subject => "p1",
            ProformaKind::Instructor => "p10",
            ProformaKind::OnlineLearning => "p10a",
        }
    }
}

impl fmt::Display for ProformaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// 评分来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingSource {
    /// 通过课程名关联讲师评分
    Correlated,
    /// 直接使用讲师评分
    Captured,
}

/// 一份评价表的布局
#[derive(Debug, Clone, Copy)]
pub struct Proforma {
    pub kind: ProformaKind,
    pub title: &'static str,
    pub path: &'static str,
    pub dropdown: &'static str,
    pub question_prefix: &'static str,
    pub question_count: usize,
    pub free_text: &'static [(&'static str, &'static str)],
    pub submit_field: &'static str,
    pub submit_value: &'static str,
    pub rating_source: RatingSource,
    pub already_filled_message: &'static str,
    pub completed_message: &'static str,
}

impl Proforma {
    pub const fn subject() -> Self {
        Self {
            kind: ProformaKind::Subject,
            title: "Subjects evaluation",
            path: "p1.aspx",
            dropdown: "ctl00$ContentPlaceHolder2$cmb_courses",
            question_prefix: "ctl00$ContentPlaceHolder2$q",
            question_count: 12,
            free_text: &[],
            submit_field: "ctl00$ContentPlaceHolder2$btnSave",
            submit_value: "Submit Proforma",
            rating_source: RatingSource::Correlated,
            already_filled_message: "Subjects evaluation proforma already filled",
            completed_message: "Subjects evaluation proforma filled successfully.",
        }
    }

    pub const fn instructor() -> Self {
        Self {
            kind: ProformaKind::Instructor,
            title: "Teacher evaluation",
            path: "p10.aspx",
            dropdown: "ctl00$ContentPlaceHolder2$ddlTeacher",
            question_prefix: "ctl00$ContentPlaceHolder2$q",
            question_count: 16,
            free_text: &[
                ("ctl00$ContentPlaceHolder2$q20", "Good instructor"),
                ("ctl00$ContentPlaceHolder2$q21", "Good course"),
            ],
            submit_field: "ctl00$ContentPlaceHolder2$btnSave",
            submit_value: "Save Proforma Proforma",
            rating_source: RatingSource::Captured,
            already_filled_message: "Teacher evaluation forms already filled",
            completed_message: "Teacher evaluations proforma filled successfully.",
        }
    }

    pub const fn online_learning() -> Self {
        Self {
            kind: ProformaKind::OnlineLearning,
            title: "Online learning feedback",
            path: "p10a_learning_online_form.aspx",
            dropdown: "ctl00$ContentPlaceHolder1$cmb_courses",
            question_prefix: "ctl00$ContentPlaceHolder1$q",
            question_count: 16,
            free_text: &[(
                "ctl00$ContentPlaceHolder1$q20",
                "Good online learning experience",
            )],
            submit_field: "ctl00$ContentPlaceHolder1$btnSave",
            submit_value: "Submit Proforma",
            rating_source: RatingSource::Correlated,
            already_filled_message: "Online Learning Feedback Proformas already filled",
            completed_message: "Online learning feedback proformas filled successfully.",
        }
    }

    /// 按提交顺序排列的三份评价表
    pub fn all() -> [Proforma; 3] {
        [Self::subject(), Self::instructor(), Self::online_learning()]
    }

    /// 第 `index` 题的字段名（从 1 开始）
    pub fn question_field(&self, index: usize) -> String {
        format!("{}{}", self.question_prefix, index)
    }

    /// 选中某项并触发依赖字段刷新的表单（不含令牌）
    pub fn reveal_form(&self, option: &OptionEntity) -> FormData {
        let mut form = FormData::new();
        form.set(EVENT_TARGET_FIELD, self.dropdown)
            .set(self.dropdown, option.value.as_str());
        form
    }

    /// 完整提交表单（不含令牌）
    pub fn submission_form(&self, option: &OptionEntity, rating: Rating) -> FormData {
        let mut form = FormData::new();
        form.set(self.dropdown, option.value.as_str());
        for index in 1..=self.question_count {
            form.set(self.question_field(index), rating.as_str());
        }
        for (field, text) in self.free_text {
            form.set(*field, *text);
        }
        form.set(self.submit_field, self.submit_value);
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_submission_has_twelve_questions() {
        let proforma = Proforma::subject();
        let form = proforma.submission_form(&OptionEntity::new("42", "Data Structures Lab"), Rating::B);

        for i in 1..=12 {
            assert_eq!(form.get(&proforma.question_field(i)), Some("B"));
        }
        assert!(!form.contains(&proforma.question_field(13)));
        assert_eq!(form.get(proforma.dropdown), Some("42"));
        assert_eq!(form.get(proforma.submit_field), Some("Submit Proforma"));
        assert!(!form.contains(EVENT_TARGET_FIELD));
    }

    #[test]
    fn test_instructor_submission_has_comments() {
        let proforma = Proforma::instructor();
        let form = proforma.submission_form(&OptionEntity::new("7", "Dr. Ali"), Rating::C);

        assert_eq!(form.get("ctl00$ContentPlaceHolder2$q16"), Some("C"));
        assert!(!form.contains("ctl00$ContentPlaceHolder2$q17"));
        assert_eq!(form.get("ctl00$ContentPlaceHolder2$q20"), Some("Good instructor"));
        assert_eq!(form.get("ctl00$ContentPlaceHolder2$q21"), Some("Good course"));
        // 16 questions + dropdown + 2 comments + submit
        assert_eq!(form.len(), 16 + 1 + 2 + 1);
    }

    #[test]
    fn test_reveal_form_names_dropdown() {
        let proforma = Proforma::online_learning();
        let form = proforma.reveal_form(&OptionEntity::new("3", "Compilers"));
        assert_eq!(form.get(EVENT_TARGET_FIELD), Some(proforma.dropdown));
        assert_eq!(form.get(proforma.dropdown), Some("3"));
        assert_eq!(form.len(), 2);
    }
}
