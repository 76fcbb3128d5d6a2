use std::collections::BTreeSet;

/// 进度条目类型，对应 progress_items.kind 列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressKind {
    Video,
    Assignment,
    Section,
    /// 章节资料里程碑，item_id 为章节 id
    Resources,
}

impl ProgressKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressKind::Video => "video",
            ProgressKind::Assignment => "assignment",
            ProgressKind::Section => "section",
            ProgressKind::Resources => "resources",
        }
    }
}

impl std::str::FromStr for ProgressKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(ProgressKind::Video),
            "assignment" => Ok(ProgressKind::Assignment),
            "section" => Ok(ProgressKind::Section),
            "resources" => Ok(ProgressKind::Resources),
            _ => Err(format!("Invalid progress kind: {s}")),
        }
    }
}

/// 某学生在某门课程上的学习进度
///
/// 四个集合只增不减。
#[derive(Debug, Clone, PartialEq)]
pub struct CourseProgress {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub videos_watched: BTreeSet<i64>,
    pub assignments_submitted: BTreeSet<i64>,
    pub sections_completed: BTreeSet<i64>,
    pub resources_completed: BTreeSet<i64>,
    /// 最近一次章节完成的时间，证书日期取自此处
    pub last_section_completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl CourseProgress {
    pub fn set_mut(&mut self, kind: ProgressKind) -> &mut BTreeSet<i64> {
        match kind {
            ProgressKind::Video => &mut self.videos_watched,
            ProgressKind::Assignment => &mut self.assignments_submitted,
            ProgressKind::Section => &mut self.sections_completed,
            ProgressKind::Resources => &mut self.resources_completed,
        }
    }

    /// 已完成且仍属于课程的章节数
    pub fn completed_section_count(&self, course_sections: &[i64]) -> usize {
        course_sections
            .iter()
            .filter(|id| self.sections_completed.contains(id))
            .count()
    }

    /// 完成百分比，四舍五入（.5 远离零），课程无章节时为 0
    pub fn completion_percentage(&self, course_sections: &[i64]) -> u8 {
        completion_percentage(self.completed_section_count(course_sections), course_sections.len())
    }

    /// 课程至少有一个章节且全部完成
    pub fn is_course_complete(&self, course_sections: &[i64]) -> bool {
        !course_sections.is_empty()
            && self.completed_section_count(course_sections) == course_sections.len()
    }
}

/// round(100 * completed / total)，用整数运算避免浮点误差
pub fn completion_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((200 * completed + total) / (2 * total)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress_with_sections(done: &[i64]) -> CourseProgress {
        let now = chrono::Utc::now();
        CourseProgress {
            id: 1,
            user_id: 1,
            course_id: 1,
            videos_watched: BTreeSet::new(),
            assignments_submitted: BTreeSet::new(),
            sections_completed: done.iter().copied().collect(),
            resources_completed: BTreeSet::new(),
            last_section_completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_three_of_four_sections() {
        let progress = progress_with_sections(&[1, 2, 3]);
        assert_eq!(progress.completion_percentage(&[1, 2, 3, 4]), 75);
        assert!(!progress.is_course_complete(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_empty_course_is_zero() {
        let progress = progress_with_sections(&[]);
        assert_eq!(progress.completion_percentage(&[]), 0);
        assert!(!progress.is_course_complete(&[]));
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(1, 8), 13); // 12.5
        assert_eq!(completion_percentage(1, 200), 1); // 0.5
        assert_eq!(completion_percentage(3, 3), 100);
    }

    #[test]
    fn test_sections_outside_course_are_ignored() {
        // 已不属于课程的章节不计入
        let progress = progress_with_sections(&[1, 99]);
        assert_eq!(progress.completion_percentage(&[1, 2]), 50);
    }

    #[test]
    fn test_progress_kind_names() {
        for kind in [
            ProgressKind::Video,
            ProgressKind::Assignment,
            ProgressKind::Section,
            ProgressKind::Resources,
        ] {
            assert_eq!(kind.as_str().parse::<ProgressKind>().unwrap(), kind);
        }
    }
}
