//! Gear checklist item (spec.md §3, §4.5).

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChecklistCategory {
    Clothing,
    Hydration,
    Navigation,
    Protection,
    Safety,
    Shelter,
    Advisory,
}

impl ChecklistCategory {
    pub fn label(self) -> &'static str {
        match self {
            ChecklistCategory::Clothing => "clothing",
            ChecklistCategory::Hydration => "hydration",
            ChecklistCategory::Navigation => "navigation",
            ChecklistCategory::Protection => "protection",
            ChecklistCategory::Safety => "safety",
            ChecklistCategory::Shelter => "shelter",
            ChecklistCategory::Advisory => "advisory",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChecklistItem {
    pub item: String,
    pub required: bool,
    pub reason: String,
    pub category: ChecklistCategory,
}

impl ChecklistItem {
    pub fn new(
        item: impl Into<String>,
        required: bool,
        reason: impl Into<String>,
        category: ChecklistCategory,
    ) -> Self {
        Self {
            item: item.into(),
            required,
            reason: reason.into(),
            category,
        }
    }
}
