use serde::{Deserialize, Serialize};

use crate::model::task::Column;
use crate::ops::sort::SortStrategy;

/// Display and behavior preferences, stored as a flat TOML document.
/// Every key is optional in the file; missing keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Ask where to put a new task created before the end of the file
    pub ask_for_new_task: bool,
    /// Ask before deleting a task line
    pub ask_for_delete: bool,
    pub card_hide_project: bool,
    pub card_hide_context: bool,
    pub card_hide_special_kv_data: bool,
    pub card_hide_index: bool,
    pub card_hide_priority: bool,
    pub card_hide_date: bool,
    pub card_hide_subject: bool,
    /// Position of the sort strategy in `SortStrategy::ALL`
    pub sort_method: usize,
    pub darkmode: bool,
    /// Hide the key memo footer
    pub hide_memo: bool,
    pub hide_buttons_move_to_column: bool,
    pub hide_buttons_assign_priority: bool,
    pub hide_buttons_move_line_up_down: bool,
    pub hide_button_add_date: bool,
    pub hide_button_delete: bool,
    pub column_0: String,
    pub column_1: String,
    pub column_2: String,
    pub column_3: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            ask_for_new_task: true,
            ask_for_delete: true,
            card_hide_project: false,
            card_hide_context: false,
            card_hide_special_kv_data: false,
            card_hide_index: false,
            card_hide_priority: false,
            card_hide_date: false,
            card_hide_subject: false,
            sort_method: 0,
            darkmode: false,
            hide_memo: false,
            hide_buttons_move_to_column: false,
            hide_buttons_assign_priority: false,
            hide_buttons_move_line_up_down: false,
            hide_button_add_date: false,
            hide_button_delete: false,
            column_0: "To Do".to_string(),
            column_1: "In progress".to_string(),
            column_2: "Validation".to_string(),
            column_3: "Done".to_string(),
        }
    }
}

impl Preferences {
    /// The configured sort strategy; an out-of-range value falls back to the default
    pub fn sort_strategy(&self) -> SortStrategy {
        SortStrategy::from_position(self.sort_method).unwrap_or_default()
    }

    /// Display name of a column
    pub fn column_name(&self, column: Column) -> &str {
        match column {
            Column::Backlog => &self.column_0,
            Column::InProgress => &self.column_1,
            Column::Validation => &self.column_2,
            Column::Done => &self.column_3,
        }
    }

    pub fn column_names(&self) -> [String; 4] {
        Column::ALL.map(|c| self.column_name(c).to_string())
    }

    pub(crate) fn set_column_names(&mut self, names: [String; 4]) {
        let [c0, c1, c2, c3] = names;
        self.column_0 = c0;
        self.column_1 = c1;
        self.column_2 = c2;
        self.column_3 = c3;
    }
}

/// A boolean preference that can be flipped from the options popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    AskForNewTask,
    AskForDelete,
    HideProject,
    HideContext,
    HideSpecialKv,
    HideIndex,
    HidePriority,
    HideDate,
    HideSubject,
    HideMemo,
    HideMoveToColumn,
    HideAssignPriority,
    HideMoveLine,
    HideAddDate,
    HideDelete,
}

impl Toggle {
    pub const ALL: [Toggle; 15] = [
        Toggle::AskForNewTask,
        Toggle::AskForDelete,
        Toggle::HideProject,
        Toggle::HideContext,
        Toggle::HideSpecialKv,
        Toggle::HideIndex,
        Toggle::HidePriority,
        Toggle::HideDate,
        Toggle::HideSubject,
        Toggle::HideMemo,
        Toggle::HideMoveToColumn,
        Toggle::HideAssignPriority,
        Toggle::HideMoveLine,
        Toggle::HideAddDate,
        Toggle::HideDelete,
    ];

    /// Key in the preferences file
    pub fn key(self) -> &'static str {
        match self {
            Toggle::AskForNewTask => "ask_for_new_task",
            Toggle::AskForDelete => "ask_for_delete",
            Toggle::HideProject => "card_hide_project",
            Toggle::HideContext => "card_hide_context",
            Toggle::HideSpecialKv => "card_hide_special_kv_data",
            Toggle::HideIndex => "card_hide_index",
            Toggle::HidePriority => "card_hide_priority",
            Toggle::HideDate => "card_hide_date",
            Toggle::HideSubject => "card_hide_subject",
            Toggle::HideMemo => "hide_memo",
            Toggle::HideMoveToColumn => "hide_buttons_move_to_column",
            Toggle::HideAssignPriority => "hide_buttons_assign_priority",
            Toggle::HideMoveLine => "hide_buttons_move_line_up_down",
            Toggle::HideAddDate => "hide_button_add_date",
            Toggle::HideDelete => "hide_button_delete",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Toggle::AskForNewTask => "Ask where to add new tasks",
            Toggle::AskForDelete => "Ask before deleting tasks",
            Toggle::HideProject => "Hide project tags on cards",
            Toggle::HideContext => "Hide context tags on cards",
            Toggle::HideSpecialKv => "Hide key:value data on cards",
            Toggle::HideIndex => "Hide line numbers on cards",
            Toggle::HidePriority => "Hide priority on cards",
            Toggle::HideDate => "Hide dates on cards",
            Toggle::HideSubject => "Hide subject on cards",
            Toggle::HideMemo => "Hide key memo",
            Toggle::HideMoveToColumn => "Hide move-to-column keys",
            Toggle::HideAssignPriority => "Hide priority keys",
            Toggle::HideMoveLine => "Hide move-line keys",
            Toggle::HideAddDate => "Hide add-date key",
            Toggle::HideDelete => "Hide delete key",
        }
    }

    pub fn get(self, prefs: &Preferences) -> bool {
        match self {
            Toggle::AskForNewTask => prefs.ask_for_new_task,
            Toggle::AskForDelete => prefs.ask_for_delete,
            Toggle::HideProject => prefs.card_hide_project,
            Toggle::HideContext => prefs.card_hide_context,
            Toggle::HideSpecialKv => prefs.card_hide_special_kv_data,
            Toggle::HideIndex => prefs.card_hide_index,
            Toggle::HidePriority => prefs.card_hide_priority,
            Toggle::HideDate => prefs.card_hide_date,
            Toggle::HideSubject => prefs.card_hide_subject,
            Toggle::HideMemo => prefs.hide_memo,
            Toggle::HideMoveToColumn => prefs.hide_buttons_move_to_column,
            Toggle::HideAssignPriority => prefs.hide_buttons_assign_priority,
            Toggle::HideMoveLine => prefs.hide_buttons_move_line_up_down,
            Toggle::HideAddDate => prefs.hide_button_add_date,
            Toggle::HideDelete => prefs.hide_button_delete,
        }
    }

    pub(crate) fn set(self, prefs: &mut Preferences, value: bool) {
        *self.field(prefs) = value;
    }

    fn field(self, prefs: &mut Preferences) -> &mut bool {
        match self {
            Toggle::AskForNewTask => &mut prefs.ask_for_new_task,
            Toggle::AskForDelete => &mut prefs.ask_for_delete,
            Toggle::HideProject => &mut prefs.card_hide_project,
            Toggle::HideContext => &mut prefs.card_hide_context,
            Toggle::HideSpecialKv => &mut prefs.card_hide_special_kv_data,
            Toggle::HideIndex => &mut prefs.card_hide_index,
            Toggle::HidePriority => &mut prefs.card_hide_priority,
            Toggle::HideDate => &mut prefs.card_hide_date,
            Toggle::HideSubject => &mut prefs.card_hide_subject,
            Toggle::HideMemo => &mut prefs.hide_memo,
            Toggle::HideMoveToColumn => &mut prefs.hide_buttons_move_to_column,
            Toggle::HideAssignPriority => &mut prefs.hide_buttons_assign_priority,
            Toggle::HideMoveLine => &mut prefs.hide_buttons_move_line_up_down,
            Toggle::HideAddDate => &mut prefs.hide_button_add_date,
            Toggle::HideDelete => &mut prefs.hide_button_delete,
        }
    }
}
