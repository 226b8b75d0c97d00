//! Selection configuration shared by the engine and the grid view.

use tracing::warn;

/// How cells can be selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CellSelectionMode {
    /// Only the active cell is tracked; nothing is ever selected.
    None,
    /// One cell at a time. Shift, ctrl and drag are ignored.
    Single,
    /// Ranges, ctrl-toggling and drag selection.
    #[default]
    Multiple,
}

/// How rows can be selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RowSelectionMode {
    #[default]
    None,
    Single,
    Multiple,
}

/// How columns can be selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ColumnSelectionMode {
    #[default]
    None,
    Single,
    Multiple,
}

macro_rules! impl_registry_mode {
    ($ty:ty) => {
        impl $ty {
            pub fn is_enabled(self) -> bool {
                !matches!(self, Self::None)
            }

            pub fn is_multiple(self) -> bool {
                matches!(self, Self::Multiple)
            }
        }
    };
}

impl_registry_mode!(RowSelectionMode);
impl_registry_mode!(ColumnSelectionMode);

/// Selection settings for one grid instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridSelectionConfig {
    pub cell_selection: CellSelectionMode,
    pub row_selection: RowSelectionMode,
    pub column_selection: ColumnSelectionMode,
    /// Field used as the row identifier. `None` means rows are identified by reference.
    pub primary_key: Option<String>,
    pub row_editable: bool,
}

impl GridSelectionConfig {
    /// Logs misconfiguration. Nothing here is fatal.
    ///
    /// Returns the number of warnings emitted.
    pub fn validate(&self, selectable_columns: usize) -> usize {
        let mut warnings = 0;
        if self.row_editable && self.primary_key.is_none() {
            warn!("row editing is enabled but no primary key is configured");
            warnings += 1;
        }
        if self.column_selection.is_enabled() && selectable_columns == 0 {
            warn!(
                mode = ?self.column_selection,
                "column selection is enabled but no column is selectable"
            );
            warnings += 1;
        }
        warnings
    }
}
