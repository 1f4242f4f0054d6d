//! Source positions attached to nodes by the tree builder.

use crate::node::NodeRef;

/// Where a node came from in the source markup. Unknown parts are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceCodeLocation {
    pub start_line: Option<u64>,
    pub start_col: Option<u64>,
    pub start_offset: Option<u64>,
    pub end_line: Option<u64>,
    pub end_col: Option<u64>,
    pub end_offset: Option<u64>,
}

impl SourceCodeLocation {
    /// A location that only knows its start line
    pub fn starting_at_line(line: u64) -> Self {
        Self {
            start_line: Some(line),
            ..Self::default()
        }
    }

    /// A location that only knows its end line
    pub fn ending_at_line(line: u64) -> Self {
        Self {
            end_line: Some(line),
            ..Self::default()
        }
    }

    /// Overwrite every field that `update` knows
    pub fn merge(&mut self, update: &SourceCodeLocation) {
        fn take(field: &mut Option<u64>, value: Option<u64>) {
            if value.is_some() {
                *field = value;
            }
        }
        take(&mut self.start_line, update.start_line);
        take(&mut self.start_col, update.start_col);
        take(&mut self.start_offset, update.start_offset);
        take(&mut self.end_line, update.end_line);
        take(&mut self.end_col, update.end_col);
        take(&mut self.end_offset, update.end_offset);
    }
}

impl NodeRef {
    pub fn source_code_location(&self) -> Option<SourceCodeLocation> {
        *self.0.location.borrow()
    }

    pub fn set_source_code_location(&self, location: Option<SourceCodeLocation>) {
        *self.0.location.borrow_mut() = location;
    }

    /// Merge `update` into the current location, creating one if needed
    pub fn update_source_code_location(&self, update: &SourceCodeLocation) {
        self.0
            .location
            .borrow_mut()
            .get_or_insert_with(SourceCodeLocation::default)
            .merge(update);
    }
}
