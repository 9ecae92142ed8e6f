//! Primary Sample

use pbrt_core::pbrt::*;

/// Records the current value of a single component of the sample vector on
/// the interval [0,1).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PrimarySample {
    /// Sample value.
    pub value: Float,

    /// Iteration that last modified the value; negative until first touched.
    pub last_modification_iteration: i64,

    /// Backed up sample value.
    pub value_backup: Float,

    /// Backed up last modification iteration.
    pub modify_backup: i64,
}

impl Default for PrimarySample {
    /// Returns a sample that has never been touched.
    fn default() -> Self {
        Self {
            value: 0.0,
            last_modification_iteration: -1,
            value_backup: 0.0,
            modify_backup: -1,
        }
    }
}

impl PrimarySample {
    /// Backup the sample value.
    pub fn backup(&mut self) {
        self.value_backup = self.value;
        self.modify_backup = self.last_modification_iteration;
    }

    /// Restore the sample value.
    pub fn restore(&mut self) {
        self.value = self.value_backup;
        self.last_modification_iteration = self.modify_backup;
    }
}
