//! Time step operations.

use crate::error::{ExodusError, Result};
use crate::ExodusFile;

impl ExodusFile {
    /// Write the time value of `step` (1-based) to `time_whole`.
    ///
    /// The `time_step` dimension is unlimited; writing a step extends it.
    ///
    /// # Errors
    ///
    /// Fails if `step` is zero.
    pub fn put_time(&mut self, step: usize, value: f64) -> Result<()> {
        if step == 0 {
            return Err(ExodusError::InvalidTimeStep(step));
        }

        let mut var = self
            .nc
            .variable_mut("time_whole")
            .ok_or_else(|| ExodusError::VariableNotDefined("time_whole".to_string()))?;
        var.put_values(&[value], step - 1..step)?;

        Ok(())
    }
}
