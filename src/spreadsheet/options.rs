use crate::error::ExtractError;
use glob::Pattern;

/// Options controlling how a workbook is loaded.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    /// Sheet name patterns selecting which sheets get control and caption recovery.
    /// `None` recovers controls for every sheet.
    pub control_sheets: Option<Vec<Pattern>>,

    /// Use cached formula results instead of the `=`-prefixed formula text.
    pub data_only: bool,
}

impl LoadOptions {
    /// Restricts control recovery to sheets matching any of the glob patterns.
    pub fn with_control_sheets(mut self, patterns: &[&str]) -> Result<Self, ExtractError> {
        let patterns = patterns
            .iter()
            .map(|pattern| Pattern::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;
        self.control_sheets = Some(patterns);
        Ok(self)
    }

    /// Checks if a sheet name matches the control sheet patterns.
    /// Returns true if no patterns are specified or if name matches any pattern.
    pub fn accept(&self, sheet_name: &str) -> bool {
        if let Some(patterns) = &self.control_sheets {
            for pattern in patterns {
                if pattern.matches(sheet_name) {
                    return true;
                }
            }
            false
        } else {
            true
        }
    }
}
