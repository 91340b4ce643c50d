use std::fmt;
use toaster_tables::FilterInfo;

use super::text::pad;

pub struct FilterInfoView<'a> {
    info: &'a FilterInfo,
}

impl<'a> FilterInfoView<'a> {
    pub fn new(info: &'a FilterInfo) -> Self {
        Self { info }
    }
}

impl fmt::Display for FilterInfoView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.info.name, self.info.title)?;

        let width = self
            .info
            .filter_actions
            .iter()
            .map(|a| a.action_name.len())
            .max()
            .unwrap_or(0);
        for action in &self.info.filter_actions {
            let count = match action.count {
                Some(n) => n.to_string(),
                None => "-".to_string(),
            };
            writeln!(
                f,
                "  {}  {:>5}  {}",
                pad(&action.action_name, width),
                count,
                action.title
            )?;
        }
        Ok(())
    }
}
