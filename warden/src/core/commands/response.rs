use eyre::Report;

/// Outcome of a command body that ran to completion.
///
/// An unexpected failure is returned as `Err` from the body instead.
#[derive(Debug)]
pub struct Response {
    pub success: bool,
    /// Whether the cooldown window of the caller starts now
    pub trigger_cooldown: bool,
    /// Why an expected failure happened
    pub error: Option<Report>,
}

impl Response {
    pub fn success() -> Self {
        Self {
            success: true,
            trigger_cooldown: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<Option<Report>>) -> Self {
        Self {
            success: false,
            trigger_cooldown: true,
            error: error.into(),
        }
    }

    /// Don't start a cooldown for this execution.
    pub fn skip_cooldown(mut self) -> Self {
        self.trigger_cooldown = false;

        self
    }
}

impl Default for Response {
    #[inline]
    fn default() -> Self {
        Self::success()
    }
}
