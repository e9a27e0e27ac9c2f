//! Generator lifecycle.

/// Lifecycle state of a [`super::SequenceGenerator`].
///
/// ```text
/// Idle -> HeaderParsed -> Generating -> Done
///   \
///    `-> Aborted   (source unreadable, header unparsable, invalid config)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorState {
    /// Not started.
    #[default]
    Idle,
    /// Source header parsed; no frame generated yet.
    HeaderParsed,
    /// Walking the path.
    Generating,
    /// Finished normally.
    Done,
    /// Failed before any frame was generated.
    Aborted,
}

impl GeneratorState {
    /// Moves to `next` if the transition is allowed.
    ///
    /// Returns false and leaves the state unchanged otherwise.
    pub fn advance(&mut self, next: GeneratorState) -> bool {
        use GeneratorState::*;
        let allowed = matches!(
            (*self, next),
            (Idle, HeaderParsed) | (Idle, Aborted) | (HeaderParsed, Generating) | (Generating, Done)
        );
        if allowed {
            tracing::trace!(from = %self, to = %next, "Generator state change");
            *self = next;
        }
        allowed
    }

    /// Returns true for `Done` and `Aborted`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

impl std::fmt::Display for GeneratorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::HeaderParsed => "header-parsed",
            Self::Generating => "generating",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}
