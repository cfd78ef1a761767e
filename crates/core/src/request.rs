//! Request lifecycle for a single asynchronous action (login, submit, ...).
//!
//! One value per operation. Only the terminal result of a request is applied,
//! and a new request is refused while one is in flight.

/// State of the most recent request for one operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState<T, E> {
    #[default]
    Idle,
    InFlight,
    Succeeded(T),
    Failed(E),
}

impl<T, E> RequestState<T, E> {
    pub fn is_idle(&self) -> bool {
        matches!(self, RequestState::Idle)
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, RequestState::InFlight)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, RequestState::Succeeded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RequestState::Failed(_))
    }

    /// Move to `InFlight`.
    ///
    /// Returns `false` (and leaves the state alone) when a request is already
    /// outstanding.
    pub fn begin(&mut self) -> bool {
        if self.is_in_flight() {
            return false;
        }
        *self = RequestState::InFlight;
        true
    }

    /// Apply the terminal result of the outstanding request.
    pub fn finish(&mut self, result: Result<T, E>) {
        *self = match result {
            Ok(value) => RequestState::Succeeded(value),
            Err(err) => RequestState::Failed(err),
        };
    }

    /// Forget the last result and return to `Idle`.
    pub fn reset(&mut self) {
        *self = RequestState::Idle;
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            RequestState::Succeeded(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            RequestState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_refused_while_in_flight() {
        let mut state: RequestState<u32, String> = RequestState::default();
        assert!(state.begin());
        assert!(!state.begin());
        assert!(state.is_in_flight());
    }

    #[test]
    fn finish_records_terminal_result() {
        let mut state: RequestState<u32, String> = RequestState::Idle;
        state.begin();
        state.finish(Err("boom".to_string()));
        assert_eq!(state.error().map(String::as_str), Some("boom"));

        assert!(state.begin());
        state.finish(Ok(3));
        assert_eq!(state.value(), Some(&3));
        assert!(state.error().is_none());
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut state: RequestState<(), ()> = RequestState::Succeeded(());
        state.reset();
        assert!(state.is_idle());
    }
}
