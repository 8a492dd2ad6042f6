//! Screen state and views.

mod actions;
mod overview;
mod welcome;

pub use actions::{
    ActionKind, ActionPhase, ModalContext, ModalEvent, ModalState, SUCCESS_LINGER,
};
pub use overview::OverviewState;
pub use welcome::{WelcomeState, ANIMATION_TICK};

use crate::ui::components::RequestFailure;

/// Lifecycle of a one-shot request whose result is rendered inline.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Failure(RequestFailure),
}

impl<T> RequestState<T> {
    pub fn set_loading(&mut self) {
        *self = RequestState::Loading;
    }

    pub fn set_success(&mut self, value: T) {
        *self = RequestState::Success(value);
    }

    pub fn set_failure(&mut self, failure: RequestFailure) {
        *self = RequestState::Failure(failure);
    }

    pub fn reset(&mut self) {
        *self = RequestState::Idle;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn as_success(&self) -> Option<&T> {
        match self {
            RequestState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_failure(&self) -> Option<&RequestFailure> {
        match self {
            RequestState::Failure(failure) => Some(failure),
            _ => None,
        }
    }
}

/// State of a value kept fresh by background polling. A failed refresh keeps
/// the last good value so the screens never regress on a transient error.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolledState<T> {
    value: Option<T>,
    refreshing: bool,
    error: Option<RequestFailure>,
}

impl<T> PolledState<T> {
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn error(&self) -> Option<&RequestFailure> {
        self.error.as_ref()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// Marks a refresh as started. Returns `false` when one is already
    /// running, so pollers do not pile up requests.
    pub fn begin_refresh(&mut self) -> bool {
        if self.refreshing {
            return false;
        }
        self.refreshing = true;
        true
    }

    pub fn resolve(&mut self, outcome: Result<T, RequestFailure>) {
        self.refreshing = false;
        match outcome {
            Ok(value) => {
                self.value = Some(value);
                self.error = None;
            }
            Err(failure) => self.error = Some(failure),
        }
    }

    /// Direct replacement, used by the simulated mode where no request is
    /// involved.
    pub fn set_value(&mut self, value: T) {
        self.value = Some(value);
        self.error = None;
        self.refreshing = false;
    }

    pub fn clear(&mut self) {
        *self = Self {
            value: None,
            refreshing: false,
            error: None,
        };
    }
}

/// Shortens an address for header display. Strings that cannot be split on
/// character boundaries render whole.
pub fn short_address(address: &str) -> String {
    if address.len() > 12 {
        if let Some((head, tail)) = address.get(..6).zip(address.get(address.len() - 4..)) {
            return format!("{head}…{tail}");
        }
    }
    address.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polled_state_keeps_value_across_failed_refresh() {
        let mut state = PolledState::default();
        assert!(state.begin_refresh());
        state.resolve(Ok(41));
        assert_eq!(state.value(), Some(&41));

        assert!(state.begin_refresh());
        assert!(!state.begin_refresh());
        state.resolve(Err(RequestFailure::new("bridge offline", None)));
        assert_eq!(state.value(), Some(&41));
        assert!(state.error().is_some());
        assert!(!state.is_refreshing());

        assert!(state.begin_refresh());
        state.resolve(Ok(42));
        assert_eq!(state.value(), Some(&42));
        assert!(state.error().is_none());
    }

    #[test]
    fn request_state_transitions() {
        let mut state: RequestState<String> = RequestState::default();
        assert!(!state.is_loading());
        state.set_loading();
        assert!(state.is_loading());
        state.set_success("0.25".to_string());
        assert_eq!(state.as_success().map(String::as_str), Some("0.25"));
        state.set_failure(RequestFailure::new("boom", None));
        assert!(state.as_failure().is_some());
        state.reset();
        assert_eq!(state, RequestState::Idle);
    }

    #[test]
    fn addresses_are_shortened_for_display() {
        assert_eq!(
            short_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234…5678"
        );
        assert_eq!(short_address("0xabc"), "0xabc");
    }

    #[test]
    fn multibyte_addresses_fall_back_to_full_display() {
        assert_eq!(
            short_address("0x123é567890abcdef012345"),
            "0x123é567890abcdef012345"
        );
        assert_eq!(short_address("0x1234567890abcdeé123"), "0x1234567890abcdeé123");
    }
}
